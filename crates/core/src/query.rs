//! Query and ConfidenceScore value types.
//!
//! A [`Query`] is what enters the pipeline: the user's text plus where it
//! came from. A [`ConfidenceScore`] is what an agent says about it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::RoutingError;

/// How the query reached the system.
///
/// Voice queries are transcribed by the transport layer before they get
/// here; the core only ever sees text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Modality {
    #[default]
    Text,
    Voice,
}

impl std::fmt::Display for Modality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text => f.write_str("text"),
            Self::Voice => f.write_str("voice"),
        }
    }
}

impl std::str::FromStr for Modality {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "voice" => Ok(Self::Voice),
            other => Err(format!("unknown modality '{other}' (expected text or voice)")),
        }
    }
}

/// An immutable user request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Query {
    id: Uuid,
    text: String,
    modality: Modality,
    received_at: DateTime<Utc>,
}

impl Query {
    /// Build a query, rejecting text that is empty after trimming.
    pub fn new(text: impl Into<String>, modality: Modality) -> Result<Self, RoutingError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(RoutingError::EmptyQuery);
        }
        Ok(Self::unchecked(text, modality))
    }

    /// Build a query without validation. The router still rejects blank text.
    pub fn unchecked(text: impl Into<String>, modality: Modality) -> Self {
        Self {
            id: Uuid::new_v4(),
            text: text.into(),
            modality,
            received_at: Utc::now(),
        }
    }

    /// Shorthand for a text-modality query.
    pub fn text(text: impl Into<String>) -> Result<Self, RoutingError> {
        Self::new(text, Modality::Text)
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// The raw text as received.
    pub fn raw(&self) -> &str {
        &self.text
    }

    /// The text with surrounding whitespace removed.
    pub fn trimmed(&self) -> &str {
        self.text.trim()
    }

    /// Lower-cased, trimmed text used by scoring heuristics.
    pub fn normalized(&self) -> String {
        self.text.trim().to_lowercase()
    }

    pub fn modality(&self) -> Modality {
        self.modality
    }

    pub fn received_at(&self) -> DateTime<Utc> {
        self.received_at
    }

    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// An agent's self-assessed suitability for one query, always in `[0, 1]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConfidenceScore(f64);

impl ConfidenceScore {
    pub const ZERO: Self = Self(0.0);
    pub const MAX: Self = Self(1.0);

    /// Sanitize a raw score: non-finite values become 0.0 and everything else
    /// is clamped into `[0, 1]`.
    pub fn new(raw: f64) -> Self {
        if raw.is_finite() {
            Self(raw.clamp(0.0, 1.0))
        } else {
            Self::ZERO
        }
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

impl From<f64> for ConfidenceScore {
    fn from(raw: f64) -> Self {
        Self::new(raw)
    }
}

impl std::fmt::Display for ConfidenceScore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}
