//! Local clock adapter: current date, time, weekday and UTC offset.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Local, TimeZone, Utc};
use concierge_core::error::ToolError;
use concierge_core::tool::{DEFAULT_TOOL_TIMEOUT, ToolAdapter, ToolOutput};

pub struct DateTimeTool {
    timeout: Duration,
}

impl DateTimeTool {
    pub fn new() -> Self {
        Self {
            timeout: DEFAULT_TOOL_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for DateTimeTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ToolAdapter for DateTimeTool {
    fn name(&self) -> &str {
        "datetime"
    }

    fn description(&self) -> &str {
        "Current local date and time, weekday, and the equivalent UTC time."
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn call(&self, _parameters: serde_json::Value) -> Result<ToolOutput, ToolError> {
        Ok(describe(&Local::now()))
    }
}

/// Render `now` (in any zone) with its UTC equivalent.
fn describe<Tz: TimeZone>(now: &DateTime<Tz>) -> ToolOutput
where
    Tz::Offset: std::fmt::Display,
{
    let utc: DateTime<Utc> = now.with_timezone(&Utc);
    let output = format!(
        "It is {} on {}. (UTC: {})",
        now.format("%H:%M"),
        now.format("%A, %-d %B %Y"),
        utc.format("%Y-%m-%d %H:%M"),
    );

    ToolOutput::with_data(
        output,
        serde_json::json!({
            "local": now.to_rfc3339(),
            "utc": utc.to_rfc3339(),
            "weekday": now.format("%A").to_string(),
            "month": now.format("%B").to_string(),
            "year": now.format("%Y").to_string(),
        }),
    )
}
