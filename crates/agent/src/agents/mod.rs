//! The built-in specialist agents.

pub mod general;
pub mod research;
pub mod text;
pub mod weather;

pub use general::GeneralAgent;
pub use research::ResearchAgent;
pub use weather::WeatherAgent;
