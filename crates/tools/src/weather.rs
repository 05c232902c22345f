//! Weather adapters backed by the OpenWeatherMap 2.5 API.
//!
//! Two adapters share one [`WeatherApi`] handle:
//! - `current_weather` calls `/weather`
//! - `weather_forecast` calls `/forecast` and keeps the first five entries

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use concierge_core::error::ToolError;
use concierge_core::tool::{DEFAULT_TOOL_TIMEOUT, ToolAdapter, ToolOutput};
use serde_json::Value;

use crate::http::{get_json, required_str};

const FORECAST_ENTRIES: usize = 5;

/// Connection settings shared by both weather adapters.
pub struct WeatherApi {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    units: String,
}

impl WeatherApi {
    pub fn new(
        client: reqwest::Client,
        base_url: impl Into<String>,
        api_key: Option<String>,
        units: impl Into<String>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.filter(|k| !k.is_empty()),
            units: units.into(),
        }
    }

    async fn fetch(&self, tool_name: &str, endpoint: &str, location: &str) -> Result<Value, ToolError> {
        let api_key = self.api_key.as_deref().ok_or_else(|| ToolError::NotConfigured {
            tool_name: tool_name.to_string(),
            reason: "set WEATHER_API_KEY or [weather].api_key".into(),
        })?;

        let url = format!("{}/{endpoint}", self.base_url);
        get_json(
            &self.client,
            tool_name,
            &url,
            &[("q", location), ("appid", api_key), ("units", self.units.as_str())],
        )
        .await
    }

    fn temp_unit(&self) -> &'static str {
        if self.units == "imperial" { "°F" } else { "°C" }
    }

    fn speed_unit(&self) -> &'static str {
        if self.units == "imperial" { "mph" } else { "m/s" }
    }
}

/// Current conditions for a location.
pub struct CurrentWeatherTool {
    api: Arc<WeatherApi>,
    timeout: Duration,
}

impl CurrentWeatherTool {
    pub fn new(api: Arc<WeatherApi>) -> Self {
        Self {
            api,
            timeout: DEFAULT_TOOL_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[async_trait]
impl ToolAdapter for CurrentWeatherTool {
    fn name(&self) -> &str {
        "current_weather"
    }

    fn description(&self) -> &str {
        "Current temperature, conditions, humidity and wind for a location."
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn call(&self, parameters: Value) -> Result<ToolOutput, ToolError> {
        let location = required_str(&parameters, "location")?;
        let body = self.api.fetch(self.name(), "weather", location).await?;

        let main = &body["main"];
        let temp = main["temp"].as_f64().ok_or_else(|| ToolError::RemoteError {
            tool_name: self.name().to_string(),
            status: Some(200),
            message: "invalid response".into(),
        })?;
        let place = body["name"].as_str().unwrap_or(location);
        let conditions = describe_conditions(&body["weather"]);
        let unit = self.api.temp_unit();

        let mut output = format!("Current weather in {place}: {temp:.1}{unit}");
        if let Some(feels_like) = main["feels_like"].as_f64() {
            output.push_str(&format!(" (feels like {feels_like:.1}{unit})"));
        }
        output.push_str(&format!(", {conditions}."));
        if let Some(humidity) = main["humidity"].as_f64() {
            output.push_str(&format!(" Humidity {humidity:.0}%."));
        }
        if let Some(speed) = body["wind"]["speed"].as_f64() {
            output.push_str(&format!(" Wind {speed:.1} {}.", self.api.speed_unit()));
        }

        Ok(ToolOutput::with_data(output, body))
    }
}

/// Short-range forecast for a location.
pub struct WeatherForecastTool {
    api: Arc<WeatherApi>,
    timeout: Duration,
}

impl WeatherForecastTool {
    pub fn new(api: Arc<WeatherApi>) -> Self {
        Self {
            api,
            timeout: DEFAULT_TOOL_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[async_trait]
impl ToolAdapter for WeatherForecastTool {
    fn name(&self) -> &str {
        "weather_forecast"
    }

    fn description(&self) -> &str {
        "Upcoming forecast entries (temperature and conditions) for a location."
    }

    fn timeout(&self) -> Duration {
        self.timeout
    }

    async fn call(&self, parameters: Value) -> Result<ToolOutput, ToolError> {
        let location = required_str(&parameters, "location")?;
        let body = self.api.fetch(self.name(), "forecast", location).await?;

        let entries = body["list"].as_array().cloned().unwrap_or_default();
        let place = body["city"]["name"].as_str().unwrap_or(location);

        if entries.is_empty() {
            return Ok(ToolOutput::text(format!("No forecast data available for {place}.")));
        }

        let unit = self.api.temp_unit();
        let mut output = format!("Forecast for {place}:");
        for (i, entry) in entries.iter().take(FORECAST_ENTRIES).enumerate() {
            let when = entry["dt_txt"]
                .as_str()
                .map(String::from)
                .unwrap_or_else(|| format!("Period {}", i + 1));
            let temp = entry["main"]["temp"]
                .as_f64()
                .map(|t| format!("{t:.1}{unit}"))
                .unwrap_or_else(|| "n/a".into());
            let conditions = describe_conditions(&entry["weather"]);
            output.push_str(&format!("\n- {when}: {temp}, {conditions}"));
        }

        let kept: Vec<Value> = entries.into_iter().take(FORECAST_ENTRIES).collect();
        Ok(ToolOutput::with_data(output, Value::Array(kept)))
    }
}

/// First `weather[].description`, or a neutral placeholder.
fn describe_conditions(weather: &Value) -> String {
    weather[0]["description"]
        .as_str()
        .map(String::from)
        .unwrap_or_else(|| "conditions unavailable".into())
}
