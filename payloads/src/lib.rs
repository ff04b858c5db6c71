//! Inbound payload model for the observer websocket.
//!
//! The observer endpoint pushes a mix of typed JSON events and bare strings.
//! [`decode`] turns any frame into an [`InboundPayload`] and never fails: text
//! that is not JSON, a known event with a body that does not fit, and JSON of
//! any other shape land in explicit fallback variants instead of an error.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Labels the server uses when a robot reports through a bare string frame.
pub const ROBOT_TEXT_LABELS: [&str; 2] = ["Robot Bogotá", "Robot Medellín"];

/// `type` discriminators of the typed events.
pub const EVENT_TYPES: [&str; 3] = ["weather_update", "chat_response", "connection"];

/// A decoded inbound frame.
#[derive(Clone, Debug, PartialEq)]
pub enum InboundPayload {
    /// Periodic reading pushed by one of the server-side weather robots.
    WeatherUpdate(WeatherUpdate),
    /// Answer from the server chat bot to a message sent by this client.
    ChatResponse { message: String },
    /// Server-side connection notice, e.g. the welcome line.
    ConnectionNotice { message: String },
    /// Valid JSON without a recognized `type`.
    UnrecognizedJson {
        /// The `message` field when it is a non-empty string.
        message: Option<String>,
        /// The frame exactly as received.
        raw: String,
    },
    /// Frame that is not JSON at all, or a known event whose body does not
    /// fit it. Handled like any bare string, robot labels included.
    Text(String),
}

impl InboundPayload {
    /// Wire discriminator of the typed variants, `None` for fallbacks.
    #[must_use]
    pub fn kind(&self) -> Option<&'static str> {
        match self {
            Self::WeatherUpdate(_) => Some("weather_update"),
            Self::ChatResponse { .. } => Some("chat_response"),
            Self::ConnectionNotice { .. } => Some("connection"),
            Self::UnrecognizedJson { .. } | Self::Text(_) => None,
        }
    }
}

/// `{"type": "weather_update", ...}` event body.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WeatherUpdate {
    /// Robot identifier, e.g. `robot_bogota` or a display name.
    pub robot: String,
    pub data: WeatherReading,
    /// Display line prepared by the server.
    pub message: String,
}

/// Reading carried by a [`WeatherUpdate`].
///
/// Only `temperature` is required; the simulated and live producers fill the
/// rest inconsistently.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WeatherReading {
    pub temperature: f64,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub humidity: Option<f64>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default)]
    pub emoji: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub real_data: Option<bool>,
    #[serde(default)]
    pub altitude: Option<f64>,
}

#[derive(Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum TypedPayload {
    WeatherUpdate(WeatherUpdate),
    ChatResponse { message: String },
    Connection { message: String },
}

impl From<TypedPayload> for InboundPayload {
    fn from(value: TypedPayload) -> Self {
        match value {
            TypedPayload::WeatherUpdate(update) => Self::WeatherUpdate(update),
            TypedPayload::ChatResponse { message } => Self::ChatResponse { message },
            TypedPayload::Connection { message } => Self::ConnectionNotice { message },
        }
    }
}

/// Decode one inbound text frame.
#[must_use]
pub fn decode(raw: &str) -> InboundPayload {
    let Ok(value) = serde_json::from_str::<Value>(raw) else {
        return InboundPayload::Text(raw.to_owned());
    };

    match TypedPayload::deserialize(&value) {
        Ok(typed) => typed.into(),
        Err(_) if names_event_type(&value) => InboundPayload::Text(raw.to_owned()),
        Err(_) => InboundPayload::UnrecognizedJson {
            message: value
                .get("message")
                .and_then(Value::as_str)
                .filter(|message| !message.is_empty())
                .map(ToOwned::to_owned),
            raw: raw.to_owned(),
        },
    }
}

fn names_event_type(value: &Value) -> bool {
    value.get("type").and_then(Value::as_str).is_some_and(|kind| EVENT_TYPES.contains(&kind))
}

/// Whether a bare string frame was produced by one of the city robots.
#[must_use]
pub fn is_robot_text(text: &str) -> bool {
    ROBOT_TEXT_LABELS.iter().any(|label| text.contains(label))
}

#[cfg(test)]
#[path = "lib_test.rs"]
mod tests;
