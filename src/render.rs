//! Terminal formatting for transcript entries, toasts and lookups.

#[cfg(test)]
#[path = "render_test.rs"]
mod render_test;

use client::services::auth::User;
use client::services::weather::CityWeather;
use client::state::connection::RobotConnections;
use client::state::notifications::Notification;
use client::{Message, MessageKind, Severity};

pub const HELP: &str = "commands: /status  /reconnect  /help  /quit  (anything else is sent as chat)";

fn kind_icon(kind: MessageKind) -> &'static str {
    match kind {
        MessageKind::Robot => "🤖",
        MessageKind::System => "ℹ️",
        MessageKind::User => "👤",
        MessageKind::Notification => "🔔",
    }
}

/// `[HH:MM:SS] 🤖 Robot: 🏔️ Bogotá 15°C`
pub fn message_line(message: &Message) -> String {
    format!("[{}] {} {}: {}", message.clock(), kind_icon(message.kind), message.sender, message.content)
}

pub fn toast_line(text: &str, severity: Severity) -> String {
    format!("({severity}) {text}")
}

pub fn status_block<'a>(connections: RobotConnections, toasts: impl Iterator<Item = &'a Notification>) -> String {
    let mut out = connections.status_line();
    for toast in toasts {
        out.push_str("\n  ");
        out.push_str(&toast_line(&toast.message.content, toast.severity));
    }
    out
}

pub fn weather_line(weather: &CityWeather) -> String {
    let city = weather.city;
    let source = if weather.live { "" } else { " (sin conexión, valor estimado)" };
    format!("{} {}: {}°C a las {}{source}", city.emoji(), city.name(), weather.temperature, weather.time)
}

pub fn user_line(user: &User) -> String {
    if user.email.is_empty() { user.name.clone() } else { format!("{} <{}>", user.name, user.email) }
}
