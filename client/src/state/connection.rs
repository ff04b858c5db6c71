//! Connection flags shown in the status banner.

#[cfg(test)]
#[path = "connection_test.rs"]
mod connection_test;

/// One flag per logical peer.
///
/// `robot_a` (Bogotá) and `robot_b` (Medellín) are server-side background
/// producers the client cannot observe; they stay `true`. Only `observer`
/// follows the real socket.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RobotConnections {
    pub observer: bool,
    pub robot_a: bool,
    pub robot_b: bool,
}

impl Default for RobotConnections {
    fn default() -> Self {
        Self { observer: false, robot_a: true, robot_b: true }
    }
}

impl RobotConnections {
    /// One-line banner, e.g. `Observer: ✅ | 🏔️ Bogotá: ✅ | 🌺 Medellín: ✅`.
    #[must_use]
    pub fn status_line(&self) -> String {
        format!(
            "Observer: {} | 🏔️ Bogotá: {} | 🌺 Medellín: {}",
            mark(self.observer),
            mark(self.robot_a),
            mark(self.robot_b)
        )
    }
}

fn mark(up: bool) -> &'static str {
    if up { "✅" } else { "❌" }
}
