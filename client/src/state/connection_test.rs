use super::*;

#[test]
fn default_has_observer_down_and_robots_up() {
    let state = RobotConnections::default();
    assert!(!state.observer);
    assert!(state.robot_a);
    assert!(state.robot_b);
}

#[test]
fn status_line_reflects_flags() {
    let mut state = RobotConnections::default();
    assert_eq!(state.status_line(), "Observer: ❌ | 🏔️ Bogotá: ✅ | 🌺 Medellín: ✅");

    state.observer = true;
    assert!(state.status_line().starts_with("Observer: ✅"));
}
