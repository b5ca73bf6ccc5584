//! Plain-text rendering of dashboard and countdown states

use crate::{
    endpoint::Endpoint,
    state::{TimerResource, ViewState},
    tasks::CountdownState,
};

pub fn render_view_state(state: &ViewState, endpoint: &Endpoint) -> String {
    match state {
        ViewState::Loading => format!("Loading timers from {} ...", endpoint),
        ViewState::Empty => format!("No timers reported by {}", endpoint),
        ViewState::Error { message } => format!("Error: {}\nPress r to retry.", message),
        ViewState::Populated { items } => {
            let mut out = format!("{} timer(s) on {}", items.len(), endpoint);
            for item in items {
                out.push('\n');
                out.push_str(&render_timer(item));
            }
            out
        }
    }
}

fn render_timer(timer: &TimerResource) -> String {
    let table = timer
        .table_number()
        .map(|n| format!("table {:>3}", n))
        .unwrap_or_else(|| "table   ?".to_string());

    let status = match (flag(timer, "time_expired"), flag(timer, "is_paused"), flag(timer, "is_running")) {
        (true, _, _) => "expired",
        (_, true, _) => "paused",
        (_, _, true) => "running",
        _ => "idle",
    };

    match timer.attributes.get("current_timer").and_then(|v| v.as_u64()) {
        Some(seconds) => format!("  {}  {:<16} {:<8} {:>3}s", table, timer.id, status, seconds),
        None => format!("  {}  {:<16} {}", table, timer.id, status),
    }
}

/// Devices report flags as booleans, 0/1 or strings
fn flag(timer: &TimerResource, name: &str) -> bool {
    match timer.attributes.get(name) {
        Some(serde_json::Value::Bool(b)) => *b,
        Some(serde_json::Value::Number(n)) => n.as_f64() == Some(1.0),
        Some(serde_json::Value::String(s)) => s.eq_ignore_ascii_case("true") || s == "1",
        _ => false,
    }
}

pub fn render_countdown(state: &CountdownState) -> String {
    if state.expired {
        "Time expired!".to_string()
    } else if state.active {
        format!("{:>4}s", state.remaining_seconds)
    } else {
        format!("Stopped with {}s left", state.remaining_seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn endpoint() -> Endpoint {
        Endpoint::parse("http://192.168.4.1:3000").unwrap()
    }

    #[test]
    fn renders_each_variant() {
        assert!(render_view_state(&ViewState::Loading, &endpoint()).starts_with("Loading"));
        assert!(render_view_state(&ViewState::Empty, &endpoint()).starts_with("No timers"));

        let error = ViewState::Error { message: "offline".into() };
        assert!(render_view_state(&error, &endpoint()).contains("offline"));
    }

    #[test]
    fn lists_timers_with_status() {
        let state = ViewState::Populated {
            items: vec![
                TimerResource::new("esp-1", json!({ "table_number": 4, "is_running": 1, "current_timer": 12 })),
                TimerResource::new("esp-2", json!({ "time_expired": "true" })),
            ],
        };
        let text = render_view_state(&state, &endpoint());
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("2 timer(s)"));
        assert!(lines[1].contains("table   4") && lines[1].contains("running") && lines[1].contains("12s"));
        assert!(lines[2].contains("esp-2") && lines[2].contains("expired"));
    }

    #[test]
    fn countdown_lines() {
        assert_eq!(render_countdown(&CountdownState::running(5)), "   5s");
        assert_eq!(render_countdown(&CountdownState::expired()), "Time expired!");
        assert_eq!(render_countdown(&CountdownState::stopped(3)), "Stopped with 3s left");
    }
}
