use super::*;

use std::collections::HashMap;

fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| vars.get(key).cloned()
}

#[test]
fn defaults_apply_without_file_or_env() {
    assert_eq!(load_settings_from(None, env_of(&[])), Settings::default());
}

#[test]
fn settings_file_overrides_defaults() {
    let file = r#"
        bind_addr = "0.0.0.0:9000"
        history_limit = 50
        event_buffer = 8
    "#;
    let settings = load_settings_from(Some(file), env_of(&[]));
    assert_eq!(settings.server_bind, "0.0.0.0:9000");
    assert_eq!(settings.history_limit, Some(50));
    assert_eq!(settings.event_buffer, 8);
}

#[test]
fn env_overrides_file() {
    let file = r#"bind_addr = "0.0.0.0:9000""#;
    let settings = load_settings_from(
        Some(file),
        env_of(&[
            ("SERVER_BIND", "127.0.0.1:1"),
            ("APP__BIND_ADDR", "127.0.0.1:2"),
            ("APP__HISTORY_LIMIT", "10"),
        ]),
    );
    assert_eq!(settings.server_bind, "127.0.0.1:2");
    assert_eq!(settings.history_limit, Some(10));
}

#[test]
fn unreadable_values_fall_back() {
    let settings = load_settings_from(
        Some("this is = = not toml"),
        env_of(&[("APP__HISTORY_LIMIT", "lots"), ("APP__EVENT_BUFFER", "-1")]),
    );
    assert_eq!(settings, Settings::default());
}

#[test]
fn zero_event_buffer_is_replaced() {
    let settings = load_settings_from(Some("event_buffer = 0"), env_of(&[]));
    assert_eq!(settings.event_buffer, Settings::default().event_buffer);
}
