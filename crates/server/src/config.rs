use std::fs;

use serde::Deserialize;
use tracing::warn;

const SETTINGS_FILE: &str = "server.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub server_bind: String,
    /// Cap on the move log kept in memory; `None` keeps every move.
    pub history_limit: Option<usize>,
    /// Broadcast events buffered per session before it counts as lagging.
    pub event_buffer: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_bind: "127.0.0.1:8081".into(),
            history_limit: None,
            event_buffer: 256,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    bind_addr: Option<String>,
    history_limit: Option<usize>,
    event_buffer: Option<usize>,
}

pub fn load_settings() -> Settings {
    let file = fs::read_to_string(SETTINGS_FILE).ok();
    load_settings_from(file.as_deref(), |key| std::env::var(key).ok())
}

/// Defaults, then the settings file, then environment overrides.
pub(crate) fn load_settings_from(
    file: Option<&str>,
    env: impl Fn(&str) -> Option<String>,
) -> Settings {
    let mut settings = Settings::default();

    if let Some(raw) = file {
        match toml::from_str::<FileSettings>(raw) {
            Ok(file_cfg) => {
                if let Some(v) = file_cfg.bind_addr {
                    settings.server_bind = v;
                }
                if let Some(v) = file_cfg.history_limit {
                    settings.history_limit = Some(v);
                }
                if let Some(v) = file_cfg.event_buffer {
                    settings.event_buffer = v;
                }
            }
            Err(error) => warn!(%error, file = SETTINGS_FILE, "ignoring unreadable settings file"),
        }
    }

    if let Some(v) = env("SERVER_BIND") {
        settings.server_bind = v;
    }
    if let Some(v) = env("APP__BIND_ADDR") {
        settings.server_bind = v;
    }

    if let Some(v) = env("APP__HISTORY_LIMIT") {
        match v.parse::<usize>() {
            Ok(parsed) => settings.history_limit = Some(parsed),
            Err(_) => warn!(value = %v, "ignoring APP__HISTORY_LIMIT"),
        }
    }

    if let Some(v) = env("APP__EVENT_BUFFER") {
        match v.parse::<usize>() {
            Ok(parsed) => settings.event_buffer = parsed,
            Err(_) => warn!(value = %v, "ignoring APP__EVENT_BUFFER"),
        }
    }

    if settings.event_buffer == 0 {
        warn!("event buffer must hold at least one event; using the default");
        settings.event_buffer = Settings::default().event_buffer;
    }

    settings
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
