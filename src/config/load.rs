use std::fs;
use std::path::Path;

use serde_json::Value;

use super::BridgeSettings;
use super::defaults::default_settings;
use super::settings::SettingsLayer;
use super::user::{CONFIG_FILE_NAME, load_user_config};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SettingsEventKind {
    Info,
    Warning,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SettingsEvent {
    pub kind: SettingsEventKind,
    pub message: String,
}

impl SettingsEvent {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            kind: SettingsEventKind::Info,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            kind: SettingsEventKind::Warning,
            message: message.into(),
        }
    }

    /// Forward the event to the `log` facade.
    pub fn log(&self) {
        match self.kind {
            SettingsEventKind::Info => {
                log::info!(target: "razor_bridge::config", "{}", self.message)
            }
            SettingsEventKind::Warning => {
                log::warn!(target: "razor_bridge::config", "{}", self.message)
            }
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SettingsSource {
    InitializationOptions,
    ClientConfiguration,
}

impl SettingsSource {
    fn description(self) -> &'static str {
        match self {
            SettingsSource::InitializationOptions => "initialization options",
            SettingsSource::ClientConfiguration => "client configuration",
        }
    }
}

#[derive(Debug)]
pub struct SettingsLoadOutcome {
    pub settings: BridgeSettings,
    pub events: Vec<SettingsEvent>,
}

/// Resolve settings from every layer.
///
/// Precedence, lowest first: programmed defaults, user config, project config
/// (`<root>/razor-bridge.toml`), then the override value. Layers that fail to
/// load are skipped and reported as warning events.
pub fn load_settings(
    root_path: Option<&Path>,
    override_settings: Option<(SettingsSource, Value)>,
) -> SettingsLoadOutcome {
    let mut events = Vec::new();

    let mut merged = default_settings();

    if let Some(user) = load_user_config_with_events(&mut events) {
        merged = merged.merged_with(user);
    }

    if let Some(project) = load_toml_settings(root_path, &mut events) {
        merged = merged.merged_with(project);
    }

    if let Some(overrides) = override_settings
        .and_then(|(source, value)| parse_override_settings(source, value, &mut events))
    {
        merged = merged.merged_with(overrides);
    }

    SettingsLoadOutcome {
        settings: BridgeSettings::from(merged),
        events,
    }
}

fn load_user_config_with_events(events: &mut Vec<SettingsEvent>) -> Option<SettingsLayer> {
    match load_user_config() {
        Ok(Some(settings)) => {
            events.push(SettingsEvent::info("Loaded user config"));
            Some(settings)
        }
        Ok(None) => None,
        Err(err) => {
            events.push(SettingsEvent::warning(format!(
                "Failed to load user config: {}",
                err
            )));
            None
        }
    }
}

fn load_toml_settings(
    root_path: Option<&Path>,
    events: &mut Vec<SettingsEvent>,
) -> Option<SettingsLayer> {
    let config_path = root_path?.join(CONFIG_FILE_NAME);
    if !config_path.exists() {
        return None;
    }

    events.push(SettingsEvent::info(format!(
        "Found config file: {}",
        config_path.display()
    )));

    match fs::read_to_string(&config_path) {
        Ok(contents) => match toml::from_str::<SettingsLayer>(&contents) {
            Ok(settings) => {
                events.push(SettingsEvent::info(format!(
                    "Successfully loaded {CONFIG_FILE_NAME}"
                )));
                Some(settings)
            }
            Err(err) => {
                events.push(SettingsEvent::warning(format!(
                    "Failed to parse {CONFIG_FILE_NAME}: {}",
                    err
                )));
                None
            }
        },
        Err(err) => {
            events.push(SettingsEvent::warning(format!(
                "Failed to read {CONFIG_FILE_NAME}: {}",
                err
            )));
            None
        }
    }
}

fn parse_override_settings(
    source: SettingsSource,
    value: Value,
    events: &mut Vec<SettingsEvent>,
) -> Option<SettingsLayer> {
    match serde_json::from_value::<SettingsLayer>(value) {
        Ok(settings) => {
            events.push(SettingsEvent::info(format!(
                "Parsed {} as razor-bridge settings",
                source.description()
            )));
            Some(settings)
        }
        Err(err) => {
            events.push(SettingsEvent::warning(format!(
                "Failed to parse {}: {}",
                source.description(),
                err
            )));
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::env;
    use std::time::Duration;
    use tempfile::TempDir;

    fn with_xdg<T>(dir: &Path, f: impl FnOnce() -> T) -> T {
        let original = env::var_os("XDG_CONFIG_HOME");
        // SAFETY: serialized through #[serial(xdg_env)]
        unsafe { env::set_var("XDG_CONFIG_HOME", dir) };
        let result = f();
        // SAFETY: same as above, restoring original env state
        unsafe {
            match original {
                Some(value) => env::set_var("XDG_CONFIG_HOME", value),
                None => env::remove_var("XDG_CONFIG_HOME"),
            }
        }
        result
    }

    #[test]
    #[serial(xdg_env)]
    fn layers_merge_user_project_and_override() {
        let user_dir = TempDir::new().unwrap();
        let project_dir = TempDir::new().unwrap();

        let user_config_dir = user_dir.path().join("razor-bridge");
        fs::create_dir_all(&user_config_dir).unwrap();
        fs::write(
            user_config_dir.join(CONFIG_FILE_NAME),
            "synchronizationTimeoutMs = 100\ncsharpScheme = \"user-csharp\"\nhtmlScheme = \"user-html\"\n",
        )
        .unwrap();
        fs::write(
            project_dir.path().join(CONFIG_FILE_NAME),
            "csharpScheme = \"project-csharp\"\n",
        )
        .unwrap();

        let outcome = with_xdg(user_dir.path(), || {
            load_settings(
                Some(project_dir.path()),
                Some((
                    SettingsSource::InitializationOptions,
                    serde_json::json!({ "htmlScheme": "override-html" }),
                )),
            )
        });

        let settings = outcome.settings;
        assert_eq!(settings.synchronization_timeout, Duration::from_millis(100));
        assert_eq!(settings.virtual_uri.csharp_scheme, "project-csharp");
        assert_eq!(settings.virtual_uri.html_scheme, "override-html");
        assert!(
            outcome
                .events
                .iter()
                .all(|event| event.kind == SettingsEventKind::Info),
            "no warnings expected: {:?}",
            outcome.events
        );
    }

    #[test]
    #[serial(xdg_env)]
    fn invalid_project_config_is_reported_and_skipped() {
        let user_dir = TempDir::new().unwrap();
        let project_dir = TempDir::new().unwrap();
        fs::write(
            project_dir.path().join(CONFIG_FILE_NAME),
            "synchronizationTimeoutMs = \"soon\"\n",
        )
        .unwrap();

        let outcome = with_xdg(user_dir.path(), || load_settings(Some(project_dir.path()), None));

        assert_eq!(outcome.settings, BridgeSettings::default());
        assert!(
            outcome
                .events
                .iter()
                .any(|event| event.kind == SettingsEventKind::Warning
                    && event.message.contains("Failed to parse")),
            "expected parse warning: {:?}",
            outcome.events
        );
    }

    #[test]
    #[serial(xdg_env)]
    fn invalid_override_is_reported_and_skipped() {
        let user_dir = TempDir::new().unwrap();
        let outcome = with_xdg(user_dir.path(), || {
            load_settings(
                None,
                Some((
                    SettingsSource::ClientConfiguration,
                    serde_json::json!({ "pathCase": "sometimes" }),
                )),
            )
        });

        assert_eq!(outcome.settings, BridgeSettings::default());
        assert_eq!(outcome.events.len(), 1);
        assert!(outcome.events[0].message.contains("client configuration"));
    }
}
