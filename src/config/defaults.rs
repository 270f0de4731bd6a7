//! Default configuration values for razor-bridge.

use super::settings::{PathCase, SettingsLayer};

/// How long a feature request waits for a projection to catch up.
pub const DEFAULT_SYNCHRONIZATION_TIMEOUT_MS: u64 = 2000;

pub const DEFAULT_CSHARP_SCHEME: &str = "razor-csharp";
pub const DEFAULT_HTML_SCHEME: &str = "razor-html";
pub const DEFAULT_CSHARP_SUFFIX: &str = "__virtual.cs";
pub const DEFAULT_HTML_SUFFIX: &str = "__virtual.html";

/// Returns the lowest-precedence settings layer with every key filled in.
pub fn default_settings() -> SettingsLayer {
    SettingsLayer {
        synchronization_timeout_ms: Some(DEFAULT_SYNCHRONIZATION_TIMEOUT_MS),
        csharp_scheme: Some(DEFAULT_CSHARP_SCHEME.to_string()),
        html_scheme: Some(DEFAULT_HTML_SCHEME.to_string()),
        csharp_suffix: Some(DEFAULT_CSHARP_SUFFIX.to_string()),
        html_suffix: Some(DEFAULT_HTML_SUFFIX.to_string()),
        path_case: Some(PathCase::Auto),
        workspace_folders: Some(Vec::new()),
    }
}
