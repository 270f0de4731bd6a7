use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// How host document paths are compared when looking documents up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PathCase {
    /// Exact comparison on Linux, case-insensitive elsewhere.
    #[default]
    Auto,
    Sensitive,
    Insensitive,
}

impl PathCase {
    pub fn is_case_sensitive(self) -> bool {
        match self {
            PathCase::Auto => cfg!(target_os = "linux"),
            PathCase::Sensitive => true,
            PathCase::Insensitive => false,
        }
    }
}

/// One layer of settings as written in `razor-bridge.toml` or passed as
/// initialization options. Absent keys defer to lower layers.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsLayer {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub synchronization_timeout_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub csharp_scheme: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html_scheme: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub csharp_suffix: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub html_suffix: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path_case: Option<PathCase>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workspace_folders: Option<Vec<PathBuf>>,
}

impl SettingsLayer {
    /// Overlay `primary` on top of `self`, preferring values from `primary`.
    pub fn merged_with(self, primary: SettingsLayer) -> SettingsLayer {
        SettingsLayer {
            synchronization_timeout_ms: primary
                .synchronization_timeout_ms
                .or(self.synchronization_timeout_ms),
            csharp_scheme: primary.csharp_scheme.or(self.csharp_scheme),
            html_scheme: primary.html_scheme.or(self.html_scheme),
            csharp_suffix: primary.csharp_suffix.or(self.csharp_suffix),
            html_suffix: primary.html_suffix.or(self.html_suffix),
            path_case: primary.path_case.or(self.path_case),
            workspace_folders: primary.workspace_folders.or(self.workspace_folders),
        }
    }
}
