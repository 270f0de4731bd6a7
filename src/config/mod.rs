pub mod defaults;
mod load;
pub mod settings;
pub mod user;

pub use load::{SettingsEvent, SettingsEventKind, SettingsLoadOutcome, SettingsSource, load_settings};
pub use settings::{PathCase, SettingsLayer};

use std::path::PathBuf;
use std::time::Duration;

use crate::projection::VirtualUriFormat;

/// Fully resolved settings used to construct the projection core.
#[derive(Debug, Clone, PartialEq)]
pub struct BridgeSettings {
    pub synchronization_timeout: Duration,
    pub virtual_uri: VirtualUriFormat,
    pub path_case: PathCase,
    /// Documents outside every folder are dropped when they close.
    pub workspace_folders: Vec<PathBuf>,
}

impl Default for BridgeSettings {
    fn default() -> Self {
        Self::from(defaults::default_settings())
    }
}

impl From<SettingsLayer> for BridgeSettings {
    fn from(layer: SettingsLayer) -> Self {
        // Fill any gaps so a partial layer still resolves
        let layer = defaults::default_settings().merged_with(layer);
        let fallback = VirtualUriFormat::default();

        Self {
            synchronization_timeout: Duration::from_millis(
                layer
                    .synchronization_timeout_ms
                    .unwrap_or(defaults::DEFAULT_SYNCHRONIZATION_TIMEOUT_MS),
            ),
            virtual_uri: VirtualUriFormat {
                csharp_scheme: layer.csharp_scheme.unwrap_or(fallback.csharp_scheme),
                html_scheme: layer.html_scheme.unwrap_or(fallback.html_scheme),
                csharp_suffix: layer.csharp_suffix.unwrap_or(fallback.csharp_suffix),
                html_suffix: layer.html_suffix.unwrap_or(fallback.html_suffix),
            },
            path_case: layer.path_case.unwrap_or_default(),
            workspace_folders: layer.workspace_folders.unwrap_or_default(),
        }
    }
}

impl BridgeSettings {
    /// Convert back into a complete layer, e.g. for printing as TOML.
    pub fn to_layer(&self) -> SettingsLayer {
        SettingsLayer {
            synchronization_timeout_ms: Some(self.synchronization_timeout.as_millis() as u64),
            csharp_scheme: Some(self.virtual_uri.csharp_scheme.clone()),
            html_scheme: Some(self.virtual_uri.html_scheme.clone()),
            csharp_suffix: Some(self.virtual_uri.csharp_suffix.clone()),
            html_suffix: Some(self.virtual_uri.html_suffix.clone()),
            path_case: Some(self.path_case),
            workspace_folders: Some(self.workspace_folders.clone()),
        }
    }
}
