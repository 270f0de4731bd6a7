//! Shared test helpers for integration tests.

#![allow(dead_code)]

#[path = "helpers_fake_server.rs"]
pub mod fake_server;

use std::sync::Arc;

use razor_bridge::protocol::UpdateBufferRequest;
use razor_bridge::{BridgeSettings, DocumentManager, LogTelemetryReporter, TextChange};

pub const HOST_PATH: &str = "/workspace/Pages/Index.razor";

pub fn host_url() -> url::Url {
    url::Url::from_file_path(HOST_PATH).unwrap()
}

pub fn manager() -> Arc<DocumentManager> {
    Arc::new(DocumentManager::new(
        BridgeSettings::default(),
        Arc::new(LogTelemetryReporter::new()),
    ))
}

/// Manager whose workspace contains `HOST_PATH`, so closing keeps the document.
pub fn workspace_manager() -> Arc<DocumentManager> {
    let settings = BridgeSettings {
        workspace_folders: vec![std::path::PathBuf::from("/workspace")],
        ..BridgeSettings::default()
    };
    Arc::new(DocumentManager::new(
        settings,
        Arc::new(LogTelemetryReporter::new()),
    ))
}

pub fn update(version: i32, changes: Vec<TextChange>) -> UpdateBufferRequest {
    UpdateBufferRequest {
        host_document_version: version,
        host_document_file_path: HOST_PATH.to_string(),
        changes,
        ..Default::default()
    }
}
