use serde::{Deserialize, Serialize};
use tower_lsp_server::ls_types::TextDocumentIdentifier;

use crate::projection::ChecksumAlgorithm;
use crate::text::TextChange;

/// `razor.provideDynamicFileInfo` request from the C# workspace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProvideDynamicFileParams {
    pub razor_document: TextDocumentIdentifier,
}

/// Generated C# document for a Razor file plus edits it has not seen yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProvideDynamicFileResponse {
    pub csharp_document: TextDocumentIdentifier,
    #[serde(default)]
    pub edits: Vec<Vec<TextChange>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checksum: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checksum_algorithm: Option<ChecksumAlgorithm>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encoding_code_page: Option<i32>,
}

/// `razor.removeDynamicFileInfo` request from the C# workspace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveDynamicFileParams {
    pub csharp_document: TextDocumentIdentifier,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RazorInitializeParams {
    pub pipe_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NamedPipeConnectParams {
    pub pipe_name: String,
}
