use serde::{Deserialize, Serialize};

use crate::projection::{ChecksumAlgorithm, ChecksumInfo};
use crate::text::TextChange;

/// Payload of `razor/updateCSharpBuffer` and `razor/updateHtmlBuffer`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBufferRequest {
    pub host_document_version: i32,
    pub host_document_file_path: String,
    #[serde(default)]
    pub changes: Vec<TextChange>,
    /// The server believes the projection was empty before this batch.
    #[serde(default)]
    pub previous_was_empty: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checksum: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checksum_algorithm: Option<ChecksumAlgorithm>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encoding_code_page: Option<i32>,
}

impl UpdateBufferRequest {
    /// Checksum metadata, present only when the server sent a checksum.
    pub fn checksum_info(&self) -> Option<ChecksumInfo> {
        self.checksum.as_ref().map(|checksum| {
            ChecksumInfo::new(
                checksum.clone(),
                self.checksum_algorithm.unwrap_or_default(),
                self.encoding_code_page,
            )
        })
    }
}
