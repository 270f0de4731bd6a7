//! Requests the projection core sends to the Razor language server.
//!
//! The transport is owned by the embedding editor host; this crate only
//! describes the calls it needs.

use async_trait::async_trait;

use crate::error::RazorResult;
use crate::protocol::{
    LanguageQueryParams, LanguageQueryResponse, MapToDocumentEditsParams,
    MapToDocumentEditsResponse, MapToDocumentRangesParams, MapToDocumentRangesResponse,
    NamedPipeConnectParams, RazorInitializeParams,
};

/// Client side of the Razor language server connection.
///
/// Implementations report transport or server failures as
/// [`crate::error::RazorError::Server`].
#[async_trait]
pub trait RazorServer: Send + Sync {
    /// `razor/languageQuery`
    async fn language_query(&self, params: LanguageQueryParams)
    -> RazorResult<LanguageQueryResponse>;

    /// `razor/mapToDocumentRanges`
    async fn map_to_document_ranges(
        &self,
        params: MapToDocumentRangesParams,
    ) -> RazorResult<MapToDocumentRangesResponse>;

    /// `razor/mapToDocumentEdits`
    async fn map_to_document_edits(
        &self,
        params: MapToDocumentEditsParams,
    ) -> RazorResult<MapToDocumentEditsResponse>;

    /// `razor/initialize`
    async fn initialize_razor(&self, params: RazorInitializeParams) -> RazorResult<()>;

    /// `razor/namedPipeConnect`
    async fn connect_named_pipe(&self, params: NamedPipeConnectParams) -> RazorResult<()>;
}
