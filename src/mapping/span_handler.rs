//! Span and text-change mapping requested by the C# language server.

use std::sync::Arc;

use log::{debug, warn};
use tower_lsp_server::ls_types::{TextDocumentIdentifier, Uri};
use url::Url;

use crate::document::DocumentManager;
use crate::language::LanguageKind;
use crate::protocol::{
    MapSpansParams, MapSpansResponse, MapTextChangesParams, MapTextChangesResponse,
    MapToDocumentEditsParams, MapToDocumentRangesParams, MappingBehavior, uri_to_url, url_to_uri,
};
use crate::server::RazorServer;

/// Answers `razor/mapSpans` and `razor/mapTextChanges`.
///
/// Both requests name a generated C# document. The handler resolves its Razor
/// document and forwards the mapping to the Razor server.
pub struct MapSpanHandler {
    manager: Arc<DocumentManager>,
    server: Arc<dyn RazorServer>,
}

impl MapSpanHandler {
    pub fn new(manager: Arc<DocumentManager>, server: Arc<dyn RazorServer>) -> Self {
        Self { manager, server }
    }

    /// Razor document owning the generated C# document `uri`.
    ///
    /// `None` before the C# workspace has activated.
    fn razor_document_for(&self, uri: &Uri) -> Option<Url> {
        let csharp_uri = uri_to_url(uri).ok()?;
        if !self.manager.is_roslyn_activated() {
            debug!(
                target: "razor_bridge::mapping",
                "Ignoring mapping request for {} before activation",
                csharp_uri
            );
            return None;
        }
        match self.manager.get_document_for_csharp_uri(&csharp_uri) {
            Some(document) => Some(document.uri().clone()),
            None => {
                debug!(
                    target: "razor_bridge::mapping",
                    "No Razor document for generated file {}",
                    csharp_uri
                );
                None
            }
        }
    }

    pub async fn map_spans(&self, params: MapSpansParams) -> Option<MapSpansResponse> {
        let razor_uri = self.razor_document_for(&params.csharp_document.uri)?;
        let razor_document_uri = url_to_uri(&razor_uri).ok()?;

        let response = self
            .server
            .map_to_document_ranges(MapToDocumentRangesParams {
                kind: LanguageKind::CSharp,
                razor_document_uri: razor_document_uri.clone(),
                projected_ranges: params.ranges,
                mapping_behavior: MappingBehavior::Strict,
            })
            .await;

        match response {
            Ok(response) => Some(MapSpansResponse {
                razor_document: TextDocumentIdentifier::new(razor_document_uri),
                mapped_ranges: response.ranges,
                mapped_spans: response.spans,
            }),
            Err(err) => {
                warn!(
                    target: "razor_bridge::mapping",
                    "Failed to map spans for {}: {}",
                    razor_uri,
                    err
                );
                None
            }
        }
    }

    pub async fn map_text_changes(
        &self,
        params: MapTextChangesParams,
    ) -> Option<MapTextChangesResponse> {
        let razor_uri = self.razor_document_for(&params.csharp_document.uri)?;
        let razor_document_uri = url_to_uri(&razor_uri).ok()?;

        let response = self
            .server
            .map_to_document_edits(MapToDocumentEditsParams {
                kind: LanguageKind::CSharp,
                razor_document_uri: razor_document_uri.clone(),
                text_changes: params.text_changes,
            })
            .await;

        match response {
            Ok(response) => Some(MapTextChangesResponse {
                razor_document: TextDocumentIdentifier::new(razor_document_uri),
                mapped_text_changes: response.text_changes,
            }),
            Err(err) => {
                warn!(
                    target: "razor_bridge::mapping",
                    "Failed to map text changes for {}: {}",
                    razor_uri,
                    err
                );
                None
            }
        }
    }
}
