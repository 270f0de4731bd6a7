//! Translation between projection coordinates and host document coordinates.
//!
//! The Razor server owns the source maps, so every translation is a request.
//! Results for generated C# files are rewritten to point at the Razor file
//! the user actually edits.

mod helpers;
mod span_handler;

pub use span_handler::MapSpanHandler;

use std::sync::Arc;

use log::{debug, trace};
use tower_lsp_server::ls_types::Range;
use url::Url;

use crate::document::DocumentManager;
use crate::error::RazorResult;
use crate::language::LanguageKind;
use crate::protocol::{MapToDocumentRangesParams, MappingBehavior, url_to_uri};
use crate::server::RazorServer;

/// Outcome of mapping one projected range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MappedRange {
    Mapped(Range),
    /// The range covers generated code with no host counterpart.
    Unmappable,
}

impl MappedRange {
    pub fn range(self) -> Option<Range> {
        match self {
            MappedRange::Mapped(range) => Some(range),
            MappedRange::Unmappable => None,
        }
    }
}

/// Maps projection ranges and edits back onto Razor documents.
pub struct MappingService {
    manager: Arc<DocumentManager>,
    server: Arc<dyn RazorServer>,
}

impl MappingService {
    pub fn new(manager: Arc<DocumentManager>, server: Arc<dyn RazorServer>) -> Self {
        Self { manager, server }
    }

    /// Host document URI for `uri`, which may already be a host URI.
    fn host_uri(&self, uri: &Url) -> Url {
        self.manager
            .virtual_uri_format()
            .host_uri(uri)
            .unwrap_or_else(|| uri.clone())
    }

    /// Ask the server where `ranges` of the `language` projection land in the
    /// host document. `uri` may name the projection or the host document.
    ///
    /// The result has one entry per input range, in order. Every range is
    /// unmappable until the C# workspace has activated.
    pub async fn map_to_document_ranges(
        &self,
        language: LanguageKind,
        uri: &Url,
        ranges: Vec<Range>,
    ) -> RazorResult<Vec<MappedRange>> {
        let host_uri = self.host_uri(uri);
        let expected = ranges.len();
        if !self.manager.is_roslyn_activated() {
            debug!(
                target: "razor_bridge::mapping",
                "Skipping range mapping for {} before activation",
                host_uri
            );
            return Ok(vec![MappedRange::Unmappable; expected]);
        }
        let response = self
            .server
            .map_to_document_ranges(MapToDocumentRangesParams {
                kind: language,
                razor_document_uri: url_to_uri(&host_uri)?,
                projected_ranges: ranges,
                mapping_behavior: MappingBehavior::Strict,
            })
            .await?;

        let mut mapped: Vec<MappedRange> = response
            .ranges
            .into_iter()
            .map(|range| match range.to_range() {
                Some(range) => MappedRange::Mapped(range),
                None => MappedRange::Unmappable,
            })
            .collect();
        // A short response leaves the tail unmapped
        mapped.resize(expected, MappedRange::Unmappable);

        trace!(
            target: "razor_bridge::mapping",
            "Mapped {} range(s) in {} at host version {:?}",
            expected,
            host_uri,
            response.host_document_version
        );
        Ok(mapped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BridgeSettings;
    use crate::language::ProjectionKind;
    use crate::telemetry::LogTelemetryReporter;
    use crate::test_support::{FakeRazorServer, PREAMBLE_LINES};
    use tower_lsp_server::ls_types::Position;

    pub(super) fn service_with(server: Arc<FakeRazorServer>) -> (MappingService, Arc<DocumentManager>) {
        let manager = Arc::new(DocumentManager::new(
            BridgeSettings::default(),
            Arc::new(LogTelemetryReporter::new()),
        ));
        manager.set_roslyn_activated();
        (MappingService::new(manager.clone(), server), manager)
    }

    pub(super) fn range(line: u32, start: u32, end: u32) -> Range {
        Range::new(Position::new(line, start), Position::new(line, end))
    }

    #[tokio::test]
    async fn negative_ranges_become_unmappable() {
        let (service, manager) = service_with(Arc::new(FakeRazorServer::default()));
        let host = Url::parse("file:///app/Index.razor").unwrap();
        let csharp = manager
            .virtual_uri_format()
            .projection_uri(&host, ProjectionKind::CSharp)
            .unwrap();
        let line = PREAMBLE_LINES as u32;

        let mapped = service
            .map_to_document_ranges(
                LanguageKind::CSharp,
                &csharp,
                vec![range(2, 0, 4), range(line + 3, 1, 1)],
            )
            .await
            .unwrap();

        assert_eq!(
            mapped,
            vec![MappedRange::Unmappable, MappedRange::Mapped(range(3, 1, 1))]
        );
        // An empty mapped range is still a mapping
        assert_eq!(mapped[1].range(), Some(range(3, 1, 1)));
    }

    #[tokio::test]
    async fn nothing_maps_before_activation() {
        let server = Arc::new(FakeRazorServer::default());
        let manager = Arc::new(DocumentManager::new(
            BridgeSettings::default(),
            Arc::new(LogTelemetryReporter::new()),
        ));
        let service = MappingService::new(manager, server.clone());
        let line = PREAMBLE_LINES as u32;

        let mapped = service
            .map_to_document_ranges(
                LanguageKind::CSharp,
                &Url::parse("file:///app/Index.razor").unwrap(),
                vec![range(line, 0, 1), range(line + 1, 0, 1)],
            )
            .await
            .unwrap();

        assert_eq!(mapped, vec![MappedRange::Unmappable; 2]);
        assert!(server.calls().is_empty());
    }

    #[tokio::test]
    async fn server_failure_is_an_error() {
        let server = Arc::new(FakeRazorServer::default());
        server.fail_requests();
        let (service, _) = service_with(server);

        let result = service
            .map_to_document_ranges(
                LanguageKind::Html,
                &Url::parse("file:///app/Index.razor").unwrap(),
                vec![range(0, 0, 1)],
            )
            .await;

        assert!(result.is_err());
    }
}
