//! Generated C# document exchange with the C# workspace.
//!
//! The C# workspace asks for the generated document of each Razor file it
//! discovers (`razor.provideDynamicFileInfo`) and releases it again
//! (`razor.removeDynamicFileInfo`). Content updates for generated documents
//! flow through the document manager.

use std::sync::Arc;

use log::{debug, warn};
use tower_lsp_server::ls_types::TextDocumentIdentifier;
use url::Url;

use crate::document::DocumentManager;
use crate::error::{RazorError, RazorResult};
use crate::language::ProjectionKind;
use crate::projection::{AppliedEdits, ProjectedDocument};
use crate::protocol::{
    ProvideDynamicFileParams, ProvideDynamicFileResponse, RemoveDynamicFileParams, uri_to_url,
    url_to_uri,
};
use crate::server::RazorServer;

pub struct DynamicFileInfoHandler {
    manager: Arc<DocumentManager>,
    server: Arc<dyn RazorServer>,
}

impl DynamicFileInfoHandler {
    pub fn new(manager: Arc<DocumentManager>, server: Arc<dyn RazorServer>) -> Self {
        Self { manager, server }
    }

    /// Answer `razor.provideDynamicFileInfo`.
    ///
    /// The first request marks the C# workspace as activated, which unblocks
    /// the Razor initialization handshake.
    pub async fn provide_dynamic_file_info(
        &self,
        params: ProvideDynamicFileParams,
    ) -> Option<ProvideDynamicFileResponse> {
        let response = match self.provide(&params).await {
            Ok(response) => Some(response),
            Err(err) => {
                warn!(
                    target: "razor_bridge::dynamic_file",
                    "razor.provideDynamicFileInfo failed with {}",
                    err
                );
                None
            }
        };

        self.manager.set_roslyn_activated();
        // A Razor file open at startup can arrive before initialization
        if let Err(err) = self
            .manager
            .ensure_razor_initialized(self.server.as_ref())
            .await
        {
            warn!(
                target: "razor_bridge::dynamic_file",
                "Razor initialization after razor.provideDynamicFileInfo failed: {}",
                err
            );
        }

        response
    }

    async fn provide(
        &self,
        params: &ProvideDynamicFileParams,
    ) -> RazorResult<ProvideDynamicFileResponse> {
        let razor_uri = uri_to_url(&params.razor_document.uri)?;
        let identity = self.manager.get_document(&razor_uri)?.identity();

        let Some((csharp_uri, applied, host_document_version)) = self
            .manager
            .with_csharp_document_mut(&razor_uri, |document| {
                let applied = document.apply_edits();
                (
                    document.uri().clone(),
                    applied,
                    document.host_document_sync_version(),
                )
            })
        else {
            warn!(
                target: "razor_bridge::dynamic_file",
                "Could not find Razor document {}",
                razor_uri
            );
            return Err(RazorError::document_not_found(razor_uri.as_str()));
        };

        let AppliedEdits {
            edits,
            original_checksum,
        } = applied;
        for batch in &edits {
            self.manager.publish_projection_change(
                identity.clone(),
                ProjectionKind::CSharp,
                batch.clone(),
                host_document_version,
            );
        }

        self.manager.did_open_razor_csharp_document(&razor_uri);
        debug!(
            target: "razor_bridge::dynamic_file",
            "Providing {} with {} pending edit batch(es)",
            csharp_uri,
            edits.len()
        );

        Ok(ProvideDynamicFileResponse {
            csharp_document: TextDocumentIdentifier::new(url_to_uri(&csharp_uri)?),
            edits,
            checksum: original_checksum.as_ref().map(|info| info.checksum.clone()),
            checksum_algorithm: original_checksum.as_ref().map(|info| info.checksum_algorithm),
            encoding_code_page: original_checksum.and_then(|info| info.encoding_code_page),
        })
    }

    /// Answer `razor.removeDynamicFileInfo`.
    pub fn remove_dynamic_file_info(&self, params: RemoveDynamicFileParams) {
        let csharp_uri: Url = match uri_to_url(&params.csharp_document.uri) {
            Ok(uri) => uri,
            Err(err) => {
                warn!(
                    target: "razor_bridge::dynamic_file",
                    "razor.removeDynamicFileInfo failed with {}",
                    err
                );
                return;
            }
        };

        if self
            .manager
            .is_razor_document_open_in_csharp_workspace(&csharp_uri)
        {
            self.manager.did_close_razor_csharp_document(&csharp_uri);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;
    use crate::config::BridgeSettings;
    use crate::document::DocumentChangeKind;
    use crate::projection::ChecksumAlgorithm;
    use crate::protocol::UpdateBufferRequest;
    use crate::telemetry::LogTelemetryReporter;
    use crate::test_support::FakeRazorServer;
    use crate::text::TextChange;
    use tower_lsp_server::ls_types::Uri;

    fn setup() -> (DynamicFileInfoHandler, Arc<DocumentManager>, Arc<FakeRazorServer>) {
        let manager = Arc::new(DocumentManager::new(
            BridgeSettings::default(),
            Arc::new(LogTelemetryReporter::new()),
        ));
        let server = Arc::new(FakeRazorServer::default());
        (
            DynamicFileInfoHandler::new(manager.clone(), server.clone()),
            manager,
            server,
        )
    }

    fn provide_params(uri: &str) -> ProvideDynamicFileParams {
        ProvideDynamicFileParams {
            razor_document: TextDocumentIdentifier::new(Uri::from_str(uri).unwrap()),
        }
    }

    #[tokio::test]
    async fn provide_returns_generated_document_and_initializes() {
        let (handler, manager, server) = setup();

        let response = handler
            .provide_dynamic_file_info(provide_params("file:///app/Index.razor"))
            .await
            .unwrap();

        assert_eq!(
            response.csharp_document.uri.as_str(),
            "razor-csharp:///app/Index.razor__virtual.cs"
        );
        assert!(response.edits.is_empty());
        assert!(response.checksum.is_none());
        assert!(manager.is_roslyn_activated());
        assert!(manager.is_razor_initialized());
        assert!(manager.is_razor_document_open_in_csharp_workspace(
            &Url::parse("file:///app/Index.razor").unwrap()
        ));
        assert_eq!(
            server.calls(),
            vec!["razor/initialize", "razor/namedPipeConnect"]
        );
    }

    #[tokio::test]
    async fn provide_flushes_buffered_edits_with_previous_checksum() {
        let (handler, manager, _) = setup();
        let update = |version: i32, text: &str, checksum: &str| UpdateBufferRequest {
            host_document_version: version,
            host_document_file_path: "/app/Index.razor".to_string(),
            changes: vec![TextChange::insert(0, text)],
            checksum: Some(checksum.to_string()),
            checksum_algorithm: Some(ChecksumAlgorithm::Sha256),
            ..Default::default()
        };
        manager.update_csharp_buffer(update(1, "b", "c1")).unwrap();
        manager.update_csharp_buffer(update(2, "a", "c2")).unwrap();
        let mut events = manager.subscribe();

        let response = handler
            .provide_dynamic_file_info(provide_params("file:///app/Index.razor"))
            .await
            .unwrap();

        assert_eq!(
            response.edits,
            vec![
                vec![TextChange::insert(0, "b")],
                vec![TextChange::insert(0, "a")],
            ]
        );
        // Checksum the workspace last saw, before the flush
        assert_eq!(response.checksum, None);

        let document = manager
            .find_document(&Url::parse("file:///app/Index.razor").unwrap())
            .unwrap();
        assert_eq!(document.csharp_document().content(), "ab");
        assert_eq!(document.csharp_document().checksum().unwrap().checksum, "c2");
        drop(document);

        let event = events.try_recv().unwrap();
        assert_eq!(event.kind, DocumentChangeKind::CSharpChanged);
        assert_eq!(event.changes, vec![TextChange::insert(0, "b")]);
    }

    #[tokio::test]
    async fn initialization_failure_still_returns_document() {
        let (handler, manager, server) = setup();
        server.fail_next_initialize();

        let response = handler
            .provide_dynamic_file_info(provide_params("file:///app/Index.razor"))
            .await;

        assert!(response.is_some());
        assert!(!manager.is_razor_initialized());

        handler
            .provide_dynamic_file_info(provide_params("file:///app/Index.razor"))
            .await
            .unwrap();
        assert!(manager.is_razor_initialized());
    }

    #[tokio::test]
    async fn remove_closes_generated_document() {
        let (handler, manager, _) = setup();
        let response = handler
            .provide_dynamic_file_info(provide_params("file:///app/Index.razor"))
            .await
            .unwrap();

        handler.remove_dynamic_file_info(RemoveDynamicFileParams {
            csharp_document: response.csharp_document,
        });

        assert!(!manager.is_razor_document_open_in_csharp_workspace(
            &Url::parse("file:///app/Index.razor").unwrap()
        ));
        // The Razor document itself stays tracked
        assert_eq!(manager.document_count(), 1);
    }
}
