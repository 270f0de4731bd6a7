//! Waiting for a projection to catch up with the host document.
//!
//! Feature requests carry the host document version the editor saw. Before
//! the request can be answered from a projection, the Razor server must have
//! pushed the edits generated from that version.

use std::sync::Arc;
use std::time::Duration;

use log::{debug, trace};
use tokio::sync::broadcast::error::RecvError;
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::document::DocumentManager;
use crate::language::ProjectionKind;

/// A host document as seen by a feature request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostDocument {
    pub uri: Url,
    pub version: i32,
}

impl HostDocument {
    pub fn new(uri: Url, version: i32) -> Self {
        Self { uri, version }
    }
}

pub struct DocumentSynchronizer {
    manager: Arc<DocumentManager>,
    timeout: Duration,
}

impl DocumentSynchronizer {
    pub fn new(manager: Arc<DocumentManager>) -> Self {
        let timeout = manager.settings().synchronization_timeout;
        Self { manager, timeout }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Wait until the `kind` projection of `host` reflects `required_version`.
    ///
    /// Returns false on cancellation or timeout.
    pub async fn try_synchronize_projected_document(
        &self,
        host: &HostDocument,
        kind: ProjectionKind,
        required_version: i32,
        token: &CancellationToken,
    ) -> bool {
        // Subscribe before checking so no change slips between the two
        let mut changes = self.manager.subscribe();
        if self.is_synchronized(&host.uri, kind, required_version) {
            return true;
        }

        debug!(
            target: "razor_bridge::sync",
            "Waiting for {} projection of {} to reach version {}",
            kind.display_name(),
            host.uri,
            required_version
        );

        let deadline = tokio::time::sleep(self.timeout);
        tokio::pin!(deadline);

        loop {
            tokio::select! {
                _ = token.cancelled() => {
                    debug!(
                        target: "razor_bridge::sync",
                        "Synchronization of {} cancelled",
                        host.uri
                    );
                    return false;
                }

                _ = &mut deadline => {
                    debug!(
                        target: "razor_bridge::sync",
                        "Synchronization of {} timed out after {:?} waiting for version {}",
                        host.uri,
                        self.timeout,
                        required_version
                    );
                    return false;
                }

                event = changes.recv() => {
                    match event {
                        Ok(event)
                            if event.kind.projection() != Some(kind)
                                || !self.manager.is_same_document(&event.document, &host.uri) => {}
                        Ok(_) | Err(RecvError::Lagged(_)) => {
                            if self.is_synchronized(&host.uri, kind, required_version) {
                                trace!(
                                    target: "razor_bridge::sync",
                                    "{} projection of {} reached version {}",
                                    kind.display_name(),
                                    host.uri,
                                    required_version
                                );
                                return true;
                            }
                        }
                        Err(RecvError::Closed) => return false,
                    }
                }
            }
        }
    }

    fn is_synchronized(&self, uri: &Url, kind: ProjectionKind, required_version: i32) -> bool {
        self.manager
            .find_document(uri)
            .and_then(|document| document.projection(kind).host_document_sync_version())
            .is_some_and(|version| version >= required_version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BridgeSettings;
    use crate::protocol::UpdateBufferRequest;
    use crate::telemetry::LogTelemetryReporter;
    use crate::text::TextChange;
    use tokio_test::{assert_pending, assert_ready_eq, task};

    fn manager() -> Arc<DocumentManager> {
        Arc::new(DocumentManager::new(
            BridgeSettings::default(),
            Arc::new(LogTelemetryReporter::new()),
        ))
    }

    fn host(version: i32) -> HostDocument {
        HostDocument::new(Url::parse("file:///app/Index.razor").unwrap(), version)
    }

    fn push(manager: &DocumentManager, kind: ProjectionKind, version: i32) {
        let request = UpdateBufferRequest {
            host_document_version: version,
            host_document_file_path: "/app/Index.razor".to_string(),
            changes: vec![TextChange::insert(0, "x")],
            ..Default::default()
        };
        match kind {
            ProjectionKind::CSharp => manager.update_csharp_buffer(request).unwrap(),
            ProjectionKind::Html => manager.update_html_buffer(request).unwrap(),
        }
    }

    #[tokio::test]
    async fn already_synchronized_returns_immediately() {
        let manager = manager();
        push(&manager, ProjectionKind::CSharp, 3);
        let synchronizer = DocumentSynchronizer::new(manager.clone());

        let synced = synchronizer
            .try_synchronize_projected_document(
                &host(3),
                ProjectionKind::CSharp,
                2,
                &CancellationToken::new(),
            )
            .await;

        assert!(synced);
        assert_eq!(manager.subscriber_count(), 0);
    }

    #[tokio::test]
    async fn waits_for_matching_projection_change() {
        let manager = manager();
        let synchronizer = DocumentSynchronizer::new(manager.clone());
        let token = CancellationToken::new();
        let host = host(2);

        let mut wait = task::spawn(synchronizer.try_synchronize_projected_document(
            &host,
            ProjectionKind::Html,
            2,
            &token,
        ));
        assert_pending!(wait.poll());

        // The other projection does not satisfy the wait
        push(&manager, ProjectionKind::CSharp, 2);
        assert_pending!(wait.poll());

        push(&manager, ProjectionKind::Html, 1);
        assert_pending!(wait.poll());

        push(&manager, ProjectionKind::Html, 2);
        assert!(wait.is_woken());
        assert_ready_eq!(wait.poll(), true);

        drop(wait);
        assert_eq!(manager.subscriber_count(), 0);
    }

    #[tokio::test]
    async fn changes_to_other_documents_are_ignored() {
        let manager = manager();
        let synchronizer = DocumentSynchronizer::new(manager.clone());
        let token = CancellationToken::new();
        let host = host(2);
        let mut events = manager.subscribe();

        let mut wait = task::spawn(synchronizer.try_synchronize_projected_document(
            &host,
            ProjectionKind::CSharp,
            2,
            &token,
        ));
        assert_pending!(wait.poll());

        manager
            .update_csharp_buffer(UpdateBufferRequest {
                host_document_version: 2,
                host_document_file_path: "/app/Other.razor".to_string(),
                ..Default::default()
            })
            .unwrap();
        assert_pending!(wait.poll());

        let other = events.try_recv().unwrap();
        assert!(!manager.is_same_document(&other.document, &host.uri));

        push(&manager, ProjectionKind::CSharp, 2);
        assert_ready_eq!(wait.poll(), true);
    }

    #[tokio::test]
    async fn cancellation_returns_false() {
        let manager = manager();
        let synchronizer = DocumentSynchronizer::new(manager.clone());
        let token = CancellationToken::new();
        let host = host(1);

        let mut wait = task::spawn(synchronizer.try_synchronize_projected_document(
            &host,
            ProjectionKind::CSharp,
            1,
            &token,
        ));
        assert_pending!(wait.poll());

        token.cancel();
        assert_ready_eq!(wait.poll(), false);

        drop(wait);
        assert_eq!(manager.subscriber_count(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn times_out_when_server_never_catches_up() {
        let manager = manager();
        let synchronizer =
            DocumentSynchronizer::new(manager.clone()).with_timeout(Duration::from_millis(500));

        let synced = synchronizer
            .try_synchronize_projected_document(
                &host(4),
                ProjectionKind::CSharp,
                4,
                &CancellationToken::new(),
            )
            .await;

        assert!(!synced);
        assert_eq!(manager.subscriber_count(), 0);
    }

    #[tokio::test]
    async fn converges_when_update_arrives_from_another_task() {
        let manager = manager();
        let synchronizer = DocumentSynchronizer::new(manager.clone());

        let pusher = {
            let manager = manager.clone();
            tokio::spawn(async move {
                tokio::task::yield_now().await;
                for version in 1..=3 {
                    push(&manager, ProjectionKind::CSharp, version);
                }
            })
        };

        let synced = synchronizer
            .try_synchronize_projected_document(
                &host(3),
                ProjectionKind::CSharp,
                3,
                &CancellationToken::new(),
            )
            .await;

        pusher.await.unwrap();
        assert!(synced);
    }
}
