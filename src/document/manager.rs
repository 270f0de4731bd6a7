//! Registry of Razor documents and entry point for server buffer pushes.
//!
//! The manager is the single writer of projection state. Feature code reads
//! through [`DocumentHandle`]s, which borrow a map shard and must be dropped
//! before awaiting anything.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use dashmap::DashSet;
use log::{debug, info, warn};
use tokio::sync::{OnceCell, broadcast};
use ulid::Ulid;
use url::Url;

use super::events::{DocumentChangeEvent, DocumentChangeKind, DocumentEvents};
use super::path::{PathKey, host_path, is_in_workspace};
use super::razor_document::{DocumentIdentity, RazorDocument};
use super::store::{DocumentHandle, DocumentStore};
use crate::config::BridgeSettings;
use crate::error::{RazorError, RazorResult};
use crate::language::ProjectionKind;
use crate::projection::{
    BufferedUpdate, CSharpProjectedDocument, ProjectionUpdate, UpdateOutcome, VirtualUriFormat,
};
use crate::protocol::{NamedPipeConnectParams, RazorInitializeParams, UpdateBufferRequest};
use crate::server::RazorServer;
use crate::telemetry::TelemetryReporter;
use crate::text::TextChange;

pub struct DocumentManager {
    settings: BridgeSettings,
    store: DocumentStore,
    events: DocumentEvents,
    telemetry: Arc<dyn TelemetryReporter>,
    /// Host documents the C# workspace has opened as generated files.
    csharp_workspace_open: DashSet<PathKey>,
    /// Set once the C# workspace has asked for dynamic file info.
    roslyn_activated: AtomicBool,
    /// Pipe name of the completed initialization handshake.
    razor_initialized: OnceCell<String>,
}

impl DocumentManager {
    pub fn new(settings: BridgeSettings, telemetry: Arc<dyn TelemetryReporter>) -> Self {
        Self {
            store: DocumentStore::new(settings.path_case),
            settings,
            events: DocumentEvents::default(),
            telemetry,
            csharp_workspace_open: DashSet::new(),
            roslyn_activated: AtomicBool::new(false),
            razor_initialized: OnceCell::new(),
        }
    }

    pub fn settings(&self) -> &BridgeSettings {
        &self.settings
    }

    pub fn virtual_uri_format(&self) -> &VirtualUriFormat {
        &self.settings.virtual_uri
    }

    pub fn subscribe(&self) -> broadcast::Receiver<DocumentChangeEvent> {
        self.events.subscribe()
    }

    /// Whether `document` is the host document `uri` names.
    pub fn is_same_document(&self, document: &DocumentIdentity, uri: &Url) -> bool {
        self.store.key(&document.path) == self.store.key(&host_path(uri))
    }

    pub fn subscriber_count(&self) -> usize {
        self.events.subscriber_count()
    }

    pub fn document_count(&self) -> usize {
        self.store.len()
    }

    /// Identities of every tracked document.
    pub fn documents(&self) -> Vec<DocumentIdentity> {
        self.store
            .paths()
            .iter()
            .filter_map(|path| self.store.get(path).map(|document| document.identity()))
            .collect()
    }

    /// Tracked document for `uri`, created on first use.
    pub fn get_document(&self, uri: &Url) -> RazorResult<DocumentHandle<'_>> {
        let path = host_path(uri);
        if !self.store.contains(&path) {
            info!(
                target: "razor_bridge::document",
                "File '{}' didn't exist in the Razor document list. This is likely because it's from outside the workspace.",
                path
            );
            self.add_document(uri.clone())?;
        }

        // Removal may race with creation
        self.store
            .get(&path)
            .ok_or_else(|| RazorError::document_not_found(uri.as_str()))
    }

    /// Tracked document for `uri` without creating one.
    pub fn find_document(&self, uri: &Url) -> Option<DocumentHandle<'_>> {
        self.store.get(&host_path(uri))
    }

    pub fn get_document_for_csharp_uri(&self, uri: &Url) -> Option<DocumentHandle<'_>> {
        self.get_document_for_projection_uri(uri, ProjectionKind::CSharp)
    }

    pub fn get_document_for_html_uri(&self, uri: &Url) -> Option<DocumentHandle<'_>> {
        self.get_document_for_projection_uri(uri, ProjectionKind::Html)
    }

    fn get_document_for_projection_uri(
        &self,
        uri: &Url,
        kind: ProjectionKind,
    ) -> Option<DocumentHandle<'_>> {
        let format = self.virtual_uri_format();
        if format.projection_kind(uri) != Some(kind) {
            return None;
        }
        self.find_document(&format.host_uri(uri)?)
    }

    /// Start tracking `uri`; a no-op if it is already tracked.
    pub fn add_document(&self, uri: Url) -> RazorResult<DocumentIdentity> {
        let document = RazorDocument::create(uri, self.virtual_uri_format())?;
        let identity = document.identity();

        if !self.store.insert_if_absent(document) {
            debug!(
                target: "razor_bridge::document",
                "Skipping document creation for '{}' because it already exists.",
                identity.path
            );
            return self
                .store
                .get(&identity.path)
                .map(|existing| existing.identity())
                .ok_or_else(|| RazorError::document_not_found(identity.uri.as_str()));
        }

        self.events.publish(DocumentChangeEvent::lifecycle(
            identity.clone(),
            DocumentChangeKind::Added,
        ));
        Ok(identity)
    }

    /// Stop tracking `uri`. Returns false if it was not tracked.
    pub fn remove_document(&self, uri: &Url) -> bool {
        let Some(document) = self.store.remove(&host_path(uri)) else {
            return false;
        };
        self.csharp_workspace_open
            .remove(&self.store.key(document.path()));

        self.events.publish(DocumentChangeEvent::lifecycle(
            document.identity(),
            DocumentChangeKind::Removed,
        ));
        true
    }

    /// The editor opened `uri`.
    ///
    /// Buffered projection updates are applied before `Opened` is published;
    /// each flushed batch is announced as a projection change.
    pub fn open_document(&self, uri: &Url) -> RazorResult<()> {
        let (identity, flushed) = {
            let path = self.get_document(uri)?.path().to_string();
            let mut document = self
                .store
                .get_mut(&path)
                .ok_or_else(|| RazorError::document_not_found(uri.as_str()))?;
            document.set_open(true);

            let flushed: Vec<(ProjectionKind, Vec<BufferedUpdate>)> =
                [ProjectionKind::CSharp, ProjectionKind::Html]
                    .into_iter()
                    .map(|kind| (kind, document.projection_mut(kind).flush_pending()))
                    .collect();
            (document.identity(), flushed)
        };

        self.events.publish(DocumentChangeEvent::lifecycle(
            identity.clone(),
            DocumentChangeKind::Opened,
        ));
        for (kind, updates) in flushed {
            for update in updates {
                self.publish_projection_change(
                    identity.clone(),
                    kind,
                    update.changes,
                    Some(update.host_document_version),
                );
            }
        }
        Ok(())
    }

    /// The editor closed `uri`. Documents outside every workspace folder are
    /// dropped.
    pub fn close_document(&self, uri: &Url) -> RazorResult<()> {
        let identity = {
            let path = self.get_document(uri)?.path().to_string();
            let mut document = self
                .store
                .get_mut(&path)
                .ok_or_else(|| RazorError::document_not_found(uri.as_str()))?;
            document.set_open(false);
            document.identity()
        };

        self.events.publish(DocumentChangeEvent::lifecycle(
            identity,
            DocumentChangeKind::Closed,
        ));

        if !is_in_workspace(
            uri,
            &self.settings.workspace_folders,
            self.settings.path_case,
        ) {
            self.remove_document(uri);
        }
        Ok(())
    }

    /// Handle `razor/updateCSharpBuffer`.
    pub fn update_csharp_buffer(&self, request: UpdateBufferRequest) -> RazorResult<()> {
        self.update_buffer(ProjectionKind::CSharp, request)
    }

    /// Handle `razor/updateHtmlBuffer`.
    pub fn update_html_buffer(&self, request: UpdateBufferRequest) -> RazorResult<()> {
        self.update_buffer(ProjectionKind::Html, request)
    }

    fn update_buffer(&self, kind: ProjectionKind, request: UpdateBufferRequest) -> RazorResult<()> {
        debug!(
            target: "razor_bridge::document",
            "Updating the {} document for Razor file '{}' ({})",
            kind.display_name(),
            request.host_document_file_path,
            request.host_document_version
        );

        let host_uri = Url::from_file_path(&request.host_document_file_path)
            .map_err(|_| RazorError::invalid_uri(&request.host_document_file_path))?;
        let path = self.get_document(&host_uri)?.path().to_string();

        let (identity, outcome) = {
            let mut document = self
                .store
                .get_mut(&path)
                .ok_or_else(|| RazorError::document_not_found(host_uri.as_str()))?;
            let host_document_is_open = document.is_open();
            let identity = document.identity();
            let projection = document.projection_mut(kind);

            if let Err(err) = projection.check_host_document_version(request.host_document_version) {
                warn!(
                    target: "razor_bridge::document",
                    "Failed to update the {} document buffer. This is unexpected and may result in incorrect {} interactions: {}",
                    kind.display_name(),
                    kind.display_name(),
                    err
                );
                return Err(err);
            }

            if request.previous_was_empty
                && (!projection.is_empty() || projection.has_pending_updates())
            {
                self.telemetry
                    .report_buffers_out_of_sync(projection.uri(), kind);
                projection.clear();
            }

            let checksum = request.checksum_info();
            let outcome = projection.update(ProjectionUpdate {
                host_document_is_open,
                changes: request.changes.clone(),
                host_document_version: request.host_document_version,
                checksum,
            })?;
            (identity, outcome)
        };

        let changes = match outcome {
            UpdateOutcome::Applied => request.changes,
            UpdateOutcome::Buffered => Vec::new(),
        };
        self.publish_projection_change(
            identity,
            kind,
            changes,
            Some(request.host_document_version),
        );
        Ok(())
    }

    pub(crate) fn publish_projection_change(
        &self,
        document: DocumentIdentity,
        kind: ProjectionKind,
        changes: Vec<TextChange>,
        host_document_version: Option<i32>,
    ) {
        self.events.publish(DocumentChangeEvent {
            document,
            kind: DocumentChangeKind::projection_changed(kind),
            changes,
            host_document_version,
        });
    }

    /// Run `f` against the C# projection of the host document `uri`.
    pub fn with_csharp_document_mut<R>(
        &self,
        uri: &Url,
        f: impl FnOnce(&mut CSharpProjectedDocument) -> R,
    ) -> Option<R> {
        let mut document = self.store.get_mut(&host_path(uri))?;
        Some(f(document.csharp_document_mut()))
    }

    fn csharp_workspace_key(&self, uri: &Url) -> PathKey {
        let format = self.virtual_uri_format();
        let host = format.host_uri(uri).unwrap_or_else(|| uri.clone());
        self.store.key(&host_path(&host))
    }

    /// Whether the C# workspace has opened the generated document for `uri`.
    ///
    /// Accepts either the host URI or the C# projection URI.
    pub fn is_razor_document_open_in_csharp_workspace(&self, uri: &Url) -> bool {
        self.csharp_workspace_open
            .contains(&self.csharp_workspace_key(uri))
    }

    pub fn did_open_razor_csharp_document(&self, uri: &Url) {
        self.csharp_workspace_open
            .insert(self.csharp_workspace_key(uri));
    }

    pub fn did_close_razor_csharp_document(&self, uri: &Url) {
        self.csharp_workspace_open
            .remove(&self.csharp_workspace_key(uri));
    }

    pub fn set_roslyn_activated(&self) {
        self.roslyn_activated.store(true, Ordering::Release);
    }

    pub fn is_roslyn_activated(&self) -> bool {
        self.roslyn_activated.load(Ordering::Acquire)
    }

    pub fn is_razor_initialized(&self) -> bool {
        self.razor_initialized.initialized()
    }

    /// Run the one-time Razor initialization handshake.
    ///
    /// Does nothing until the C# workspace has activated. Returns whether
    /// initialization has completed. A failed handshake leaves the manager
    /// uninitialized so a later call retries it.
    pub async fn ensure_razor_initialized(&self, server: &dyn RazorServer) -> RazorResult<bool> {
        if !self.is_roslyn_activated() {
            debug!(
                target: "razor_bridge::document",
                "Deferring Razor initialization until the C# workspace activates"
            );
            return Ok(false);
        }

        self.razor_initialized
            .get_or_try_init(|| async {
                let pipe_name = Ulid::new().to_string();
                info!(
                    target: "razor_bridge::document",
                    "Initializing Razor document generation over pipe {}",
                    pipe_name
                );
                server
                    .initialize_razor(RazorInitializeParams {
                        pipe_name: pipe_name.clone(),
                    })
                    .await?;
                server
                    .connect_named_pipe(NamedPipeConnectParams {
                        pipe_name: pipe_name.clone(),
                    })
                    .await?;
                Ok::<_, RazorError>(pipe_name)
            })
            .await?;
        Ok(true)
    }
}
