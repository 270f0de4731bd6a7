//! Serving projection text to an editor that opens a projection URI.

use std::sync::Arc;

use log::trace;
use url::Url;

use crate::document::{DocumentChangeEvent, DocumentManager};

/// Snapshot of one projection's text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectedContent {
    pub content: String,
    pub host_document_version: Option<i32>,
    pub projected_document_version: u64,
}

pub struct ProjectedContentProvider {
    manager: Arc<DocumentManager>,
}

impl ProjectedContentProvider {
    pub fn new(manager: Arc<DocumentManager>) -> Self {
        Self { manager }
    }

    /// Current text of the projection named by `uri`.
    ///
    /// Returns `None` for URIs that are not projection URIs or whose host
    /// document is not tracked.
    pub fn provide_content(&self, uri: &Url) -> Option<ProjectedContent> {
        let format = self.manager.virtual_uri_format();
        let kind = format.projection_kind(uri)?;
        let host_uri = format.host_uri(uri)?;

        let document = self.manager.find_document(&host_uri)?;
        let projection = document.projection(kind);
        trace!(
            target: "razor_bridge::content",
            "Providing {} content for {} at projected version {}",
            kind.display_name(),
            uri,
            projection.projected_document_sync_version()
        );

        Some(ProjectedContent {
            content: projection.content().to_string(),
            host_document_version: projection.host_document_sync_version(),
            projected_document_version: projection.projected_document_sync_version(),
        })
    }

    /// Projection URI whose content `event` changed, if any.
    pub fn changed_uri(event: &DocumentChangeEvent) -> Option<&Url> {
        event
            .kind
            .projection()
            .map(|kind| event.document.projection_uri(kind))
    }
}
