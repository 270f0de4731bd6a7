//! Change notifications published by the document manager.

use log::trace;
use tokio::sync::broadcast;

use super::razor_document::DocumentIdentity;
use crate::language::ProjectionKind;
use crate::text::TextChange;

/// Capacity of the change channel; slower subscribers observe `Lagged`.
const CHANNEL_CAPACITY: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentChangeKind {
    Added,
    Opened,
    Closed,
    Removed,
    CSharpChanged,
    HtmlChanged,
}

impl DocumentChangeKind {
    pub fn projection_changed(kind: ProjectionKind) -> Self {
        match kind {
            ProjectionKind::CSharp => DocumentChangeKind::CSharpChanged,
            ProjectionKind::Html => DocumentChangeKind::HtmlChanged,
        }
    }

    /// The projection whose content this event reports, if any.
    pub fn projection(self) -> Option<ProjectionKind> {
        match self {
            DocumentChangeKind::CSharpChanged => Some(ProjectionKind::CSharp),
            DocumentChangeKind::HtmlChanged => Some(ProjectionKind::Html),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentChangeEvent {
    pub document: DocumentIdentity,
    pub kind: DocumentChangeKind,
    /// Edits applied by a projection change; empty for lifecycle events.
    pub changes: Vec<TextChange>,
    pub host_document_version: Option<i32>,
}

impl DocumentChangeEvent {
    pub fn lifecycle(document: DocumentIdentity, kind: DocumentChangeKind) -> Self {
        Self {
            document,
            kind,
            changes: Vec::new(),
            host_document_version: None,
        }
    }
}

/// Broadcast hub for [`DocumentChangeEvent`]s.
pub struct DocumentEvents {
    sender: broadcast::Sender<DocumentChangeEvent>,
}

impl Default for DocumentEvents {
    fn default() -> Self {
        let (sender, _) = broadcast::channel(CHANNEL_CAPACITY);
        Self { sender }
    }
}

impl DocumentEvents {
    pub fn subscribe(&self) -> broadcast::Receiver<DocumentChangeEvent> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    pub fn publish(&self, event: DocumentChangeEvent) {
        trace!(
            target: "razor_bridge::document",
            "Notifying document '{}' changed '{:?}'",
            event.document.path,
            event.kind
        );
        // No subscribers is not an error
        let _ = self.sender.send(event);
    }
}
