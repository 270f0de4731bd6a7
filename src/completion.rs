//! Provisional completion after a `.` that Razor classifies as HTML.
//!
//! In `@DateTime.|` the Razor parser ends the C# expression before the dot, so
//! a completion request at the cursor lands in HTML. When the character before
//! the cursor is C#, a provisional `.` is inserted into the C# projection so
//! the C# server can offer member completions. The dot is rolled back as soon
//! as the user moves on.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use log::{debug, warn};
use tower_lsp_server::ls_types::Position;
use url::Url;

use crate::document::DocumentManager;
use crate::language::{LanguageKind, ProjectionKind};
use crate::projection::{CSharpProjectedDocument, ProjectedDocument};
use crate::protocol::{LanguageQueryParams, url_to_uri};
use crate::server::RazorServer;

const TRIGGER_CHARACTER: &str = ".";

/// Where C# completion should be requested after a provisional dot was
/// applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProvisionalCompletion {
    pub csharp_uri: Url,
    /// Position in the C# projection just after the provisional dot.
    pub provisional_position: Position,
}

pub struct ProvisionalCompletionOrchestrator {
    manager: Arc<DocumentManager>,
    server: Arc<dyn RazorServer>,
    dots_may_be_active: AtomicBool,
}

impl ProvisionalCompletionOrchestrator {
    pub fn new(manager: Arc<DocumentManager>, server: Arc<dyn RazorServer>) -> Self {
        Self {
            manager,
            server,
            dots_may_be_active: AtomicBool::new(false),
        }
    }

    /// Apply a provisional dot for a completion triggered at `position` of
    /// `host_uri`, which Razor classified as `language`.
    ///
    /// Returns `None` when the request is not a provisional completion
    /// candidate or the server cannot answer.
    pub async fn try_provisional_completion(
        &self,
        host_uri: &Url,
        language: LanguageKind,
        position: Position,
        trigger_character: Option<&str>,
    ) -> Option<ProvisionalCompletion> {
        if language != LanguageKind::Html
            || trigger_character != Some(TRIGGER_CHARACTER)
            || position.character == 0
        {
            return None;
        }

        let previous_character = Position::new(position.line, position.character - 1);
        let query = match self
            .server
            .language_query(LanguageQueryParams {
                uri: url_to_uri(host_uri).ok()?,
                position: previous_character,
            })
            .await
        {
            Ok(query) => query,
            Err(err) => {
                warn!(
                    target: "razor_bridge::completion",
                    "Language query for provisional completion on {} failed: {}",
                    host_uri,
                    err
                );
                return None;
            }
        };

        if query.kind != LanguageKind::CSharp {
            return None;
        }

        let csharp_uri = self
            .manager
            .get_document(host_uri)
            .ok()?
            .csharp_document()
            .uri()
            .clone();
        debug!(
            target: "razor_bridge::completion",
            "Applying provisional completion on {} at ({}, {})",
            csharp_uri,
            query.position.line,
            query.position.character
        );

        self.mutate(host_uri, |document| {
            document.add_provisional_dot_at(query.position_index)
        });
        self.dots_may_be_active.store(true, Ordering::Release);

        Some(ProvisionalCompletion {
            csharp_uri,
            provisional_position: Position::new(
                query.position.line,
                query.position.character + 1,
            ),
        })
    }

    /// Roll back the provisional dot of `host_uri`, if any.
    pub fn try_remove_provisional_dot(&self, host_uri: &Url) -> bool {
        if !self.dots_may_be_active.swap(false, Ordering::AcqRel) {
            return false;
        }

        let removed = self.mutate(host_uri, CSharpProjectedDocument::remove_provisional_dot);
        if removed {
            debug!(
                target: "razor_bridge::completion",
                "Ensured removal of provisional completion on {}.",
                host_uri
            );
        }
        removed
    }

    /// The editor changed `host_uri` with edits inserting `inserted_texts`.
    ///
    /// Typing the trigger character itself keeps the dot that was just added.
    pub fn on_host_document_changed(&self, host_uri: &Url, inserted_texts: &[&str]) -> bool {
        if matches!(inserted_texts, [text] if *text == TRIGGER_CHARACTER) {
            return false;
        }
        self.try_remove_provisional_dot(host_uri)
    }

    /// Re-apply the dot at the last provisional position for completion
    /// resolve.
    pub fn ensure_resolve_provisional_dot(&self, host_uri: &Url) -> bool {
        self.mutate(host_uri, CSharpProjectedDocument::ensure_resolve_provisional_dot)
    }

    pub fn remove_resolve_provisional_dot(&self, host_uri: &Url) -> bool {
        self.mutate(host_uri, |document| {
            document.remove_resolve_provisional_dot(false)
        })
    }

    /// Run `f` on the C# projection and announce a content change if it
    /// reports one.
    fn mutate(&self, host_uri: &Url, f: impl FnOnce(&mut CSharpProjectedDocument) -> bool) -> bool {
        let Some((changed, host_document_version)) = self
            .manager
            .with_csharp_document_mut(host_uri, |document| {
                (f(&mut *document), document.host_document_sync_version())
            })
        else {
            return false;
        };

        if changed
            && let Some(identity) = self
                .manager
                .find_document(host_uri)
                .map(|document| document.identity())
        {
            self.manager.publish_projection_change(
                identity,
                ProjectionKind::CSharp,
                Vec::new(),
                host_document_version,
            );
        }
        changed
    }
}
