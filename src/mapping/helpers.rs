//! Rewriting results that point into generated C# files.

use std::collections::HashMap;

use log::{trace, warn};
use tower_lsp_server::ls_types::{
    AnnotatedTextEdit, DocumentChangeOperation, DocumentChanges, Location, OneOf,
    OptionalVersionedTextDocumentIdentifier, Range, TextDocumentEdit, TextEdit, Uri, WorkspaceEdit,
};
use url::Url;

use super::{MappedRange, MappingService};
use crate::language::LanguageKind;
use crate::protocol::{uri_to_url, url_to_uri};

impl MappingService {
    /// The host document of `uri` if it names a generated C# file.
    fn generated_file_host(&self, uri: &Uri) -> Option<Url> {
        let url = uri_to_url(uri).ok()?;
        let format = self.manager.virtual_uri_format();
        if !format.is_razor_csharp_file(&url) {
            return None;
        }
        format.host_uri(&url)
    }

    async fn remap_range(&self, host_uri: &Url, range: Range) -> Option<Range> {
        match self
            .map_to_document_ranges(LanguageKind::CSharp, host_uri, vec![range])
            .await
        {
            Ok(mapped) => match mapped.first() {
                Some(MappedRange::Mapped(mapped)) => Some(*mapped),
                _ => {
                    warn!(
                        target: "razor_bridge::mapping",
                        "Unable to remap file {} at {:?}.",
                        host_uri,
                        range
                    );
                    None
                }
            },
            Err(err) => {
                warn!(
                    target: "razor_bridge::mapping",
                    "Unable to remap file {} at {:?}: {}",
                    host_uri,
                    range,
                    err
                );
                None
            }
        }
    }

    /// Map a location in a generated file onto its Razor file.
    ///
    /// Locations outside generated files are returned unchanged; unmappable
    /// ones yield `None`.
    pub async fn remap_generated_file_location(&self, location: Location) -> Option<Location> {
        let Some(host_uri) = self.generated_file_host(&location.uri) else {
            return Some(location);
        };

        let range = self.remap_range(&host_uri, location.range).await?;
        trace!(
            target: "razor_bridge::mapping",
            "Re-mapping location {:?} in {} to {:?} in {}",
            location.range,
            location.uri.as_str(),
            range,
            host_uri
        );
        Some(Location::new(url_to_uri(&host_uri).ok()?, range))
    }

    pub async fn remap_generated_file_locations(&self, locations: Vec<Location>) -> Vec<Location> {
        let mut result = Vec::with_capacity(locations.len());
        for location in locations {
            if let Some(location) = self.remap_generated_file_location(location).await {
                result.push(location);
            }
        }
        result
    }

    /// Map one edit of the generated file of `host_uri` onto the Razor file.
    pub async fn remap_generated_file_text_edit(
        &self,
        host_uri: &Url,
        edit: TextEdit,
    ) -> Option<TextEdit> {
        let range = self.remap_range(host_uri, edit.range).await?;
        trace!(
            target: "razor_bridge::mapping",
            "Re-mapping text {:?} at {:?} in {} to {:?}",
            edit.new_text,
            edit.range,
            host_uri,
            range
        );
        Some(TextEdit::new(range, edit.new_text))
    }

    /// Rewrite every generated-file entry of `edit` to target its Razor file.
    ///
    /// Edits are mapped one by one; the ones that cannot be mapped are dropped.
    /// Entries for ordinary files and resource operations pass through
    /// untouched.
    pub async fn remap_generated_file_workspace_edit(&self, edit: WorkspaceEdit) -> WorkspaceEdit {
        let changes = match edit.changes {
            Some(changes) => Some(self.remap_changes(changes).await),
            None => None,
        };
        let document_changes = match edit.document_changes {
            Some(document_changes) => Some(self.remap_document_changes(document_changes).await),
            None => None,
        };

        WorkspaceEdit {
            changes,
            document_changes,
            change_annotations: edit.change_annotations,
        }
    }

    async fn remap_changes(
        &self,
        changes: HashMap<Uri, Vec<TextEdit>>,
    ) -> HashMap<Uri, Vec<TextEdit>> {
        let mut remapped: HashMap<Uri, Vec<TextEdit>> = HashMap::new();
        for (uri, edits) in changes {
            let Some(host_uri) = self.generated_file_host(&uri) else {
                remapped.entry(uri).or_default().extend(edits);
                continue;
            };
            let Ok(host) = url_to_uri(&host_uri) else {
                continue;
            };

            for text_edit in edits {
                if let Some(text_edit) = self.remap_generated_file_text_edit(&host_uri, text_edit).await
                {
                    remapped.entry(host.clone()).or_default().push(text_edit);
                }
            }
        }
        remapped
    }

    /// Plain edit lists are regrouped per target document; operation lists
    /// keep their order.
    async fn remap_document_changes(&self, document_changes: DocumentChanges) -> DocumentChanges {
        match document_changes {
            DocumentChanges::Edits(edits) => {
                let mut remapped: Vec<TextDocumentEdit> = Vec::with_capacity(edits.len());
                for edit in edits {
                    let Some(edit) = self.remap_text_document_edit(edit).await else {
                        continue;
                    };
                    match remapped
                        .iter_mut()
                        .find(|existing| existing.text_document == edit.text_document)
                    {
                        Some(existing) => existing.edits.extend(edit.edits),
                        None => remapped.push(edit),
                    }
                }
                DocumentChanges::Edits(remapped)
            }
            DocumentChanges::Operations(operations) => {
                let mut remapped = Vec::with_capacity(operations.len());
                for operation in operations {
                    match operation {
                        DocumentChangeOperation::Edit(edit) => {
                            if let Some(edit) = self.remap_text_document_edit(edit).await {
                                remapped.push(DocumentChangeOperation::Edit(edit));
                            }
                        }
                        op => remapped.push(op),
                    }
                }
                DocumentChanges::Operations(remapped)
            }
        }
    }

    /// Retarget a generated-file document edit at its Razor file. The
    /// remapped identifier carries no version.
    async fn remap_text_document_edit(&self, edit: TextDocumentEdit) -> Option<TextDocumentEdit> {
        let Some(host_uri) = self.generated_file_host(&edit.text_document.uri) else {
            return Some(edit);
        };
        let host = url_to_uri(&host_uri).ok()?;

        let mut edits = Vec::with_capacity(edit.edits.len());
        for text_edit in edit.edits {
            match text_edit {
                OneOf::Left(text_edit) => {
                    if let Some(text_edit) =
                        self.remap_generated_file_text_edit(&host_uri, text_edit).await
                    {
                        edits.push(OneOf::Left(text_edit));
                    }
                }
                OneOf::Right(annotated) => {
                    if let Some(text_edit) = self
                        .remap_generated_file_text_edit(&host_uri, annotated.text_edit)
                        .await
                    {
                        edits.push(OneOf::Right(AnnotatedTextEdit {
                            text_edit,
                            annotation_id: annotated.annotation_id,
                        }));
                    }
                }
            }
        }

        Some(TextDocumentEdit {
            text_document: OptionalVersionedTextDocumentIdentifier {
                uri: host,
                version: None,
            },
            edits,
        })
    }
}
