use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use dashmap::mapref::one::{Ref, RefMut};
use std::ops::{Deref, DerefMut};

use super::path::PathKey;
use super::razor_document::RazorDocument;
use crate::config::PathCase;

/// Razor documents keyed by normalized host path.
pub struct DocumentStore {
    documents: DashMap<PathKey, RazorDocument>,
    path_case: PathCase,
}

/// Read access to a stored document. Do not hold across an `.await`.
pub struct DocumentHandle<'a> {
    inner: Ref<'a, PathKey, RazorDocument>,
}

impl<'a> Deref for DocumentHandle<'a> {
    type Target = RazorDocument;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

/// Write access to a stored document. Do not hold across an `.await`.
pub struct DocumentHandleMut<'a> {
    inner: RefMut<'a, PathKey, RazorDocument>,
}

impl<'a> Deref for DocumentHandleMut<'a> {
    type Target = RazorDocument;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl<'a> DerefMut for DocumentHandleMut<'a> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.inner
    }
}

impl DocumentStore {
    pub fn new(path_case: PathCase) -> Self {
        Self {
            documents: DashMap::new(),
            path_case,
        }
    }

    pub fn key(&self, path: &str) -> PathKey {
        PathKey::new(path, self.path_case)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.documents.contains_key(&self.key(path))
    }

    pub fn get(&self, path: &str) -> Option<DocumentHandle<'_>> {
        self.documents
            .get(&self.key(path))
            .map(|inner| DocumentHandle { inner })
    }

    pub fn get_mut(&self, path: &str) -> Option<DocumentHandleMut<'_>> {
        self.documents
            .get_mut(&self.key(path))
            .map(|inner| DocumentHandleMut { inner })
    }

    /// Insert unless a document with the same path exists.
    ///
    /// Returns false and drops `document` if the path is already taken.
    pub fn insert_if_absent(&self, document: RazorDocument) -> bool {
        let key = self.key(document.path());
        match self.documents.entry(key) {
            Entry::Occupied(_) => false,
            Entry::Vacant(entry) => {
                entry.insert(document);
                true
            }
        }
    }

    pub fn remove(&self, path: &str) -> Option<RazorDocument> {
        self.documents.remove(&self.key(path)).map(|(_, doc)| doc)
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Host paths of every stored document.
    pub fn paths(&self) -> Vec<String> {
        self.documents
            .iter()
            .map(|entry| entry.value().path().to_string())
            .collect()
    }
}
