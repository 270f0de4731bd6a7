//! Path identity for Razor host documents.
//!
//! Documents are keyed by file system path. Editors and project systems do not
//! always agree on letter case, so on case-insensitive platforms two paths
//! that differ only by case name the same document.

use std::path::{Path, PathBuf};

use path_clean::PathClean;
use url::Url;

use crate::config::PathCase;

/// Normalized lookup key for a host document path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PathKey(String);

impl PathKey {
    pub fn new(path: &str, case: PathCase) -> Self {
        if case.is_case_sensitive() {
            Self(path.to_string())
        } else {
            Self(path.to_lowercase())
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Display path of a host document: the file path for `file:` URIs, the URI
/// text otherwise.
pub fn host_path(uri: &Url) -> String {
    uri.to_file_path()
        .map(|path| path.clean().to_string_lossy().into_owned())
        .unwrap_or_else(|_| uri.as_str().to_string())
}

/// Whether `uri` points inside any of `folders`.
pub fn is_in_workspace(uri: &Url, folders: &[PathBuf], case: PathCase) -> bool {
    let Ok(path) = uri.to_file_path() else {
        return false;
    };
    let path = path.clean();

    folders
        .iter()
        .any(|folder| starts_with(&path, &folder.clean(), case))
}

fn starts_with(path: &Path, folder: &Path, case: PathCase) -> bool {
    if case.is_case_sensitive() {
        return path.starts_with(folder);
    }
    let lower = |p: &Path| PathBuf::from(p.to_string_lossy().to_lowercase());
    lower(path).starts_with(lower(folder))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn case_insensitive_keys_fold_case() {
        assert_eq!(
            PathKey::new("/App/Index.razor", PathCase::Insensitive),
            PathKey::new("/app/index.razor", PathCase::Insensitive)
        );
        assert_ne!(
            PathKey::new("/App/Index.razor", PathCase::Sensitive),
            PathKey::new("/app/index.razor", PathCase::Sensitive)
        );
    }

    #[test]
    fn host_path_prefers_file_system_path() {
        let file = Url::parse("file:///app/Pages/../Index.razor").unwrap();
        assert_eq!(host_path(&file), "/app/Index.razor");

        let untitled = Url::parse("untitled:Untitled-1").unwrap();
        assert_eq!(host_path(&untitled), "untitled:Untitled-1");
    }

    #[test]
    fn workspace_containment() {
        let folders = vec![PathBuf::from("/work/site")];
        let inside = Url::parse("file:///work/site/Pages/Index.razor").unwrap();
        let sibling = Url::parse("file:///work/site-old/Index.razor").unwrap();
        let shouting = Url::parse("file:///WORK/SITE/Index.razor").unwrap();

        assert!(is_in_workspace(&inside, &folders, PathCase::Sensitive));
        assert!(!is_in_workspace(&sibling, &folders, PathCase::Sensitive));
        assert!(!is_in_workspace(&shouting, &folders, PathCase::Sensitive));
        assert!(is_in_workspace(&shouting, &folders, PathCase::Insensitive));
    }
}
