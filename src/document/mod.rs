pub mod events;
pub mod manager;
pub mod path;
mod razor_document;
pub mod store;

// Re-export main types
pub use events::{DocumentChangeEvent, DocumentChangeKind};
pub use manager::DocumentManager;
pub use razor_document::{DocumentIdentity, RazorDocument};
pub use store::{DocumentHandle, DocumentHandleMut, DocumentStore};
