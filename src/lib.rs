pub mod completion;
pub mod config;
pub mod content;
pub mod document;
pub mod dynamic_file;
pub mod error;
pub mod language;
pub mod mapping;
pub mod projection;
pub mod protocol;
pub mod server;
pub mod sync;
pub mod telemetry;
pub mod text;

#[cfg(test)]
mod test_support;

// Re-export the types most callers need
pub use config::BridgeSettings;
pub use document::{DocumentChangeEvent, DocumentChangeKind, DocumentManager};
pub use error::{RazorError, RazorResult};
pub use language::{LanguageKind, ProjectionKind};
pub use mapping::{MapSpanHandler, MappedRange, MappingService};
pub use projection::{CSharpProjectedDocument, HtmlProjectedDocument, ProjectedDocument};
pub use server::RazorServer;
pub use sync::{DocumentSynchronizer, HostDocument};
pub use telemetry::{LogTelemetryReporter, TelemetryReporter};
pub use text::{TextChange, TextSpan};
