//! Language discriminators used across the projection core.

use serde::{Deserialize, Serialize};

/// The language a position of a Razor document belongs to.
///
/// Serialized as the integer the Razor server uses on the wire
/// (`CSharp = 1`, `Html = 2`, `Razor = 3`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum LanguageKind {
    CSharp,
    Html,
    Razor,
}

impl LanguageKind {
    /// The projection that backs this language, if any.
    ///
    /// Razor positions live only in the host document.
    pub fn projection(self) -> Option<ProjectionKind> {
        match self {
            LanguageKind::CSharp => Some(ProjectionKind::CSharp),
            LanguageKind::Html => Some(ProjectionKind::Html),
            LanguageKind::Razor => None,
        }
    }
}

impl From<LanguageKind> for u8 {
    fn from(kind: LanguageKind) -> Self {
        match kind {
            LanguageKind::CSharp => 1,
            LanguageKind::Html => 2,
            LanguageKind::Razor => 3,
        }
    }
}

impl TryFrom<u8> for LanguageKind {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(LanguageKind::CSharp),
            2 => Ok(LanguageKind::Html),
            3 => Ok(LanguageKind::Razor),
            other => Err(format!("unknown language kind {other}")),
        }
    }
}

/// One of the two synthetic documents projected from a Razor file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProjectionKind {
    CSharp,
    Html,
}

impl ProjectionKind {
    pub fn language(self) -> LanguageKind {
        match self {
            ProjectionKind::CSharp => LanguageKind::CSharp,
            ProjectionKind::Html => LanguageKind::Html,
        }
    }

    /// Human readable name used in log messages.
    pub fn display_name(self) -> &'static str {
        match self {
            ProjectionKind::CSharp => "C#",
            ProjectionKind::Html => "HTML",
        }
    }
}
