//! Queries answered by the host application.

use crate::error::HostError;

pub const AUTHOR_MODE_PATH: &str = "/bloom/authorMode";
pub const FONT_NAMES_PATH: &str = "/bloom/availableFontNames";

/// The editor's view of the host process.
pub trait EditorHost {
    /// Whether the user is authoring a new book rather than translating one.
    fn author_mode(&self) -> Result<bool, HostError>;

    /// Names of the fonts installed on the machine.
    fn available_font_names(&self) -> Result<Vec<String>, HostError>;
}

/// Interprets the author-mode payload; only `true` counts.
pub fn parse_author_mode(payload: &str) -> bool {
    payload.trim() == "true"
}

/// Splits the comma-separated font list, dropping empty entries.
pub fn parse_font_names(payload: &str) -> Vec<String> {
    payload
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

/// A host with fixed answers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaticHost {
    pub author_mode: bool,
    pub font_names: Vec<String>,
}

impl StaticHost {
    pub fn new(author_mode: bool, font_names: &[&str]) -> Self {
        Self {
            author_mode,
            font_names: font_names.iter().map(|name| name.to_string()).collect(),
        }
    }

    /// A host built from raw endpoint payloads.
    pub fn from_payloads(author_mode: &str, font_names: &str) -> Self {
        Self {
            author_mode: parse_author_mode(author_mode),
            font_names: parse_font_names(font_names),
        }
    }
}

impl EditorHost for StaticHost {
    fn author_mode(&self) -> Result<bool, HostError> {
        Ok(self.author_mode)
    }

    fn available_font_names(&self) -> Result<Vec<String>, HostError> {
        Ok(self.font_names.clone())
    }
}

/// A host that cannot be reached.
#[derive(Debug, Clone, Copy, Default)]
pub struct OfflineHost;

impl EditorHost for OfflineHost {
    fn author_mode(&self) -> Result<bool, HostError> {
        Err(HostError::Unavailable {
            path: AUTHOR_MODE_PATH.to_string(),
            message: "host is offline".to_string(),
        })
    }

    fn available_font_names(&self) -> Result<Vec<String>, HostError> {
        Err(HostError::Unavailable {
            path: FONT_NAMES_PATH.to_string(),
            message: "host is offline".to_string(),
        })
    }
}
