//! Error types.
//!
//! Most editing operations never fail: an element without a resolvable style
//! or a size below the floor is quietly ignored. The types here cover the
//! remaining cases:
//!
//! - [`StyleAlert`]: an invariant violation the dialog should surface to the user
//! - [`ConfigError`]: editor configuration could not be loaded
//! - [`DocumentError`]: a book page could not be read into a [`Document`](crate::Document)
//! - [`HostError`]: the host process did not answer a query

use std::path::PathBuf;

use thiserror::Error;

/// A "should never happen" condition reported by a size command.
///
/// These correspond to the blocking alerts of the format dialog. They signal a
/// logic error in the caller, not a recoverable user mistake.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StyleAlert {
    /// The element carries no style class and none could be migrated onto it.
    #[error("size change requested on an element with no style class")]
    MissingStyleClass,
}

/// Error returned when editor configuration cannot be loaded.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// YAML content did not match the configuration schema.
    #[error("invalid YAML config: {0}")]
    Yaml(#[from] serde_yaml::Error),
    /// JSON content did not match the configuration schema.
    #[error("invalid JSON config: {0}")]
    Json(#[from] serde_json::Error),
    /// The file extension does not name a supported format.
    #[error("unsupported config format '{extension}' (expected yaml, yml or json)")]
    UnsupportedFormat { extension: String },
}

/// Error returned when a page's markup cannot be loaded.
#[derive(Debug, Error)]
pub enum DocumentError {
    /// The markup is not well-formed enough to walk.
    #[error("malformed page markup: {0}")]
    Xml(#[from] quick_xml::Error),
    /// An attribute could not be decoded.
    #[error("malformed attribute: {0}")]
    Attribute(#[from] quick_xml::events::attributes::AttrError),
}

/// Error returned when the host process fails to answer a query.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HostError {
    /// The endpoint could not be reached or returned an error.
    #[error("host request {path} failed: {message}")]
    Unavailable { path: String, message: String },
}
