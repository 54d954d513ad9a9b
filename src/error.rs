//! Error types for rust-schemacompare

use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort a schema comparison or dump.
///
/// Every variant is fatal: a malformed object fails the whole run rather than being
/// skipped, so a partially collected schema never reaches the diff engine.
#[derive(Error, Debug)]
pub enum SchemaCompareError {
    #[error("Failed to read configuration file: {path}")]
    ConfigReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse configuration file: {path}")]
    ConfigParseError {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to read file: {path}")]
    FileReadError {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse definition of {object}: {message}")]
    ParseError { object: String, message: String },

    #[error("Beginning and ending parenthesis for {list} specification expected in definition of {object}")]
    MissingParenthesis { object: String, list: String },

    #[error("Unable to find '{keyword}' keyword in definition of {object}")]
    MissingKeyword { object: String, keyword: String },

    #[error("{list} name and type expected in definition of {object} after token {token}")]
    MissingEntryPart {
        object: String,
        list: String,
        token: usize,
    },

    #[error("Query error: {message} (SQL: {sql})")]
    QueryError { sql: String, message: String },

    #[error("No catalog connection available to read schemas: {schemas}")]
    CatalogUnavailable { schemas: String },

    #[error("Failed to read catalog snapshot: {path}: {message}")]
    SnapshotError { path: PathBuf, message: String },

    #[error("Invalid pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    #[error("Invalid arguments: {message}")]
    InvalidArguments { message: String },

    #[error("Failed to serialize schema dump")]
    DumpSerializeError(#[source] serde_json::Error),
}

impl SchemaCompareError {
    /// Shorthand for a generic parse failure on a named object.
    pub fn parse(object: impl Into<String>, message: impl Into<String>) -> Self {
        SchemaCompareError::ParseError {
            object: object.into(),
            message: message.into(),
        }
    }
}
