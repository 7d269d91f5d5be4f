//! Error types for the catalog crate.
//!
//! Covers both catalog backends: parse failures while loading the `.dat`
//! files into a [`CatalogIndex`](crate::CatalogIndex), and transport
//! failures from the SQLite catalog.

use thiserror::Error;

/// Errors that can occur while loading or querying the course catalog
#[derive(Error, Debug)]
pub enum CatalogError {
    /// Catalog file could not be found
    #[error("Failed to open file: {path}")]
    FileNotFound { path: String },

    /// I/O error occurred while reading a catalog file
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Line in a catalog file couldn't be parsed
    #[error("Parse error at line {line} in {file}: {reason}")]
    ParseError {
        file: String,
        line: usize,
        reason: String,
    },

    /// A field had an invalid value
    #[error("Invalid value for {field}: {value}")]
    InvalidValue { field: String, value: String },

    /// The same id appeared twice in one catalog file
    #[error("Duplicate {entity} with id {id}")]
    DuplicateId { entity: String, id: u32 },

    /// The relational catalog could not be reached or queried
    #[error("Catalog database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, CatalogError>;
