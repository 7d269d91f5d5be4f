//! # Catalog Crate
//!
//! Authoritative course data used to enrich scorer recommendations.
//!
//! ## Main Components
//!
//! - **types**: Domain types (Course, Instructor, Department, CatalogEntry, CatalogIndex)
//! - **parser**: Parse the `.dat` catalog exports into Rust structs
//! - **index**: Build a [`CatalogIndex`] from a directory of exports
//! - **source**: The [`CourseCatalog`] batch lookup trait
//! - **sqlite**: Read-only relational catalog
//! - **error**: Error types for loading and querying
//!
//! ## Example Usage
//!
//! ```ignore
//! use catalog::{CatalogIndex, CourseCatalog};
//! use std::path::Path;
//!
//! let index = CatalogIndex::load_from_files(Path::new("data/catalog"))?;
//! let entries = index.fetch_entries(&[42, 43]).await?;
//! ```

pub mod error;
pub mod types;
pub mod parser;
pub mod index;
pub mod source;
pub mod sqlite;

pub use error::{CatalogError, Result};
pub use source::CourseCatalog;
pub use sqlite::SqliteCatalog;
pub use types::{
    // Type aliases
    CourseId,
    StudentId,
    InstructorId,
    DepartmentId,
    // Core types
    Course,
    Instructor,
    Department,
    CatalogEntry,
    CatalogIndex,
};
