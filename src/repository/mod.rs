//! Repository contract for schema-object access.
//!
//! The [`ObjectRepository`] trait is the only seam between the diff engine
//! and a database: listing objects of the requested categories, fetching one
//! object's raw definition text, and fetching the composite drop script for
//! a table. The engine treats listing failures as fatal and fetch failures
//! as per-object, so the two get distinct error types.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::model::{ObjectCategory, SchemaObject};

mod mssql;
mod pool;

pub use mssql::MsSqlRepository;

/// Errors from connection establishment or object listing. Fatal: they abort
/// the whole comparison run.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("connection failed: {0}")]
    Connection(String),

    #[error("listing query failed: {0}")]
    Query(String),
}

/// Errors from per-object definition or drop-statement retrieval. Recovered
/// locally: the object is skipped and the run continues.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("query failed: {0}")]
    Query(String),

    #[error("no definition returned for {object}")]
    NotFound { object: String },

    #[error("fetch timed out after {0:?}")]
    Timeout(Duration),
}

/// Read access to the schema objects of one database.
#[async_trait]
pub trait ObjectRepository: Send + Sync {
    /// Name of the database this repository reads from; used in artifact and
    /// debug-directory names.
    fn database_name(&self) -> &str;

    /// List the schema objects of the requested categories, ordered by kind
    /// and name. An empty category set lists nothing.
    async fn list_objects(
        &self,
        categories: &[ObjectCategory],
    ) -> Result<Vec<SchemaObject>, RepositoryError>;

    /// Fetch the raw textual definition of one object.
    async fn get_definition(&self, object: &SchemaObject) -> Result<String, FetchError>;

    /// Fetch the composite drop script for a table: foreign-key constraint
    /// drops referencing it, default-constraint drops, then the table drop,
    /// each terminated by a batch separator.
    async fn get_table_drop_statement(&self, object: &SchemaObject) -> Result<String, FetchError>;
}
