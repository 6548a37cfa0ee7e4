//! # drift
//!
//! Compares the schema objects (tables, views, procedures, functions,
//! triggers) of two SQL Server databases and generates a remediation script
//! that brings the target's schema in line with the source's.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │           ObjectRepository (source + target)             │
//! │   listing, definition fetch, composite table drops       │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [diff engine: K workers]
//! ┌─────────────────────────────────────────────────────────┐
//! │   per-object compare: normalize → diff → drop + create   │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [outcome channel → collector]
//! ┌─────────────────────────────────────────────────────────┐
//! │              DiffReport (sorted outcomes)                │
//! └─────────────────────────────────────────────────────────┘
//!                          │
//!                          ▼ [script writer]
//! ┌─────────────────────────────────────────────────────────┐
//! │        schema-diff-<src>-<tgt>-<cats>-<run>.sql          │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! Comparison is textual, modulo whitespace normalization; the engine never
//! parses SQL. One failing object never aborts the run; only listing
//! failures and the final artifact write are fatal.

pub mod config;
pub mod diff;
pub mod model;
pub mod normalize;
pub mod remediation;
pub mod repository;
pub mod script;

pub use diff::{CompareOptions, DiffEngine, DiffError, DiffReport};
pub use model::{DiffOutcome, ObjectCategory, ObjectKind, SchemaObject, Side};
pub use normalize::normalize;
pub use repository::{FetchError, MsSqlRepository, ObjectRepository, RepositoryError};
