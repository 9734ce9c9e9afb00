//! # sheetql-core
//!
//! The data-processing side of sheetql, independent of any file format.
//!
//! This crate provides:
//! - VLOOKUP joins between two sheets
//! - Primary-key validation (duplicates and empty keys)
//! - Sequential prefixed ID generation
//! - PostgreSQL INSERT / UPDATE statement generation
//! - Job runners that combine the above over a [`sheetql_sheet::Book`]

/// Statement generation settings.
pub mod config;
/// Error types and result aliases.
pub mod error;
/// PostgreSQL literal and identifier quoting.
pub mod escape;
/// ID generation.
pub mod ids;
/// End-to-end jobs.
pub mod job;
/// INSERT / UPDATE generation.
pub mod sql;
/// Primary-key checks.
pub mod validate;
/// VLOOKUP join.
pub mod vlookup;

pub use config::{IdMode, InsertConfig, UpdateConfig};
pub use error::{IdError, IdErrorKind, JobError, JobResult};
pub use escape::{escape_literal, format_value, quote_identifier};
pub use ids::{generate_ids, validate_id_config};
pub use job::{
    run_insert, run_update, run_vlookup, with_generated_ids, MappingEntry, SqlJobOutput,
    VlookupJob, VlookupJobOutput,
};
pub use sql::{generate_insert_sql, generate_update_sql, render_script};
pub use validate::{display_row, validate, DuplicateInfo, RowFinding, ValidationResult};
pub use vlookup::{
    apply_results, detect_key_columns, matchable_columns, perform_vlookup,
    resolve_key_columns, VlookupMapping, VlookupOutput, VlookupResult,
};
