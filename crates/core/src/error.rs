//! Error types for sheetql-core.

use serde::Serialize;
use sheetql_sheet::SheetError;
use std::fmt;
use thiserror::Error;

/// Result type for job orchestration.
pub type JobResult<T> = Result<T, JobError>;

/// Category of an [`IdError`], as reported to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IdErrorKind {
    PrefixTooLong,
    Overflow,
    DuplicateId,
}

impl IdErrorKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            IdErrorKind::PrefixTooLong => "prefix_too_long",
            IdErrorKind::Overflow => "overflow",
            IdErrorKind::DuplicateId => "duplicate_id",
        }
    }
}

impl fmt::Display for IdErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors raised by ID configuration checks and ID generation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdError {
    /// The prefix leaves no room for a numeric suffix.
    #[error("Prefix length ({prefix_len}) must be less than total ID length ({total_length}).")]
    PrefixTooLong {
        prefix_len: usize,
        total_length: usize,
    },

    #[error("Starting number cannot be negative.")]
    NegativeStart { start: i64 },

    /// The last requested ID does not fit in the numeric field.
    #[error("Cannot generate {count} IDs starting from {start}. Maximum value for {digits} digits is {max}.")]
    Overflow {
        count: usize,
        start: i64,
        digits: usize,
        max: i128,
    },

    /// Two generated IDs collided. Indicates a width computation bug.
    #[error("Duplicate ID generated: {0}")]
    DuplicateId(String),
}

impl IdError {
    /// The reported category of this error.
    #[must_use]
    pub fn kind(&self) -> IdErrorKind {
        match self {
            IdError::PrefixTooLong { .. } => IdErrorKind::PrefixTooLong,
            IdError::NegativeStart { .. } | IdError::Overflow { .. } => IdErrorKind::Overflow,
            IdError::DuplicateId(_) => IdErrorKind::DuplicateId,
        }
    }
}

/// Errors that stop a job before any statement is produced.
#[derive(Debug, Error)]
pub enum JobError {
    /// The selected sheet has no data rows.
    #[error("Sheet '{sheet}' has no data rows")]
    EmptySheet { sheet: String },

    /// Table name is blank.
    #[error("Table name must not be empty")]
    EmptyTableName,

    /// A configured column is outside the sheet's header row.
    #[error("Column {column} is out of range (sheet '{sheet}' has {count} columns)")]
    ColumnOutOfRange {
        sheet: String,
        column: usize,
        count: usize,
    },

    /// UPDATE without any column to set.
    #[error("Select at least one column to update")]
    NoSetColumns,

    /// A VLOOKUP mapping is missing its return or target column.
    #[error("Mapping #{index} needs both a return column and a target column")]
    IncompleteMapping { index: usize },

    #[error(transparent)]
    Id(#[from] IdError),

    #[error(transparent)]
    Sheet(#[from] SheetError),
}

impl JobError {
    /// Create a column range error.
    pub fn column_out_of_range(sheet: impl Into<String>, column: usize, count: usize) -> Self {
        Self::ColumnOutOfRange {
            sheet: sheet.into(),
            column,
            count,
        }
    }
}
