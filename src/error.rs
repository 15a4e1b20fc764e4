//! Errors that abort a run, and the console messages they print as.
//!
//! The [`Display`](std::fmt::Display) form of every [`Error`] is exactly the
//! line shown to the user, so callers print errors as-is.

use std::{io, path::PathBuf};

use thiserror::Error;

use crate::table::TableKind;

/// Fixed console messages.
pub mod messages {
    pub const UNKNOWN_ERROR: &str = "An unexpected error has occurred";
    pub const FILE_NOT_EXIST: &str = "definition file does not exist";
    pub const FILE_INVALID_FORMAT: &str = "definition file has an invalid format";
    pub const FILE_NOT_SEQUENTIAL: &str = "Sales file names are not sequential";
    pub const SALE_AMOUNT_EXCEEDS_LIMIT: &str = "Total amount exceeds 10 digits";
    pub const SALES_FILE_INVALID_FORMAT: &str = "has an invalid format";
    pub const BRANCH_CODE_NOT_FOUND: &str = "has an invalid branch code";
    pub const COMMODITY_CODE_NOT_FOUND: &str = "has an invalid commodity code";
}

use messages::*;

#[derive(Debug, Error)]
pub enum Error {
    /// The command line did not name exactly one directory.
    #[error("{}", UNKNOWN_ERROR)]
    Argument(String),

    #[error("{kind} {msg}", msg = FILE_NOT_EXIST)]
    FileNotFound { kind: TableKind },

    #[error("{kind} {msg} (line {line})", msg = FILE_INVALID_FORMAT)]
    InvalidFormat { kind: TableKind, line: u64 },

    #[error("{}", FILE_NOT_SEQUENTIAL)]
    NonSequentialFiles { previous: String, next: String },

    #[error("{file} {msg}", msg = SALES_FILE_INVALID_FORMAT)]
    InvalidRecordFormat { file: String },

    #[error("{file} {msg}", msg = BRANCH_CODE_NOT_FOUND)]
    UnknownBranchCode { file: String },

    #[error("{file} {msg}", msg = COMMODITY_CODE_NOT_FOUND)]
    UnknownCommodityCode { file: String },

    /// The amount line is not a plain whole number.
    #[error("{}", UNKNOWN_ERROR)]
    InvalidAmount { file: String },

    #[error("{}", SALE_AMOUNT_EXCEEDS_LIMIT)]
    AmountExceedsLimit { file: String },

    #[error("{}", UNKNOWN_ERROR)]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Any other I/O failure, including a failure to close a file.
    #[error("{}", UNKNOWN_ERROR)]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn write(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::Write {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn from_csv(path: impl Into<PathBuf>, err: csv::Error) -> Self {
        Error::io(path, csv_to_io(err))
    }
}

/// Unwraps the I/O error inside a `csv` error, or describes a parse failure
/// as invalid data.
pub(crate) fn csv_to_io(err: csv::Error) -> io::Error {
    match err.into_kind() {
        csv::ErrorKind::Io(source) => source,
        other => io::Error::new(io::ErrorKind::InvalidData, format!("{other:?}")),
    }
}

pub type Result<T> = std::result::Result<T, Error>;
