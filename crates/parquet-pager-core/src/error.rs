//! Error types and SNAFU context selectors for the paging core.
//!
//! This module centralizes the error taxonomy used by the public API and
//! exposes context selectors (via `#[snafu(visibility(pub(crate)))]`) so
//! sibling modules can attach error context without re-exporting everything
//! at the crate root. The taxonomy mirrors the three failure surfaces of the
//! core: opening a file, extracting its schema, and reading row groups.

use arrow::error::ArrowError;
use parquet::errors::ParquetError;
use snafu::{Backtrace, prelude::*};

/// Errors raised while opening a Parquet file and parsing its footer.
///
/// Any variant leaves the reader closed; there is no partially-open state.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum OpenError {
    /// The file could not be opened (missing, unreadable, permissions).
    #[snafu(display("Failed to open file {path}: {source}"))]
    FileOpen {
        /// Path that was passed to `open`.
        path: String,
        /// Underlying filesystem error.
        source: std::io::Error,
        /// The backtrace at the time the error occurred.
        backtrace: Backtrace,
    },

    /// The on-disk size could not be determined after opening the handle.
    #[snafu(display("Failed to stat file {path}: {source}"))]
    FileStat {
        /// Path that was passed to `open`.
        path: String,
        /// Underlying filesystem error.
        source: std::io::Error,
        /// The backtrace at the time the error occurred.
        backtrace: Backtrace,
    },

    /// The file exists but is not a valid Parquet file (bad footer or
    /// corrupt metadata).
    #[snafu(display("Not a valid Parquet file {path}: {source}"))]
    Footer {
        /// Path that was passed to `open`.
        path: String,
        /// Underlying Parquet metadata error.
        source: ParquetError,
        /// The backtrace at the time the error occurred.
        backtrace: Backtrace,
    },
}

/// Parquet metadata was parsed but the schema could not be converted into an
/// Arrow schema.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum SchemaError {
    /// Parquet-to-Arrow schema conversion failed.
    #[snafu(display("Failed to extract schema from {path}: {source}"))]
    ArrowConvert {
        /// Path of the file whose schema was rejected.
        path: String,
        /// Underlying Parquet error from the schema converter.
        source: ParquetError,
        /// The backtrace at the time the error occurred.
        backtrace: Backtrace,
    },
}

/// I/O or decode failure while reading a set of row groups.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum ReadError {
    /// Cloning the owned file handle for a read failed.
    #[snafu(display("Failed to clone file handle for {path}: {source}"))]
    HandleClone {
        /// Path of the open file.
        path: String,
        /// Underlying filesystem error.
        source: std::io::Error,
        /// The backtrace at the time the error occurred.
        backtrace: Backtrace,
    },

    /// Building the row-group reader failed.
    #[snafu(display("Failed to build row-group reader for {path}: {source}"))]
    ReaderBuild {
        /// Path of the open file.
        path: String,
        /// Underlying Parquet error.
        source: ParquetError,
        /// The backtrace at the time the error occurred.
        backtrace: Backtrace,
    },

    /// Decoding a record batch from the selected row groups failed.
    #[snafu(display("Failed to decode row groups {row_groups:?} from {path}: {source}"))]
    BatchDecode {
        /// Path of the open file.
        path: String,
        /// Row-group ids that were being read.
        row_groups: Vec<usize>,
        /// Underlying Arrow decode error.
        source: ArrowError,
        /// The backtrace at the time the error occurred.
        backtrace: Backtrace,
    },

    /// Concatenating the decoded batches into one table failed.
    #[snafu(display("Failed to assemble table from {path}: {source}"))]
    Concat {
        /// Path of the open file.
        path: String,
        /// Underlying Arrow error.
        source: ArrowError,
        /// The backtrace at the time the error occurred.
        backtrace: Backtrace,
    },
}

/// Consumer-facing error for a failed `open` call.
///
/// `ReadError`s during `fetch_page` are absorbed into a "no page" result and
/// retained on the provider as a diagnostics side channel, so they never
/// surface through this enum from the paging path.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum PagerError {
    /// The file could not be opened or is not valid Parquet.
    #[snafu(display("{source}"))]
    Open {
        /// Underlying open failure.
        #[snafu(backtrace)]
        source: OpenError,
    },

    /// Metadata was present but schema extraction failed.
    #[snafu(display("{source}"))]
    Schema {
        /// Underlying schema failure.
        #[snafu(backtrace)]
        source: SchemaError,
    },
}
