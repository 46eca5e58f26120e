//! Parquet file reader: footer parsing, row-group index, and range reads.
//!
//! [`ParquetFileReader`] owns the file handle for one Parquet file. `open`
//! parses the footer once, converts the schema to Arrow, and precomputes the
//! row-group index (each group's starting logical row offset). After that the
//! only I/O the reader performs is [`ParquetFileReader::read_row_groups`],
//! which decodes the requested groups into a single in-memory
//! [`RecordBatch`]. The reader never buffers more than one such read.

use std::fmt;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use arrow::compute::concat_batches;
use arrow::datatypes::SchemaRef;
use arrow::record_batch::RecordBatch;
use log::debug;
use parquet::arrow::arrow_reader::{
    ArrowReaderMetadata, ArrowReaderOptions, ParquetRecordBatchReaderBuilder,
};
use parquet::file::metadata::ParquetMetaDataReader;
use snafu::prelude::*;

use crate::error::{
    ArrowConvertSnafu, BatchDecodeSnafu, ConcatSnafu, FileOpenSnafu, FileStatSnafu, FooterSnafu,
    HandleCloneSnafu, PagerError, ReadError, ReaderBuildSnafu,
};
use crate::schema::LogicalSchema;

/// Position of one row group within the file's logical row space.
///
/// Row groups are contiguous and non-overlapping, so `start_row` is the
/// cumulative sum of the preceding groups' row counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowGroupInfo {
    /// Logical row offset of the group's first row.
    pub start_row: i64,
    /// Number of rows in the group.
    pub num_rows: i64,
}

/// Metadata summary for the file-info surface.
#[derive(Debug, Clone)]
pub struct FileInfo {
    /// Path the file was opened from.
    pub path: PathBuf,
    /// On-disk size in bytes.
    pub file_size: u64,
    /// Sum of the row groups' uncompressed byte sizes.
    pub uncompressed_size: i64,
    /// Total logical rows across all row groups.
    pub row_count: i64,
    /// Number of row groups.
    pub row_group_count: usize,
    /// Logical column name/type pairs.
    pub schema: LogicalSchema,
}

impl fmt::Display for FileInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "File Path: {}", self.path.display())?;
        writeln!(f, "File Size: {}", format_size(self.file_size))?;
        writeln!(
            f,
            "Uncompressed Size: {}",
            format_size(self.uncompressed_size.max(0) as u64)
        )?;
        writeln!(f, "Total Rows: {}", self.row_count)?;
        writeln!(f, "Number of Row Groups: {}", self.row_group_count)?;
        writeln!(f, "Schema:")?;
        for field in self.schema.fields() {
            writeln!(f, "  - {field}")?;
        }
        Ok(())
    }
}

/// Format a byte count as B/KB/MB/GB with two decimals.
pub fn format_size(bytes: u64) -> String {
    if bytes < 1024 {
        return format!("{bytes} B");
    }
    let kb = bytes as f64 / 1024.0;
    if kb < 1024.0 {
        return format!("{kb:.2} KB");
    }
    let mb = kb / 1024.0;
    if mb < 1024.0 {
        return format!("{mb:.2} MB");
    }
    format!("{:.2} GB", mb / 1024.0)
}

/// Reader for a single Parquet file.
///
/// Construction is the `open` operation: a value of this type always holds a
/// fully parsed footer and a valid Arrow schema. Dropping the reader releases
/// the file handle.
pub struct ParquetFileReader {
    path: PathBuf,
    file: File,
    file_size: u64,
    metadata: ArrowReaderMetadata,
    row_groups: Vec<RowGroupInfo>,
}

impl ParquetFileReader {
    /// Open `path`, parse its footer, and build the row-group index.
    ///
    /// Fails with [`PagerError::Open`] when the file is missing, unreadable,
    /// or not valid Parquet, and with [`PagerError::Schema`] when the footer
    /// parses but the schema cannot be converted to Arrow. There is no
    /// partial success: on error no reader exists.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, PagerError> {
        let path = path.into();
        let path_str = path.display().to_string();

        let file = File::open(&path)
            .context(FileOpenSnafu { path: &path_str })
            .context(crate::error::OpenSnafu)?;
        let file_size = file
            .metadata()
            .context(FileStatSnafu { path: &path_str })
            .context(crate::error::OpenSnafu)?
            .len();

        let parquet_meta = ParquetMetaDataReader::new()
            .parse_and_finish(&file)
            .context(FooterSnafu { path: &path_str })
            .context(crate::error::OpenSnafu)?;

        let metadata =
            ArrowReaderMetadata::try_new(Arc::new(parquet_meta), ArrowReaderOptions::new())
                .context(ArrowConvertSnafu { path: &path_str })
                .context(crate::error::SchemaSnafu)?;

        let mut row_groups = Vec::with_capacity(metadata.metadata().num_row_groups());
        let mut start_row = 0i64;
        for rg in metadata.metadata().row_groups() {
            row_groups.push(RowGroupInfo {
                start_row,
                num_rows: rg.num_rows(),
            });
            start_row += rg.num_rows();
        }

        debug!(
            "opened {path_str}: {} rows in {} row groups",
            metadata.metadata().file_metadata().num_rows(),
            row_groups.len()
        );

        Ok(Self {
            path,
            file,
            file_size,
            metadata,
            row_groups,
        })
    }

    /// Path the file was opened from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Arrow schema of the file.
    pub fn schema(&self) -> SchemaRef {
        self.metadata.schema().clone()
    }

    /// Logical (grid-facing) schema of the file.
    pub fn logical_schema(&self) -> LogicalSchema {
        LogicalSchema::from(self.metadata.schema().as_ref())
    }

    /// Total logical rows across all row groups.
    pub fn row_count(&self) -> i64 {
        self.metadata.metadata().file_metadata().num_rows()
    }

    /// The row-group index, in file order.
    pub fn row_groups(&self) -> &[RowGroupInfo] {
        &self.row_groups
    }

    /// Metadata summary for the file-info surface.
    pub fn file_info(&self) -> FileInfo {
        let uncompressed_size = self
            .metadata
            .metadata()
            .row_groups()
            .iter()
            .map(|rg| rg.total_byte_size())
            .sum();

        FileInfo {
            path: self.path.clone(),
            file_size: self.file_size,
            uncompressed_size,
            row_count: self.row_count(),
            row_group_count: self.row_groups.len(),
            schema: self.logical_schema(),
        }
    }

    /// Read the given row groups (each in full) and concatenate them, in
    /// ascending row-group order, into one [`RecordBatch`].
    ///
    /// The returned batch's row order is the file's natural order restricted
    /// to the requested groups. Requesting no groups yields an empty batch
    /// with the file's schema.
    pub fn read_row_groups(&self, ids: &[usize]) -> Result<RecordBatch, ReadError> {
        let path_str = self.path.display().to_string();
        let schema = self.schema();

        if ids.is_empty() {
            return Ok(RecordBatch::new_empty(schema));
        }

        let mut ids = ids.to_vec();
        ids.sort_unstable();
        ids.dedup();

        // A fresh handle per read keeps `read_row_groups` free of cursor
        // state shared with other reads.
        let file = self
            .file
            .try_clone()
            .context(HandleCloneSnafu { path: &path_str })?;

        let reader = ParquetRecordBatchReaderBuilder::new_with_metadata(file, self.metadata.clone())
            .with_row_groups(ids.clone())
            .build()
            .context(ReaderBuildSnafu { path: &path_str })?;

        let mut batches = Vec::new();
        for batch in reader {
            let batch = batch.context(BatchDecodeSnafu {
                path: &path_str,
                row_groups: ids.clone(),
            })?;
            batches.push(batch);
        }

        concat_batches(&schema, &batches).context(ConcatSnafu { path: &path_str })
    }
}

impl fmt::Debug for ParquetFileReader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParquetFileReader")
            .field("path", &self.path)
            .field("row_count", &self.row_count())
            .field("row_groups", &self.row_groups.len())
            .finish()
    }
}
