//! Paged data providers.
//!
//! [`DataProvider`] is the stable paging contract the grid consumer talks to;
//! [`ParquetPageProvider`] is the reference backend over
//! [`ParquetFileReader`]. Pages are fixed windows of [`PAGE_SIZE`] rows.
//! `fetch_page` maps a page window onto the physical row-group layout,
//! reads only the covering groups, and slices out exactly the requested rows.

use std::path::Path;

use arrow::datatypes::SchemaRef;
use arrow::record_batch::RecordBatch;
use log::warn;

use crate::error::{PagerError, ReadError};
use crate::query::Query;
use crate::reader::{ParquetFileReader, RowGroupInfo};

/// Number of rows per page.
pub const PAGE_SIZE: i64 = 10_000;

/// Paging contract between the grid consumer and a backend.
///
/// The reference backend is synchronous and blocking; `cancel` and
/// `set_query` are hooks for alternative backends (streaming reads, query
/// pushdown) and have no effect here. Implementations are not internally
/// synchronized; callers must serialize access to one provider instance.
pub trait DataProvider {
    /// Open `path`, discarding any previously opened file first.
    ///
    /// After a failed open the provider is closed: `row_count` is 0 and
    /// `schema` is `None`, regardless of any earlier successful open.
    fn open(&mut self, path: &Path) -> Result<(), PagerError>;

    /// Install a query. A backend may use it to change what `fetch_page`
    /// returns; the reference backend ignores it.
    fn set_query(&mut self, query: Query);

    /// Schema of the open file, or `None` when closed.
    fn schema(&self) -> Option<SchemaRef>;

    /// Total logical rows, or 0 when closed.
    fn row_count(&self) -> i64;

    /// Whether `row_count` is an estimate. Exact for this crate's backend.
    fn is_row_count_approximate(&self) -> bool;

    /// Fetch the page at `page_index`.
    ///
    /// Returns `None` ("no page") for a negative index, a window past the
    /// end of the file, or a read failure; absence is not an error.
    fn fetch_page(&mut self, page_index: i64) -> Option<RecordBatch>;

    /// Abort an in-flight fetch. No-op for synchronous backends.
    fn cancel(&mut self);
}

/// Select the row groups whose row intervals intersect `[start, end)`.
///
/// Strict overlap: a group ending exactly at `start` or starting exactly at
/// `end` contributes no requested row and is excluded.
pub fn select_row_groups(row_groups: &[RowGroupInfo], start: i64, end: i64) -> Vec<usize> {
    row_groups
        .iter()
        .enumerate()
        .filter(|(_, rg)| rg.start_row < end && rg.start_row + rg.num_rows > start)
        .map(|(id, _)| id)
        .collect()
}

/// Reference paged provider over a single Parquet file.
#[derive(Debug, Default)]
pub struct ParquetPageProvider {
    reader: Option<ParquetFileReader>,
    query: Query,
    last_error: Option<ReadError>,
}

impl ParquetPageProvider {
    /// Create a closed provider.
    pub fn new() -> Self {
        Self::default()
    }

    /// The underlying reader, for metadata surfaces like
    /// [`ParquetFileReader::file_info`]. `None` when closed.
    pub fn reader(&self) -> Option<&ParquetFileReader> {
        self.reader.as_ref()
    }

    /// The currently installed query. Inert for this backend.
    pub fn query(&self) -> &Query {
        &self.query
    }

    /// The read failure absorbed by the most recent `fetch_page`, if any.
    ///
    /// Cleared by a successful fetch and by `open`. Lets a consumer
    /// distinguish "row beyond end of file" from "row exists but failed to
    /// read" when it cares to.
    pub fn last_error(&self) -> Option<&ReadError> {
        self.last_error.as_ref()
    }
}

impl DataProvider for ParquetPageProvider {
    fn open(&mut self, path: &Path) -> Result<(), PagerError> {
        // Drop the previous file before touching the new one so a failure
        // cannot leak stale state.
        self.reader = None;
        self.last_error = None;

        self.reader = Some(ParquetFileReader::open(path)?);
        Ok(())
    }

    fn set_query(&mut self, query: Query) {
        // Stored but never applied: this backend serves the file unfiltered.
        self.query = query;
    }

    fn schema(&self) -> Option<SchemaRef> {
        self.reader.as_ref().map(ParquetFileReader::schema)
    }

    fn row_count(&self) -> i64 {
        self.reader.as_ref().map_or(0, ParquetFileReader::row_count)
    }

    fn is_row_count_approximate(&self) -> bool {
        false
    }

    fn fetch_page(&mut self, page_index: i64) -> Option<RecordBatch> {
        let reader = self.reader.as_ref()?;
        if page_index < 0 {
            return None;
        }

        let start = page_index.checked_mul(PAGE_SIZE)?;
        let total = reader.row_count();
        if start >= total {
            return None;
        }

        let want = PAGE_SIZE.min(total - start);
        let end = start + want;

        let selected = select_row_groups(reader.row_groups(), start, end);
        // Empty selection here means the index disagrees with row_count.
        let first = *selected.first()?;
        let first_offset = reader.row_groups()[first].start_row;

        match reader.read_row_groups(&selected) {
            Ok(table) => {
                let local_offset = start - first_offset;
                let page = table.slice(local_offset as usize, want as usize);
                self.last_error = None;
                Some(page)
            }
            Err(err) => {
                warn!("fetch_page({page_index}) failed reading row groups {selected:?}: {err}");
                self.last_error = Some(err);
                None
            }
        }
    }

    fn cancel(&mut self) {}
}
