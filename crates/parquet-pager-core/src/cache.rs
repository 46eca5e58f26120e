//! Single-page cache and the grid-facing table adapter.
//!
//! [`PageCache`] keeps at most one decoded page resident, keyed by page
//! index, so the whole system never holds more than [`PAGE_SIZE`] rows of
//! decoded data plus the row-group index in memory, independent of file
//! size. A row lookup behaves like a pure query from the caller's point of
//! view but may replace the cached page as a side effect; that mutation is
//! explicit here rather than hidden behind a shared view.

use std::path::{Path, PathBuf};

use arrow::record_batch::RecordBatch;

use crate::error::PagerError;
use crate::provider::{DataProvider, PAGE_SIZE};
use crate::value::{cell_value, CellValue};

#[derive(Debug, Default)]
enum CacheState {
    #[default]
    Empty,
    Loaded { page_index: i64, page: RecordBatch },
}

/// Holds the one currently resident page.
#[derive(Debug, Default)]
pub struct PageCache {
    state: CacheState,
}

impl PageCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop any resident page.
    pub fn clear(&mut self) {
        self.state = CacheState::Empty;
    }

    /// Index of the resident page, if any.
    pub fn loaded_page_index(&self) -> Option<i64> {
        match &self.state {
            CacheState::Empty => None,
            CacheState::Loaded { page_index, .. } => Some(*page_index),
        }
    }

    /// Resolve logical row `row` to the page containing it plus the row's
    /// offset within that page, fetching through `provider` on a miss.
    ///
    /// On a miss that `fetch_page` answers with "no page" the cache
    /// transitions to empty and the lookup reports absence.
    pub fn row(
        &mut self,
        provider: &mut dyn DataProvider,
        row: i64,
    ) -> Option<(&RecordBatch, usize)> {
        if row < 0 {
            return None;
        }
        let wanted = row / PAGE_SIZE;
        let row_in_page = (row % PAGE_SIZE) as usize;

        let hit = matches!(
            &self.state,
            CacheState::Loaded { page_index, .. } if *page_index == wanted
        );
        if !hit {
            match provider.fetch_page(wanted) {
                Some(page) => {
                    self.state = CacheState::Loaded {
                        page_index: wanted,
                        page,
                    };
                }
                None => {
                    self.state = CacheState::Empty;
                    return None;
                }
            }
        }

        match &self.state {
            CacheState::Loaded { page, .. } if row_in_page < page.num_rows() => {
                Some((page, row_in_page))
            }
            _ => None,
        }
    }
}

/// Grid-facing table over a provider plus a [`PageCache`].
///
/// This is the consumer-side adapter the (out-of-scope) presentation layer
/// drives: cell reads trigger page fetches transparently; opening a file
/// invalidates the cache before any new page can be loaded.
pub struct PageTable {
    provider: Box<dyn DataProvider>,
    cache: PageCache,
    path: Option<PathBuf>,
}

impl PageTable {
    /// Build a table over the given backend.
    pub fn new(provider: Box<dyn DataProvider>) -> Self {
        Self {
            provider,
            cache: PageCache::new(),
            path: None,
        }
    }

    /// Open `path`, discarding the previous file's cache and metadata first.
    pub fn open(&mut self, path: &Path) -> Result<(), PagerError> {
        self.cache.clear();
        self.path = None;
        self.provider.open(path)?;
        self.path = Some(path.to_path_buf());
        Ok(())
    }

    /// Path of the open file, if any.
    pub fn file_path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Total logical rows; 0 when closed.
    pub fn row_count(&self) -> i64 {
        self.provider.row_count()
    }

    /// Number of columns; 0 when closed.
    pub fn column_count(&self) -> usize {
        self.provider.schema().map_or(0, |s| s.fields().len())
    }

    /// Header name for column `col`.
    pub fn column_name(&self, col: usize) -> Option<String> {
        let schema = self.provider.schema()?;
        let field = schema.fields().get(col)?;
        Some(field.name().clone())
    }

    /// Read one cell, faulting in the covering page when needed.
    pub fn cell(&mut self, row: i64, col: usize) -> Option<CellValue> {
        let (page, row_in_page) = self.cache.row(self.provider.as_mut(), row)?;
        if col >= page.num_columns() {
            return None;
        }
        Some(cell_value(page.column(col).as_ref(), row_in_page))
    }

    /// The backend, for metadata surfaces beyond the paging contract.
    pub fn provider(&self) -> &dyn DataProvider {
        self.provider.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::Int64Array;
    use arrow::datatypes::{DataType, Field, Schema, SchemaRef};
    use std::sync::Arc;

    /// Scripted in-memory backend: serves pages out of a fixed row count and
    /// counts fetches, so cache behavior is observable without files.
    struct ScriptedProvider {
        rows: i64,
        fetches: usize,
        fail: bool,
    }

    impl ScriptedProvider {
        fn new(rows: i64) -> Self {
            Self {
                rows,
                fetches: 0,
                fail: false,
            }
        }

        fn schema_ref() -> SchemaRef {
            Arc::new(Schema::new(vec![Field::new("n", DataType::Int64, false)]))
        }
    }

    impl DataProvider for ScriptedProvider {
        fn open(&mut self, _path: &Path) -> Result<(), PagerError> {
            Ok(())
        }

        fn set_query(&mut self, _query: crate::query::Query) {}

        fn schema(&self) -> Option<SchemaRef> {
            Some(Self::schema_ref())
        }

        fn row_count(&self) -> i64 {
            self.rows
        }

        fn is_row_count_approximate(&self) -> bool {
            false
        }

        fn fetch_page(&mut self, page_index: i64) -> Option<RecordBatch> {
            self.fetches += 1;
            if self.fail || page_index < 0 {
                return None;
            }
            let start = page_index * PAGE_SIZE;
            if start >= self.rows {
                return None;
            }
            let want = PAGE_SIZE.min(self.rows - start);
            let values: Vec<i64> = (start..start + want).collect();
            Some(
                RecordBatch::try_new(
                    Self::schema_ref(),
                    vec![Arc::new(Int64Array::from(values))],
                )
                .expect("valid batch"),
            )
        }

        fn cancel(&mut self) {}
    }

    #[test]
    fn lookup_starts_empty_and_loads_on_miss() {
        let mut provider = ScriptedProvider::new(25_000);
        let mut cache = PageCache::new();
        assert_eq!(cache.loaded_page_index(), None);

        let (page, offset) = cache.row(&mut provider, 12_345).expect("row exists");
        assert_eq!(offset, 2_345);
        assert_eq!(page.num_rows(), PAGE_SIZE as usize);
        assert_eq!(cache.loaded_page_index(), Some(1));
        assert_eq!(provider.fetches, 1);
    }

    #[test]
    fn hits_do_not_refetch() {
        let mut provider = ScriptedProvider::new(25_000);
        let mut cache = PageCache::new();

        cache.row(&mut provider, 3).expect("row exists");
        cache.row(&mut provider, 4).expect("row exists");
        cache.row(&mut provider, 9_999).expect("row exists");
        assert_eq!(provider.fetches, 1);

        // Crossing a page boundary replaces the resident page.
        cache.row(&mut provider, 10_000).expect("row exists");
        assert_eq!(provider.fetches, 2);
        assert_eq!(cache.loaded_page_index(), Some(1));
    }

    #[test]
    fn no_page_transitions_to_empty() {
        let mut provider = ScriptedProvider::new(25_000);
        let mut cache = PageCache::new();
        cache.row(&mut provider, 0).expect("row exists");
        assert_eq!(cache.loaded_page_index(), Some(0));

        assert!(cache.row(&mut provider, 999_999_999).is_none());
        assert_eq!(cache.loaded_page_index(), None);
    }

    #[test]
    fn negative_rows_are_absent_without_fetching() {
        let mut provider = ScriptedProvider::new(25_000);
        let mut cache = PageCache::new();
        assert!(cache.row(&mut provider, -1).is_none());
        assert_eq!(provider.fetches, 0);
    }

    #[test]
    fn failed_fetch_empties_the_cache() {
        let mut provider = ScriptedProvider::new(25_000);
        let mut cache = PageCache::new();
        cache.row(&mut provider, 0).expect("row exists");

        provider.fail = true;
        assert!(cache.row(&mut provider, 20_000).is_none());
        assert_eq!(cache.loaded_page_index(), None);
    }

    #[test]
    fn table_reads_cells_through_the_cache() {
        let mut table = PageTable::new(Box::new(ScriptedProvider::new(25_000)));
        assert_eq!(table.row_count(), 25_000);
        assert_eq!(table.column_count(), 1);
        assert_eq!(table.column_name(0).as_deref(), Some("n"));
        assert_eq!(table.column_name(1), None);

        assert_eq!(table.cell(0, 0), Some(CellValue::Int(0)));
        assert_eq!(table.cell(24_999, 0), Some(CellValue::Int(24_999)));
        assert_eq!(table.cell(25_000, 0), None);
        assert_eq!(table.cell(0, 5), None);
    }
}
