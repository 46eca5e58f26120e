//! Paged row-window access over Parquet files.
//!
//! This crate is the data-access core of `parquet-pager`: it lets a
//! scrollable grid display arbitrarily large Parquet files while holding at
//! most one fixed-size page of decoded rows in memory.
//!
//! - [`reader::ParquetFileReader`] owns the file handle, parses the footer
//!   once, and serves whole-row-group reads.
//! - [`provider::ParquetPageProvider`] implements the paging contract
//!   ([`provider::DataProvider`]): map a page window onto the row-group
//!   layout, read the covering groups, slice out exactly the requested rows.
//! - [`cache::PageCache`] / [`cache::PageTable`] sit on the consumer side,
//!   redirecting row lookups to the one resident page and faulting pages in
//!   on demand.
//!
//! Everything is synchronous and blocking; one provider instance per open
//! file, no internal locking. Presentation (windows, menus, rendering) is a
//! separate concern that calls in through [`provider::DataProvider`] and
//! [`cache::PageTable`].
#![deny(missing_docs)]

pub mod cache;
pub mod error;
pub mod provider;
pub mod query;
pub mod reader;
pub mod schema;
pub mod value;

pub use cache::{PageCache, PageTable};
pub use error::{OpenError, PagerError, ReadError, SchemaError};
pub use provider::{DataProvider, PAGE_SIZE, ParquetPageProvider};
pub use query::Query;
pub use reader::{FileInfo, ParquetFileReader, RowGroupInfo};
pub use schema::{LogicalDataType, LogicalField, LogicalSchema};
pub use value::CellValue;
