use arrow::error::ArrowError;
use parquet_pager_core::PagerError;
use snafu::Snafu;

pub type CliResult<T> = std::result::Result<T, CliError>;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum CliError {
    #[snafu(display(
        "Failed to open {file}. \
         Ensure the path exists and is a valid Parquet file."
    ))]
    OpenFile {
        file: String,
        #[snafu(source(from(PagerError, Box::new)))]
        source: Box<PagerError>,
    },

    #[snafu(display("Failed to render page {page}: {source}"))]
    RenderPage { page: i64, source: ArrowError },

    #[snafu(display("No page {page} in {file} ({rows} rows total)"))]
    NoSuchPage { page: i64, file: String, rows: i64 },
}
