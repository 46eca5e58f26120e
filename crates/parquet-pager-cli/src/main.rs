//! Command-line front end for browsing Parquet files page by page.

mod error;

use std::path::{Path, PathBuf};

use arrow::util::pretty::pretty_format_batches;
use clap::{Parser, Subcommand};
use snafu::{OptionExt, ResultExt};

use parquet_pager_core::{DataProvider, ParquetFileReader, ParquetPageProvider, PAGE_SIZE};

use crate::error::{CliResult, NoSuchPageSnafu, OpenFileSnafu, RenderPageSnafu};

#[derive(Debug, Subcommand)]
enum Command {
    /// Print file metadata: sizes, row count, row groups, schema
    Info {
        #[arg(long)]
        file: PathBuf,
    },

    /// Print the column name/type pairs only
    Schema {
        #[arg(long)]
        file: PathBuf,
    },

    /// Print one page of rows as a table
    Page {
        #[arg(long)]
        file: PathBuf,

        /// Page index (pages hold 10000 rows)
        #[arg(long, default_value_t = 0)]
        index: i64,

        /// Print at most this many rows of the page
        #[arg(long, default_value_t = 20)]
        limit: usize,
    },
}

#[derive(Debug, Parser)]
#[command(name = "parquet-pager", about = "Browse Parquet files page by page")]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

fn open_reader(file: &Path) -> CliResult<ParquetFileReader> {
    ParquetFileReader::open(file).context(OpenFileSnafu {
        file: file.display().to_string(),
    })
}

fn cmd_info(file: &Path) -> CliResult<()> {
    let reader = open_reader(file)?;
    print!("{}", reader.file_info());
    Ok(())
}

fn cmd_schema(file: &Path) -> CliResult<()> {
    let reader = open_reader(file)?;
    for field in reader.logical_schema().fields() {
        println!("{field}");
    }
    Ok(())
}

fn cmd_page(file: &Path, index: i64, limit: usize) -> CliResult<()> {
    let mut provider = ParquetPageProvider::new();
    provider.open(file).context(OpenFileSnafu {
        file: file.display().to_string(),
    })?;

    let page = provider.fetch_page(index).context(NoSuchPageSnafu {
        page: index,
        file: file.display().to_string(),
        rows: provider.row_count(),
    })?;

    let shown = page.num_rows().min(limit);
    let display = page.slice(0, shown);
    let rendered =
        pretty_format_batches(&[display]).context(RenderPageSnafu { page: index })?;
    println!("{rendered}");
    println!(
        "page {index}: rows {}..{} of {} (showing {shown})",
        index * PAGE_SIZE,
        index * PAGE_SIZE + page.num_rows() as i64,
        provider.row_count(),
    );
    Ok(())
}

fn run() -> CliResult<()> {
    let cli = Cli::parse();

    match cli.cmd {
        Command::Info { file } => cmd_info(&file),
        Command::Schema { file } => cmd_schema(&file),
        Command::Page { file, index, limit } => cmd_page(&file, index, limit),
    }
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("{e}");
        std::process::exit(1);
    }
}
