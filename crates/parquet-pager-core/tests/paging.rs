//! End-to-end paging behavior against real Parquet files.

use std::fs::File;
use std::path::Path;
use std::sync::Arc;

use arrow::array::{Int64Array, StringArray};
use arrow::compute::concat_batches;
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::arrow::ArrowWriter;
use parquet::file::properties::WriterProperties;
use tempfile::TempDir;

use parquet_pager_core::{
    CellValue, DataProvider, PageCache, PageTable, ParquetPageProvider, PAGE_SIZE,
};

type TestResult = Result<(), Box<dyn std::error::Error>>;

fn fixture_schema() -> Arc<Schema> {
    Arc::new(Schema::new(vec![
        Field::new("id", DataType::Int64, false),
        Field::new("label", DataType::Utf8, false),
    ]))
}

/// Write a file whose row groups have exactly `row_group_sizes` rows; `id`
/// counts up from 0 in file order.
fn write_fixture(path: &Path, row_group_sizes: &[usize]) -> TestResult {
    let schema = fixture_schema();
    let max_group = row_group_sizes.iter().copied().max().unwrap_or(1);
    let props = WriterProperties::builder()
        .set_max_row_group_size(max_group)
        .build();

    let file = File::create(path)?;
    let mut writer = ArrowWriter::try_new(file, schema.clone(), Some(props))?;

    let mut next_id = 0i64;
    for &size in row_group_sizes {
        let ids: Vec<i64> = (next_id..next_id + size as i64).collect();
        let labels: Vec<String> = ids.iter().map(|i| format!("row-{i}")).collect();
        next_id += size as i64;

        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(Int64Array::from(ids)),
                Arc::new(StringArray::from(labels)),
            ],
        )?;
        writer.write(&batch)?;
        writer.flush()?;
    }
    writer.close()?;
    Ok(())
}

/// Reference full-table read, independent of the paging path.
fn read_full(path: &Path) -> Result<RecordBatch, Box<dyn std::error::Error>> {
    let file = File::open(path)?;
    let reader = ParquetRecordBatchReaderBuilder::try_new(file)?.build()?;
    let batches: Vec<RecordBatch> = reader.collect::<Result<_, _>>()?;
    let schema = fixture_schema();
    Ok(concat_batches(&schema, &batches)?)
}

fn ids_of(batch: &RecordBatch) -> Vec<i64> {
    batch
        .column(0)
        .as_any()
        .downcast_ref::<Int64Array>()
        .expect("id column")
        .iter()
        .map(|v| v.expect("non-null id"))
        .collect()
}

#[test]
fn pages_round_trip_against_full_read() -> TestResult {
    let tmp = TempDir::new()?;
    let path = tmp.path().join("groups.parquet");
    // 12_000 rows in three groups of 4_000, so pages straddle group
    // boundaries both ways.
    write_fixture(&path, &[4_000, 4_000, 4_000])?;

    let full = read_full(&path)?;
    let full_ids = ids_of(&full);

    let mut provider = ParquetPageProvider::new();
    provider.open(&path)?;
    assert_eq!(provider.row_count(), 12_000);

    for page_index in 0..2 {
        let page = provider.fetch_page(page_index).expect("page exists");
        let start = (page_index * PAGE_SIZE) as usize;
        let want = (PAGE_SIZE as usize).min(12_000 - start);
        assert_eq!(page.num_rows(), want);
        assert_eq!(ids_of(&page), &full_ids[start..start + want]);
    }
    Ok(())
}

#[test]
fn page_one_of_three_small_groups_comes_from_last_group_only() -> TestResult {
    let tmp = TempDir::new()?;
    let path = tmp.path().join("tail.parquet");
    write_fixture(&path, &[4_000, 4_000, 4_000])?;

    let mut provider = ParquetPageProvider::new();
    provider.open(&path)?;

    // Rows 10_000..12_000 live entirely in the last group; the slice
    // offset within the read table is 2_000.
    let page = provider.fetch_page(1).expect("tail page exists");
    assert_eq!(page.num_rows(), 2_000);
    let ids = ids_of(&page);
    assert_eq!(ids.first(), Some(&10_000));
    assert_eq!(ids.last(), Some(&11_999));
    Ok(())
}

#[test]
fn out_of_range_page_indices_yield_no_page() -> TestResult {
    let tmp = TempDir::new()?;
    let path = tmp.path().join("range.parquet");
    write_fixture(&path, &[100])?;

    let mut provider = ParquetPageProvider::new();
    provider.open(&path)?;

    assert!(provider.fetch_page(-1).is_none());
    assert!(provider.fetch_page(1).is_none());
    assert!(provider.fetch_page(i64::MAX / PAGE_SIZE + 1).is_none());
    assert!(provider.last_error().is_none());
    Ok(())
}

#[test]
fn fetch_page_is_idempotent() -> TestResult {
    let tmp = TempDir::new()?;
    let path = tmp.path().join("idem.parquet");
    write_fixture(&path, &[4_000, 4_000, 4_000])?;

    let mut provider = ParquetPageProvider::new();
    provider.open(&path)?;

    let first = provider.fetch_page(1).expect("page exists");
    let second = provider.fetch_page(1).expect("page exists");
    assert_eq!(ids_of(&first), ids_of(&second));
    Ok(())
}

#[test]
fn empty_file_has_schema_but_no_pages() -> TestResult {
    let tmp = TempDir::new()?;
    let path = tmp.path().join("empty.parquet");
    let file = File::create(&path)?;
    let writer = ArrowWriter::try_new(file, fixture_schema(), None)?;
    writer.close()?;

    let mut provider = ParquetPageProvider::new();
    provider.open(&path)?;

    assert_eq!(provider.row_count(), 0);
    assert!(provider.fetch_page(0).is_none());
    let schema = provider.schema().expect("schema survives emptiness");
    assert_eq!(schema.fields().len(), 2);
    Ok(())
}

#[test]
fn exact_page_size_group_fills_one_page_only() -> TestResult {
    let tmp = TempDir::new()?;
    let path = tmp.path().join("exact.parquet");
    write_fixture(&path, &[PAGE_SIZE as usize])?;

    let mut provider = ParquetPageProvider::new();
    provider.open(&path)?;

    let page = provider.fetch_page(0).expect("page exists");
    assert_eq!(page.num_rows(), PAGE_SIZE as usize);
    assert_eq!(ids_of(&page).first(), Some(&0));
    assert!(provider.fetch_page(1).is_none());
    Ok(())
}

#[test]
fn reopen_discards_previous_file_entirely() -> TestResult {
    let tmp = TempDir::new()?;
    let first = tmp.path().join("first.parquet");
    let second = tmp.path().join("second.parquet");
    write_fixture(&first, &[50])?;

    // Different shape: single column, fewer rows.
    let schema = Arc::new(Schema::new(vec![Field::new(
        "only",
        DataType::Int64,
        false,
    )]));
    let file = File::create(&second)?;
    let mut writer = ArrowWriter::try_new(file, schema.clone(), None)?;
    writer.write(&RecordBatch::try_new(
        schema,
        vec![Arc::new(Int64Array::from(vec![7i64; 10]))],
    )?)?;
    writer.close()?;

    let mut table = PageTable::new(Box::new(ParquetPageProvider::new()));
    table.open(&first)?;
    assert_eq!(table.row_count(), 50);
    assert_eq!(table.column_count(), 2);
    assert_eq!(table.cell(49, 0), Some(CellValue::Int(49)));

    table.open(&second)?;
    assert_eq!(table.row_count(), 10);
    assert_eq!(table.column_count(), 1);
    assert_eq!(table.column_name(0).as_deref(), Some("only"));
    assert_eq!(table.cell(0, 0), Some(CellValue::Int(7)));
    assert_eq!(table.cell(49, 0), None);
    Ok(())
}

#[test]
fn failed_open_clears_prior_state() -> TestResult {
    let tmp = TempDir::new()?;
    let good = tmp.path().join("good.parquet");
    let bad = tmp.path().join("bad.parquet");
    write_fixture(&good, &[25])?;
    std::fs::write(&bad, b"definitely not parquet")?;

    let mut provider = ParquetPageProvider::new();
    provider.open(&good)?;
    assert_eq!(provider.row_count(), 25);

    let err = provider.open(&bad);
    assert!(err.is_err());
    assert_eq!(provider.row_count(), 0);
    assert!(provider.schema().is_none());
    assert!(provider.fetch_page(0).is_none());
    Ok(())
}

#[test]
fn read_failure_is_absorbed_and_retained() -> TestResult {
    let tmp = TempDir::new()?;
    let path = tmp.path().join("corrupt.parquet");
    write_fixture(&path, &[4_000, 4_000])?;

    let mut provider = ParquetPageProvider::new();
    provider.open(&path)?;
    assert_eq!(provider.row_count(), 8_000);

    // Truncate the data pages out from under the open handle; metadata is
    // already parsed, so the failure surfaces at read time.
    let f = std::fs::OpenOptions::new().write(true).open(&path)?;
    f.set_len(4)?;

    assert!(provider.fetch_page(0).is_none());
    assert!(provider.last_error().is_some());
    Ok(())
}

#[test]
fn cache_and_provider_agree_across_page_boundaries() -> TestResult {
    let tmp = TempDir::new()?;
    let path = tmp.path().join("walk.parquet");
    write_fixture(&path, &[4_000, 4_000, 4_000])?;

    let mut provider = ParquetPageProvider::new();
    provider.open(&path)?;
    let mut cache = PageCache::new();

    for row in [0i64, 3_999, 4_000, 9_999, 10_000, 11_999] {
        let (page, offset) = cache.row(&mut provider, row).expect("row exists");
        let ids = ids_of(page);
        assert_eq!(ids[offset], row);
    }
    assert!(cache.row(&mut provider, 12_000).is_none());
    Ok(())
}
