//! Typed cell values extracted from a page.
//!
//! The grid renders whatever typed value the core hands it. [`cell_value`]
//! downcasts a page column to its concrete Arrow array and pulls out one
//! element, widening integers to 64 bits and converting timestamps to UTC.
//! Types outside the grid's native set fall back to Arrow's own text
//! rendering via [`ArrayFormatter`].

use std::fmt;

use arrow::array::{
    Array, BooleanArray, Float32Array, Float64Array, Int8Array, Int16Array, Int32Array,
    Int64Array, LargeStringArray, StringArray, TimestampMicrosecondArray,
    TimestampMillisecondArray, TimestampNanosecondArray, TimestampSecondArray, UInt8Array,
    UInt16Array, UInt32Array, UInt64Array,
};
use arrow::datatypes::{DataType, TimeUnit};
use arrow::util::display::{ArrayFormatter, FormatOptions};
use chrono::{DateTime, Utc};

/// One cell of a page, in the grid's native value set.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// Null cell.
    Null,
    /// Boolean.
    Bool(bool),
    /// Signed integer (int8 through int64, widened).
    Int(i64),
    /// Unsigned integer (uint8 through uint64, widened).
    UInt(u64),
    /// 32-bit float.
    Float32(f32),
    /// 64-bit float.
    Float64(f64),
    /// UTF-8 string (both offset widths).
    Str(String),
    /// Timestamp, converted to UTC.
    Timestamp(DateTime<Utc>),
    /// Anything else, rendered as text.
    Other(String),
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Null => write!(f, "<NULL>"),
            CellValue::Bool(v) => write!(f, "{v}"),
            CellValue::Int(v) => write!(f, "{v}"),
            CellValue::UInt(v) => write!(f, "{v}"),
            CellValue::Float32(v) => write!(f, "{v}"),
            CellValue::Float64(v) => write!(f, "{v}"),
            CellValue::Str(v) => write!(f, "{v}"),
            CellValue::Timestamp(v) => write!(f, "{v}"),
            CellValue::Other(v) => write!(f, "{v}"),
        }
    }
}

macro_rules! extract {
    ($array:expr, $row:expr, $array_ty:ty, $variant:expr) => {{
        let arr = $array
            .as_any()
            .downcast_ref::<$array_ty>()
            .expect("array type matches its DataType");
        $variant(arr.value($row))
    }};
}

fn timestamp_millis(array: &dyn Array, row: usize, unit: &TimeUnit) -> Option<i64> {
    let raw = match unit {
        TimeUnit::Second => array
            .as_any()
            .downcast_ref::<TimestampSecondArray>()?
            .value(row)
            .checked_mul(1_000)?,
        TimeUnit::Millisecond => array
            .as_any()
            .downcast_ref::<TimestampMillisecondArray>()?
            .value(row),
        TimeUnit::Microsecond => {
            array
                .as_any()
                .downcast_ref::<TimestampMicrosecondArray>()?
                .value(row)
                / 1_000
        }
        TimeUnit::Nanosecond => {
            array
                .as_any()
                .downcast_ref::<TimestampNanosecondArray>()?
                .value(row)
                / 1_000_000
        }
    };
    Some(raw)
}

fn fallback_text(array: &dyn Array, row: usize) -> CellValue {
    let options = FormatOptions::default();
    match ArrayFormatter::try_new(array, &options) {
        Ok(formatter) => CellValue::Other(formatter.value(row).to_string()),
        Err(_) => CellValue::Null,
    }
}

/// Extract the value at `row` from a page column.
///
/// `row` must be in bounds for the array; nulls become [`CellValue::Null`].
pub fn cell_value(array: &dyn Array, row: usize) -> CellValue {
    if array.is_null(row) {
        return CellValue::Null;
    }

    match array.data_type() {
        DataType::Boolean => extract!(array, row, BooleanArray, CellValue::Bool),
        DataType::Int8 => extract!(array, row, Int8Array, |v| CellValue::Int(v as i64)),
        DataType::Int16 => extract!(array, row, Int16Array, |v| CellValue::Int(v as i64)),
        DataType::Int32 => extract!(array, row, Int32Array, |v| CellValue::Int(v as i64)),
        DataType::Int64 => extract!(array, row, Int64Array, CellValue::Int),
        DataType::UInt8 => extract!(array, row, UInt8Array, |v| CellValue::UInt(v as u64)),
        DataType::UInt16 => extract!(array, row, UInt16Array, |v| CellValue::UInt(v as u64)),
        DataType::UInt32 => extract!(array, row, UInt32Array, |v| CellValue::UInt(v as u64)),
        DataType::UInt64 => extract!(array, row, UInt64Array, CellValue::UInt),
        DataType::Float32 => extract!(array, row, Float32Array, CellValue::Float32),
        DataType::Float64 => extract!(array, row, Float64Array, CellValue::Float64),
        DataType::Utf8 => extract!(array, row, StringArray, |v: &str| CellValue::Str(
            v.to_string()
        )),
        DataType::LargeUtf8 => extract!(array, row, LargeStringArray, |v: &str| CellValue::Str(
            v.to_string()
        )),
        DataType::Timestamp(unit, _) => {
            match timestamp_millis(array, row, unit).and_then(DateTime::from_timestamp_millis) {
                Some(dt) => CellValue::Timestamp(dt),
                // Out of chrono range (or overflow); show the raw rendering.
                None => fallback_text(array, row),
            }
        }
        _ => fallback_text(array, row),
    }
}
