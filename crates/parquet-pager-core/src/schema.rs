//! Logical schema view over an opened Parquet file.
//!
//! The grid consumer renders column headers and a file-info panel from a
//! closed set of primitive kinds rather than the full Arrow type lattice.
//! This module maps an Arrow schema into that set, with a catch-all
//! [`LogicalDataType::Other`] for anything the grid only knows how to render
//! as text. The mapping is total: building a `LogicalSchema` never fails.

use std::fmt;

use arrow::datatypes::{DataType, Schema, TimeUnit};

/// Units for logical timestamps surfaced to the consumer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicalTimestampUnit {
    /// Second precision timestamps.
    Seconds,
    /// Millisecond precision timestamps.
    Millis,
    /// Microsecond precision timestamps.
    Micros,
    /// Nanosecond precision timestamps.
    Nanos,
}

impl fmt::Display for LogicalTimestampUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogicalTimestampUnit::Seconds => write!(f, "s"),
            LogicalTimestampUnit::Millis => write!(f, "ms"),
            LogicalTimestampUnit::Micros => write!(f, "us"),
            LogicalTimestampUnit::Nanos => write!(f, "ns"),
        }
    }
}

impl From<&TimeUnit> for LogicalTimestampUnit {
    fn from(unit: &TimeUnit) -> Self {
        match unit {
            TimeUnit::Second => LogicalTimestampUnit::Seconds,
            TimeUnit::Millisecond => LogicalTimestampUnit::Millis,
            TimeUnit::Microsecond => LogicalTimestampUnit::Micros,
            TimeUnit::Nanosecond => LogicalTimestampUnit::Nanos,
        }
    }
}

/// Closed set of primitive kinds the grid renders natively.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogicalDataType {
    /// Boolean value.
    Bool,
    /// 8-bit signed integer.
    Int8,
    /// 16-bit signed integer.
    Int16,
    /// 32-bit signed integer.
    Int32,
    /// 64-bit signed integer.
    Int64,
    /// 8-bit unsigned integer.
    UInt8,
    /// 16-bit unsigned integer.
    UInt16,
    /// 32-bit unsigned integer.
    UInt32,
    /// 64-bit unsigned integer.
    UInt64,
    /// 32-bit floating point.
    Float32,
    /// 64-bit floating point.
    Float64,
    /// UTF-8 encoded string with 32-bit offsets.
    Utf8,
    /// UTF-8 encoded string with 64-bit offsets.
    LargeUtf8,
    /// Timestamp value with a precision unit.
    Timestamp {
        /// Timestamp precision unit.
        unit: LogicalTimestampUnit,
    },
    /// Anything else; rendered as text only.
    Other(String),
}

impl fmt::Display for LogicalDataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogicalDataType::Bool => write!(f, "bool"),
            LogicalDataType::Int8 => write!(f, "int8"),
            LogicalDataType::Int16 => write!(f, "int16"),
            LogicalDataType::Int32 => write!(f, "int32"),
            LogicalDataType::Int64 => write!(f, "int64"),
            LogicalDataType::UInt8 => write!(f, "uint8"),
            LogicalDataType::UInt16 => write!(f, "uint16"),
            LogicalDataType::UInt32 => write!(f, "uint32"),
            LogicalDataType::UInt64 => write!(f, "uint64"),
            LogicalDataType::Float32 => write!(f, "float32"),
            LogicalDataType::Float64 => write!(f, "float64"),
            LogicalDataType::Utf8 => write!(f, "utf8"),
            LogicalDataType::LargeUtf8 => write!(f, "large_utf8"),
            LogicalDataType::Timestamp { unit } => write!(f, "timestamp[{unit}]"),
            LogicalDataType::Other(name) => write!(f, "{name}"),
        }
    }
}

impl From<&DataType> for LogicalDataType {
    fn from(dt: &DataType) -> Self {
        match dt {
            DataType::Boolean => LogicalDataType::Bool,
            DataType::Int8 => LogicalDataType::Int8,
            DataType::Int16 => LogicalDataType::Int16,
            DataType::Int32 => LogicalDataType::Int32,
            DataType::Int64 => LogicalDataType::Int64,
            DataType::UInt8 => LogicalDataType::UInt8,
            DataType::UInt16 => LogicalDataType::UInt16,
            DataType::UInt32 => LogicalDataType::UInt32,
            DataType::UInt64 => LogicalDataType::UInt64,
            DataType::Float32 => LogicalDataType::Float32,
            DataType::Float64 => LogicalDataType::Float64,
            DataType::Utf8 => LogicalDataType::Utf8,
            DataType::LargeUtf8 => LogicalDataType::LargeUtf8,
            DataType::Timestamp(unit, _) => LogicalDataType::Timestamp { unit: unit.into() },
            other => LogicalDataType::Other(other.to_string()),
        }
    }
}

/// Logical column definition in a schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogicalField {
    /// Column name as stored in the file.
    pub name: String,
    /// Logical data type for the column.
    pub data_type: LogicalDataType,
    /// Whether the column allows null values.
    pub nullable: bool,
}

impl fmt::Display for LogicalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.nullable {
            write!(f, "{}?: {}", self.name, self.data_type)
        } else {
            write!(f, "{}: {}", self.name, self.data_type)
        }
    }
}

/// Ordered list of logical fields describing an opened file.
///
/// Immutable once produced; a reopen builds a fresh instance.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogicalSchema {
    fields: Vec<LogicalField>,
}

impl LogicalSchema {
    /// Number of columns.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// True when the file declares no columns.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// The ordered fields.
    pub fn fields(&self) -> &[LogicalField] {
        &self.fields
    }
}

impl From<&Schema> for LogicalSchema {
    fn from(schema: &Schema) -> Self {
        let fields = schema
            .fields()
            .iter()
            .map(|f| LogicalField {
                name: f.name().clone(),
                data_type: f.data_type().into(),
                nullable: f.is_nullable(),
            })
            .collect();
        LogicalSchema { fields }
    }
}
