//! Query description passed to a provider.
//!
//! The reference Parquet backend ignores queries entirely; the type exists so
//! a pushdown-capable backend can be substituted behind [`crate::provider::DataProvider`]
//! without changing the consumer. A provider that honors a query must still
//! obey the page-size and ordering contract of `fetch_page`.

/// Comparison operator in a filter predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOp {
    /// Equal.
    Eq,
    /// Not equal.
    NotEq,
    /// Less than.
    Lt,
    /// Less than or equal.
    LtEq,
    /// Greater than.
    Gt,
    /// Greater than or equal.
    GtEq,
    /// Substring containment (string columns).
    Contains,
}

/// Typed literal compared against a column.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    /// String literal.
    Str(String),
    /// Integer literal.
    Int(i64),
    /// Floating-point literal.
    Float(f64),
}

/// One column/operator/literal filter.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterPredicate {
    /// Column the predicate applies to.
    pub column: String,
    /// Comparison operator.
    pub op: FilterOp,
    /// Literal to compare against.
    pub value: FilterValue,
}

/// Sort direction for one column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortKey {
    /// Column to sort by.
    pub column: String,
    /// Ascending when true.
    pub ascending: bool,
}

/// Complete query state a consumer may hand to a provider.
///
/// An empty query (the default) means an unfiltered, unsorted,
/// full-projection request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Query {
    /// Conjunction of filter predicates.
    pub filters: Vec<FilterPredicate>,
    /// Sort keys in priority order.
    pub sort_keys: Vec<SortKey>,
    /// Columns to return; empty means all.
    pub projection: Vec<String>,
}

impl Query {
    /// True when at least one filter is set.
    pub fn is_filtered(&self) -> bool {
        !self.filters.is_empty()
    }

    /// True when at least one sort key is set.
    pub fn is_sorted(&self) -> bool {
        !self.sort_keys.is_empty()
    }
}
