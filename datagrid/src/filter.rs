//! Global full-text filtering.
//!
//! A query is split into whitespace-separated terms and a row matches when
//! every term is a substring of the row's search projection. The projection
//! covers every filterable accessor column, including all language variants
//! of localized values, so search works whatever the display locale is.

use crate::column::ColumnDescriptor;

/// A parsed global filter query.
///
/// # Example
///
/// ```
/// use datagrid::filter::GlobalFilter;
///
/// let filter = GlobalFilter::parse("  Chi   BRE ");
/// assert_eq!(filter.terms(), ["chi", "bre"]);
/// assert!(filter.matches("chicken breast"));
/// assert!(!filter.matches("chicken thigh"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GlobalFilter {
    terms: Vec<String>,
}

impl GlobalFilter {
    /// Trim, lowercase and split the query on runs of whitespace.
    pub fn parse(query: &str) -> Self {
        Self {
            terms: query
                .to_lowercase()
                .split_whitespace()
                .map(str::to_string)
                .collect(),
        }
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    /// An empty or whitespace-only query lets every row through.
    pub fn is_inert(&self) -> bool {
        self.terms.is_empty()
    }

    /// AND-match against an already lowercased projection.
    pub fn matches(&self, projection: &str) -> bool {
        self.terms.iter().all(|term| projection.contains(term.as_str()))
    }
}

/// Build the lowercased search projection of a row.
pub fn row_projection<T>(row: &T, columns: &[ColumnDescriptor<T>]) -> String {
    let mut projection = String::new();
    for column in columns.iter().filter(|c| c.filterable && c.has_accessor()) {
        column.value(row).push_search_text(&mut projection);
    }
    projection
}

/// Does `row` match the free-text `query`?
pub fn matches<T>(row: &T, columns: &[ColumnDescriptor<T>], query: &str) -> bool {
    let filter = GlobalFilter::parse(query);
    filter.is_inert() || filter.matches(&row_projection(row, columns))
}

/// Positions of the rows matching `query`, in their original order.
pub fn filter_rows<T>(rows: &[T], columns: &[ColumnDescriptor<T>], query: &str) -> Vec<usize> {
    let filter = GlobalFilter::parse(query);
    if filter.is_inert() {
        return (0..rows.len()).collect();
    }

    rows.iter()
        .enumerate()
        .filter(|(_, row)| filter.matches(&row_projection(*row, columns)))
        .map(|(index, _)| index)
        .collect()
}
