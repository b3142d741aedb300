//! Sorting state and the default row comparator.

use std::cmp::Ordering;

use serde::Deserialize;
use serde::Serialize;

use crate::column::ColumnDescriptor;
use crate::value::CellValue;

/// Sort direction of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    pub fn is_desc(self) -> bool {
        matches!(self, SortDirection::Desc)
    }

    fn apply(self, ord: Ordering) -> Ordering {
        match self {
            SortDirection::Asc => ord,
            SortDirection::Desc => ord.reverse(),
        }
    }
}

/// One entry of the sorting state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnSort {
    pub column_id: String,
    pub direction: SortDirection,
}

/// Requested change to a column's sort.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortAction {
    Asc,
    Desc,
    /// Cycle `unsorted -> asc -> desc -> unsorted`.
    Toggle,
    Clear,
}

/// Computes the next sorting state.
///
/// Only one column is sorted at a time: sorting a new column replaces the
/// previous entry. The state keeps the list shape so a multi-column sort can
/// be added without changing the serialized form.
pub fn next_sorting(current: &[ColumnSort], column_id: &str, action: SortAction) -> Vec<ColumnSort> {
    let existing = current
        .iter()
        .find(|s| s.column_id == column_id)
        .map(|s| s.direction);

    let direction = match (action, existing) {
        (SortAction::Asc, _) => Some(SortDirection::Asc),
        (SortAction::Desc, _) => Some(SortDirection::Desc),
        (SortAction::Clear, _) => None,
        (SortAction::Toggle, None) => Some(SortDirection::Asc),
        (SortAction::Toggle, Some(SortDirection::Asc)) => Some(SortDirection::Desc),
        (SortAction::Toggle, Some(SortDirection::Desc)) => None,
    };

    match direction {
        Some(direction) => vec![ColumnSort {
            column_id: column_id.to_string(),
            direction,
        }],
        // Clearing another column's sort leaves the active one alone.
        None if existing.is_none() => current.to_vec(),
        None => Vec::new(),
    }
}

/// Sorts `indices` (positions into `rows`) by one column.
///
/// The sort is stable. A custom comparator is used when the column has one;
/// otherwise accessor values are compared with nulls placed last in both
/// directions.
pub fn sort_indices<T>(
    rows: &[T],
    indices: &mut [usize],
    column: &ColumnDescriptor<T>,
    direction: SortDirection,
    locale: &str,
) {
    if let Some(comparator) = column.comparator() {
        indices.sort_by(|&a, &b| direction.apply(comparator(&rows[a], &rows[b])));
        return;
    }

    // Read each value once, only for the rows being sorted.
    let mut keyed: Vec<(usize, CellValue)> = indices
        .iter()
        .map(|&index| (index, column.value(&rows[index])))
        .collect();
    keyed.sort_by(|a, b| compare_nulls_last(&a.1, &b.1, direction, locale));

    for (slot, (index, _)) in indices.iter_mut().zip(keyed) {
        *slot = index;
    }
}

/// Default comparison: `Null` always sorts after every other value.
pub fn compare_nulls_last(
    a: &CellValue,
    b: &CellValue,
    direction: SortDirection,
    locale: &str,
) -> Ordering {
    match (a.sorts_last(), b.sorts_last()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => direction.apply(a.compare(b, locale)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sort(column_id: &str, direction: SortDirection) -> ColumnSort {
        ColumnSort {
            column_id: column_id.into(),
            direction,
        }
    }

    #[test]
    fn test_toggle_cycle() {
        let s0: Vec<ColumnSort> = Vec::new();
        let s1 = next_sorting(&s0, "kcal", SortAction::Toggle);
        assert_eq!(s1, vec![sort("kcal", SortDirection::Asc)]);
        let s2 = next_sorting(&s1, "kcal", SortAction::Toggle);
        assert_eq!(s2, vec![sort("kcal", SortDirection::Desc)]);
        let s3 = next_sorting(&s2, "kcal", SortAction::Toggle);
        assert!(s3.is_empty());
    }

    #[test]
    fn test_new_column_replaces_previous() {
        let current = vec![sort("kcal", SortDirection::Desc)];
        let next = next_sorting(&current, "name", SortAction::Toggle);
        assert_eq!(next, vec![sort("name", SortDirection::Asc)]);
    }

    #[test]
    fn test_clear_other_column_keeps_active() {
        let current = vec![sort("kcal", SortDirection::Asc)];
        assert_eq!(next_sorting(&current, "name", SortAction::Clear), current);
        assert!(next_sorting(&current, "kcal", SortAction::Clear).is_empty());
    }

    #[test]
    fn test_nulls_last_in_both_directions() {
        let column: ColumnDescriptor<Option<i64>> =
            ColumnDescriptor::new("n").accessor(|v: &Option<i64>| CellValue::from(*v));
        let rows = vec![Some(3), None, Some(1), Some(2)];

        let mut asc: Vec<usize> = (0..rows.len()).collect();
        sort_indices(&rows, &mut asc, &column, SortDirection::Asc, "en");
        assert_eq!(asc, vec![2, 3, 0, 1]);

        let mut desc: Vec<usize> = (0..rows.len()).collect();
        sort_indices(&rows, &mut desc, &column, SortDirection::Desc, "en");
        assert_eq!(desc, vec![0, 3, 2, 1]);
    }

    #[test]
    fn test_nan_sorts_with_nulls() {
        let column: ColumnDescriptor<f64> =
            ColumnDescriptor::new("fat").accessor(|v: &f64| CellValue::from(*v));
        let rows: Vec<f64> = (0..200)
            .map(|i| if i % 3 == 0 { f64::NAN } else { ((i * 37) % 101) as f64 })
            .collect();
        let finite = rows.iter().filter(|v| !v.is_nan()).count();

        for direction in [SortDirection::Asc, SortDirection::Desc] {
            let mut indices: Vec<usize> = (0..rows.len()).collect();
            sort_indices(&rows, &mut indices, &column, direction, "en");

            let values: Vec<f64> = indices.iter().map(|&i| rows[i]).collect();
            assert!(values[finite..].iter().all(|v| v.is_nan()));
            let ordered = values[..finite].windows(2).all(|w| match direction {
                SortDirection::Asc => w[0] <= w[1],
                SortDirection::Desc => w[0] >= w[1],
            });
            assert!(ordered, "{:?} not ordered", direction);
        }
    }

    #[test]
    fn test_custom_comparator_respects_direction() {
        let column: ColumnDescriptor<Vec<&str>> = ColumnDescriptor::new("tags")
            .sort_with(|a: &Vec<&str>, b: &Vec<&str>| a.len().cmp(&b.len()));
        let rows = vec![vec!["a", "b"], vec![], vec!["c"]];

        let mut indices: Vec<usize> = (0..rows.len()).collect();
        sort_indices(&rows, &mut indices, &column, SortDirection::Desc, "en");
        assert_eq!(indices, vec![0, 2, 1]);
    }
}
