//! Dynamic cell values produced by column accessors.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::Deserialize;
use serde::Serialize;

/// Fallback locale used when a localized value has no variant for the
/// requested display locale.
pub const FALLBACK_LOCALE: &str = "en";

/// A value read out of a row by a column accessor.
///
/// The engine only looks inside a `CellValue` to sort, filter and produce
/// default display text. Everything else about a row stays opaque.
///
/// | Variant     | Sorts as                         | Searchable text          |
/// |-------------|----------------------------------|--------------------------|
/// | `Null`      | always last                      | nothing                  |
/// | `Bool`      | `false < true`                   | `true` / `false`         |
/// | `Int`       | numeric                          | decimal digits           |
/// | `Float`     | numeric                          | shortest decimal form    |
/// | `Text`      | lexicographic                    | the text                 |
/// | `Localized` | display-locale text              | every language variant   |
/// | `List`      | length, then elementwise         | every element            |
///
/// # Example
///
/// ```
/// use datagrid::CellValue;
///
/// let kcal = CellValue::from(165i64);
/// let name = CellValue::localized([("en", "Apple"), ("es", "Manzana")]);
/// assert_eq!(name.display("es"), "Manzana");
/// assert_eq!(kcal.display("en"), "165");
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    /// Missing or empty value.
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    /// Text keyed by locale code (`en`, `es`, `pt-br`, ...).
    Localized(BTreeMap<String, String>),
    List(Vec<CellValue>),
}

impl CellValue {
    /// Builds a localized value from `(locale, text)` pairs.
    pub fn localized<L, S>(variants: impl IntoIterator<Item = (L, S)>) -> Self
    where
        L: Into<String>,
        S: Into<String>,
    {
        CellValue::Localized(
            variants
                .into_iter()
                .map(|(locale, text)| (locale.into(), text.into()))
                .collect(),
        )
    }

    /// Returns `true` if this is a null value.
    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    /// Null, or a float that is not a number. Both sort after every other
    /// value in either direction.
    pub fn sorts_last(&self) -> bool {
        match self {
            CellValue::Null => true,
            CellValue::Float(f) => f.is_nan(),
            _ => false,
        }
    }

    /// Returns the type name of this value.
    pub fn type_name(&self) -> &'static str {
        match self {
            CellValue::Null => "null",
            CellValue::Bool(_) => "bool",
            CellValue::Int(_) => "int",
            CellValue::Float(_) => "float",
            CellValue::Text(_) => "text",
            CellValue::Localized(_) => "localized",
            CellValue::List(_) => "list",
        }
    }

    /// Text shown for this value in the given display locale.
    pub fn display(&self, locale: &str) -> String {
        match self {
            CellValue::Null => String::new(),
            CellValue::Bool(b) => b.to_string(),
            CellValue::Int(n) => n.to_string(),
            CellValue::Float(f) => f.to_string(),
            CellValue::Text(s) => s.clone(),
            CellValue::Localized(map) => resolve_localized(map, locale).to_string(),
            CellValue::List(items) => items
                .iter()
                .map(|item| item.display(locale))
                .filter(|s| !s.is_empty())
                .collect::<Vec<_>>()
                .join(", "),
        }
    }

    /// Appends the lowercased, locale-independent search text of this value.
    ///
    /// Numbers use Rust's plain `Display` output, so there are never any
    /// grouping separators. Localized values contribute every variant.
    pub fn push_search_text(&self, out: &mut String) {
        match self {
            CellValue::Null => {}
            CellValue::Bool(b) => push_term(out, if *b { "true" } else { "false" }),
            CellValue::Int(n) => push_term(out, &n.to_string()),
            CellValue::Float(f) => push_term(out, &f.to_string()),
            CellValue::Text(s) => push_term(out, s),
            CellValue::Localized(map) => {
                for text in map.values() {
                    push_term(out, text);
                }
            }
            CellValue::List(items) => {
                for item in items {
                    item.push_search_text(out);
                }
            }
        }
    }

    /// Compares two non-null values in ascending order.
    ///
    /// Null handling (always last) is the caller's job since it does not
    /// flip with the sort direction. Floats use IEEE total ordering.
    pub fn compare(&self, other: &CellValue, locale: &str) -> Ordering {
        use CellValue::*;

        match (self, other) {
            (Bool(a), Bool(b)) => a.cmp(b),
            (Int(a), Int(b)) => a.cmp(b),
            (Int(a), Float(b)) => (*a as f64).total_cmp(b),
            (Float(a), Int(b)) => a.total_cmp(&(*b as f64)),
            (Float(a), Float(b)) => a.total_cmp(b),
            (Text(_) | Localized(_), Text(_) | Localized(_)) => {
                self.display(locale).cmp(&other.display(locale))
            }
            (List(a), List(b)) => a.len().cmp(&b.len()).then_with(|| {
                a.iter()
                    .zip(b.iter())
                    .map(|(x, y)| x.compare(y, locale))
                    .find(|ord| *ord != Ordering::Equal)
                    .unwrap_or(Ordering::Equal)
            }),
            _ => self.rank().cmp(&other.rank()),
        }
    }

    fn rank(&self) -> u8 {
        match self {
            CellValue::Null => 0,
            CellValue::Bool(_) => 1,
            CellValue::Int(_) | CellValue::Float(_) => 2,
            CellValue::Text(_) | CellValue::Localized(_) => 3,
            CellValue::List(_) => 4,
        }
    }
}

/// Picks the variant to display: requested locale, then `en`, then the first
/// non-empty variant.
pub fn resolve_localized<'a>(map: &'a BTreeMap<String, String>, locale: &str) -> &'a str {
    let non_empty = |key: &str| map.get(key).map(String::as_str).filter(|s| !s.is_empty());

    non_empty(locale)
        .or_else(|| non_empty(FALLBACK_LOCALE))
        .or_else(|| map.values().map(String::as_str).find(|s| !s.is_empty()))
        .unwrap_or("")
}

fn push_term(out: &mut String, text: &str) {
    if text.is_empty() {
        return;
    }
    if !out.is_empty() {
        out.push(' ');
    }
    out.push_str(&text.to_lowercase());
}

// =============================================================================
// From implementations
// =============================================================================

impl From<bool> for CellValue {
    fn from(v: bool) -> Self {
        CellValue::Bool(v)
    }
}

impl From<i32> for CellValue {
    fn from(v: i32) -> Self {
        CellValue::Int(v as i64)
    }
}

impl From<i64> for CellValue {
    fn from(v: i64) -> Self {
        CellValue::Int(v)
    }
}

impl From<u32> for CellValue {
    fn from(v: u32) -> Self {
        CellValue::Int(v as i64)
    }
}

impl From<f64> for CellValue {
    fn from(v: f64) -> Self {
        CellValue::Float(v)
    }
}

impl From<String> for CellValue {
    fn from(v: String) -> Self {
        CellValue::Text(v)
    }
}

impl From<&str> for CellValue {
    fn from(v: &str) -> Self {
        CellValue::Text(v.to_string())
    }
}

impl From<BTreeMap<String, String>> for CellValue {
    fn from(v: BTreeMap<String, String>) -> Self {
        CellValue::Localized(v)
    }
}

impl<T: Into<CellValue>> From<Vec<T>> for CellValue {
    fn from(v: Vec<T>) -> Self {
        CellValue::List(v.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(inner) => inner.into(),
            None => CellValue::Null,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_localized_fallback_chain() {
        let name = CellValue::localized([("en", "Apple"), ("es", "Manzana")]);
        assert_eq!(name.display("es"), "Manzana");
        assert_eq!(name.display("pt-br"), "Apple");

        let only_pt = CellValue::localized([("en", ""), ("pt-pt", "Maçã")]);
        assert_eq!(only_pt.display("es"), "Maçã");
    }

    #[test]
    fn test_search_text_includes_every_variant() {
        let name = CellValue::localized([("en", "Apple"), ("es", "Manzana")]);
        let mut out = String::new();
        name.push_search_text(&mut out);
        assert_eq!(out, "apple manzana");
    }

    #[test]
    fn test_numbers_have_no_grouping_separators() {
        let mut out = String::new();
        CellValue::Int(1_250_000).push_search_text(&mut out);
        CellValue::Float(12.5).push_search_text(&mut out);
        CellValue::Float(3.0).push_search_text(&mut out);
        assert_eq!(out, "1250000 12.5 3");
    }

    #[test]
    fn test_compare_mixed_numbers() {
        assert_eq!(
            CellValue::Int(2).compare(&CellValue::Float(2.5), "en"),
            Ordering::Less
        );
        assert_eq!(
            CellValue::Float(10.0).compare(&CellValue::Int(9), "en"),
            Ordering::Greater
        );
    }

    #[test]
    fn test_compare_localized_uses_display_locale() {
        let a = CellValue::localized([("en", "Zucchini"), ("es", "Calabacín")]);
        let b = CellValue::localized([("en", "Apple"), ("es", "Manzana")]);
        assert_eq!(a.compare(&b, "en"), Ordering::Greater);
        assert_eq!(a.compare(&b, "es"), Ordering::Less);
    }

    #[test]
    fn test_list_display_skips_empty() {
        let tags = CellValue::from(vec!["vegan", "", "keto"]);
        assert_eq!(tags.display("en"), "vegan, keto");
    }
}
