//! Multi-language text and supported locales.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use datagrid::CellValue;
use datagrid::value::resolve_localized;
use serde::{Deserialize, Serialize};

/// Locales the back-office is translated into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Locale {
    #[default]
    #[serde(rename = "en")]
    En,
    #[serde(rename = "es")]
    Es,
    #[serde(rename = "pt-pt")]
    PtPt,
    #[serde(rename = "pt-br")]
    PtBr,
}

impl Locale {
    pub const ALL: [Locale; 4] = [Locale::En, Locale::Es, Locale::PtPt, Locale::PtBr];

    pub fn as_str(self) -> &'static str {
        match self {
            Locale::En => "en",
            Locale::Es => "es",
            Locale::PtPt => "pt-pt",
            Locale::PtBr => "pt-br",
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error for an unsupported locale tag.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported locale '{0}' (expected one of en, es, pt-pt, pt-br)")]
pub struct UnknownLocale(pub String);

impl FromStr for Locale {
    type Err = UnknownLocale;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = s.trim().to_ascii_lowercase().replace('_', "-");
        Locale::ALL
            .into_iter()
            .find(|l| l.as_str() == tag)
            .ok_or_else(|| UnknownLocale(s.to_string()))
    }
}

/// Text with one variant per locale, e.g. `{"en": "Apple", "es": "Manzana"}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocalizedText(BTreeMap<String, String>);

impl LocalizedText {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, locale: impl Into<String>, text: impl Into<String>) -> Self {
        self.0.insert(locale.into(), text.into());
        self
    }

    /// Text for `locale`, falling back to English, then to the first
    /// non-empty variant. Empty if there is none.
    pub fn resolve(&self, locale: &str) -> &str {
        resolve_localized(&self.0, locale)
    }

    /// The variant for exactly this locale, if present and non-empty.
    pub fn get(&self, locale: &str) -> Option<&str> {
        self.0.get(locale).map(String::as_str).filter(|s| !s.is_empty())
    }

    /// True when no variant has visible text.
    pub fn is_blank(&self) -> bool {
        self.0.values().all(|s| s.trim().is_empty())
    }

    /// Case-insensitive substring match against every variant.
    pub fn contains_ci(&self, needle_lower: &str) -> bool {
        self.0
            .values()
            .any(|text| text.to_lowercase().contains(needle_lower))
    }
}

impl FromIterator<(String, String)> for LocalizedText {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl From<&LocalizedText> for CellValue {
    fn from(text: &LocalizedText) -> Self {
        CellValue::Localized(text.0.clone())
    }
}
