//! Translation hook
//!
//! Widgets never hard-code user-facing text. Placeholder and status strings
//! are looked up by key through a [`Translator`]; applications plug in their
//! own string tables, and [`Translator::fallback`] covers English.

use std::fmt;
use std::sync::Arc;

use rustc_hash::FxHashMap;

/// A named argument interpolated into a translated string
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TranslateArg {
    Text(String),
    Number(i64),
}

impl fmt::Display for TranslateArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TranslateArg::Text(text) => f.write_str(text),
            TranslateArg::Number(n) => write!(f, "{}", n),
        }
    }
}

impl From<&str> for TranslateArg {
    fn from(text: &str) -> Self {
        TranslateArg::Text(text.to_string())
    }
}

impl From<usize> for TranslateArg {
    fn from(n: usize) -> Self {
        TranslateArg::Number(i64::try_from(n).unwrap_or(i64::MAX))
    }
}

/// Translation function: `(key, args) -> text`
pub type TranslateFn = dyn Fn(&str, &[(&str, TranslateArg)]) -> String + Send + Sync;

#[derive(Clone)]
pub struct Translator {
    inner: Arc<TranslateFn>,
}

impl Translator {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(&str, &[(&str, TranslateArg)]) -> String + Send + Sync + 'static,
    {
        Self { inner: Arc::new(f) }
    }

    /// Translator over a fixed key -> template table
    ///
    /// Unknown keys come back unchanged so missing strings are easy to spot.
    pub fn from_table<I, K, T>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, T)>,
        K: Into<String>,
        T: Into<String>,
    {
        let table: FxHashMap<String, String> = entries
            .into_iter()
            .map(|(k, t)| (k.into(), t.into()))
            .collect();

        Self::new(move |key, args| match table.get(key) {
            Some(template) => interpolate(template, args),
            None => {
                tracing::debug!("missing translation for {:?}", key);
                key.to_string()
            }
        })
    }

    /// Built-in English strings
    pub fn fallback() -> Self {
        Self::from_table([
            ("select.placeholder", "Select an option"),
            ("select.placeholder_multiple", "Select options"),
            ("combobox.placeholder", "Search..."),
            ("select.results", "{count} results"),
            ("select.results_one", "1 result"),
            ("select.no_results", "No results"),
            ("select.selected_count", "{count} selected"),
        ])
    }

    pub fn translate(&self, key: &str, args: &[(&str, TranslateArg)]) -> String {
        (self.inner)(key, args)
    }
}

impl Default for Translator {
    fn default() -> Self {
        Self::fallback()
    }
}

impl fmt::Debug for Translator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Translator")
    }
}

/// Replace `{name}` placeholders with matching arguments
///
/// Placeholders without an argument are left as they are.
pub fn interpolate(template: &str, args: &[(&str, TranslateArg)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        match after.find('}') {
            Some(close) => {
                let name = &after[..close];
                match args.iter().find(|(arg, _)| *arg == name) {
                    Some((_, value)) => out.push_str(&value.to_string()),
                    None => {
                        out.push('{');
                        out.push_str(name);
                        out.push('}');
                    }
                }
                rest = &after[close + 1..];
            }
            None => {
                out.push_str(&rest[open..]);
                rest = "";
            }
        }
    }

    out.push_str(rest);
    out
}
