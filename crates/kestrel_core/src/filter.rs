//! Search filtering
//!
//! A query is split on whitespace into tokens. An item matches when every
//! token is a substring of at least one of its search keys; different tokens
//! may hit different keys. Filtering is stable: the output keeps the input
//! order, since list position drives highlight traversal.

use smallvec::SmallVec;

use crate::option::SelectOption;

/// Controls how matching handles letter case
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CaseSensitivity {
    CaseSensitive,
    #[default]
    CaseInsensitive,
}

/// Anything with search keys
pub trait Searchable {
    fn search_keys(&self) -> &[String];
}

impl<V> Searchable for SelectOption<V> {
    fn search_keys(&self) -> &[String] {
        SelectOption::search_keys(self)
    }
}

impl<T: Searchable + ?Sized> Searchable for &T {
    fn search_keys(&self) -> &[String] {
        (**self).search_keys()
    }
}

/// A parsed query
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    tokens: SmallVec<[String; 4]>,
    case: CaseSensitivity,
}

impl SearchQuery {
    pub fn parse(query: &str, case: CaseSensitivity) -> Self {
        let tokens = query
            .split_whitespace()
            .map(|token| fold(token, case))
            .collect();
        Self { tokens, case }
    }

    /// Empty or whitespace-only queries match everything
    pub fn is_blank(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    pub fn matches<T: Searchable + ?Sized>(&self, item: &T) -> bool {
        let keys: SmallVec<[String; 2]> = item
            .search_keys()
            .iter()
            .map(|key| fold(key, self.case))
            .collect();

        self.tokens
            .iter()
            .all(|token| keys.iter().any(|key| key.contains(token.as_str())))
    }
}

fn fold(text: &str, case: CaseSensitivity) -> String {
    match case {
        CaseSensitivity::CaseInsensitive => text.to_lowercase(),
        CaseSensitivity::CaseSensitive => text.to_string(),
    }
}

/// Narrows a list of options to those matching a query
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchFilter {
    case: CaseSensitivity,
}

impl SearchFilter {
    pub fn new(case: CaseSensitivity) -> Self {
        Self { case }
    }

    pub fn case_sensitivity(&self) -> CaseSensitivity {
        self.case
    }

    /// Items matching `query`, in input order
    pub fn filter<'a, T: Searchable>(&self, query: &str, items: &'a [T]) -> Vec<&'a T> {
        // Blank queries return the input as-is rather than "everything matches
        // the empty substring", so nothing about ordering can shift.
        if query.trim().is_empty() {
            return items.iter().collect();
        }

        let parsed = SearchQuery::parse(query, self.case);
        let visible: Vec<&T> = items.iter().filter(|item| parsed.matches(*item)).collect();

        tracing::trace!(
            "filter {:?}: {} of {} items visible",
            query,
            visible.len(),
            items.len()
        );
        visible
    }

    /// Whether a single item matches `query`
    pub fn matches<T: Searchable + ?Sized>(&self, query: &str, item: &T) -> bool {
        SearchQuery::parse(query, self.case).matches(item)
    }
}
