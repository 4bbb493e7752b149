//! Type-to-select for lists without a search field
//!
//! Printable keys accumulate into a short buffer that is matched against
//! option labels by prefix. The buffer resets after a pause in typing.

use crate::highlight::Navigable;
use crate::option::OptionId;

/// Default pause after which the buffer starts over
pub const DEFAULT_TYPEAHEAD_TIMEOUT_MS: u64 = 500;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Typeahead {
    buffer: String,
    last_input_ms: Option<u64>,
    timeout_ms: u64,
}

impl Default for Typeahead {
    fn default() -> Self {
        Self::new(DEFAULT_TYPEAHEAD_TIMEOUT_MS)
    }
}

impl Typeahead {
    pub fn new(timeout_ms: u64) -> Self {
        Self {
            buffer: String::new(),
            last_input_ms: None,
            timeout_ms,
        }
    }

    /// Append a character typed at `now_ms`, returning the current buffer
    pub fn push(&mut self, c: char, now_ms: u64) -> &str {
        let expired = self
            .last_input_ms
            .is_some_and(|last| now_ms.saturating_sub(last) > self.timeout_ms);
        if expired {
            self.buffer.clear();
        }

        self.buffer.extend(c.to_lowercase());
        self.last_input_ms = Some(now_ms);
        &self.buffer
    }

    pub fn reset(&mut self) {
        self.buffer.clear();
        self.last_input_ms = None;
    }

    /// Find the option the buffer points at
    ///
    /// Typing the same letter repeatedly (`"bbb"`) cycles through options
    /// starting with that letter; any other buffer prefers the current option
    /// if it still matches, so typing `"ba"` after `"b"` does not jump away.
    pub fn find_match<T, F>(&self, visible: &[T], current: Option<OptionId>, label: F) -> Option<OptionId>
    where
        T: Navigable,
        F: Fn(&T) -> &str,
    {
        if self.buffer.is_empty() || visible.is_empty() {
            return None;
        }

        let mut chars = self.buffer.chars();
        let first = chars.next()?;
        let repeated = chars.all(|c| c == first);
        let (needle, skip_current) = if repeated {
            (first.to_string(), true)
        } else {
            (self.buffer.clone(), false)
        };

        let len = visible.len();
        let start = current
            .and_then(|id| visible.iter().position(|o| o.option_id() == id))
            .map(|idx| if skip_current { idx + 1 } else { idx })
            .unwrap_or(0);

        (0..len)
            .map(|offset| &visible[(start + offset) % len])
            .find(|o| !o.is_disabled() && label(*o).to_lowercase().starts_with(&needle))
            .map(|o| o.option_id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::option::OptionDecl;
    use crate::registry::OptionRegistry;

    fn registry(labels: &[(&'static str, bool)]) -> OptionRegistry<&'static str> {
        let mut registry = OptionRegistry::new();
        for (label, disabled) in labels {
            registry
                .register(OptionDecl::new(*label, *label).disabled(*disabled))
                .unwrap();
        }
        registry
    }

    #[test]
    fn test_buffer_resets_after_timeout() {
        let mut typeahead = Typeahead::new(500);
        typeahead.push('b', 0);
        assert_eq!(typeahead.push('a', 100), "ba");
        assert_eq!(typeahead.push('c', 700), "c");
    }

    #[test]
    fn test_prefix_match_skips_disabled() {
        let registry = registry(&[("Apple", false), ("Banana", true), ("Blueberry", false)]);
        let visible = registry.list();

        let mut typeahead = Typeahead::default();
        typeahead.push('B', 0);
        let found = typeahead.find_match(&visible, None, |o| o.label());
        assert_eq!(found, Some(visible[2].id()));
    }

    #[test]
    fn test_repeated_letter_cycles() {
        let registry = registry(&[("Bean", false), ("Beet", false), ("Carrot", false)]);
        let visible = registry.list();

        let mut typeahead = Typeahead::default();
        typeahead.push('b', 0);
        let first = typeahead.find_match(&visible, None, |o| o.label());
        assert_eq!(first, Some(visible[0].id()));

        typeahead.push('b', 10);
        let second = typeahead.find_match(&visible, first, |o| o.label());
        assert_eq!(second, Some(visible[1].id()));

        typeahead.push('b', 20);
        let third = typeahead.find_match(&visible, second, |o| o.label());
        assert_eq!(third, Some(visible[0].id()));
    }

    #[test]
    fn test_longer_prefix_stays_on_current() {
        let registry = registry(&[("Bean", false), ("Beet", false)]);
        let visible = registry.list();

        let mut typeahead = Typeahead::default();
        typeahead.push('b', 0);
        let current = typeahead.find_match(&visible, None, |o| o.label());
        typeahead.push('e', 10);
        typeahead.push('e', 20);
        assert_eq!(
            typeahead.find_match(&visible, current, |o| o.label()),
            Some(visible[1].id())
        );
    }

    #[test]
    fn test_no_match() {
        let registry = registry(&[("Apple", false)]);
        let visible = registry.list();
        let mut typeahead = Typeahead::default();
        typeahead.push('z', 0);
        assert_eq!(typeahead.find_match(&visible, None, |o| o.label()), None);
    }
}
