//! Ordered slot tables driving the report decoders.
//!
//! A [`Grammar`] is a list of rules tried in order against each token. The
//! first rule whose pattern matches the whole token wins. Rules that are not
//! repeatable drop out of the table once they have matched, so the set of
//! accepted groups shrinks as a report is read.
//!
//! # Examples
//!
//! ```
//! use horde_weather::grammar::{Grammar, SlotRule};
//! use regex::Regex;
//! use std::sync::LazyLock;
//!
//! static WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-Z]+$").unwrap());
//!
//! let mut grammar = Grammar::new(vec![SlotRule::once("word", &WORD)]);
//! assert!(grammar.match_token("KBOS").is_some());
//! assert!(grammar.match_token("KJFK").is_none());
//! ```

use regex::{Captures, Regex};
use std::fmt::Debug;
use std::sync::LazyLock;

/// One entry of a slot table.
#[derive(Debug, Clone, Copy)]
pub struct SlotRule<S: 'static> {
    /// Slot the rule fills
    pub slot: S,
    /// Anchored pattern for a whole token
    pub pattern: &'static LazyLock<Regex>,
    /// Whether the rule stays active after matching
    pub repeatable: bool,
}

impl<S> SlotRule<S> {
    /// A rule that is consumed by its first match.
    #[must_use]
    pub const fn once(slot: S, pattern: &'static LazyLock<Regex>) -> Self {
        Self {
            slot,
            pattern,
            repeatable: false,
        }
    }

    /// A rule that may match any number of tokens.
    #[must_use]
    pub const fn repeated(slot: S, pattern: &'static LazyLock<Regex>) -> Self {
        Self {
            slot,
            pattern,
            repeatable: true,
        }
    }
}

/// The active rules of a decoder, in priority order.
#[derive(Debug, Clone)]
pub struct Grammar<S: 'static> {
    rules: Vec<SlotRule<S>>,
}

impl<S: Copy + PartialEq + Debug> Grammar<S> {
    /// Creates a grammar from an ordered rule list.
    #[must_use]
    pub const fn new(rules: Vec<SlotRule<S>>) -> Self {
        Self { rules }
    }

    /// Finds the first rule accepting `token` and returns its captures.
    ///
    /// A matched rule that is not repeatable is removed.
    pub fn match_token<'t>(&mut self, token: &'t str) -> Option<(S, Captures<'t>)> {
        let (index, captures) = self
            .rules
            .iter()
            .enumerate()
            .find_map(|(index, rule)| rule.pattern.captures(token).map(|c| (index, c)))?;
        let rule = self.rules[index];
        if !rule.repeatable {
            self.rules.remove(index);
        }
        Some((rule.slot, captures))
    }

    /// Tests whether the rule for `slot` is active and accepts `text`,
    /// without consuming it.
    #[must_use]
    pub fn peek(&self, slot: S, text: &str) -> bool {
        self.rules
            .iter()
            .any(|rule| rule.slot == slot && rule.pattern.is_match(text))
    }

    /// Returns `true` while the rule for `slot` has not been consumed.
    #[must_use]
    pub fn is_active(&self, slot: S) -> bool {
        self.rules.iter().any(|rule| rule.slot == slot)
    }

    /// Number of active rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns `true` if every rule has been consumed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    static DIGITS: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"^(\d+)$").expect("valid regex"));
    static LETTERS: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"^([A-Z]+)$").expect("valid regex"));
    static ANY: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\S+$").expect("valid regex"));

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Slot {
        Number,
        Word,
        Anything,
    }

    fn grammar() -> Grammar<Slot> {
        Grammar::new(vec![
            SlotRule::once(Slot::Number, &DIGITS),
            SlotRule::repeated(Slot::Word, &LETTERS),
            SlotRule::repeated(Slot::Anything, &ANY),
        ])
    }

    #[test]
    fn test_first_matching_rule_wins() {
        let mut g = grammar();
        let (slot, caps) = g.match_token("42").unwrap();
        assert_eq!(slot, Slot::Number);
        assert_eq!(&caps[1], "42");
    }

    #[test]
    fn test_consumed_rule_falls_through() {
        let mut g = grammar();
        g.match_token("1");
        assert!(!g.is_active(Slot::Number));
        assert_eq!(g.match_token("2").map(|(s, _)| s), Some(Slot::Anything));
        assert_eq!(g.len(), 2);
    }

    #[test]
    fn test_repeatable_rule_stays() {
        let mut g = grammar();
        g.match_token("AB");
        g.match_token("CD");
        assert!(g.is_active(Slot::Word));
    }

    #[test]
    fn test_peek_does_not_consume() {
        let g = grammar();
        assert!(g.peek(Slot::Number, "7"));
        assert!(!g.peek(Slot::Number, "X"));
        assert!(g.is_active(Slot::Number));
    }

    #[test]
    fn test_no_match() {
        let mut g = Grammar::new(vec![SlotRule::once(Slot::Number, &DIGITS)]);
        assert!(g.match_token("ABC").is_none());
        assert!(!g.is_empty());
    }
}
