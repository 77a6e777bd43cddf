//! Trigger registry — canned-context detection on raw user text.
//!
//! Maps user input to a small closed set of context labels via
//! case-insensitive word-boundary patterns. Registry iteration order is
//! unspecified: registrants must keep patterns mutually exclusive, because
//! when two patterns both match, which label wins is implementation-defined.

use hearthline_core::error::Error;
use regex_lite::Regex;
use std::collections::HashMap;

/// Built-in labels seeded into every matcher.
pub const GREETING: &str = "greeting";
pub const FAREWELL: &str = "farewell";
pub const THANKS: &str = "thanks";
pub const HELP: &str = "help";

/// Pattern registry for canned-context detection. No side effects, no
/// persistence; `add`/`remove` mutate only this instance.
#[derive(Debug)]
pub struct TriggerMatcher {
    patterns: HashMap<String, Regex>,
}

impl TriggerMatcher {
    /// Create a matcher seeded with the built-in labels.
    pub fn new() -> Self {
        let mut matcher = Self {
            patterns: HashMap::new(),
        };
        // Seed patterns are known-good; expect() here cannot fire.
        matcher
            .add(GREETING, r"\b(hello|hi|hey)\b")
            .expect("builtin greeting pattern");
        matcher
            .add(FAREWELL, r"\b(bye|goodbye|see you)\b")
            .expect("builtin farewell pattern");
        matcher
            .add(THANKS, r"\b(thank you|thanks|appreciate)\b")
            .expect("builtin thanks pattern");
        matcher
            .add(HELP, r"\b(help|assistance|support)\b")
            .expect("builtin help pattern");
        matcher
    }

    /// Register a pattern for a label, replacing any existing entry.
    /// Patterns are compiled case-insensitively.
    pub fn add(&mut self, label: impl Into<String>, pattern: &str) -> Result<(), Error> {
        let regex = Regex::new(&format!("(?i){pattern}")).map_err(|e| Error::Config {
            message: format!("invalid trigger pattern: {e}"),
        })?;
        self.patterns.insert(label.into(), regex);
        Ok(())
    }

    /// Remove a label from the registry. Returns whether it existed.
    pub fn remove(&mut self, label: &str) -> bool {
        self.patterns.remove(label).is_some()
    }

    /// Find the label triggered by `text`, if any.
    pub fn matches(&self, text: &str) -> Option<&str> {
        self.patterns
            .iter()
            .find(|(_, regex)| regex.is_match(text))
            .map(|(label, _)| label.as_str())
    }

    /// Registered label count.
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

impl Default for TriggerMatcher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_greeting_matches() {
        let matcher = TriggerMatcher::new();
        assert_eq!(matcher.matches("hello there"), Some(GREETING));
        assert_eq!(matcher.matches("Hey, got a minute?"), Some(GREETING));
    }

    #[test]
    fn matching_is_case_insensitive() {
        let matcher = TriggerMatcher::new();
        assert_eq!(matcher.matches("THANK YOU so much"), Some(THANKS));
        assert_eq!(matcher.matches("GOODBYE"), Some(FAREWELL));
    }

    #[test]
    fn word_boundaries_are_respected() {
        let matcher = TriggerMatcher::new();
        // "hi" inside "this" must not trigger a greeting
        assert_eq!(matcher.matches("this weather is odd"), None);
        // "bye" inside "goodbyes" has no right boundary, so no farewell
        assert_eq!(matcher.matches("no goodbyes yet"), None);
    }

    #[test]
    fn no_match_returns_none() {
        let matcher = TriggerMatcher::new();
        assert_eq!(matcher.matches("let's discuss quarterly numbers"), None);
    }

    #[test]
    fn add_and_remove_labels() {
        let mut matcher = TriggerMatcher::new();
        matcher.add("weather", r"\b(weather|forecast)\b").unwrap();
        assert_eq!(matcher.matches("what's the forecast?"), Some("weather"));

        assert!(matcher.remove("weather"));
        assert!(!matcher.remove("weather"));
        assert_eq!(matcher.matches("what's the forecast?"), None);
    }

    #[test]
    fn invalid_pattern_is_rejected() {
        let mut matcher = TriggerMatcher::new();
        assert!(matcher.add("broken", r"(unclosed").is_err());
        // Registry unchanged by the failed add.
        assert_eq!(matcher.len(), 4);
    }

    #[test]
    fn matching_has_no_side_effects() {
        let matcher = TriggerMatcher::new();
        let before = matcher.len();
        let _ = matcher.matches("hello");
        let _ = matcher.matches("goodbye");
        assert_eq!(matcher.len(), before);
    }
}
