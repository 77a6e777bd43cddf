//! Small-talk detection — the casual-path classifier.
//!
//! A plain keyword-phrase list, deliberately independent from the trigger
//! registry: triggers answer with canned text, while small talk still goes
//! to the LLM, just without personality injection. Phrases match on word
//! boundaries, so "this" never reads as "hi".

/// Phrases that mark an inbound message as casual small talk.
const SMALL_TALK_PATTERNS: &[&str] = &[
    "hello",
    "hi",
    "hey",
    "how are you",
    "how's it going",
    "what's up",
    "how's your day",
    "nice to meet you",
    "good morning",
    "good afternoon",
    "good evening",
    "goodbye",
    "bye",
    "see you later",
];

/// Lightweight keyword classifier for the casual conversation path.
#[derive(Debug, Clone, Default)]
pub struct SmallTalkDetector;

impl SmallTalkDetector {
    pub fn new() -> Self {
        Self
    }

    /// Whether `text` reads as small talk (case-insensitive phrase match on
    /// word boundaries).
    pub fn is_small_talk(&self, text: &str) -> bool {
        let normalized: String = text
            .to_lowercase()
            .chars()
            .map(|c| if c.is_alphanumeric() || c == '\'' { c } else { ' ' })
            .collect();
        let padded = format!(" {} ", normalized.split_whitespace().collect::<Vec<_>>().join(" "));

        SMALL_TALK_PATTERNS
            .iter()
            .any(|pattern| padded.contains(&format!(" {pattern} ")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn greetings_are_small_talk() {
        let detector = SmallTalkDetector::new();
        assert!(detector.is_small_talk("Hello!"));
        assert!(detector.is_small_talk("hey, how are you doing today?"));
        assert!(detector.is_small_talk("GOOD MORNING"));
    }

    #[test]
    fn multi_word_phrases_match_through_punctuation() {
        let detector = SmallTalkDetector::new();
        assert!(detector.is_small_talk("So... what's up?"));
        assert!(detector.is_small_talk("how's it going"));
    }

    #[test]
    fn substantive_questions_are_not() {
        let detector = SmallTalkDetector::new();
        assert!(!detector.is_small_talk("Explain the difference between TCP and UDP"));
        assert!(!detector.is_small_talk("Can you summarize this contract clause?"));
    }

    #[test]
    fn embedded_words_do_not_match() {
        let detector = SmallTalkDetector::new();
        // "hi" inside "this" or "ship" must not flip the casual path.
        assert!(!detector.is_small_talk("this ship is historic"));
        assert!(!detector.is_small_talk("the high road"));
    }

    #[test]
    fn greeting_inside_a_sentence_still_counts() {
        let detector = SmallTalkDetector::new();
        assert!(detector.is_small_talk("I wanted to say hello before we start"));
    }
}
