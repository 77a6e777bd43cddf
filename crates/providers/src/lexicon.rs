//! Lexicon-based sentiment and intent analyzer.
//!
//! The default in-process implementation of the analyzer seam. Scores text
//! against small valence wordlists and picks a primary intent from keyword
//! heuristics. Deployments wanting richer analysis substitute their own
//! `SentimentAnalyzer` implementation; the engine never looks inside.

use async_trait::async_trait;
use hearthline_core::analyzer::{SentimentAnalyzer, SentimentReport};
use hearthline_core::error::AnalyzerError;

/// Normalization constant for the compound score. Keeps small raw scores
/// responsive while asymptotically approaching ±1.
const COMPOUND_NORM: f64 = 15.0;

const POSITIVE_WORDS: &[&str] = &[
    "good", "great", "love", "loved", "like", "liked", "wonderful", "awesome",
    "amazing", "fantastic", "happy", "glad", "excellent", "fun", "nice",
    "cool", "best", "enjoy", "enjoyed", "beautiful", "perfect", "thanks",
    "thank", "appreciate", "excited", "brilliant", "delightful", "yay",
];

const NEGATIVE_WORDS: &[&str] = &[
    "bad", "terrible", "hate", "hated", "awful", "horrible", "sad", "angry",
    "annoyed", "annoying", "worst", "boring", "bored", "ugly", "stupid",
    "useless", "broken", "wrong", "disappointed", "disappointing", "upset",
    "frustrated", "frustrating", "no", "never", "unhappy",
];

const HUMOR_WORDS: &[&str] = &[
    "joke", "jokes", "funny", "pun", "puns", "hilarious", "laugh", "comedy",
    "humor", "humour",
];

const FORMAL_WORDS: &[&str] = &[
    "kindly", "regarding", "sincerely", "request", "requesting", "formally",
    "appointment", "invoice", "application", "documentation", "professional",
];

const QUESTION_OPENERS: &[&str] = &[
    "who", "what", "when", "where", "why", "how", "can", "could", "would",
    "do", "does", "is", "are", "will",
];

/// A deterministic, dependency-free sentiment/intent analyzer.
#[derive(Debug, Clone, Default)]
pub struct LexiconAnalyzer;

impl LexiconAnalyzer {
    pub fn new() -> Self {
        Self
    }

    fn tokenize(text: &str) -> Vec<String> {
        text.to_lowercase()
            .split(|c: char| !c.is_alphanumeric() && c != '\'')
            .filter(|w| !w.is_empty())
            .map(|w| w.trim_matches('\'').to_string())
            .filter(|w| !w.is_empty())
            .collect()
    }

    fn score(tokens: &[String]) -> (f64, f64) {
        let pos = tokens
            .iter()
            .filter(|t| POSITIVE_WORDS.contains(&t.as_str()))
            .count() as f64;
        let neg = tokens
            .iter()
            .filter(|t| NEGATIVE_WORDS.contains(&t.as_str()))
            .count() as f64;

        let raw = pos - neg;
        let compound = raw / (raw * raw + COMPOUND_NORM).sqrt();
        let positive = if tokens.is_empty() {
            0.0
        } else {
            (pos / tokens.len() as f64).min(1.0)
        };

        (compound, positive)
    }

    /// Pick the dominant intent. Humor wins over formality when both match,
    /// so "tell me a joke about invoices" lands on the humor path.
    fn classify_intent(text: &str, tokens: &[String]) -> &'static str {
        if tokens.iter().any(|t| HUMOR_WORDS.contains(&t.as_str())) {
            return "joke";
        }

        let looks_formal = tokens.iter().any(|t| FORMAL_WORDS.contains(&t.as_str()))
            || text.trim_start().to_lowercase().starts_with("dear ");
        if looks_formal {
            return "formal_request";
        }

        let first = tokens.first().map(String::as_str).unwrap_or("");
        if text.trim_end().ends_with('?') || QUESTION_OPENERS.contains(&first) {
            return "general_inquiry";
        }

        "statement"
    }
}

#[async_trait]
impl SentimentAnalyzer for LexiconAnalyzer {
    fn name(&self) -> &str {
        "lexicon"
    }

    async fn analyze(&self, text: &str) -> std::result::Result<SentimentReport, AnalyzerError> {
        let tokens = Self::tokenize(text);
        if tokens.is_empty() {
            return Ok(SentimentReport::neutral());
        }

        let (compound, positive) = Self::score(&tokens);
        let primary_intent = Self::classify_intent(text, &tokens).to_string();

        Ok(SentimentReport {
            compound: compound.clamp(-1.0, 1.0),
            positive: positive.clamp(0.0, 1.0),
            primary_intent,
        })
    }
}
