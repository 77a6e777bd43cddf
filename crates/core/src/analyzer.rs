//! SentimentAnalyzer trait — the black-box text-analysis collaborator.
//!
//! The engine only needs three signals per user turn: a compound sentiment
//! score, a positive-affect score, and a primary intent label. How those are
//! produced (lexicon scoring, a hosted NLP service, an LLM prompt) is an
//! implementation concern behind this trait.

use crate::error::AnalyzerError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// The analysis result for one piece of user text.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SentimentReport {
    /// Overall sentiment in `[-1.0, 1.0]` (negative → positive)
    pub compound: f64,

    /// Positive-affect proportion in `[0.0, 1.0]`
    pub positive: f64,

    /// The dominant conversational intent (e.g. "joke", "formal_request",
    /// "general_inquiry"). Free-form; consumers match case-insensitively.
    pub primary_intent: String,
}

impl SentimentReport {
    /// A neutral report: zero sentiment, general inquiry.
    pub fn neutral() -> Self {
        Self {
            compound: 0.0,
            positive: 0.0,
            primary_intent: "general_inquiry".into(),
        }
    }
}

/// The core SentimentAnalyzer trait.
///
/// Failures are recoverable by design: when `analyze` errs, the caller skips
/// the personality update for that turn and carries on.
#[async_trait]
pub trait SentimentAnalyzer: Send + Sync {
    /// A human-readable name for this analyzer (e.g. "lexicon").
    fn name(&self) -> &str;

    /// Analyze a piece of user text.
    async fn analyze(&self, text: &str) -> std::result::Result<SentimentReport, AnalyzerError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn neutral_report_shape() {
        let report = SentimentReport::neutral();
        assert_eq!(report.compound, 0.0);
        assert_eq!(report.positive, 0.0);
        assert_eq!(report.primary_intent, "general_inquiry");
    }

    #[test]
    fn report_serialization_roundtrip() {
        let report = SentimentReport {
            compound: 0.8,
            positive: 0.6,
            primary_intent: "joke".into(),
        };
        let json = serde_json::to_string(&report).unwrap();
        let back: SentimentReport = serde_json::from_str(&json).unwrap();
        assert!((back.compound - 0.8).abs() < f64::EPSILON);
        assert_eq!(back.primary_intent, "joke");
    }
}
