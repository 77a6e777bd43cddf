//! Adaptive personality profile — a bounded trait accumulator.
//!
//! Four traits (formality, enthusiasm, humor, empathy), each clamped to
//! `[-1.0, 1.0]`, nudged by the sentiment/intent analysis of every user
//! turn on an adaptive binding. Traits only move in response to observed
//! input: there is no decay back toward neutral. They model the character's
//! cumulative impression of the conversation, not a momentary mood.

use hearthline_core::analyzer::SentimentReport;
use hearthline_core::turn::TraitSnapshot;
use serde::{Deserialize, Serialize};

/// How far a single observation moves a trait.
const TRAIT_STEP: f64 = 0.1;

/// Intents that nudge the humor trait.
const HUMOR_INTENTS: &[&str] = &["joke", "humor"];

/// Intents that nudge the formality trait.
const FORMAL_INTENTS: &[&str] = &["formal_request", "professional_inquiry"];

/// The mutable trait vector for one adaptive character binding.
///
/// Created neutral at binding time; never reset within a session (a new
/// binding starts a new profile).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PersonalityProfile {
    formality: f64,
    enthusiasm: f64,
    humor: f64,
    empathy: f64,
}

impl PersonalityProfile {
    /// A neutral profile: all traits at 0.0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one analysis result into the traits.
    ///
    /// Out-of-range analyzer values are clamped to their documented domains
    /// before use rather than rejected. Every trait is re-clamped to
    /// `[-1.0, 1.0]` after the additions.
    pub fn update(&mut self, report: &SentimentReport) {
        let compound = report.compound.clamp(-1.0, 1.0);
        let positive = report.positive.clamp(0.0, 1.0);

        self.enthusiasm += compound * TRAIT_STEP;
        self.empathy += positive * TRAIT_STEP;

        let intent = report.primary_intent.to_lowercase();
        if HUMOR_INTENTS.contains(&intent.as_str()) {
            self.humor += TRAIT_STEP;
        } else if FORMAL_INTENTS.contains(&intent.as_str()) {
            self.formality += TRAIT_STEP;
        }

        self.formality = self.formality.clamp(-1.0, 1.0);
        self.enthusiasm = self.enthusiasm.clamp(-1.0, 1.0);
        self.humor = self.humor.clamp(-1.0, 1.0);
        self.empathy = self.empathy.clamp(-1.0, 1.0);
    }

    /// An immutable copy for embedding in a turn or API response.
    pub fn snapshot(&self) -> TraitSnapshot {
        TraitSnapshot {
            formality: self.formality,
            enthusiasm: self.enthusiasm,
            humor: self.humor,
            empathy: self.empathy,
        }
    }
}
