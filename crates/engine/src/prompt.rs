//! System-prompt composition from a character sheet and trait snapshot.
//!
//! Composition is deterministic: identical inputs always produce
//! byte-identical output. Trait directives use symmetric ±0.5 thresholds and
//! a fixed evaluation order (formality, enthusiasm, humor, empathy) so the
//! assembled prompt is stable and testable.

use hearthline_core::character::CharacterSheet;
use hearthline_core::turn::TraitSnapshot;

/// Threshold beyond which a trait emits a directive. Values inside the
/// `[-0.5, 0.5]` band emit nothing for that trait.
const DIRECTIVE_THRESHOLD: f64 = 0.5;

/// System prompt for the casual small-talk path, which bypasses personality
/// injection entirely.
pub const CASUAL_SYSTEM_PROMPT: &str = "You are a friendly conversational partner. \
    Engage in natural dialogue without mentioning that you're an AI or a language model. \
    Focus on the topic at hand and respond as a knowledgeable human would.";

/// Builds system prompts. Stateless — create one and reuse it.
#[derive(Debug, Clone, Copy, Default)]
pub struct PromptComposer;

impl PromptComposer {
    pub fn new() -> Self {
        Self
    }

    /// Compose the system prompt for a character.
    ///
    /// The fixed template covers the sheet; when a trait snapshot is present
    /// (adaptive bindings only), trait-conditioned directives are appended on
    /// a new line.
    pub fn compose(&self, sheet: &CharacterSheet, profile: Option<&TraitSnapshot>) -> String {
        let mut prompt = format!(
            "You are {}. {}\nBackstory: {}\nSpeak in a {} manner.\nYou have expertise in: {}.",
            sheet.name,
            sheet.description,
            sheet.backstory,
            sheet.speech_style,
            sheet.knowledge_areas.join(", "),
        );

        if let Some(snapshot) = profile {
            let directives = Self::trait_directives(snapshot);
            if !directives.is_empty() {
                prompt.push('\n');
                prompt.push_str(&directives);
            }
        }

        prompt
    }

    /// Render the adaptive directives in fixed trait order, joined by
    /// single spaces.
    fn trait_directives(snapshot: &TraitSnapshot) -> String {
        let mut directives: Vec<&str> = Vec::new();

        if snapshot.formality > DIRECTIVE_THRESHOLD {
            directives.push("Speak formally and professionally.");
        } else if snapshot.formality < -DIRECTIVE_THRESHOLD {
            directives.push("Speak casually and informally.");
        }

        if snapshot.enthusiasm > DIRECTIVE_THRESHOLD {
            directives.push("Be very enthusiastic and energetic in your responses.");
        } else if snapshot.enthusiasm < -DIRECTIVE_THRESHOLD {
            directives.push("Remain calm and composed in your responses.");
        }

        if snapshot.humor > DIRECTIVE_THRESHOLD {
            directives.push("Incorporate humor and light-heartedness in your responses.");
        } else if snapshot.humor < -DIRECTIVE_THRESHOLD {
            directives.push("Maintain a serious and straightforward tone.");
        }

        if snapshot.empathy > DIRECTIVE_THRESHOLD {
            directives.push("Show strong empathy and emotional understanding.");
        } else if snapshot.empathy < -DIRECTIVE_THRESHOLD {
            directives.push("Focus on facts and logic rather than emotions.");
        }

        directives.join(" ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hearthline_core::character::sheet_by_name;

    fn snapshot(formality: f64, enthusiasm: f64, humor: f64, empathy: f64) -> TraitSnapshot {
        TraitSnapshot {
            formality,
            enthusiasm,
            humor,
            empathy,
        }
    }

    #[test]
    fn template_includes_sheet_fields() {
        let sheet = sheet_by_name("Captain Maren");
        let prompt = PromptComposer::new().compose(&sheet, None);
        assert!(prompt.contains("You are Captain Maren."));
        assert!(prompt.contains("Backstory:"));
        assert!(prompt.contains("navigation, leadership, weather, maritime history"));
        assert!(prompt.contains("Calm, precise, and authoritative"));
    }

    #[test]
    fn neutral_snapshot_emits_no_directives() {
        let sheet = CharacterSheet::adaptive_default();
        let with_neutral =
            PromptComposer::new().compose(&sheet, Some(&TraitSnapshot::neutral()));
        let without = PromptComposer::new().compose(&sheet, None);
        assert_eq!(with_neutral, without);
    }

    #[test]
    fn band_boundary_is_exclusive() {
        let sheet = CharacterSheet::adaptive_default();
        // Exactly 0.5 sits inside the silent band.
        let prompt = PromptComposer::new().compose(&sheet, Some(&snapshot(0.5, -0.5, 0.5, -0.5)));
        assert!(!prompt.contains("formally"));
        assert!(!prompt.contains("calm"));
    }

    #[test]
    fn positive_directions_emit_positive_directives() {
        let sheet = CharacterSheet::adaptive_default();
        let prompt = PromptComposer::new().compose(&sheet, Some(&snapshot(0.6, 0.6, 0.6, 0.6)));
        assert!(prompt.contains("Speak formally and professionally."));
        assert!(prompt.contains("Be very enthusiastic and energetic in your responses."));
        assert!(prompt.contains("Incorporate humor and light-heartedness in your responses."));
        assert!(prompt.contains("Show strong empathy and emotional understanding."));
    }

    #[test]
    fn negative_directions_emit_opposite_directives() {
        let sheet = CharacterSheet::adaptive_default();
        let prompt =
            PromptComposer::new().compose(&sheet, Some(&snapshot(-0.6, -0.6, -0.6, -0.6)));
        assert!(prompt.contains("Speak casually and informally."));
        assert!(prompt.contains("Remain calm and composed in your responses."));
        assert!(prompt.contains("Maintain a serious and straightforward tone."));
        assert!(prompt.contains("Focus on facts and logic rather than emotions."));
    }

    #[test]
    fn directives_follow_fixed_trait_order() {
        let sheet = CharacterSheet::adaptive_default();
        let prompt = PromptComposer::new().compose(&sheet, Some(&snapshot(0.9, 0.9, 0.9, 0.9)));
        let formality = prompt.find("Speak formally").unwrap();
        let enthusiasm = prompt.find("Be very enthusiastic").unwrap();
        let humor = prompt.find("Incorporate humor").unwrap();
        let empathy = prompt.find("Show strong empathy").unwrap();
        assert!(formality < enthusiasm);
        assert!(enthusiasm < humor);
        assert!(humor < empathy);
    }

    #[test]
    fn composition_is_deterministic() {
        let sheet = sheet_by_name("Professor Wren");
        let snap = snapshot(0.7, -0.8, 0.2, 0.0);
        let composer = PromptComposer::new();
        let first = composer.compose(&sheet, Some(&snap));
        let second = composer.compose(&sheet, Some(&snap));
        assert_eq!(first, second);
    }

    #[test]
    fn mixed_snapshot_emits_only_crossed_traits() {
        let sheet = CharacterSheet::adaptive_default();
        let prompt = PromptComposer::new().compose(&sheet, Some(&snapshot(0.0, 0.8, 0.0, -0.7)));
        assert!(!prompt.contains("formally"));
        assert!(prompt.contains("Be very enthusiastic"));
        assert!(!prompt.contains("humor and light-heartedness"));
        assert!(prompt.contains("Focus on facts and logic"));
    }
}
