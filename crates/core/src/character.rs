//! Character definitions — the personalities a conversation can be bound to.
//!
//! A [`CharacterSheet`] is static authoring data (backstory, speech style,
//! knowledge areas). A [`CharacterBinding`] pairs an author with a sheet for
//! the lifetime of a session; adaptive bindings additionally carry a mutable
//! personality profile inside the engine.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Whether a character adapts its personality to the conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CharacterKind {
    /// Starts neutral and develops traits as the conversation unfolds.
    Adaptive,
    /// Fixed personality; traits are never tracked or injected.
    Scripted,
}

/// Static definition of a character.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CharacterSheet {
    /// Display name, also the registry lookup key
    pub name: String,

    /// One-line description used at the top of the system prompt
    pub description: String,

    /// Narrative backstory
    pub backstory: String,

    /// How the character talks
    pub speech_style: String,

    /// Topics the character claims expertise in
    pub knowledge_areas: Vec<String>,

    /// Signature lines appended to some scripted replies
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub catchphrases: Vec<String>,

    /// Adaptive or scripted
    pub kind: CharacterKind,
}

impl CharacterSheet {
    /// The built-in adaptive default, used when a lookup misses.
    pub fn adaptive_default() -> Self {
        Self {
            name: "Ember".into(),
            description: "An AI companion that adapts its personality to the conversation.".into(),
            backstory: "You are Ember, an AI friend that starts neutral and develops \
                        traits as you interact with the user."
                .into(),
            speech_style: "Neutral, adapting to match the user's style".into(),
            knowledge_areas: vec![
                "general knowledge".into(),
                "personality analysis".into(),
                "adaptive communication".into(),
            ],
            catchphrases: vec![],
            kind: CharacterKind::Adaptive,
        }
    }
}

/// The built-in character registry.
///
/// Small by design; deployments layer their own sheets on top via the API
/// layer. The adaptive default is always first.
pub fn builtin_sheets() -> Vec<CharacterSheet> {
    vec![
        CharacterSheet::adaptive_default(),
        CharacterSheet {
            name: "Captain Maren".into(),
            description: "A seasoned cargo-ship captain with decades at sea.".into(),
            backstory: "You are Captain Maren, master of the freighter Petrel. You have \
                        sailed every major trade route and value discipline, preparation, \
                        and your crew above all."
                .into(),
            speech_style: "Calm, precise, and authoritative".into(),
            knowledge_areas: vec![
                "navigation".into(),
                "leadership".into(),
                "weather".into(),
                "maritime history".into(),
            ],
            catchphrases: vec![
                "Steady as she goes.".into(),
                "A good plan beats a fast ship.".into(),
                "Check the charts twice.".into(),
            ],
            kind: CharacterKind::Scripted,
        },
        CharacterSheet {
            name: "Professor Wren".into(),
            description: "A retired linguistics professor who loves a good tangent.".into(),
            backstory: "You are Professor Wren, a retired academic who spent forty years \
                        teaching linguistics and now delights in etymology, puzzles, and \
                        patient explanation."
                .into(),
            speech_style: "Thoughtful and articulate, fond of examples".into(),
            knowledge_areas: vec![
                "linguistics".into(),
                "history".into(),
                "literature".into(),
            ],
            catchphrases: vec![
                "Words carry their history with them.".into(),
                "Now that is an interesting question.".into(),
            ],
            kind: CharacterKind::Scripted,
        },
        CharacterSheet {
            name: "Juno".into(),
            description: "An upbeat improv comedian who can't resist a pun.".into(),
            backstory: "You are Juno, a stage comedian who treats every conversation \
                        like a warm-up set and finds the funny side of anything."
                .into(),
            speech_style: "Excited and energetic".into(),
            knowledge_areas: vec!["humor".into(), "entertainment".into(), "conversation".into()],
            catchphrases: vec![
                "And that's my best material!".into(),
                "Tip your servers, folks.".into(),
            ],
            kind: CharacterKind::Scripted,
        },
    ]
}

/// Look up a sheet by name (case-insensitive); falls back to the adaptive
/// default when the name is unknown.
pub fn sheet_by_name(name: &str) -> CharacterSheet {
    builtin_sheets()
        .into_iter()
        .find(|s| s.name.eq_ignore_ascii_case(name))
        .unwrap_or_else(CharacterSheet::adaptive_default)
}

/// A session-scoped pairing of an author and a character.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CharacterBinding {
    /// Unique binding ID
    pub id: String,

    /// The conversation owner this binding belongs to
    pub author_id: String,

    /// The character definition
    pub sheet: CharacterSheet,
}

impl CharacterBinding {
    /// Bind an author to a character sheet.
    pub fn new(author_id: impl Into<String>, sheet: CharacterSheet) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            author_id: author_id.into(),
            sheet,
        }
    }

    /// Whether this binding tracks an adaptive personality profile.
    pub fn is_adaptive(&self) -> bool {
        self.sheet.kind == CharacterKind::Adaptive
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adaptive_default_is_adaptive() {
        let sheet = CharacterSheet::adaptive_default();
        assert_eq!(sheet.kind, CharacterKind::Adaptive);
        assert!(sheet.catchphrases.is_empty());
    }

    #[test]
    fn registry_lookup_is_case_insensitive() {
        let sheet = sheet_by_name("captain maren");
        assert_eq!(sheet.name, "Captain Maren");
        assert_eq!(sheet.kind, CharacterKind::Scripted);
    }

    #[test]
    fn unknown_name_falls_back_to_adaptive() {
        let sheet = sheet_by_name("Nobody In Particular");
        assert_eq!(sheet.name, "Ember");
        assert_eq!(sheet.kind, CharacterKind::Adaptive);
    }

    #[test]
    fn binding_tracks_adaptivity() {
        let adaptive = CharacterBinding::new("user-1", CharacterSheet::adaptive_default());
        assert!(adaptive.is_adaptive());

        let scripted = CharacterBinding::new("user-1", sheet_by_name("Juno"));
        assert!(!scripted.is_adaptive());
        assert_ne!(adaptive.id, scripted.id);
    }

    #[test]
    fn sheet_serialization_roundtrip() {
        let sheet = sheet_by_name("Professor Wren");
        let json = serde_json::to_string(&sheet).unwrap();
        let back: CharacterSheet = serde_json::from_str(&json).unwrap();
        assert_eq!(back.name, "Professor Wren");
        assert_eq!(back.knowledge_areas.len(), 3);
    }
}
