//! Turn and trait-snapshot domain types.
//!
//! These are the core value objects that flow through the entire system:
//! User sends a message → Orchestrator processes it → Provider generates a
//! response → both ends are recorded as Turns in the context window.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Maximum content length retained per turn, in characters.
/// Constructors truncate anything longer.
pub const MAX_CONTENT_CHARS: usize = 4096;

/// A turn created at full relevance; the context store decays it from here.
pub const INITIAL_RELEVANCE: f64 = 1.0;

/// The role of a turn's sender in a conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// The end user
    User,
    /// The AI character
    Assistant,
    /// System instructions (prompt scaffolding)
    System,
}

/// A single conversational turn.
///
/// `relevance` starts at 1.0 and is mutated only by the context store's
/// decay pass; a resident turn always satisfies `0.1 < relevance <= 1.0`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Turn {
    /// Unique turn ID
    pub id: String,

    /// Who sent this turn
    pub role: Role,

    /// The text content (truncated to [`MAX_CONTENT_CHARS`])
    pub content: String,

    /// Opaque key identifying the conversation's owner
    pub author_id: String,

    /// When this turn was created
    pub created_at: DateTime<Utc>,

    /// Decaying weight of this turn's importance to context
    pub relevance: f64,

    /// Copy of the personality traits at emission time, for audit/display
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trait_snapshot: Option<TraitSnapshot>,
}

impl Turn {
    /// Create a new user turn, stamped now.
    pub fn user(author_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self::new(Role::User, author_id, content)
    }

    /// Create a new assistant turn, stamped now.
    pub fn assistant(author_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, author_id, content)
    }

    /// Create a new system turn, stamped now.
    pub fn system(author_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self::new(Role::System, author_id, content)
    }

    fn new(role: Role, author_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            role,
            content: truncate_content(content.into()),
            author_id: author_id.into(),
            created_at: Utc::now(),
            relevance: INITIAL_RELEVANCE,
            trait_snapshot: None,
        }
    }

    /// Attach a trait snapshot (builder-style, used by the orchestrator).
    pub fn with_snapshot(mut self, snapshot: TraitSnapshot) -> Self {
        self.trait_snapshot = Some(snapshot);
        self
    }

    /// Age of this turn in fractional seconds at `now`.
    ///
    /// Negative ages (turn stamped in the future) are clamped to zero.
    pub fn age_secs(&self, now: DateTime<Utc>) -> f64 {
        let millis = now.signed_duration_since(self.created_at).num_milliseconds();
        (millis.max(0) as f64) / 1000.0
    }
}

fn truncate_content(content: String) -> String {
    if content.chars().count() <= MAX_CONTENT_CHARS {
        content
    } else {
        content.chars().take(MAX_CONTENT_CHARS).collect()
    }
}

/// An immutable copy of the four personality traits, each in `[-1.0, 1.0]`.
///
/// Produced by the engine's personality profile; embedded in [`Turn`]s and
/// returned to API-layer callers.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TraitSnapshot {
    pub formality: f64,
    pub enthusiasm: f64,
    pub humor: f64,
    pub empathy: f64,
}

impl TraitSnapshot {
    /// The neutral starting point: all traits at 0.0.
    pub fn neutral() -> Self {
        Self::default()
    }
}
