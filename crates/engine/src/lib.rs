//! The conversational context & adaptive personality engine — the heart of
//! Hearthline.
//!
//! One inbound user message flows through:
//!
//! 1. **Trigger check** — canned-context patterns answer instantly
//! 2. **Context read** — the author's decayed recent-turn window
//! 3. **Path selection** — casual small talk vs. full personality prompt
//! 4. **External generation** — the injected LLM provider (only suspend point)
//! 5. **Context write** — both turns recorded, window pruned
//! 6. **Personality update** — adaptive bindings absorb the turn's sentiment
//!
//! All state is in-memory and per-process; the history sweep keeps the
//! append-only log bounded over time.

pub mod context;
pub mod orchestrator;
pub mod personality;
pub mod prompt;
pub mod small_talk;
pub mod sweep;
pub mod triggers;

#[cfg(test)]
pub(crate) mod test_support;

pub use context::{ContextStore, RELEVANCE_FLOOR};
pub use orchestrator::{APOLOGY, ConversationOrchestrator, TurnOutcome};
pub use personality::PersonalityProfile;
pub use prompt::{CASUAL_SYSTEM_PROMPT, PromptComposer};
pub use small_talk::SmallTalkDetector;
pub use sweep::{spawn_history_sweep, spawn_history_sweep_from};
pub use triggers::TriggerMatcher;
