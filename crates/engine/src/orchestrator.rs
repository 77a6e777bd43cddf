//! The conversation orchestrator — the façade the chat endpoint talks to.
//!
//! One inbound message walks a fixed pipeline: trigger check, context read,
//! path selection (casual small talk vs. full personality), the external
//! LLM call, context write, and — for adaptive bindings — the personality
//! update. The LLM call is the only suspend point and the only thing that
//! can fail; failure degrades to a fixed apology while the user's own turn
//! is still recorded, so the conversation survives a retry.

use crate::context::ContextStore;
use crate::personality::PersonalityProfile;
use crate::prompt::{CASUAL_SYSTEM_PROMPT, PromptComposer};
use crate::small_talk::SmallTalkDetector;
use crate::triggers::{self, TriggerMatcher};
use chrono::{DateTime, Utc};
use hearthline_config::{EngineConfig, GenerationSettings};
use hearthline_core::analyzer::{SentimentAnalyzer, SentimentReport};
use hearthline_core::character::CharacterBinding;
use hearthline_core::error::Error;
use hearthline_core::provider::{ChatMessage, ChatProvider, ChatRequest};
use hearthline_core::turn::{Role, TraitSnapshot, Turn};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};
use tracing::{debug, warn};

/// The fixed, character-agnostic reply used whenever generation fails.
pub const APOLOGY: &str = "I apologize, but I am unable to generate a response at the moment.";

/// Every third scripted reply carries a catchphrase.
const CATCHPHRASE_CADENCE: u64 = 3;

/// The outcome of handling one user turn.
///
/// Transient external failures surface as `Degraded`, never as an error —
/// callers always have text to return to the user.
#[derive(Debug, Clone)]
pub enum TurnOutcome {
    /// A trigger matched and a canned reply was served without the LLM.
    Canned { label: String, text: String },
    /// The LLM produced a reply.
    Generated { text: String },
    /// Generation failed; `text` is the apology string.
    Degraded { reason: String, text: String },
}

impl TurnOutcome {
    /// The reply text, whatever the path taken.
    pub fn text(&self) -> &str {
        match self {
            Self::Canned { text, .. } | Self::Generated { text } | Self::Degraded { text, .. } => {
                text
            }
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, Self::Degraded { .. })
    }
}

/// Per-binding mutable state: the adaptive profile (when the character is
/// adaptive) and a reply counter driving catchphrase rotation.
#[derive(Debug, Default)]
struct BindingState {
    profile: Option<PersonalityProfile>,
    replies: u64,
}

/// The façade owning all per-conversation engine state.
///
/// Collaborators are injected, never constructed ad hoc, so tests substitute
/// scripted fakes for the LLM and analyzer.
pub struct ConversationOrchestrator {
    provider: Arc<dyn ChatProvider>,
    analyzer: Arc<dyn SentimentAnalyzer>,
    context: Arc<ContextStore>,
    triggers: RwLock<TriggerMatcher>,
    small_talk: SmallTalkDetector,
    composer: PromptComposer,
    bindings: Mutex<HashMap<String, BindingState>>,
    generation: GenerationSettings,
}

impl ConversationOrchestrator {
    /// Build an orchestrator from validated configuration and collaborators.
    pub fn new(
        config: &EngineConfig,
        provider: Arc<dyn ChatProvider>,
        analyzer: Arc<dyn SentimentAnalyzer>,
    ) -> Result<Self, Error> {
        Ok(Self {
            provider,
            analyzer,
            context: Arc::new(ContextStore::new(&config.context)?),
            triggers: RwLock::new(TriggerMatcher::new()),
            small_talk: SmallTalkDetector::new(),
            composer: PromptComposer::new(),
            bindings: Mutex::new(HashMap::new()),
            generation: config.generation.clone(),
        })
    }

    /// Shared handle to the context store (the background sweep needs one).
    pub fn context_store(&self) -> Arc<ContextStore> {
        Arc::clone(&self.context)
    }

    // ── Trigger registry ──────────────────────────────────────────────────

    /// Register a trigger pattern.
    pub async fn add_trigger(&self, label: impl Into<String>, pattern: &str) -> Result<(), Error> {
        self.triggers.write().await.add(label, pattern)
    }

    /// Remove a trigger. Returns whether it existed.
    pub async fn remove_trigger(&self, label: &str) -> bool {
        self.triggers.write().await.remove(label)
    }

    // ── Read accessors (exposed to the API layer) ─────────────────────────

    /// Snapshot of the author's resident context window.
    pub async fn get_context(&self, author_id: &str, limit: Option<usize>) -> Vec<Turn> {
        self.context.get_context(author_id, limit).await
    }

    /// Full or time-filtered turn history for an author.
    pub async fn get_history(
        &self,
        author_id: &str,
        since: Option<DateTime<Utc>>,
    ) -> Vec<(Turn, DateTime<Utc>)> {
        self.context.get_history(author_id, since).await
    }

    /// Clear an author's history log (the active window is untouched).
    pub async fn clear_history(&self, author_id: &str) {
        self.context.clear_history(author_id).await;
    }

    /// Current traits for an adaptive binding; `None` for scripted ones.
    pub async fn get_trait_snapshot(&self, binding: &CharacterBinding) -> Option<TraitSnapshot> {
        if !binding.is_adaptive() {
            return None;
        }
        let mut bindings = self.bindings.lock().await;
        let state = Self::binding_state(&mut bindings, binding);
        state.profile.as_ref().map(PersonalityProfile::snapshot)
    }

    // ── The main pipeline ─────────────────────────────────────────────────

    /// Handle one inbound user message and produce a reply.
    pub async fn handle_turn(
        &self,
        author_id: &str,
        binding: &CharacterBinding,
        user_text: &str,
    ) -> TurnOutcome {
        // Trigger check: a canned-context hit answers without the LLM.
        let trigger = {
            let triggers = self.triggers.read().await;
            triggers.matches(user_text).map(str::to_string)
        };
        if let Some(label) = trigger {
            if let Some(reply) = canned_reply(&label) {
                debug!(author_id, label, "Serving canned trigger reply");
                let user_turn = Turn::user(author_id, user_text);
                let assistant_turn = Turn::assistant(author_id, reply);
                self.context
                    .update(author_id, vec![user_turn, assistant_turn])
                    .await;
                return TurnOutcome::Canned {
                    label,
                    text: reply.to_string(),
                };
            }
            // A registered trigger without canned text falls through to
            // normal generation.
            debug!(author_id, label, "Trigger matched but has no canned reply");
        }

        // Context read.
        let context = self.context.get_context(author_id, None).await;

        // Path selection and analysis. Only adaptive bindings are analyzed;
        // an analyzer failure just means no steering and no profile update.
        let casual = self.small_talk.is_small_talk(user_text);
        let report = if binding.is_adaptive() {
            match self.analyzer.analyze(user_text).await {
                Ok(report) => Some(report),
                Err(e) => {
                    warn!(author_id, error = %e, "Analyzer failed; skipping personality update");
                    None
                }
            }
        } else {
            None
        };

        let (system_prompt, temperature) = if casual {
            (CASUAL_SYSTEM_PROMPT.to_string(), self.generation.temperature)
        } else {
            let snapshot = if binding.is_adaptive() {
                let mut bindings = self.bindings.lock().await;
                let state = Self::binding_state(&mut bindings, binding);
                state.profile.as_ref().map(PersonalityProfile::snapshot)
            } else {
                None
            };
            let prompt = self.composer.compose(&binding.sheet, snapshot.as_ref());
            let temperature = match &report {
                Some(report) => steer_temperature(self.generation.temperature, report.compound),
                None => self.generation.temperature,
            };
            (prompt, temperature)
        };

        // External generation — the only suspend point, bounded by the
        // configured deadline.
        let request = self.build_request(&context, &system_prompt, user_text, temperature);
        let deadline = Duration::from_secs(self.generation.request_timeout_secs);
        let result = tokio::time::timeout(deadline, self.provider.complete(request)).await;

        let reply_text = match result {
            Ok(Ok(response)) => postprocess(&response.message.content),
            Ok(Err(e)) => {
                warn!(author_id, error = %e, "Generation failed; degrading");
                return self.degrade(author_id, user_text, e.to_string()).await;
            }
            Err(_) => {
                warn!(
                    author_id,
                    timeout_secs = self.generation.request_timeout_secs,
                    "Generation timed out; degrading"
                );
                return self
                    .degrade(author_id, user_text, "request timed out".to_string())
                    .await;
            }
        };

        // Per-binding bookkeeping: catchphrase rotation and the snapshot to
        // stamp on the assistant turn.
        let (reply_text, snapshot) = {
            let mut bindings = self.bindings.lock().await;
            let state = Self::binding_state(&mut bindings, binding);
            state.replies += 1;
            let text = decorate_reply(reply_text, binding, state.replies);
            (text, state.profile.as_ref().map(PersonalityProfile::snapshot))
        };

        // Context write: both ends of the exchange.
        let user_turn = Turn::user(author_id, user_text);
        let mut assistant_turn = Turn::assistant(author_id, reply_text.clone());
        if let Some(snapshot) = snapshot {
            assistant_turn = assistant_turn.with_snapshot(snapshot);
        }
        self.context
            .update(author_id, vec![user_turn, assistant_turn])
            .await;

        // Personality update, after the write so the stamped snapshot
        // reflects the traits the reply was composed under.
        if let Some(report) = report {
            let mut bindings = self.bindings.lock().await;
            let state = Self::binding_state(&mut bindings, binding);
            if let Some(profile) = state.profile.as_mut() {
                profile.update(&report);
            }
        }

        TurnOutcome::Generated { text: reply_text }
    }

    // ── Helpers ───────────────────────────────────────────────────────────

    fn binding_state<'a>(
        bindings: &'a mut HashMap<String, BindingState>,
        binding: &CharacterBinding,
    ) -> &'a mut BindingState {
        bindings.entry(binding.id.clone()).or_insert_with(|| BindingState {
            profile: binding.is_adaptive().then(PersonalityProfile::new),
            replies: 0,
        })
    }

    fn build_request(
        &self,
        context: &[Turn],
        system_prompt: &str,
        user_text: &str,
        temperature: f32,
    ) -> ChatRequest {
        let mut messages = Vec::with_capacity(context.len() + 2);
        messages.push(ChatMessage::system(system_prompt));
        for turn in context {
            messages.push(match turn.role {
                Role::User => ChatMessage::user(&turn.content),
                Role::Assistant => ChatMessage::assistant(&turn.content),
                Role::System => ChatMessage::system(&turn.content),
            });
        }
        messages.push(ChatMessage::user(user_text));

        ChatRequest {
            model: self.generation.model.clone(),
            messages,
            temperature,
            max_tokens: Some(self.generation.max_tokens),
        }
    }

    /// Record the user's turn and answer with the apology. The failed
    /// assistant reply is never written to context.
    async fn degrade(&self, author_id: &str, user_text: &str, reason: String) -> TurnOutcome {
        let user_turn = Turn::user(author_id, user_text);
        self.context.update(author_id, vec![user_turn]).await;
        TurnOutcome::Degraded {
            reason,
            text: APOLOGY.to_string(),
        }
    }
}

/// Canned reply for a built-in trigger label.
fn canned_reply(label: &str) -> Option<&'static str> {
    match label {
        triggers::GREETING => Some("Hello! How can I assist you today?"),
        triggers::FAREWELL => Some("Goodbye! Have a great day!"),
        triggers::THANKS => Some("You're welcome! It's my pleasure to help."),
        triggers::HELP => Some("Sure, I'm here to help. What do you need assistance with?"),
        _ => None,
    }
}

/// Nudge the sampling temperature toward the observed sentiment: strongly
/// negative input pins it low, strongly positive pins it high, moderate
/// sentiment shifts it within [0.3, 0.9].
fn steer_temperature(base: f32, compound: f64) -> f32 {
    if compound <= -0.5 {
        0.3
    } else if compound < -0.3 {
        (base - 0.2).max(0.3)
    } else if compound > 0.5 {
        0.9
    } else if compound > 0.3 {
        (base + 0.2).min(0.9)
    } else {
        base
    }
}

/// Normalize generated text: trim, and strip a leading echoed role label.
fn postprocess(raw: &str) -> String {
    let trimmed = raw.trim();
    let stripped = trimmed
        .strip_prefix("Assistant:")
        .or_else(|| trimmed.strip_prefix("assistant:"))
        .map(str::trim_start)
        .unwrap_or(trimmed);
    stripped.to_string()
}

/// Append a rotating catchphrase to every third scripted reply.
fn decorate_reply(text: String, binding: &CharacterBinding, replies: u64) -> String {
    if binding.is_adaptive() || binding.sheet.catchphrases.is_empty() {
        return text;
    }
    if replies % CATCHPHRASE_CADENCE != 0 {
        return text;
    }
    let index = ((replies / CATCHPHRASE_CADENCE - 1) as usize) % binding.sheet.catchphrases.len();
    format!("{} {}", text, binding.sheet.catchphrases[index])
}

// ── Tests ─────────────────────────────────────────────────────────────────
