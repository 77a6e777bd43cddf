//! Per-author conversational context — the engine's working memory.
//!
//! Each author owns two independent structures:
//!
//! - **Window**: a bounded, relevance-decayed buffer of recent turns, read
//!   during prompt construction. Turns age out, decay out, or are pushed out
//!   from the front when the length bound is hit.
//! - **History**: an unbounded append-only log of every turn ever observed,
//!   kept for analytics/debugging and pruned only by the retention sweep.
//!
//! Losing one structure never corrupts the other.
//!
//! # Concurrency
//!
//! Authors are sharded behind a `RwLock<HashMap<_, Arc<Mutex<AuthorState>>>>`:
//! the decay pass inside [`ContextStore::update`] is atomic with respect to
//! other calls for the same author, while different authors proceed fully in
//! parallel.

use chrono::{DateTime, Duration, Utc};
use hearthline_config::ContextSettings;
use hearthline_core::error::Error;
use hearthline_core::turn::Turn;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing::debug;

/// A turn decayed to this relevance or below is evicted from the window.
pub const RELEVANCE_FLOOR: f64 = 0.1;

/// The decay function: relevance lost is proportional to the turn's age in
/// minutes, applied once per update pass (discrete, not continuous).
fn decayed_relevance(relevance: f64, age_secs: f64, decay_rate: f64) -> f64 {
    relevance - decay_rate * (age_secs / 60.0)
}

// ── Author state ──────────────────────────────────────────────────────────

#[derive(Debug, Default)]
struct AuthorState {
    window: VecDeque<Turn>,
    history: Vec<(Turn, DateTime<Utc>)>,
}

// ── Store ─────────────────────────────────────────────────────────────────

/// The keyed context store, owned by a single orchestrator instance.
pub struct ContextStore {
    max_length: usize,
    max_age_secs: u64,
    decay_rate: f64,
    authors: RwLock<HashMap<String, Arc<Mutex<AuthorState>>>>,
}

impl ContextStore {
    /// Create a store from validated settings.
    ///
    /// Degenerate dynamics are configuration errors and fail fast here:
    /// a zero-length window, a zero max age, or a decay rate outside (0, 1)
    /// (a rate ≥ 1 would empty the window in a single minute-long step).
    pub fn new(settings: &ContextSettings) -> Result<Self, Error> {
        if settings.max_length == 0 {
            return Err(Error::Config {
                message: "context max_length must be at least 1".into(),
            });
        }
        if settings.max_age_secs == 0 {
            return Err(Error::Config {
                message: "context max_age_secs must be greater than 0".into(),
            });
        }
        if settings.decay_rate <= 0.0 || settings.decay_rate >= 1.0 {
            return Err(Error::Config {
                message: "context decay_rate must be in (0, 1)".into(),
            });
        }

        Ok(Self {
            max_length: settings.max_length,
            max_age_secs: settings.max_age_secs,
            decay_rate: settings.decay_rate,
            authors: RwLock::new(HashMap::new()),
        })
    }

    async fn author_state(&self, author_id: &str) -> Arc<Mutex<AuthorState>> {
        {
            let authors = self.authors.read().await;
            if let Some(state) = authors.get(author_id) {
                return Arc::clone(state);
            }
        }
        let mut authors = self.authors.write().await;
        Arc::clone(authors.entry(author_id.to_string()).or_default())
    }

    /// Fold new turns into an author's window and history.
    ///
    /// In order: decay/evict resident turns, log every incoming turn to
    /// history, drop incoming turns already past the age bound, append the
    /// survivors, then trim the window from the front to the length bound.
    /// Ordering is preserved throughout.
    pub async fn update(&self, author_id: &str, new_turns: Vec<Turn>) {
        self.update_at(author_id, new_turns, Utc::now()).await;
    }

    async fn update_at(&self, author_id: &str, new_turns: Vec<Turn>, now: DateTime<Utc>) {
        let state = self.author_state(author_id).await;
        let mut state = state.lock().await;

        // Decay pass over residents. Age and relevance are two independent
        // eviction conditions, checked every call.
        let max_age = self.max_age_secs as f64;
        let decay_rate = self.decay_rate;
        state.window.retain_mut(|turn| {
            let age = turn.age_secs(now);
            if age >= max_age {
                debug!(author_id, turn_id = %turn.id, age, "Evicting turn past age bound");
                return false;
            }
            let relevance = decayed_relevance(turn.relevance, age, decay_rate);
            if relevance <= RELEVANCE_FLOOR {
                debug!(author_id, turn_id = %turn.id, relevance, "Evicting turn below relevance floor");
                return false;
            }
            turn.relevance = relevance;
            true
        });

        // History records every incoming turn, including ones the window
        // rejects below.
        state
            .history
            .extend(new_turns.iter().cloned().map(|t| (t, now)));

        // Stale arrivals never enter the window.
        for turn in new_turns {
            if turn.age_secs(now) >= max_age {
                debug!(author_id, turn_id = %turn.id, "Dropping stale incoming turn");
                continue;
            }
            state.window.push_back(turn);
        }

        // Length bound wins over relevance: oldest turns go first.
        while state.window.len() > self.max_length {
            if let Some(removed) = state.window.pop_front() {
                debug!(author_id, turn_id = %removed.id, "Evicting turn past length bound");
            }
        }
    }

    /// Snapshot the resident window, optionally truncated to the most recent
    /// `limit` turns. Unknown authors yield an empty sequence.
    pub async fn get_context(&self, author_id: &str, limit: Option<usize>) -> Vec<Turn> {
        let authors = self.authors.read().await;
        let Some(state) = authors.get(author_id) else {
            return Vec::new();
        };
        let state = state.lock().await;
        let window = state.window.iter().cloned();
        match limit {
            Some(n) => {
                let skip = state.window.len().saturating_sub(n);
                window.skip(skip).collect()
            }
            None => window.collect(),
        }
    }

    /// Full or time-filtered history for an author. Entries observed at or
    /// after `since` are returned; unknown authors yield an empty sequence.
    pub async fn get_history(
        &self,
        author_id: &str,
        since: Option<DateTime<Utc>>,
    ) -> Vec<(Turn, DateTime<Utc>)> {
        let authors = self.authors.read().await;
        let Some(state) = authors.get(author_id) else {
            return Vec::new();
        };
        let state = state.lock().await;
        match since {
            Some(cutoff) => state
                .history
                .iter()
                .filter(|(_, ts)| *ts >= cutoff)
                .cloned()
                .collect(),
            None => state.history.clone(),
        }
    }

    /// Clear an author's history log. The active window is untouched.
    pub async fn clear_history(&self, author_id: &str) {
        let authors = self.authors.read().await;
        if let Some(state) = authors.get(author_id) {
            state.lock().await.history.clear();
        }
    }

    /// Drop history entries older than `retention` across all authors.
    ///
    /// Called by the background sweep; locks one author at a time so
    /// foreground updates on other authors never wait on it. Idempotent
    /// under overlapping runs.
    pub async fn prune_history(&self, retention: Duration) {
        self.prune_history_at(retention, Utc::now()).await;
    }

    async fn prune_history_at(&self, retention: Duration, now: DateTime<Utc>) {
        let states: Vec<Arc<Mutex<AuthorState>>> = {
            let authors = self.authors.read().await;
            authors.values().map(Arc::clone).collect()
        };

        let cutoff = now - retention;
        let mut pruned = 0usize;
        for state in states {
            let mut state = state.lock().await;
            let before = state.history.len();
            state.history.retain(|(_, ts)| *ts >= cutoff);
            pruned += before - state.history.len();
        }

        if pruned > 0 {
            debug!(pruned, "Pruned aged history entries");
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────
