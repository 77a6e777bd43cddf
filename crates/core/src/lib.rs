//! # Hearthline Core
//!
//! Domain types, traits, and error definitions for the Hearthline
//! conversation engine. This crate has **zero framework dependencies** — it
//! defines the domain model that all other crates implement against.
//!
//! ## Design Philosophy
//!
//! Every external collaborator is defined as a trait here. Implementations
//! live in their respective crates. This enables:
//! - Swapping the LLM backend or analyzer via configuration
//! - Easy testing with mock/stub implementations
//! - Clean dependency graph (all crates depend inward on core)

pub mod analyzer;
pub mod character;
pub mod error;
pub mod provider;
pub mod turn;

// Re-export key types at crate root for ergonomics
pub use analyzer::{SentimentAnalyzer, SentimentReport};
pub use character::{CharacterBinding, CharacterKind, CharacterSheet};
pub use error::{AnalyzerError, Error, ProviderError, Result};
pub use provider::{ChatMessage, ChatProvider, ChatRequest, ChatResponse, Usage};
pub use turn::{Role, TraitSnapshot, Turn};
