//! Collaborator implementations for Hearthline.
//!
//! The chat client implements `hearthline_core::ChatProvider` against any
//! OpenAI-compatible endpoint; the lexicon analyzer is the default
//! `hearthline_core::SentimentAnalyzer`. Both are injected into the engine
//! as constructor-supplied collaborators — nothing in here is a singleton.

pub mod chat_client;
pub mod lexicon;

pub use chat_client::ChatCompletionsClient;
pub use lexicon::LexiconAnalyzer;
