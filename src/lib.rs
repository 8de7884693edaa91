//! AI study assistant service.
//!
//! A study request is answered with one of seven structured study cards
//! (notes, quiz, code, progress, summary, flashcards, resources). A hosted
//! model is asked first when one is configured; the keyword classifier and
//! template synthesizer answer otherwise, so every request gets a card.

pub mod api;
pub mod assistant;
pub mod classifier;
pub mod config;
pub mod delegate;
pub mod error;
pub mod model;
pub mod prompts;
pub mod registry;
pub mod synthesis;

pub use assistant::{Answer, ResponseSource, StudyAssistant};
pub use model::{ResponseKind, StructuredResponse};
