//! Local response synthesis.
//!
//! Picks a hand-authored topic template when the request names a known
//! topic, otherwise renders the generic fallback for the kind with the
//! extracted topic. Always produces a schema-valid response.

pub mod templates;

use once_cell::sync::Lazy;

use crate::classifier::{classify, default_topic_extractor};
use crate::model::{ResponseKind, StructuredResponse};

pub use templates::{check_template_bounds, TemplateBank, TemplateError, TopicTemplate};

static EN_TEMPLATES: Lazy<TemplateBank> = Lazy::new(|| {
    TemplateBank::from_sources(&templates::BUNDLED_SOURCES, default_topic_extractor().clone())
        .expect("invalid response templates")
});

pub fn default_bank() -> &'static TemplateBank {
    &EN_TEMPLATES
}

pub fn synthesize(intent: ResponseKind, raw_text: &str) -> StructuredResponse {
    default_bank().synthesize(intent, raw_text)
}

/// Classifier plus synthesizer: the path taken when no model answer is
/// available.
pub fn respond_locally(raw_text: &str) -> StructuredResponse {
    synthesize(classify(raw_text), raw_text)
}
