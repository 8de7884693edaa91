use minijinja::{context, Environment};
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use tracing::warn;

use crate::classifier::TopicExtractor;
use crate::model::{ResponseKind, SchemaViolation, StructuredResponse};

macro_rules! template_file {
    ($kind:literal) => {
        include_str!(concat!(
            env!("CARGO_MANIFEST_DIR"),
            "/templates/",
            $kind,
            ".json"
        ))
    };
}

/// Bundled template sources, one file per response kind.
pub(crate) const BUNDLED_SOURCES: [(ResponseKind, &str); 7] = [
    (ResponseKind::Notes, template_file!("notes")),
    (ResponseKind::Quiz, template_file!("quiz")),
    (ResponseKind::Code, template_file!("code")),
    (ResponseKind::Progress, template_file!("progress")),
    (ResponseKind::Summary, template_file!("summary")),
    (ResponseKind::Flashcards, template_file!("flashcards")),
    (ResponseKind::Resources, template_file!("resources")),
];

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("{kind} templates are not valid JSON: {source}")]
    Parse {
        kind: ResponseKind,
        #[source]
        source: serde_json::Error,
    },
    #[error("{kind} template {entry} has type {found}")]
    KindMismatch {
        kind: ResponseKind,
        entry: String,
        found: ResponseKind,
    },
    #[error("{kind} template {entry} violates the response schema: {source}")]
    Schema {
        kind: ResponseKind,
        entry: String,
        #[source]
        source: SchemaViolation,
    },
    #[error("{kind} template {entry} is out of bounds: {detail}")]
    Bounds {
        kind: ResponseKind,
        entry: String,
        detail: String,
    },
    #[error("{kind} fallback failed to render: {source}")]
    Render {
        kind: ResponseKind,
        #[source]
        source: minijinja::Error,
    },
    #[error("{kind} fallback does not describe a response: {source}")]
    Fallback {
        kind: ResponseKind,
        #[source]
        source: serde_json::Error,
    },
    #[error("no templates registered for {0}")]
    MissingKind(ResponseKind),
}

#[derive(Deserialize)]
struct TemplateFile {
    topics: Vec<TopicTemplate>,
    fallback: Value,
}

/// A hand-authored response that is served when the request mentions one of
/// `keywords` and every entry of `requires`.
#[derive(Debug, Clone, Deserialize)]
pub struct TopicTemplate {
    pub keywords: Vec<String>,
    #[serde(default)]
    pub requires: Vec<String>,
    pub response: StructuredResponse,
}

impl TopicTemplate {
    pub fn matches(&self, lower_text: &str) -> bool {
        self.keywords.iter().any(|kw| lower_text.contains(kw.as_str()))
            && self.requires.iter().all(|kw| lower_text.contains(kw.as_str()))
    }
}

struct KindTemplates {
    kind: ResponseKind,
    topics: Vec<TopicTemplate>,
    /// Raw fallback document; string fields may reference `{{ topic }}`.
    fallback: Value,
    /// Fallback rendered with the placeholder topic, served if a later
    /// render fails.
    placeholder_fallback: StructuredResponse,
}

/// Topic templates and generic fallbacks for all seven response kinds.
///
/// Every template is checked against the response schema and the
/// per-kind item bounds when the bank is built, so `synthesize` never has a
/// failure path.
pub struct TemplateBank {
    env: Environment<'static>,
    entries: Vec<KindTemplates>,
    topics: TopicExtractor,
}

impl TemplateBank {
    pub fn from_sources(
        sources: &[(ResponseKind, &str)],
        topics: TopicExtractor,
    ) -> Result<Self, TemplateError> {
        let env = Environment::new();
        let mut entries = Vec::with_capacity(ResponseKind::ALL.len());

        for kind in ResponseKind::ALL {
            let raw = sources
                .iter()
                .rev()
                .find(|(k, _)| *k == kind)
                .map(|(_, raw)| *raw)
                .ok_or(TemplateError::MissingKind(kind))?;
            entries.push(load_kind(&env, kind, raw, topics.placeholder())?);
        }

        Ok(Self {
            env,
            entries,
            topics,
        })
    }

    pub fn topic_templates(&self, kind: ResponseKind) -> &[TopicTemplate] {
        &self.entry(kind).topics
    }

    pub fn synthesize(&self, kind: ResponseKind, raw_text: &str) -> StructuredResponse {
        let entry = self.entry(kind);
        let lower = raw_text.to_lowercase();

        if let Some(template) = entry.topics.iter().find(|t| t.matches(&lower)) {
            return template.response.clone();
        }

        let topic = self.topics.extract(&lower);
        render_fallback(&self.env, entry.kind, &entry.fallback, &topic)
            .and_then(|value| {
                serde_json::from_value(value)
                    .map_err(|source| TemplateError::Fallback { kind, source })
            })
            .unwrap_or_else(|err| {
                warn!(%kind, %topic, error = %err, "fallback render failed, using placeholder");
                entry.placeholder_fallback.clone()
            })
    }

    fn entry(&self, kind: ResponseKind) -> &KindTemplates {
        // `from_sources` pushes one entry per kind in `ResponseKind::ALL` order.
        &self.entries[kind as usize]
    }
}

fn load_kind(
    env: &Environment<'static>,
    kind: ResponseKind,
    raw: &str,
    placeholder: &str,
) -> Result<KindTemplates, TemplateError> {
    let file: TemplateFile =
        serde_json::from_str(raw).map_err(|source| TemplateError::Parse { kind, source })?;

    let topics: Vec<TopicTemplate> = file
        .topics
        .into_iter()
        .map(|topic| TopicTemplate {
            keywords: topic.keywords.iter().map(|kw| kw.to_lowercase()).collect(),
            requires: topic.requires.iter().map(|kw| kw.to_lowercase()).collect(),
            ..topic
        })
        .collect();

    for topic in &topics {
        check_entry(kind, &topic.keywords.join("|"), &topic.response)?;
    }

    let rendered = render_fallback(env, kind, &file.fallback, placeholder)?;
    let placeholder_fallback: StructuredResponse = serde_json::from_value(rendered)
        .map_err(|source| TemplateError::Fallback { kind, source })?;
    check_entry(kind, "fallback", &placeholder_fallback)?;

    Ok(KindTemplates {
        kind,
        topics,
        fallback: file.fallback,
        placeholder_fallback,
    })
}

fn check_entry(
    kind: ResponseKind,
    entry: &str,
    response: &StructuredResponse,
) -> Result<(), TemplateError> {
    let found = response.kind();
    if found != kind {
        return Err(TemplateError::KindMismatch {
            kind,
            entry: entry.to_string(),
            found,
        });
    }
    response.validate().map_err(|source| TemplateError::Schema {
        kind,
        entry: entry.to_string(),
        source,
    })?;
    check_template_bounds(response).map_err(|detail| TemplateError::Bounds {
        kind,
        entry: entry.to_string(),
        detail,
    })
}

/// Item counts every locally synthesized response stays within.
pub fn check_template_bounds(response: &StructuredResponse) -> Result<(), String> {
    fn within(what: &str, len: usize, min: usize, max: usize) -> Result<(), String> {
        if (min..=max).contains(&len) {
            Ok(())
        } else {
            Err(format!("{len} {what}, expected {min}..={max}"))
        }
    }

    match response {
        StructuredResponse::Notes { .. } | StructuredResponse::Code { .. } => Ok(()),
        StructuredResponse::Quiz { content, .. } => within("questions", content.len(), 3, 3),
        StructuredResponse::Progress { content, .. } => {
            within("topics", content.topics.len(), 4, 5)
        }
        StructuredResponse::Summary { content, .. } => {
            within("points", content.points.len(), 4, 6)?;
            within("highlights", content.highlights.len(), 3, 6)
        }
        StructuredResponse::Flashcards { content, .. } => within("cards", content.len(), 4, 5),
        StructuredResponse::Resources { content, .. } => {
            within("resources", content.resources.len(), 3, 4)
        }
    }
}

fn render_fallback(
    env: &Environment<'static>,
    kind: ResponseKind,
    value: &Value,
    topic: &str,
) -> Result<Value, TemplateError> {
    let rendered = match value {
        Value::String(text) if text.contains("{{") => Value::String(
            env.render_str(text, context! { topic => topic })
                .map_err(|source| TemplateError::Render { kind, source })?,
        ),
        Value::Array(items) => Value::Array(
            items
                .iter()
                .map(|item| render_fallback(env, kind, item, topic))
                .collect::<Result<_, _>>()?,
        ),
        Value::Object(fields) => {
            let mut rendered = serde_json::Map::with_capacity(fields.len());
            for (key, item) in fields {
                rendered.insert(key.clone(), render_fallback(env, kind, item, topic)?);
            }
            Value::Object(rendered)
        }
        other => other.clone(),
    };
    Ok(rendered)
}
