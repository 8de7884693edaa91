use reqwest::Url;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::kind::ResponseKind;

pub const MAX_ANSWER_INDEX: usize = 3;
pub const MAX_PERCENT: u8 = 100;

/// A study card produced for one conversation turn.
///
/// Serialized as `{ "type": ..., "title": ..., "content": ... }`. The shape of
/// `content` is fixed by the `type` tag, so a mismatched payload fails to
/// deserialize instead of reaching the renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum StructuredResponse {
    Notes {
        title: String,
        content: String,
    },
    Quiz {
        title: String,
        content: Vec<QuizQuestion>,
    },
    Code {
        title: String,
        content: CodeContent,
    },
    Progress {
        title: String,
        content: ProgressContent,
    },
    Summary {
        title: String,
        content: SummaryContent,
    },
    Flashcards {
        title: String,
        content: Vec<Flashcard>,
    },
    Resources {
        title: String,
        content: ResourceContent,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizQuestion {
    pub question: String,
    pub options: [String; 4],
    /// 0-based index into `options`.
    pub answer: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeContent {
    pub code: String,
    pub explanation: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicProgress {
    pub name: String,
    pub progress: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressContent {
    pub topics: Vec<TopicProgress>,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SummaryContent {
    pub points: Vec<String>,
    pub highlights: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flashcard {
    pub front: String,
    pub back: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceCategory {
    Documentation,
    Video,
    Tutorial,
    Article,
}

impl ResourceCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceCategory::Documentation => "documentation",
            ResourceCategory::Video => "video",
            ResourceCategory::Tutorial => "tutorial",
            ResourceCategory::Article => "article",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    pub title: String,
    pub url: String,
    #[serde(rename = "type")]
    pub category: ResourceCategory,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceContent {
    pub resources: Vec<Resource>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaViolation {
    #[error("{kind} response has an empty title")]
    EmptyTitle { kind: ResponseKind },
    #[error("{kind} response has no content")]
    EmptyContent { kind: ResponseKind },
    #[error("{kind} item {index}: {field} is empty")]
    EmptyField {
        kind: ResponseKind,
        index: usize,
        field: &'static str,
    },
    #[error("quiz question {index}: answer {answer} is outside 0..=3")]
    AnswerOutOfRange { index: usize, answer: usize },
    #[error("progress topic {index}: {progress}% exceeds 100%")]
    PercentOutOfRange { index: usize, progress: u8 },
    #[error("resource {index}: invalid url {url:?}")]
    InvalidUrl { index: usize, url: String },
}

impl StructuredResponse {
    pub fn kind(&self) -> ResponseKind {
        match self {
            StructuredResponse::Notes { .. } => ResponseKind::Notes,
            StructuredResponse::Quiz { .. } => ResponseKind::Quiz,
            StructuredResponse::Code { .. } => ResponseKind::Code,
            StructuredResponse::Progress { .. } => ResponseKind::Progress,
            StructuredResponse::Summary { .. } => ResponseKind::Summary,
            StructuredResponse::Flashcards { .. } => ResponseKind::Flashcards,
            StructuredResponse::Resources { .. } => ResponseKind::Resources,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            StructuredResponse::Notes { title, .. }
            | StructuredResponse::Quiz { title, .. }
            | StructuredResponse::Code { title, .. }
            | StructuredResponse::Progress { title, .. }
            | StructuredResponse::Summary { title, .. }
            | StructuredResponse::Flashcards { title, .. }
            | StructuredResponse::Resources { title, .. } => title,
        }
    }

    /// Number of top-level items in `content` (questions, cards, topics,
    /// points or resources). Notes and code count as a single block.
    pub fn item_count(&self) -> usize {
        match self {
            StructuredResponse::Notes { .. } | StructuredResponse::Code { .. } => 1,
            StructuredResponse::Quiz { content, .. } => content.len(),
            StructuredResponse::Progress { content, .. } => content.topics.len(),
            StructuredResponse::Summary { content, .. } => content.points.len(),
            StructuredResponse::Flashcards { content, .. } => content.len(),
            StructuredResponse::Resources { content, .. } => content.resources.len(),
        }
    }

    /// Checks the content against the schema of its `type`.
    pub fn validate(&self) -> Result<(), SchemaViolation> {
        let kind = self.kind();
        if self.title().trim().is_empty() {
            return Err(SchemaViolation::EmptyTitle { kind });
        }

        match self {
            StructuredResponse::Notes { content, .. } => {
                if content.trim().is_empty() {
                    return Err(SchemaViolation::EmptyContent { kind });
                }
            }
            StructuredResponse::Quiz { content, .. } => {
                non_empty(kind, content)?;
                for (index, question) in content.iter().enumerate() {
                    require_text(kind, index, "question", &question.question)?;
                    for option in &question.options {
                        require_text(kind, index, "option", option)?;
                    }
                    if question.answer > MAX_ANSWER_INDEX {
                        return Err(SchemaViolation::AnswerOutOfRange {
                            index,
                            answer: question.answer,
                        });
                    }
                }
            }
            StructuredResponse::Code { content, .. } => {
                require_text(kind, 0, "code", &content.code)?;
            }
            StructuredResponse::Progress { content, .. } => {
                non_empty(kind, &content.topics)?;
                for (index, topic) in content.topics.iter().enumerate() {
                    require_text(kind, index, "name", &topic.name)?;
                    if topic.progress > MAX_PERCENT {
                        return Err(SchemaViolation::PercentOutOfRange {
                            index,
                            progress: topic.progress,
                        });
                    }
                }
            }
            StructuredResponse::Summary { content, .. } => {
                non_empty(kind, &content.points)?;
                for (index, point) in content.points.iter().enumerate() {
                    require_text(kind, index, "point", point)?;
                }
            }
            StructuredResponse::Flashcards { content, .. } => {
                non_empty(kind, content)?;
                for (index, card) in content.iter().enumerate() {
                    require_text(kind, index, "front", &card.front)?;
                    require_text(kind, index, "back", &card.back)?;
                }
            }
            StructuredResponse::Resources { content, .. } => {
                non_empty(kind, &content.resources)?;
                for (index, resource) in content.resources.iter().enumerate() {
                    require_text(kind, index, "title", &resource.title)?;
                    if !is_web_url(&resource.url) {
                        return Err(SchemaViolation::InvalidUrl {
                            index,
                            url: resource.url.clone(),
                        });
                    }
                }
            }
        }

        Ok(())
    }
}

fn non_empty<T>(kind: ResponseKind, items: &[T]) -> Result<(), SchemaViolation> {
    if items.is_empty() {
        Err(SchemaViolation::EmptyContent { kind })
    } else {
        Ok(())
    }
}

fn require_text(
    kind: ResponseKind,
    index: usize,
    field: &'static str,
    text: &str,
) -> Result<(), SchemaViolation> {
    if text.trim().is_empty() {
        Err(SchemaViolation::EmptyField { kind, index, field })
    } else {
        Ok(())
    }
}

fn is_web_url(raw: &str) -> bool {
    Url::parse(raw)
        .map(|url| matches!(url.scheme(), "http" | "https"))
        .unwrap_or(false)
}
