use std::fmt::Write;

use super::CardRenderer;
use crate::model::StructuredResponse;

const BAR_WIDTH: usize = 20;
const OPTION_LABELS: [char; 4] = ['A', 'B', 'C', 'D'];

/// Terminal rendering of a study card.
#[derive(Debug, Clone, Copy, Default)]
pub struct TextRenderer;

impl CardRenderer for TextRenderer {
    fn render(&self, response: &StructuredResponse) -> String {
        let mut out = String::new();
        let title = response.title();
        let _ = writeln!(out, "{title}");
        let _ = writeln!(out, "{}", "=".repeat(title.chars().count()));
        out.push('\n');

        match response {
            StructuredResponse::Notes { content, .. } => {
                out.push_str(content.trim_end());
                out.push('\n');
            }
            StructuredResponse::Quiz { content, .. } => {
                for (i, question) in content.iter().enumerate() {
                    let _ = writeln!(out, "{}. {}", i + 1, question.question);
                    for (label, option) in OPTION_LABELS.iter().zip(&question.options) {
                        let _ = writeln!(out, "   {label}) {option}");
                    }
                    out.push('\n');
                }
                let key: Vec<String> = content
                    .iter()
                    .enumerate()
                    .map(|(i, q)| format!("{}{}", i + 1, OPTION_LABELS[q.answer.min(3)]))
                    .collect();
                let _ = writeln!(out, "Answers: {}", key.join(" "));
            }
            StructuredResponse::Code { content, .. } => {
                let _ = writeln!(out, "```\n{}\n```", content.code.trim_end());
                if !content.explanation.trim().is_empty() {
                    out.push('\n');
                    let _ = writeln!(out, "{}", content.explanation.trim_end());
                }
            }
            StructuredResponse::Progress { content, .. } => {
                let width = content
                    .topics
                    .iter()
                    .map(|t| t.name.chars().count())
                    .max()
                    .unwrap_or(0);
                for topic in &content.topics {
                    let filled = usize::from(topic.progress.min(100)) * BAR_WIDTH / 100;
                    let _ = writeln!(
                        out,
                        "{:<width$}  [{}{}] {:>3}%",
                        topic.name,
                        "#".repeat(filled),
                        "-".repeat(BAR_WIDTH - filled),
                        topic.progress,
                    );
                }
                if !content.message.trim().is_empty() {
                    let _ = writeln!(out, "\n{}", content.message.trim_end());
                }
            }
            StructuredResponse::Summary { content, .. } => {
                for point in &content.points {
                    let _ = writeln!(out, "- {point}");
                }
                if !content.highlights.is_empty() {
                    let _ = writeln!(out, "\nKey terms: {}", content.highlights.join(", "));
                }
            }
            StructuredResponse::Flashcards { content, .. } => {
                for (i, card) in content.iter().enumerate() {
                    let _ = writeln!(out, "[{}] Q: {}", i + 1, card.front);
                    let _ = writeln!(out, "    A: {}", card.back);
                }
            }
            StructuredResponse::Resources { content, .. } => {
                for resource in &content.resources {
                    let _ = writeln!(
                        out,
                        "- [{}] {} <{}>",
                        resource.category.as_str(),
                        resource.title,
                        resource.url
                    );
                    if !resource.description.trim().is_empty() {
                        let _ = writeln!(out, "  {}", resource.description);
                    }
                }
                if let Some(suggestion) = &content.suggestion {
                    let _ = writeln!(out, "\nTip: {suggestion}");
                }
            }
        }

        out
    }
}
