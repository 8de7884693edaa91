//! Registry / dispatch from a response `type` to the component that
//! renders it.
//!
//! Built once at startup and shared read-only afterwards. `build()` refuses
//! a registry that leaves any of the seven kinds without a renderer, so a
//! missing component is caught before the first request.

pub mod text;

use std::collections::HashMap;
use std::sync::Arc;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{ResponseKind, StructuredResponse};

pub use text::TextRenderer;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("no renderer registered for {0}")]
    MissingRenderer(ResponseKind),
}

pub trait CardRenderer: Send + Sync {
    fn render(&self, response: &StructuredResponse) -> String;
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ComponentMetadata {
    pub name: String,
    pub description: String,
}

/// One row of `ComponentRegistry::summary`, serialized as
/// `{ "type", "name", "description" }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComponentSummary {
    #[serde(rename = "type")]
    pub kind: ResponseKind,
    pub name: String,
    pub description: String,
}

#[derive(Deserialize)]
struct ComponentEntry {
    #[serde(rename = "type")]
    kind: ResponseKind,
    #[serde(flatten)]
    metadata: ComponentMetadata,
}

static EN_COMPONENTS: Lazy<Vec<ComponentEntry>> = Lazy::new(|| {
    let raw = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/lang/en/components.json"));
    serde_json::from_str(raw).expect("invalid component table")
});

struct Registration {
    renderer: Arc<dyn CardRenderer>,
    metadata: ComponentMetadata,
}

#[derive(Clone)]
pub struct ComponentRegistry {
    entries: Arc<HashMap<ResponseKind, Registration>>,
}

#[derive(Default)]
pub struct RegistryBuilder {
    entries: HashMap<ResponseKind, Registration>,
}

impl RegistryBuilder {
    /// Registering a kind twice keeps the later entry.
    pub fn register(
        mut self,
        kind: ResponseKind,
        renderer: Arc<dyn CardRenderer>,
        metadata: ComponentMetadata,
    ) -> Self {
        self.entries.insert(kind, Registration { renderer, metadata });
        self
    }

    pub fn build(self) -> Result<ComponentRegistry, RegistryError> {
        if let Some(kind) = ResponseKind::ALL
            .into_iter()
            .find(|kind| !self.entries.contains_key(kind))
        {
            return Err(RegistryError::MissingRenderer(kind));
        }
        Ok(ComponentRegistry {
            entries: Arc::new(self.entries),
        })
    }
}

impl ComponentRegistry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    /// The seven study cards, all rendered as plain text.
    pub fn standard() -> Result<Self, RegistryError> {
        let renderer: Arc<dyn CardRenderer> = Arc::new(TextRenderer);
        EN_COMPONENTS
            .iter()
            .fold(Self::builder(), |builder, entry| {
                builder.register(entry.kind, renderer.clone(), entry.metadata.clone())
            })
            .build()
    }

    pub fn resolve(&self, kind: ResponseKind) -> Option<&dyn CardRenderer> {
        self.entries.get(&kind).map(|entry| entry.renderer.as_ref())
    }

    pub fn metadata(&self, kind: ResponseKind) -> Option<&ComponentMetadata> {
        self.entries.get(&kind).map(|entry| &entry.metadata)
    }

    /// Renders with the component registered for the response's own type.
    pub fn render(&self, response: &StructuredResponse) -> Option<String> {
        self.resolve(response.kind())
            .map(|renderer| renderer.render(response))
    }

    pub fn summary(&self) -> Vec<ComponentSummary> {
        ResponseKind::ALL
            .into_iter()
            .filter_map(|kind| {
                self.metadata(kind).map(|meta| ComponentSummary {
                    kind,
                    name: meta.name.clone(),
                    description: meta.description.clone(),
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synthesis::respond_locally;

    struct Shouting;

    impl CardRenderer for Shouting {
        fn render(&self, response: &StructuredResponse) -> String {
            response.title().to_uppercase()
        }
    }

    fn meta(name: &str) -> ComponentMetadata {
        ComponentMetadata {
            name: name.to_string(),
            description: format!("{name} card"),
        }
    }

    fn all_but(skip: Option<ResponseKind>) -> RegistryBuilder {
        ResponseKind::ALL
            .into_iter()
            .filter(|kind| Some(*kind) != skip)
            .fold(ComponentRegistry::builder(), |builder, kind| {
                builder.register(kind, Arc::new(TextRenderer), meta(kind.as_str()))
            })
    }

    #[test]
    fn standard_registry_covers_every_kind() {
        let registry = ComponentRegistry::standard().unwrap();
        for kind in ResponseKind::ALL {
            assert!(registry.resolve(kind).is_some(), "{kind}");
        }
    }

    #[test]
    fn summary_lists_components_in_kind_order() {
        let summary = ComponentRegistry::standard().unwrap().summary();
        let names: Vec<&str> = summary.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(
            names,
            [
                "NotesCard",
                "QuizCard",
                "CodeCard",
                "ProgressCard",
                "SummaryCard",
                "FlashcardComponent",
                "ResourceCard"
            ]
        );
        let json = serde_json::to_value(&summary[0]).unwrap();
        assert_eq!(json["type"], "notes");
        assert!(json["description"]
            .as_str()
            .unwrap()
            .starts_with("Renders study notes"));
    }

    #[test]
    fn missing_renderer_fails_the_build() {
        let err = all_but(Some(ResponseKind::Progress)).build().err().unwrap();
        assert_eq!(err, RegistryError::MissingRenderer(ResponseKind::Progress));
    }

    #[test]
    fn later_registration_replaces_earlier() {
        let registry = all_but(None)
            .register(ResponseKind::Notes, Arc::new(Shouting), meta("LoudNotes"))
            .build()
            .unwrap();

        let notes = respond_locally("Explain recursion");
        assert_eq!(registry.render(&notes).unwrap(), "UNDERSTANDING RECURSION");
        assert_eq!(registry.metadata(ResponseKind::Notes).unwrap().name, "LoudNotes");
        assert_eq!(registry.summary().len(), 7);
    }
}
