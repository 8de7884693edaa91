use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// The seven response shapes a study request can resolve to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseKind {
    Notes,
    Quiz,
    Code,
    Progress,
    Summary,
    Flashcards,
    Resources,
}

impl Default for ResponseKind {
    fn default() -> Self {
        ResponseKind::Notes
    }
}

impl ResponseKind {
    pub const ALL: [ResponseKind; 7] = [
        ResponseKind::Notes,
        ResponseKind::Quiz,
        ResponseKind::Code,
        ResponseKind::Progress,
        ResponseKind::Summary,
        ResponseKind::Flashcards,
        ResponseKind::Resources,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ResponseKind::Notes => "notes",
            ResponseKind::Quiz => "quiz",
            ResponseKind::Code => "code",
            ResponseKind::Progress => "progress",
            ResponseKind::Summary => "summary",
            ResponseKind::Flashcards => "flashcards",
            ResponseKind::Resources => "resources",
        }
    }
}

impl fmt::Display for ResponseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown response kind: {0}")]
pub struct UnknownKind(pub String);

impl FromStr for ResponseKind {
    type Err = UnknownKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ResponseKind::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownKind(s.to_string()))
    }
}
