use once_cell::sync::Lazy;
use serde::Deserialize;

use crate::model::ResponseKind;

macro_rules! lang_file {
    ($lang:literal, $file:literal) => {
        include_str!(concat!(
            env!("CARGO_MANIFEST_DIR"),
            "/lang/",
            $lang,
            "/",
            $file
        ))
    };
}

static EN_RULES: Lazy<RuleSet> =
    Lazy::new(|| RuleSet::from_json(lang_file!("en", "intent_rules.json")));

/// One keyword group. Any keyword found in the lower-cased text selects
/// `intent`.
#[derive(Debug, Clone, Deserialize)]
pub struct IntentRule {
    pub intent: ResponseKind,
    pub keywords: Vec<String>,
}

impl IntentRule {
    pub fn new(intent: ResponseKind, keywords: &[&str]) -> Self {
        Self {
            intent,
            keywords: keywords.iter().map(|kw| kw.to_lowercase()).collect(),
        }
    }

    pub fn matched_keyword(&self, lower_text: &str) -> Option<&str> {
        self.keywords
            .iter()
            .find(|kw| lower_text.contains(kw.as_str()))
            .map(String::as_str)
    }
}

/// Ordered rule table. Evaluation is first-match-wins; text no rule matches
/// resolves to `fallback`.
#[derive(Debug, Clone)]
pub struct RuleSet {
    rules: Vec<IntentRule>,
    fallback: ResponseKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleMatch<'a> {
    pub intent: ResponseKind,
    /// `None` when no rule matched and the fallback was used.
    pub keyword: Option<&'a str>,
}

impl RuleSet {
    pub fn new(rules: Vec<IntentRule>, fallback: ResponseKind) -> Self {
        Self { rules, fallback }
    }

    fn from_json(raw: &str) -> Self {
        let rules: Vec<IntentRule> = serde_json::from_str(raw).expect("invalid intent rule table");
        let rules = rules
            .into_iter()
            .map(|rule| IntentRule {
                keywords: rule.keywords.iter().map(|kw| kw.to_lowercase()).collect(),
                ..rule
            })
            .collect();
        Self::new(rules, ResponseKind::default())
    }

    pub fn rules(&self) -> &[IntentRule] {
        &self.rules
    }

    pub fn fallback(&self) -> ResponseKind {
        self.fallback
    }

    pub fn evaluate<'a>(&'a self, text: &str) -> RuleMatch<'a> {
        let lower = text.to_lowercase();
        self.rules
            .iter()
            .find_map(|rule| {
                rule.matched_keyword(&lower).map(|keyword| RuleMatch {
                    intent: rule.intent,
                    keyword: Some(keyword),
                })
            })
            .unwrap_or(RuleMatch {
                intent: self.fallback,
                keyword: None,
            })
    }
}

pub fn default_rules() -> &'static RuleSet {
    &EN_RULES
}
