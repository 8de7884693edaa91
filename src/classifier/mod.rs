//! Keyword classification of study requests.
//!
//! `classify` walks the ordered rule table in `lang/en/intent_rules.json`
//! and returns the first label whose keywords occur in the text.
//! `extract_topic` derives the display topic used by generic templates.

pub mod rules;
pub mod topic;

pub use rules::{default_rules, IntentRule, RuleMatch, RuleSet};
pub use topic::{default_topic_extractor, extract_topic, TopicExtractor};

use tracing::debug;

use crate::model::ResponseKind;

pub fn classify(text: &str) -> ResponseKind {
    let hit = default_rules().evaluate(text);
    debug!(intent = %hit.intent, keyword = ?hit.keyword, "request classified");
    hit.intent
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_is_checked_before_quiz() {
        assert_eq!(classify("show my quiz progress"), ResponseKind::Progress);
        assert_eq!(classify("track my quiz progress"), ResponseKind::Progress);
    }

    #[test]
    fn unmatched_text_defaults_to_notes() {
        assert_eq!(classify("zzz qqq"), ResponseKind::Notes);
        assert_eq!(classify("Explain recursion"), ResponseKind::Notes);
        assert_eq!(classify(""), ResponseKind::Notes);
    }

    #[test]
    fn each_label_is_reachable() {
        let cases = [
            ("How am I doing this week?", ResponseKind::Progress),
            ("Create flashcards for JavaScript closures", ResponseKind::Flashcards),
            ("Summarize Python basics", ResponseKind::Summary),
            ("Show learning resources", ResponseKind::Resources),
            ("Quiz me on React", ResponseKind::Quiz),
            ("Implement binary search", ResponseKind::Code),
            ("What is a monad", ResponseKind::Notes),
        ];
        for (text, expected) in cases {
            assert_eq!(classify(text), expected, "{text}");
        }
    }

    #[test]
    fn precedence_follows_table_order() {
        // flashcards before summary
        assert_eq!(classify("flashcards with key points"), ResponseKind::Flashcards);
        // summary before resources
        assert_eq!(classify("overview of the documentation"), ResponseKind::Summary);
        // resources before quiz
        assert_eq!(classify("video tutorial with a test"), ResponseKind::Resources);
        // quiz before code
        assert_eq!(classify("test my code"), ResponseKind::Quiz);
    }

    #[test]
    fn classify_agrees_with_the_matched_rule() {
        for text in ["Where can I learn Go?", "Quiz me on React", "zzz qqq"] {
            let hit = default_rules().evaluate(text);
            assert_eq!(classify(text), hit.intent, "{text}");
            assert_eq!(hit.keyword.is_some(), hit.intent != ResponseKind::Notes, "{text}");
        }
    }

    #[test]
    fn matching_is_case_insensitive() {
        assert_eq!(classify("QUIZ ME"), ResponseKind::Quiz);
        assert_eq!(classify("Write A Code Snippet"), ResponseKind::Code);
    }
}
