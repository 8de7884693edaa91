use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;

#[derive(Deserialize)]
struct TopicFillerFile {
    placeholder: String,
    min_length: usize,
    fillers: Vec<String>,
}

static EN_TOPIC_EXTRACTOR: Lazy<TopicExtractor> = Lazy::new(|| {
    let raw = include_str!(concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/lang/en/topic_fillers.json"
    ));
    let parsed: TopicFillerFile = serde_json::from_str(raw).expect("invalid topic filler config");
    TopicExtractor::new(&parsed.fillers, parsed.placeholder, parsed.min_length)
        .expect("topic filler table produced an invalid pattern")
});

/// Turns a free-text request into a display label by dropping instruction
/// phrases ("explain", "tell me about", articles, ...) and title-casing what
/// remains.
#[derive(Debug, Clone)]
pub struct TopicExtractor {
    fillers: Option<Regex>,
    placeholder: String,
    min_length: usize,
}

impl TopicExtractor {
    pub fn new<S: AsRef<str>>(
        fillers: &[S],
        placeholder: impl Into<String>,
        min_length: usize,
    ) -> Result<Self, regex::Error> {
        let mut phrases: Vec<String> = fillers
            .iter()
            .map(|f| f.as_ref().trim().to_lowercase())
            .filter(|f| !f.is_empty())
            .collect();
        // longest phrase first so "what is" is not shadowed by a shorter prefix
        phrases.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
        phrases.dedup();

        let fillers = if phrases.is_empty() {
            None
        } else {
            let alternation = phrases
                .iter()
                .map(|p| regex::escape(p))
                .collect::<Vec<_>>()
                .join("|");
            Some(Regex::new(&format!(r"(?i)\b(?:{alternation})\b"))?)
        };

        Ok(Self {
            fillers,
            placeholder: placeholder.into(),
            min_length,
        })
    }

    pub fn placeholder(&self) -> &str {
        &self.placeholder
    }

    pub fn extract(&self, text: &str) -> String {
        let residual = self.strip_fillers(text);
        if residual.chars().count() < self.min_length {
            return self.placeholder.clone();
        }

        residual
            .split(' ')
            .map(capitalize)
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Removes filler phrases until none are left. A removal can bring two
    /// filler words together ("what the is" -> "what is"), so one pass is
    /// not enough for a stable result.
    fn strip_fillers(&self, text: &str) -> String {
        let mut current = collapse_whitespace(text);
        let Some(fillers) = &self.fillers else {
            return current;
        };
        loop {
            let next = collapse_whitespace(&fillers.replace_all(&current, ""));
            if next == current {
                return current;
            }
            current = next;
        }
    }
}

pub fn default_topic_extractor() -> &'static TopicExtractor {
    &EN_TOPIC_EXTRACTOR
}

pub fn extract_topic(text: &str) -> String {
    default_topic_extractor().extract(text)
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_instruction_phrases_and_title_cases() {
        assert_eq!(extract_topic("explain recursion"), "Recursion");
        assert_eq!(extract_topic("what is the event loop"), "Event Loop");
        assert_eq!(
            extract_topic("Tell me about   rust  ownership please"),
            "Rust Ownership"
        );
        assert_eq!(extract_topic("zzz qqq"), "Zzz Qqq");
    }

    #[test]
    fn removes_whole_words_only() {
        assert_eq!(extract_topic("theory of an anagram"), "Theory Of Anagram");
        assert_eq!(extract_topic("describe thermal analysis"), "Thermal Analysis");
    }

    #[test]
    fn short_residual_falls_back_to_placeholder() {
        assert_eq!(extract_topic("explain"), "Programming Concepts");
        assert_eq!(extract_topic("can you explain the a"), "Programming Concepts");
        assert_eq!(extract_topic("explain go"), "Programming Concepts");
        assert_eq!(extract_topic(""), "Programming Concepts");
    }

    #[test]
    fn reapplication_is_stable() {
        let inputs = [
            "explain recursion",
            "zzz qqq",
            "what the is",
            "summary of the borrow checker",
            "how do closures capture an environment",
            "a an the",
            "give me   tail   call optimisation",
            "ZZZ QQQ",
            "Explain TCP Handshakes",
            "What Is The Event LOOP",
        ];
        for input in inputs {
            // requests are lower-cased before extraction
            let once = extract_topic(&input.to_lowercase());
            let twice = extract_topic(&once.to_lowercase());
            let thrice = extract_topic(&twice.to_lowercase());
            assert_eq!(once, twice, "input {input:?}");
            assert_eq!(twice, thrice, "input {input:?}");
        }
    }

    #[test]
    fn fillers_exposed_by_a_removal_are_removed_too() {
        assert_eq!(extract_topic("what the is"), "Programming Concepts");
    }

    #[test]
    fn custom_table_without_fillers_only_title_cases() {
        let none: [&str; 0] = [];
        let extractor = TopicExtractor::new(&none, "Misc", 1).unwrap();
        assert_eq!(extractor.extract("the  borrow checker"), "The Borrow Checker");
        assert_eq!(extractor.placeholder(), "Misc");
    }
}
