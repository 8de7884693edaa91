use once_cell::sync::Lazy;
use serde::Deserialize;

#[derive(Deserialize)]
struct PromptFile {
    system: String,
}

macro_rules! prompt_file {
    ($lang:literal) => {
        include_str!(concat!(
            env!("CARGO_MANIFEST_DIR"),
            "/lang/",
            $lang,
            "/prompts.json"
        ))
    };
}

static EN_PROMPTS: Lazy<PromptFile> = Lazy::new(|| {
    serde_json::from_str(prompt_file!("en")).expect("invalid prompt config")
});

/// Instruction sent ahead of the user message when a model delegate is
/// configured. Lists the seven JSON shapes and the rule for picking one.
pub fn system_prompt() -> &'static str {
    &EN_PROMPTS.system
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ResponseKind;

    #[test]
    fn system_prompt_names_every_response_type() {
        let prompt = system_prompt();
        for kind in ResponseKind::ALL {
            assert!(
                prompt.contains(&format!("\"type\": \"{kind}\"")),
                "prompt is missing the {kind} shape"
            );
        }
    }

    #[test]
    fn system_prompt_asks_for_json_only() {
        assert!(system_prompt().contains("ALWAYS return valid JSON and nothing else"));
        assert!(system_prompt().contains("default to \"notes\""));
    }
}
