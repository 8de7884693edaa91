use std::sync::Arc;
use std::time::Duration;

use tokio::time::timeout;
use tracing::{info, warn};

use crate::config::AppConfig;
use crate::delegate::{parse_model_output, DelegateError, ModelDelegate, OpenAiDelegate};
use crate::model::StructuredResponse;
use crate::prompts::system_prompt;
use crate::synthesis::respond_locally;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseSource {
    Delegate,
    Local,
}

impl ResponseSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResponseSource::Delegate => "delegate",
            ResponseSource::Local => "local",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Answer {
    pub response: StructuredResponse,
    pub source: ResponseSource,
}

/// Answers one study request: the model delegate first, when configured,
/// and the local classifier plus synthesizer whenever the delegate fails.
#[derive(Clone)]
pub struct StudyAssistant {
    delegate: Option<Arc<dyn ModelDelegate>>,
    system_prompt: String,
    delegate_timeout: Duration,
}

impl StudyAssistant {
    /// An assistant that never calls out and always synthesizes locally.
    pub fn local() -> Self {
        Self {
            delegate: None,
            system_prompt: system_prompt().to_string(),
            delegate_timeout: Duration::ZERO,
        }
    }

    pub fn with_delegate(delegate: Arc<dyn ModelDelegate>, delegate_timeout: Duration) -> Self {
        Self {
            delegate: Some(delegate),
            system_prompt: system_prompt().to_string(),
            delegate_timeout,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        match &config.delegate {
            Some(delegate) => Self::with_delegate(
                Arc::new(OpenAiDelegate::new(delegate.clone())),
                config.delegate_timeout,
            ),
            None => Self::local(),
        }
    }

    pub fn has_delegate(&self) -> bool {
        self.delegate.is_some()
    }

    /// Never fails. Dropping the returned future abandons the delegate call
    /// without running the local path.
    pub async fn respond(&self, message: &str) -> Answer {
        if let Some(delegate) = &self.delegate {
            match self.ask_delegate(delegate.as_ref(), message).await {
                Ok(response) => {
                    info!(
                        source = "delegate",
                        intent = %response.kind(),
                        items = response.item_count(),
                        "study card ready"
                    );
                    return Answer {
                        response,
                        source: ResponseSource::Delegate,
                    };
                }
                Err(err) => {
                    warn!(delegate = delegate.name(), error = %err, "delegate failed, answering locally");
                }
            }
        }

        let response = self.fallback_response(message);
        info!(
            source = "local",
            intent = %response.kind(),
            items = response.item_count(),
            "study card ready"
        );
        Answer {
            response,
            source: ResponseSource::Local,
        }
    }

    pub fn fallback_response(&self, message: &str) -> StructuredResponse {
        respond_locally(message)
    }

    async fn ask_delegate(
        &self,
        delegate: &dyn ModelDelegate,
        message: &str,
    ) -> Result<StructuredResponse, DelegateError> {
        let raw = timeout(
            self.delegate_timeout,
            delegate.complete(&self.system_prompt, message),
        )
        .await
        .map_err(|_| DelegateError::Timeout(self.delegate_timeout))??;
        parse_model_output(&raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ResponseKind;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    enum Behaviour {
        Fail,
        Reply(&'static str),
        Hang,
    }

    struct ScriptedDelegate {
        behaviour: Behaviour,
        calls: AtomicUsize,
    }

    impl ScriptedDelegate {
        fn new(behaviour: Behaviour) -> Arc<Self> {
            Arc::new(Self {
                behaviour,
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl ModelDelegate for ScriptedDelegate {
        fn name(&self) -> &str {
            "scripted"
        }

        async fn complete(&self, system: &str, _message: &str) -> Result<String, DelegateError> {
            assert!(system.contains("study assistant"));
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.behaviour {
                Behaviour::Fail => Err(DelegateError::EmptyCompletion),
                Behaviour::Reply(text) => Ok(text.to_string()),
                Behaviour::Hang => {
                    tokio::time::sleep(Duration::from_secs(30)).await;
                    Ok(String::new())
                }
            }
        }
    }

    fn assistant(delegate: Arc<ScriptedDelegate>, wait: Duration) -> StudyAssistant {
        StudyAssistant::with_delegate(delegate, wait)
    }

    const MESSAGES: &[&str] = &[
        "Explain recursion",
        "Quiz me on React",
        "Create flashcards for JavaScript closures",
        "zzz qqq",
        "show my quiz progress",
    ];

    #[tokio::test]
    async fn delegate_failure_matches_local_path() {
        let delegate = ScriptedDelegate::new(Behaviour::Fail);
        let assistant = assistant(delegate.clone(), Duration::from_secs(1));
        for message in MESSAGES {
            let answer = assistant.respond(message).await;
            assert_eq!(answer.source, ResponseSource::Local);
            assert_eq!(answer.response, StudyAssistant::local().fallback_response(message));
        }
        assert_eq!(delegate.calls.load(Ordering::SeqCst), MESSAGES.len());
    }

    #[tokio::test]
    async fn valid_delegate_output_is_used() {
        let delegate = ScriptedDelegate::new(Behaviour::Reply(
            "```json\n{\"type\":\"notes\",\"title\":\"Closures\",\"content\":\"Functions that capture.\"}\n```",
        ));
        let answer = assistant(delegate, Duration::from_secs(1))
            .respond("Quiz me on React")
            .await;
        assert_eq!(answer.source, ResponseSource::Delegate);
        assert_eq!(answer.response.kind(), ResponseKind::Notes);
        assert_eq!(answer.response.title(), "Closures");
    }

    #[tokio::test]
    async fn invalid_delegate_output_falls_back() {
        let delegate = ScriptedDelegate::new(Behaviour::Reply(
            r#"{"type":"quiz","title":"Q","content":[{"question":"?","options":["a","b","c","d"],"answer":9}]}"#,
        ));
        let answer = assistant(delegate, Duration::from_secs(1))
            .respond("Quiz me on React")
            .await;
        assert_eq!(answer.source, ResponseSource::Local);
        assert_eq!(answer.response.title(), "React Knowledge Quiz");
    }

    #[tokio::test]
    async fn slow_delegate_times_out_into_fallback() {
        let delegate = ScriptedDelegate::new(Behaviour::Hang);
        let answer = assistant(delegate, Duration::from_millis(20))
            .respond("Explain recursion")
            .await;
        assert_eq!(answer.source, ResponseSource::Local);
        assert_eq!(answer.response.title(), "Understanding Recursion");
    }

    #[tokio::test]
    async fn abandoned_request_emits_nothing() {
        let delegate = ScriptedDelegate::new(Behaviour::Hang);
        let assistant = assistant(delegate.clone(), Duration::from_secs(30));
        let outcome = timeout(Duration::from_millis(20), assistant.respond("Explain recursion")).await;
        assert!(outcome.is_err());
        assert_eq!(delegate.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn local_assistant_skips_the_delegate() {
        let assistant = StudyAssistant::local();
        assert!(!assistant.has_delegate());
        let answer = assistant.respond("zzz qqq").await;
        assert_eq!(answer.source, ResponseSource::Local);
        assert_eq!(answer.response.title(), "Understanding Zzz Qqq");
    }
}
