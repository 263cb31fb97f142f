//! Interaction sequencing: Idle → QuestionsShown → AnswersSubmitted.

use std::sync::Arc;

use serde::Serialize;
use tracing::{error, info};

use crate::completion::{ChatCompletionClient, CompletionProvider};
use crate::config::Settings;
use crate::error::SwotError;
use crate::interview::DomainShifter;
use crate::strategy::StrategySynthesizer;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Stage {
    Idle,
    QuestionsShown,
    AnswersSubmitted,
}

/// A user action that moves the session forward.
#[derive(Debug, Clone)]
pub enum Action {
    CreateQuestions { domain: String },
    SubmitAnswers { answers: String },
}

/// The two model-backed steps, sharing one provider.
pub struct Workflow {
    shifter: DomainShifter,
    synthesizer: StrategySynthesizer,
}

impl Workflow {
    pub fn new(shifter: DomainShifter, synthesizer: StrategySynthesizer) -> Self {
        Self {
            shifter,
            synthesizer,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        let provider: Arc<dyn CompletionProvider> =
            Arc::new(ChatCompletionClient::from_settings(settings));
        Self::with_provider(provider, settings)
    }

    pub fn with_provider(provider: Arc<dyn CompletionProvider>, settings: &Settings) -> Self {
        Self::new(
            DomainShifter::new(provider.clone(), settings.shift.clone()),
            StrategySynthesizer::new(provider, settings.strategy.clone()),
        )
    }
}

/// State of one interactive session. Lives only as long as the process.
#[derive(Debug, Clone, Default)]
pub struct Session {
    /// Domain the current questions were shifted to.
    pub domain: String,
    /// Domain last typed into Create Questions, kept even if the request failed.
    pub domain_input: String,
    pub shifted_questions: Option<String>,
    pub answers: Option<String>,
    pub report: Option<String>,
    /// Message of the last failed action, cleared when the next action starts.
    pub error: Option<String>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stage(&self) -> Stage {
        match (&self.shifted_questions, &self.answers) {
            (None, _) => Stage::Idle,
            (Some(_), None) => Stage::QuestionsShown,
            (Some(_), Some(_)) => Stage::AnswersSubmitted,
        }
    }

    /// The answer box is only offered once questions exist.
    pub fn accepts_answers(&self) -> bool {
        self.stage() != Stage::Idle
    }

    /// Run one action to completion and update the session.
    ///
    /// On failure the error is also recorded in `self.error` for display.
    pub async fn apply(&mut self, action: Action, workflow: &Workflow) -> Result<Stage, SwotError> {
        self.error = None;
        let result = match action {
            Action::CreateQuestions { domain } => self.create_questions(domain, workflow).await,
            Action::SubmitAnswers { answers } => self.submit_answers(answers, workflow).await,
        };

        match result {
            Ok(()) => {
                let stage = self.stage();
                info!(?stage, "Session advanced");
                Ok(stage)
            }
            Err(e) => {
                error!("Session action failed: {}", e);
                self.error = Some(e.to_string());
                Err(e)
            }
        }
    }

    async fn create_questions(&mut self, domain: String, workflow: &Workflow) -> Result<(), SwotError> {
        self.domain_input = domain.clone();
        // Keep the previous questions if the new request fails.
        let questions = workflow.shifter.shift(&domain).await?;
        self.domain = domain;
        self.shifted_questions = Some(questions);
        self.answers = None;
        self.report = None;
        Ok(())
    }

    async fn submit_answers(&mut self, answers: String, workflow: &Workflow) -> Result<(), SwotError> {
        if !self.accepts_answers() {
            return Err(SwotError::QuestionsNotCreated);
        }
        self.report = None;
        let outcome = workflow
            .synthesizer
            .synthesize(&self.domain, &answers, self.shifted_questions.as_deref())
            .await;
        self.answers = Some(answers);
        self.report = Some(outcome?);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::completion::CompletionRequest;
    use crate::config::CompletionOptions;
    use crate::error::ProviderError;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Replies from a script and remembers the prompts it was sent.
    struct ScriptedProvider {
        replies: Mutex<Vec<Result<String, ProviderError>>>,
        prompts: Mutex<Vec<String>>,
    }

    impl ScriptedProvider {
        fn new(replies: Vec<Result<String, ProviderError>>) -> Arc<Self> {
            Arc::new(Self {
                replies: Mutex::new(replies),
                prompts: Mutex::new(Vec::new()),
            })
        }

        fn calls(&self) -> usize {
            self.prompts.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl CompletionProvider for ScriptedProvider {
        async fn complete(&self, request: &CompletionRequest) -> Result<String, ProviderError> {
            self.prompts.lock().unwrap().push(request.prompt.clone());
            self.replies.lock().unwrap().remove(0)
        }
    }

    fn workflow(provider: Arc<ScriptedProvider>) -> Workflow {
        Workflow::new(
            DomainShifter::new(provider.clone(), CompletionOptions::domain_shift()),
            StrategySynthesizer::new(provider, CompletionOptions::strategy()),
        )
    }

    #[tokio::test]
    async fn test_full_sequence() {
        let provider = ScriptedProvider::new(vec![
            Ok("1. **Strengths**\n- What breads sell best?".to_string()),
            Ok("### Report".to_string()),
        ]);
        let workflow = workflow(provider.clone());
        let mut session = Session::new();
        assert_eq!(session.stage(), Stage::Idle);
        assert!(!session.accepts_answers());

        let stage = session
            .apply(Action::CreateQuestions { domain: "bakery".into() }, &workflow)
            .await
            .unwrap();
        assert_eq!(stage, Stage::QuestionsShown);
        assert!(session.accepts_answers());
        assert_eq!(session.domain, "bakery");
        assert_eq!(session.domain_input, "bakery");

        let stage = session
            .apply(Action::SubmitAnswers { answers: "We offer free samples.".into() }, &workflow)
            .await
            .unwrap();
        assert_eq!(stage, Stage::AnswersSubmitted);
        assert_eq!(session.report.as_deref(), Some("### Report"));

        let prompts = provider.prompts.lock().unwrap();
        assert!(prompts[1].contains("We offer free samples."));
        assert!(prompts[1].contains("What breads sell best?"));
    }

    #[tokio::test]
    async fn test_answers_rejected_while_idle() {
        let provider = ScriptedProvider::new(vec![]);
        let workflow = workflow(provider.clone());
        let mut session = Session::new();

        let err = session
            .apply(Action::SubmitAnswers { answers: "early".into() }, &workflow)
            .await
            .unwrap_err();
        assert!(matches!(err, SwotError::QuestionsNotCreated));
        assert_eq!(session.stage(), Stage::Idle);
        assert!(session.error.is_some());
        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test]
    async fn test_failed_synthesis_clears_stale_report() {
        let provider = ScriptedProvider::new(vec![
            Ok("questions".to_string()),
            Ok("first report".to_string()),
            Err(ProviderError::RateLimited),
        ]);
        let workflow = workflow(provider);
        let mut session = Session::new();
        session
            .apply(Action::CreateQuestions { domain: "bakery".into() }, &workflow)
            .await
            .unwrap();
        session
            .apply(Action::SubmitAnswers { answers: "one".into() }, &workflow)
            .await
            .unwrap();

        let result = session
            .apply(Action::SubmitAnswers { answers: "two".into() }, &workflow)
            .await;
        assert!(result.is_err());
        assert!(session.report.is_none());
        assert_eq!(session.answers.as_deref(), Some("two"));
        assert_eq!(
            session.error.as_deref(),
            Some("the provider rate limit was exceeded")
        );
        assert_eq!(session.stage(), Stage::AnswersSubmitted);
    }

    #[tokio::test]
    async fn test_failed_shift_keeps_previous_questions() {
        let provider = ScriptedProvider::new(vec![
            Ok("bakery questions".to_string()),
            Err(ProviderError::Unauthorized),
        ]);
        let workflow = workflow(provider);
        let mut session = Session::new();
        session
            .apply(Action::CreateQuestions { domain: "bakery".into() }, &workflow)
            .await
            .unwrap();
        assert!(session
            .apply(Action::CreateQuestions { domain: "florist".into() }, &workflow)
            .await
            .is_err());

        assert_eq!(session.domain, "bakery");
        assert_eq!(session.domain_input, "florist");
        assert_eq!(session.shifted_questions.as_deref(), Some("bakery questions"));
        assert_eq!(session.stage(), Stage::QuestionsShown);
        assert!(session.error.is_some());
    }

    #[tokio::test]
    async fn test_new_questions_reset_answers_but_not_to_idle() {
        let provider = ScriptedProvider::new(vec![
            Ok("q1".to_string()),
            Ok("report".to_string()),
            Ok("q2".to_string()),
        ]);
        let workflow = workflow(provider);
        let mut session = Session::new();
        session
            .apply(Action::CreateQuestions { domain: "a".into() }, &workflow)
            .await
            .unwrap();
        session
            .apply(Action::SubmitAnswers { answers: "x".into() }, &workflow)
            .await
            .unwrap();
        let stage = session
            .apply(Action::CreateQuestions { domain: "b".into() }, &workflow)
            .await
            .unwrap();

        assert_eq!(stage, Stage::QuestionsShown);
        assert_eq!(session.shifted_questions.as_deref(), Some("q2"));
        assert!(session.answers.is_none());
        assert!(session.report.is_none());
    }

    #[tokio::test]
    async fn test_error_cleared_by_next_action() {
        let provider = ScriptedProvider::new(vec![
            Err(ProviderError::EmptyCompletion),
            Ok("questions".to_string()),
        ]);
        let workflow = workflow(provider);
        let mut session = Session::new();
        assert!(session
            .apply(Action::CreateQuestions { domain: "".into() }, &workflow)
            .await
            .is_err());
        assert_eq!(session.stage(), Stage::Idle);

        session
            .apply(Action::CreateQuestions { domain: "".into() }, &workflow)
            .await
            .unwrap();
        assert!(session.error.is_none());
    }
}
