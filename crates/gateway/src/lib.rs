mod openai;
mod scripted;

use std::time::Instant;

use thiserror::Error;
use tourgid_core::{parse_intent_reply, Intent, IntentResult};
use tracing::{info, warn};

pub use openai::{OpenAiClient, OpenAiConfig, DEFAULT_BASE_URL, DEFAULT_MODEL};
pub use scripted::ScriptedClient;

pub const TEMPERATURE: f32 = 0.7;
pub const MAX_TOKENS: u32 = 500;

const UNSTRUCTURED_CONFIDENCE: f32 = 0.8;
const UNSTRUCTURED_NOTE: &str = "AI сгенерировал ответ, но не в JSON формате";
const UNAVAILABLE_CONFIDENCE: f32 = 0.5;
const UNAVAILABLE_TEXT: &str = "Извините, у меня проблемы с подключением к AI. Попробуйте позже.";
const UNAVAILABLE_NOTE: &str = "OpenAI API недоступен";

#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("completion request failed: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("completion API returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("completion API returned no text")]
    EmptyReply,
    #[error("completion API unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub system_prompt: String,
    pub user_text: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

pub trait CompletionClient: Send + Sync {
    fn name(&self) -> &'static str;
    async fn complete(&self, request: &CompletionRequest) -> Result<String, GatewayError>;
}

#[derive(Debug, Clone)]
pub enum CompletionBackend {
    OpenAi(OpenAiClient),
    Scripted(ScriptedClient),
}

impl CompletionClient for CompletionBackend {
    fn name(&self) -> &'static str {
        match self {
            CompletionBackend::OpenAi(client) => client.name(),
            CompletionBackend::Scripted(client) => client.name(),
        }
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<String, GatewayError> {
        match self {
            CompletionBackend::OpenAi(client) => client.complete(request).await,
            CompletionBackend::Scripted(client) => client.complete(request).await,
        }
    }
}

#[derive(Debug)]
pub enum CompletionOutcome {
    Structured(IntentResult),
    Unstructured(String),
    Unavailable(GatewayError),
}

impl CompletionOutcome {
    pub fn from_reply(reply: Result<String, GatewayError>) -> Self {
        match reply {
            Ok(text) => match parse_intent_reply(&text) {
                Some(parsed) => Self::Structured(parsed),
                None => Self::Unstructured(text),
            },
            Err(error) => Self::Unavailable(error),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Structured(_) => "structured",
            Self::Unstructured(_) => "unstructured",
            Self::Unavailable(_) => "unavailable",
        }
    }

    pub fn is_fallback(&self) -> bool {
        !matches!(self, Self::Structured(_))
    }

    pub fn into_intent(self) -> IntentResult {
        match self {
            Self::Structured(result) => result,
            Self::Unstructured(text) => IntentResult {
                intent: Intent::General,
                confidence: UNSTRUCTURED_CONFIDENCE,
                destination: None,
                response_text: text,
                reasoning: vec![UNSTRUCTURED_NOTE.to_string()],
            },
            Self::Unavailable(_) => IntentResult {
                intent: Intent::General,
                confidence: UNAVAILABLE_CONFIDENCE,
                destination: None,
                response_text: UNAVAILABLE_TEXT.to_string(),
                reasoning: vec![UNAVAILABLE_NOTE.to_string()],
            },
        }
    }
}

pub fn build_system_prompt(context: &str) -> String {
    format!(
        "Ты - туристический гид по Казахстану. Отвечай на русском языке.\n\
         Контекст: {context}\n\n\
         Проанализируй запрос пользователя и верни JSON с полями:\n\
         - intent: намерение (get_route, find_attraction, get_info, general)\n\
         - confidence: уверенность (0.0-1.0)\n\
         - destination: название места назначения (если есть)\n\
         - response_text: естественный ответ на русском языке\n\
         - reasoning: объяснение почему такой ответ"
    )
}

#[derive(Debug, Clone)]
pub struct LanguageModelGateway<C> {
    client: C,
}

impl<C> LanguageModelGateway<C>
where
    C: CompletionClient,
{
    pub fn new(client: C) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// Never fails: transport errors and free-text replies are folded into a
    /// `general` intent.
    pub async fn interpret(&self, query: &str, context: &str) -> IntentResult {
        self.interpret_outcome(query, context).await.into_intent()
    }

    pub async fn interpret_outcome(&self, query: &str, context: &str) -> CompletionOutcome {
        let request = CompletionRequest {
            system_prompt: build_system_prompt(context),
            user_text: query.to_string(),
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
        };

        let started = Instant::now();
        let outcome = CompletionOutcome::from_reply(self.client.complete(&request).await);
        let elapsed_ms = started.elapsed().as_millis() as u64;

        match &outcome {
            CompletionOutcome::Unavailable(error) => warn!(
                client = self.client.name(),
                elapsed_ms,
                error = %error,
                "completion failed, using fallback reply"
            ),
            other => info!(
                client = self.client.name(),
                elapsed_ms,
                outcome = other.label(),
                "completion received"
            ),
        }

        outcome
    }
}
