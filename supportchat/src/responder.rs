use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use miette::Result;
use shared::HistoryEntry;

use crate::config::Config;
use crate::error::{InvalidRequest, ProviderError};
use crate::matcher::FallbackMatcher;
use crate::openai::CompletionProvider;
use crate::prompt;

pub const APOLOGY_MESSAGE: &str = "Sorry, something went wrong while preparing a response. \
Please try again in a moment, or I can escalate this to a human support agent.";

/// One customer utterance plus its conversation context.
#[derive(Debug, Clone, Default)]
pub struct ChatTurn {
    pub prompt: String,
    pub session_id: Option<String>,
    pub history: Vec<HistoryEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedAnswer {
    pub text: String,
}

/// Answers a chat turn with the completion provider, falling back to the
/// knowledge base when generation is unavailable.
#[derive(Clone)]
pub struct Responder {
    provider: Option<Arc<dyn CompletionProvider>>,
    matcher: FallbackMatcher,
}

impl Responder {
    pub fn new(provider: Option<Arc<dyn CompletionProvider>>, matcher: FallbackMatcher) -> Self {
        Self { provider, matcher }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let provider = match &config.openai {
            Some(openai) => {
                let client = openai.client()?;
                tracing::info!(model = %client.model(), "completion provider configured");
                Some(Arc::new(client) as Arc<dyn CompletionProvider>)
            }
            None => {
                tracing::info!("no completion provider configured, using knowledge base only");
                None
            }
        };

        let knowledge_base = config.knowledge_base.as_ref().and_then(|kb| kb.connect());

        Ok(Self::new(provider, FallbackMatcher::new(knowledge_base)))
    }

    /// Only a missing prompt is an error. Every other failure degrades to
    /// some answer text.
    pub async fn respond(&self, turn: ChatTurn) -> Result<GeneratedAnswer, InvalidRequest> {
        if turn.prompt.is_empty() {
            return Err(InvalidRequest::MissingPrompt);
        }

        let session_id = turn.session_id.clone();
        let text = match AssertUnwindSafe(self.answer(turn)).catch_unwind().await {
            Ok(text) => text,
            Err(_) => {
                tracing::error!(session_id = ?session_id, "responder panicked");
                APOLOGY_MESSAGE.to_owned()
            }
        };

        Ok(GeneratedAnswer { text })
    }

    async fn answer(&self, turn: ChatTurn) -> String {
        match self.generate(&turn).await {
            Ok(text) => text,
            Err(reason) => {
                tracing::info!(session_id = ?turn.session_id, %reason, "using knowledge base fallback");
                self.matcher.answer(&turn.prompt).await
            }
        }
    }

    async fn generate(&self, turn: &ChatTurn) -> Result<String, GenerationSkipped> {
        let provider = self
            .provider
            .as_ref()
            .ok_or(GenerationSkipped::Unconfigured)?;

        let messages = prompt::conversation(turn.session_id.as_deref(), &turn.history, &turn.prompt);

        provider.complete(messages).await.map_err(|e| {
            tracing::warn!(session_id = ?turn.session_id, error = ?e, "completion failed");
            GenerationSkipped::Failed(e)
        })
    }
}

#[derive(Debug, thiserror::Error)]
enum GenerationSkipped {
    #[error("no completion provider configured")]
    Unconfigured,
    #[error("completion failed: {0}")]
    Failed(ProviderError),
}
