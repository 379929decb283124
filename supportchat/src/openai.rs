use async_trait::async_trait;
use miette::{Context, IntoDiagnostic, Result};
use reqwest::header::{HeaderValue, AUTHORIZATION};

use crate::error::ProviderError;
use crate::APP_USER_AGENT;

use self::completion::{CompletionRequest, Message};

pub(crate) mod completion;

pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Something that can turn a conversation into one completion text.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    async fn complete(&self, messages: Vec<Message>) -> Result<String, ProviderError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenAiConfig {
    pub api_key: String,
    pub model: String,
    pub base_url: String,
}

#[derive(Debug, Clone)]
pub struct Client {
    http: reqwest::Client,
    model: String,
    base_url: String,
}

impl OpenAiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_owned(),
            base_url: DEFAULT_BASE_URL.to_owned(),
        }
    }

    pub fn client(&self) -> Result<Client> {
        let mut headers = reqwest::header::HeaderMap::new();

        let value = format!("Bearer {}", self.api_key);
        let mut value = HeaderValue::from_str(&value)
            .into_diagnostic()
            .wrap_err("Could not create header value")?;
        value.set_sensitive(true);

        headers.insert(AUTHORIZATION, value);

        let http = reqwest::Client::builder()
            .user_agent(APP_USER_AGENT)
            .default_headers(headers)
            .build()
            .into_diagnostic()
            .wrap_err("Could not build reqwest client")?;

        Ok(Client {
            http,
            model: self.model.clone(),
            base_url: self.base_url.trim_end_matches('/').to_owned(),
        })
    }
}

impl Client {
    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl CompletionProvider for Client {
    async fn complete(&self, messages: Vec<Message>) -> Result<String, ProviderError> {
        let request = CompletionRequest::new(&self.model, messages);
        let response = self.completion(request).await?;

        response
            .first_text()
            .map(str::to_owned)
            .ok_or(ProviderError::EmptyCompletion)
    }
}
