use serde::{Deserialize, Serialize};
use shared::{HistoryEntry, Role};

use super::Client;
use crate::error::ProviderError;
use crate::prompt::TEMPERATURE;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

impl From<HistoryEntry> for Message {
    fn from(entry: HistoryEntry) -> Self {
        Self {
            role: entry.role,
            content: entry.content,
        }
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    model: String,
    messages: Vec<Message>,
    temperature: f32,
}

impl CompletionRequest {
    pub fn new(model: &str, messages: Vec<Message>) -> Self {
        Self {
            model: model.to_owned(),
            messages,
            temperature: TEMPERATURE,
        }
    }
}

#[derive(Deserialize, Debug, Clone)]
pub(crate) struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize, Debug, Clone)]
pub(crate) struct CompletionChoice {
    #[serde(default)]
    message: Option<ChoiceMessage>,
}

#[derive(Deserialize, Debug, Clone)]
pub(crate) struct CompletionUsage {
    total_tokens: i64,
}

#[derive(Deserialize, Debug, Clone)]
pub(crate) struct CompletionResponse {
    #[serde(default)]
    choices: Vec<CompletionChoice>,
    #[serde(default)]
    usage: Option<CompletionUsage>,
}

impl CompletionResponse {
    /// Text of the first choice, if it has any non-blank content.
    pub(crate) fn first_text(&self) -> Option<&str> {
        self.choices
            .first()?
            .message
            .as_ref()?
            .content
            .as_deref()
            .filter(|text| !text.trim().is_empty())
    }
}

impl Client {
    pub(crate) async fn completion(
        &self,
        request: CompletionRequest,
    ) -> Result<CompletionResponse, ProviderError> {
        let started = std::time::Instant::now();

        let response = self
            .http
            .post(format!("{}/chat/completions", self.base_url))
            .json(&request)
            .send()
            .await
            .map_err(ProviderError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Status { status, body });
        }

        let response_body: CompletionResponse =
            response.json().await.map_err(ProviderError::Decode)?;

        tracing::debug!(
            model = %self.model,
            elapsed = ?started.elapsed(),
            total_tokens = response_body.usage.as_ref().map(|u| u.total_tokens),
            "completion finished"
        );

        Ok(response_body)
    }
}

#[cfg(test)]
mod tests {
    use std::net::{SocketAddr, TcpListener};

    use axum::{http::StatusCode, routing::post, Json, Router};
    use serde_json::{json, Value};

    use super::*;
    use crate::openai::{CompletionProvider, OpenAiConfig};

    fn serve(app: Router) -> SocketAddr {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let server = axum::Server::from_tcp(listener)
            .unwrap()
            .serve(app.into_make_service());
        tokio::spawn(server);
        addr
    }

    fn client_for(addr: SocketAddr) -> Client {
        let mut config = OpenAiConfig::new("sk-test");
        config.base_url = format!("http://{addr}/v1/");
        config.client().unwrap()
    }

    #[test]
    fn request_carries_model_and_temperature() {
        let request = CompletionRequest::new("gpt-4o-mini", vec![Message::user("hello")]);
        let body = serde_json::to_value(&request).unwrap();

        assert_eq!(body["model"], "gpt-4o-mini");
        assert_eq!(body["messages"][0], json!({ "role": "user", "content": "hello" }));
        assert!((body["temperature"].as_f64().unwrap() - 0.3).abs() < 1e-6);
    }

    #[test]
    fn first_text_skips_blank_content() {
        let empty: CompletionResponse = serde_json::from_value(json!({ "choices": [] })).unwrap();
        assert_eq!(empty.first_text(), None);

        let blank: CompletionResponse = serde_json::from_value(json!({
            "choices": [{ "message": { "role": "assistant", "content": "  " } }]
        }))
        .unwrap();
        assert_eq!(blank.first_text(), None);

        let null: CompletionResponse = serde_json::from_value(json!({
            "choices": [{ "message": { "role": "assistant", "content": null } }]
        }))
        .unwrap();
        assert_eq!(null.first_text(), None);
    }

    #[tokio::test]
    async fn complete_returns_first_choice() {
        let app = Router::new().route(
            "/v1/chat/completions",
            post(|Json(body): Json<Value>| async move {
                assert_eq!(body["messages"][0]["role"], "system");
                Json(json!({
                    "id": "chatcmpl-1",
                    "object": "chat.completion",
                    "choices": [
                        { "index": 0, "message": { "role": "assistant", "content": "Charge it overnight." } },
                        { "index": 1, "message": { "role": "assistant", "content": "ignored" } }
                    ],
                    "usage": { "prompt_tokens": 10, "completion_tokens": 4, "total_tokens": 14 }
                }))
            }),
        );
        let client = client_for(serve(app));

        let text = client
            .complete(vec![Message::system("be nice"), Message::user("battery?")])
            .await
            .unwrap();

        assert_eq!(text, "Charge it overnight.");
    }

    #[tokio::test]
    async fn non_success_status_is_an_error() {
        let app = Router::new().route(
            "/v1/chat/completions",
            post(|| async { (StatusCode::TOO_MANY_REQUESTS, "slow down") }),
        );
        let client = client_for(serve(app));

        let err = client.complete(vec![Message::user("hi")]).await.unwrap_err();

        match err {
            ProviderError::Status { status, body } => {
                assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
                assert_eq!(body, "slow down");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn malformed_body_is_a_decode_error() {
        let app = Router::new().route("/v1/chat/completions", post(|| async { "not json" }));
        let client = client_for(serve(app));

        let err = client.complete(vec![Message::user("hi")]).await.unwrap_err();

        assert!(matches!(err, ProviderError::Decode(_)));
    }

    #[tokio::test]
    async fn empty_choices_is_empty_completion() {
        let app = Router::new().route(
            "/v1/chat/completions",
            post(|| async { Json(json!({ "choices": [] })) }),
        );
        let client = client_for(serve(app));

        let err = client.complete(vec![Message::user("hi")]).await.unwrap_err();

        assert!(matches!(err, ProviderError::EmptyCompletion));
    }
}
