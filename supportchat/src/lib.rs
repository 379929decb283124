pub use shared::{HistoryEntry, Role};

pub use crate::config::{Config, KnowledgeBaseConfig};
pub use crate::error::{InvalidRequest, KnowledgeBaseError, ProviderError};
pub use crate::knowledge::{
    Article, KnowledgeBase, SqliteKnowledgeBase, SupabaseKnowledgeBase, ARTICLE_LIMIT,
};
pub use crate::matcher::FallbackMatcher;
pub use crate::openai::completion::{CompletionRequest, Message};
pub use crate::openai::{Client as OpenAiClient, CompletionProvider, OpenAiConfig};
pub use crate::responder::{ChatTurn, GeneratedAnswer, Responder};

pub mod config;
mod error;
pub mod knowledge;
pub mod matcher;
mod openai;
pub mod prompt;
mod responder;

static APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);
