use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::KnowledgeBaseError;

pub use self::sqlite::SqliteKnowledgeBase;
pub use self::supabase::SupabaseKnowledgeBase;

mod schema;
mod sqlite;
mod supabase;

/// Upper bound on how many articles one fallback lookup reads.
pub const ARTICLE_LIMIT: usize = 100;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Article {
    pub question: String,
    pub answer: String,
    #[serde(default)]
    pub category: Option<String>,
}

/// Read-only source of active FAQ articles.
#[async_trait]
pub trait KnowledgeBase: Send + Sync {
    async fn active_articles(&self, limit: usize) -> Result<Vec<Article>, KnowledgeBaseError>;
}
