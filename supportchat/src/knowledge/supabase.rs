use async_trait::async_trait;
use miette::{Context, IntoDiagnostic, Result};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};

use super::{Article, KnowledgeBase};
use crate::error::KnowledgeBaseError;
use crate::APP_USER_AGENT;

/// Hosted knowledge base read through the Supabase REST (PostgREST) API.
#[derive(Debug, Clone)]
pub struct SupabaseKnowledgeBase {
    http: reqwest::Client,
    table_url: String,
}

impl SupabaseKnowledgeBase {
    pub fn new(url: &str, api_key: &str) -> Result<Self> {
        let mut headers = HeaderMap::new();

        let mut apikey = HeaderValue::from_str(api_key)
            .into_diagnostic()
            .wrap_err("Could not create apikey header value")?;
        apikey.set_sensitive(true);
        headers.insert("apikey", apikey);

        let mut bearer = HeaderValue::from_str(&format!("Bearer {api_key}"))
            .into_diagnostic()
            .wrap_err("Could not create header value")?;
        bearer.set_sensitive(true);
        headers.insert(AUTHORIZATION, bearer);

        let http = reqwest::Client::builder()
            .user_agent(APP_USER_AGENT)
            .default_headers(headers)
            .build()
            .into_diagnostic()
            .wrap_err("Could not build reqwest client")?;

        Ok(Self {
            http,
            table_url: format!(
                "{}/rest/v1/predefined_questions",
                url.trim_end_matches('/')
            ),
        })
    }
}

#[async_trait]
impl KnowledgeBase for SupabaseKnowledgeBase {
    async fn active_articles(&self, limit: usize) -> Result<Vec<Article>, KnowledgeBaseError> {
        let limit = limit.to_string();

        let articles = self
            .http
            .get(&self.table_url)
            .query(&[
                ("select", "question,answer,category"),
                ("is_active", "eq.true"),
                ("order", "created_at.asc"),
                ("limit", limit.as_str()),
            ])
            .send()
            .await?
            .error_for_status()?
            .json::<Vec<Article>>()
            .await?;

        Ok(articles)
    }
}
