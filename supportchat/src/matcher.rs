//! Keyword-overlap FAQ lookup used when generation is unavailable.

use std::collections::HashSet;
use std::sync::Arc;

use indoc::formatdoc;

use crate::knowledge::{Article, KnowledgeBase, ARTICLE_LIMIT};

pub const UNREACHABLE_MESSAGE: &str = "I'm having trouble reaching our knowledge base right now. \
Could you share a bit more detail about your question, such as your order number or scooter model? \
That way a support agent can pick it up quickly.";

pub const NO_ARTICLE_MESSAGE: &str = "I couldn't find a relevant article in our help center for that question. \
Would you like me to escalate this to a human support agent?";

/// Lower-cased tokens longer than two characters, with duplicates collapsed.
pub fn tokenize(text: &str) -> HashSet<String> {
    let normalized: String = text
        .to_lowercase()
        .chars()
        .map(|c| {
            if c.is_ascii_lowercase() || c.is_ascii_digit() || c.is_whitespace() {
                c
            } else {
                ' '
            }
        })
        .collect();

    normalized
        .split_whitespace()
        .filter(|token| token.len() > 2)
        .map(str::to_owned)
        .collect()
}

/// Share of `query` tokens that also appear in `candidate`.
///
/// Normalized by the query side only, so `score(a, b)` and `score(b, a)` differ.
pub fn score(query: &str, candidate: &str) -> f64 {
    let query = tokenize(query);
    let candidate = tokenize(candidate);

    let shared = query.intersection(&candidate).count();
    shared as f64 / query.len().max(1) as f64
}

/// Highest scoring article against either its question or its answer.
/// Ties keep the earlier article.
pub fn best_match<'a>(text: &str, articles: &'a [Article]) -> Option<&'a Article> {
    let mut best: Option<(&Article, f64)> = None;

    for article in articles {
        let s = score(text, &article.question).max(score(text, &article.answer));
        match best {
            Some((_, best_score)) if s <= best_score => {}
            _ => best = Some((article, s)),
        }
    }

    best.map(|(article, _)| article)
}

pub fn format_article(article: &Article) -> String {
    let category = article
        .category
        .as_deref()
        .filter(|c| !c.trim().is_empty())
        .map(|c| format!("Category: {c}\n"))
        .unwrap_or_default();

    formatdoc!(
        "
        Here's what I found in our help center that may help:

        {category}Q: {question}
        A: {answer}",
        question = article.question.trim(),
        answer = article.answer.trim(),
    )
}

#[derive(Clone, Default)]
pub struct FallbackMatcher {
    knowledge_base: Option<Arc<dyn KnowledgeBase>>,
}

impl FallbackMatcher {
    pub fn new(knowledge_base: Option<Arc<dyn KnowledgeBase>>) -> Self {
        Self { knowledge_base }
    }

    /// Always produces a user-facing answer; lookup failures become fixed messages.
    pub async fn answer(&self, text: &str) -> String {
        let Some(knowledge_base) = &self.knowledge_base else {
            tracing::info!("no knowledge base configured");
            return UNREACHABLE_MESSAGE.to_owned();
        };

        let articles = match knowledge_base.active_articles(ARTICLE_LIMIT).await {
            Ok(articles) => articles,
            Err(e) => {
                tracing::warn!(error = ?e, "knowledge base query failed");
                return NO_ARTICLE_MESSAGE.to_owned();
            }
        };

        match best_match(text, &articles) {
            Some(article) => {
                tracing::debug!(question = %article.question, "fallback matched article");
                format_article(article)
            }
            None => NO_ARTICLE_MESSAGE.to_owned(),
        }
    }
}
