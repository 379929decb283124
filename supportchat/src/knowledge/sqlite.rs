use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use miette::{IntoDiagnostic, Result, WrapErr};
use rusqlite::{params, Connection, Row};

use super::{schema, Article, KnowledgeBase};
use crate::error::KnowledgeBaseError;

/// Local knowledge base kept in a SQLite file.
#[derive(Clone)]
pub struct SqliteKnowledgeBase(Arc<Mutex<Connection>>);

impl SqliteKnowledgeBase {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let conn = Connection::open(path)
            .into_diagnostic()
            .wrap_err_with(|| format!("Could not open knowledge base at {}", path.display()))?;

        Self::from_connection(conn)
    }

    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().into_diagnostic()?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        schema::setup_schema_v0(&conn)
            .into_diagnostic()
            .wrap_err("Could not set up knowledge base schema")?;

        Ok(Self(Arc::new(Mutex::new(conn))))
    }

    pub fn insert(&self, article: &Article, is_active: bool) -> Result<(), KnowledgeBaseError> {
        let conn = self.0.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        conn.execute(
            "INSERT INTO predefined_questions (question, answer, category, is_active) VALUES (?, ?, ?, ?)",
            params![article.question, article.answer, article.category, is_active],
        )?;
        Ok(())
    }

    fn select_active(&self, limit: usize) -> Result<Vec<Article>, KnowledgeBaseError> {
        let conn = self.0.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        let mut st = conn.prepare(
            "SELECT question, answer, category FROM predefined_questions
             WHERE is_active = 1
             ORDER BY rowid
             LIMIT ?1",
        )?;

        let articles = st
            .query_map(params![limit as i64], |row: &Row| {
                Ok(Article {
                    question: row.get(0)?,
                    answer: row.get(1)?,
                    category: row.get(2)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(articles)
    }
}

#[async_trait]
impl KnowledgeBase for SqliteKnowledgeBase {
    async fn active_articles(&self, limit: usize) -> Result<Vec<Article>, KnowledgeBaseError> {
        self.select_active(limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article(question: &str, category: Option<&str>) -> Article {
        Article {
            question: question.to_owned(),
            answer: format!("Answer to {question}"),
            category: category.map(str::to_owned),
        }
    }

    #[tokio::test]
    async fn only_active_articles_are_returned_in_insert_order() {
        let kb = SqliteKnowledgeBase::in_memory().unwrap();
        kb.insert(&article("How do I charge?", Some("Battery")), true)
            .unwrap();
        kb.insert(&article("Old shipping policy", None), false).unwrap();
        kb.insert(&article("Where is my order?", None), true).unwrap();

        let articles = kb.active_articles(100).await.unwrap();

        assert_eq!(
            articles,
            vec![
                article("How do I charge?", Some("Battery")),
                article("Where is my order?", None),
            ]
        );
    }

    #[tokio::test]
    async fn limit_bounds_the_snapshot() {
        let kb = SqliteKnowledgeBase::in_memory().unwrap();
        for i in 0..5 {
            kb.insert(&article(&format!("Question {i}"), None), true)
                .unwrap();
        }

        let articles = kb.active_articles(3).await.unwrap();

        assert_eq!(articles.len(), 3);
        assert_eq!(articles[0].question, "Question 0");
    }

    #[tokio::test]
    async fn empty_table_yields_no_articles() {
        let kb = SqliteKnowledgeBase::in_memory().unwrap();

        assert!(kb.active_articles(100).await.unwrap().is_empty());
    }
}
