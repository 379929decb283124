//! Capability configuration for the responder.
//!
//! Every setting is optional. An absent credential never fails, it selects the
//! degraded path instead.

use std::path::PathBuf;
use std::sync::Arc;

use crate::knowledge::{KnowledgeBase, SqliteKnowledgeBase, SupabaseKnowledgeBase};
use crate::openai::OpenAiConfig;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    pub openai: Option<OpenAiConfig>,
    pub knowledge_base: Option<KnowledgeBaseConfig>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KnowledgeBaseConfig {
    Supabase { url: String, api_key: String },
    Sqlite { path: PathBuf },
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup. Empty values count as missing.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let openai = get("OPENAI_API_KEY").map(|api_key| {
            let mut config = OpenAiConfig::new(api_key);
            if let Some(model) = get("OPENAI_MODEL") {
                config.model = model;
            }
            if let Some(base_url) = get("OPENAI_BASE_URL") {
                config.base_url = base_url;
            }
            config
        });

        let supabase = get("SUPABASE_URL").and_then(|url| {
            get("SUPABASE_SERVICE_ROLE_KEY")
                .or_else(|| get("SUPABASE_ANON_KEY"))
                .map(|api_key| KnowledgeBaseConfig::Supabase { url, api_key })
        });
        let knowledge_base = supabase.or_else(|| {
            get("KNOWLEDGE_DB_PATH").map(|path| KnowledgeBaseConfig::Sqlite { path: path.into() })
        });

        Self {
            openai,
            knowledge_base,
        }
    }
}

impl KnowledgeBaseConfig {
    /// Opens the configured store. Failure is logged and reads as "not configured".
    pub fn connect(&self) -> Option<Arc<dyn KnowledgeBase>> {
        let connected: miette::Result<Arc<dyn KnowledgeBase>> = match self {
            KnowledgeBaseConfig::Supabase { url, api_key } => {
                SupabaseKnowledgeBase::new(url, api_key).map(|kb| Arc::new(kb) as Arc<dyn KnowledgeBase>)
            }
            KnowledgeBaseConfig::Sqlite { path } => {
                SqliteKnowledgeBase::open(path).map(|kb| Arc::new(kb) as Arc<dyn KnowledgeBase>)
            }
        };

        match connected {
            Ok(kb) => Some(kb),
            Err(e) => {
                tracing::warn!(error = ?e, "knowledge base unavailable");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(pairs: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn nothing_set_means_nothing_configured() {
        assert_eq!(config_from(&[]), Config::default());
    }

    #[test]
    fn openai_defaults_and_overrides() {
        let config = config_from(&[("OPENAI_API_KEY", "sk-1")]);
        let openai = config.openai.unwrap();
        assert_eq!(openai.model, "gpt-4o-mini");
        assert_eq!(openai.base_url, "https://api.openai.com/v1");

        let config = config_from(&[
            ("OPENAI_API_KEY", "sk-1"),
            ("OPENAI_MODEL", "gpt-4o"),
            ("OPENAI_BASE_URL", "http://localhost:8080/v1"),
        ]);
        let openai = config.openai.unwrap();
        assert_eq!(openai.model, "gpt-4o");
        assert_eq!(openai.base_url, "http://localhost:8080/v1");
    }

    #[test]
    fn empty_key_is_treated_as_absent() {
        assert!(config_from(&[("OPENAI_API_KEY", "  ")]).openai.is_none());
    }

    #[test]
    fn supabase_needs_url_and_key() {
        let config = config_from(&[("SUPABASE_URL", "https://x.supabase.co")]);
        assert!(config.knowledge_base.is_none());

        let config = config_from(&[
            ("SUPABASE_URL", "https://x.supabase.co"),
            ("SUPABASE_ANON_KEY", "anon"),
        ]);
        assert_eq!(
            config.knowledge_base,
            Some(KnowledgeBaseConfig::Supabase {
                url: "https://x.supabase.co".to_owned(),
                api_key: "anon".to_owned(),
            })
        );
    }

    #[test]
    fn service_role_key_wins_and_supabase_beats_sqlite() {
        let config = config_from(&[
            ("SUPABASE_URL", "https://x.supabase.co"),
            ("SUPABASE_ANON_KEY", "anon"),
            ("SUPABASE_SERVICE_ROLE_KEY", "service"),
            ("KNOWLEDGE_DB_PATH", "faq.db"),
        ]);
        assert!(matches!(
            config.knowledge_base,
            Some(KnowledgeBaseConfig::Supabase { ref api_key, .. }) if api_key == "service"
        ));
    }

    #[test]
    fn sqlite_path_selects_local_store() {
        let config = config_from(&[("KNOWLEDGE_DB_PATH", "faq.db")]);
        assert_eq!(
            config.knowledge_base,
            Some(KnowledgeBaseConfig::Sqlite {
                path: PathBuf::from("faq.db")
            })
        );
    }
}
