use std::path::PathBuf;

use clap::{Parser, Subcommand};
use miette::Result;
use supportchat::{Article, ChatTurn, Config, Responder, SqliteKnowledgeBase};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Ask the support responder from a terminal")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Answer one prompt using the environment's configuration
    Ask {
        prompt: String,
        #[arg(long)]
        session_id: Option<String>,
    },
    /// Add an article to a local SQLite knowledge base
    AddArticle {
        #[arg(long, env = "KNOWLEDGE_DB_PATH")]
        db: PathBuf,
        #[arg(long)]
        question: String,
        #[arg(long)]
        answer: String,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        inactive: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    match Cli::parse().command {
        Command::Ask { prompt, session_id } => {
            let responder = Responder::from_config(&Config::from_env())?;
            let turn = ChatTurn {
                prompt,
                session_id,
                history: Vec::new(),
            };

            let answer = responder.respond(turn).await?;
            println!("{}", answer.text);
        }
        Command::AddArticle {
            db,
            question,
            answer,
            category,
            inactive,
        } => {
            let kb = SqliteKnowledgeBase::open(&db)?;
            kb.insert(
                &Article {
                    question,
                    answer,
                    category,
                },
                !inactive,
            )?;
            println!("Added article to {}", db.display());
        }
    }

    Ok(())
}
