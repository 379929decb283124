use std::net::SocketAddr;

use clap::Parser;
use miette::{IntoDiagnostic, Result, WrapErr};
use supportchat::{Config, Responder};
use tracing_subscriber::EnvFilter;

mod error;
mod routes;

#[derive(Parser, Debug)]
#[command(author, version, about = "Customer support chat responder")]
struct Args {
    #[arg(long, env = "SUPPORT_CHAT_ADDR", default_value = "0.0.0.0:3000")]
    addr: SocketAddr,
    #[arg(long, env = "RUST_LOG", default_value = "info,tower_http=debug")]
    log: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_new(&args.log)
                .into_diagnostic()
                .wrap_err("Invalid log filter")?,
        )
        .init();

    let responder = Responder::from_config(&Config::from_env())?;
    let app = routes::app(responder);

    tracing::info!(addr = %args.addr, "listening");
    axum::Server::bind(&args.addr)
        .serve(app.into_make_service())
        .await
        .into_diagnostic()
        .wrap_err("Server error")?;

    Ok(())
}
