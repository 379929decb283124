use miette::Diagnostic;
use thiserror::Error;

/// The only failure `Responder::respond` reports to its caller.
#[derive(Error, Diagnostic, Debug, Clone, PartialEq, Eq)]
pub enum InvalidRequest {
    #[error("{}", shared::MISSING_PROMPT)]
    #[diagnostic(code(supportchat::missing_prompt))]
    MissingPrompt,
}

#[derive(Error, Diagnostic, Debug)]
pub enum ProviderError {
    #[error("completion request failed")]
    #[diagnostic(code(supportchat::provider::transport))]
    Transport(#[source] reqwest::Error),
    #[error("completion request returned {status}: {body}")]
    #[diagnostic(code(supportchat::provider::status))]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("could not decode completion response")]
    #[diagnostic(code(supportchat::provider::decode))]
    Decode(#[source] reqwest::Error),
    #[error("completion response had no text")]
    #[diagnostic(code(supportchat::provider::empty))]
    EmptyCompletion,
}

#[derive(Error, Diagnostic, Debug)]
pub enum KnowledgeBaseError {
    #[error("knowledge base request failed")]
    #[diagnostic(code(supportchat::knowledge::http))]
    Http(#[from] reqwest::Error),
    #[error("knowledge base query failed")]
    #[diagnostic(code(supportchat::knowledge::sqlite))]
    Sqlite(#[from] rusqlite::Error),
}
