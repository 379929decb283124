//! Grounding instruction and message assembly for the completion request.

use indoc::formatdoc;
use shared::HistoryEntry;

use crate::openai::completion::Message;

/// Sampling temperature sent with every completion request.
pub const TEMPERATURE: f32 = 0.3;

pub fn system_instruction(session_id: Option<&str>) -> String {
    let session_id = session_id.unwrap_or("unknown");

    formatdoc!(
        "
        You are an expert customer support assistant for an electric scooter company.
        - Be concise and helpful.
        - Answer in plain language; use bullet points when useful.
        - If the user asks about orders, warranties, battery, charging, or troubleshooting, give step-by-step guidance and safety notes.
        - If you are unsure, say you'll escalate to a human agent and ask for needed details.
        - Never make up order details or invent personal data.
        Session ID: {session_id}."
    )
}

/// System instruction, then prior turns in order, then the new prompt.
pub fn conversation(
    session_id: Option<&str>,
    history: &[HistoryEntry],
    prompt: &str,
) -> Vec<Message> {
    let mut messages = Vec::with_capacity(history.len() + 2);
    messages.push(Message::system(system_instruction(session_id)));
    messages.extend(history.iter().cloned().map(Message::from));
    messages.push(Message::user(prompt));
    messages
}
