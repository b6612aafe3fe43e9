//! Flat-text transcript codec.
//!
//! A transcript is the wire form of a message log: one `"<sender>: <text>"`
//! header line per message, where any embedded newlines in the text continue
//! on the following lines until the next header. [`encode`] and [`decode`]
//! are pure functions; all I/O lives in the backend client.
//!
//! The format is ambiguous by contract: a text line that itself begins with
//! `"user: "` or `"bot: "` cannot be told apart from a genuine message
//! boundary, so [`decode`] is a lossy, best-effort reconstruction rather
//! than a verified round trip. The backend owns the format; no escaping
//! rule is applied on top of it.

use super::types::{Message, Sender};

const USER_PREFIX: &str = "user: ";
const BOT_PREFIX: &str = "bot: ";

/// Serialize a message log to the flat-text transcript form.
///
/// Each message becomes `"<sender>: <text>"` with embedded newlines kept
/// verbatim; messages are joined with a single newline. Deterministic and
/// total.
pub fn encode(messages: &[Message]) -> String {
    messages
        .iter()
        .map(|m| format!("{}: {}", m.sender.as_str(), m.text))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Parse a transcript back into messages.
///
/// A line starting with the exact prefix `"user: "` or `"bot: "` opens a new
/// message seeded with the remainder of the line; any other line is appended
/// (trimmed) to the currently open message, or discarded when no message is
/// open. Closing a message trims its accumulated text. Ids and timestamps
/// are synthesized since the wire format carries neither.
pub fn decode(transcript: &str) -> Vec<Message> {
    let mut messages = Vec::new();
    let mut open: Option<(Sender, String)> = None;

    for line in transcript.split('\n') {
        if let Some(rest) = line.strip_prefix(USER_PREFIX) {
            close(&mut open, &mut messages);
            open = Some((Sender::User, rest.to_string()));
        } else if let Some(rest) = line.strip_prefix(BOT_PREFIX) {
            close(&mut open, &mut messages);
            open = Some((Sender::Bot, rest.to_string()));
        } else if let Some((_, text)) = open.as_mut() {
            text.push('\n');
            text.push_str(line.trim());
        }
        // Continuation with no open message: discarded.
    }

    close(&mut open, &mut messages);
    messages
}

fn close(open: &mut Option<(Sender, String)>, messages: &mut Vec<Message>) {
    if let Some((sender, text)) = open.take() {
        messages.push(Message::new(sender, text.trim()));
    }
}
