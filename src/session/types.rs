//! Session types — message senders, messages, attachment references, and
//! session index entries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Who produced a message.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Bot,
}

impl Sender {
    /// Wire spelling used by the transcript format.
    pub fn as_str(self) -> &'static str {
        match self {
            Sender::User => "user",
            Sender::Bot => "bot",
        }
    }
}

/// Metadata for a file already handed to the upload endpoint.
///
/// The engine never holds the file bytes, only this reference.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AttachmentRef {
    pub name: String,
    pub size: u64,
    pub content_type: String,
}

/// One entry in a session's message log.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Message {
    /// Unique within a session, monotonic by creation order.
    pub id: String,
    pub sender: Sender,
    /// May contain embedded newlines.
    pub text: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub attachments: Vec<AttachmentRef>,
}

impl Message {
    /// A fresh message with a synthesized id and the current instant.
    pub fn new(sender: Sender, text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            sender,
            text: text.into(),
            timestamp: Utc::now(),
            attachments: Vec::new(),
        }
    }

    /// A user turn carrying resolved attachment references.
    pub fn user(text: impl Into<String>, attachments: Vec<AttachmentRef>) -> Self {
        Self {
            attachments,
            ..Self::new(Sender::User, text)
        }
    }

    /// An assistant turn.
    pub fn bot(text: impl Into<String>) -> Self {
        Self::new(Sender::Bot, text)
    }
}

/// A backend-persisted container for one conversation's transcript.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ChatSession {
    /// Opaque identifier assigned by the backend.
    pub id: String,
    /// Display string; currently defaulted to the identifier.
    pub title: String,
    /// Advisory only.
    pub last_activity: DateTime<Utc>,
}

impl ChatSession {
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            title: id.clone(),
            id,
            last_activity: Utc::now(),
        }
    }

    /// Map a stored-file name from the listing endpoint into a session,
    /// stripping the `.json` extension the backend appends.
    pub fn from_stored_file(file: &str) -> Self {
        Self::new(file.strip_suffix(".json").unwrap_or(file))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sender_serialization() {
        assert_eq!(serde_json::to_string(&Sender::User).unwrap(), "\"user\"");
        assert_eq!(serde_json::to_string(&Sender::Bot).unwrap(), "\"bot\"");
    }

    #[test]
    fn messages_get_unique_ids() {
        let a = Message::bot("hi");
        let b = Message::bot("hi");
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn user_message_carries_attachments() {
        let msg = Message::user(
            "see attached",
            vec![AttachmentRef {
                name: "report.pdf".into(),
                size: 1024,
                content_type: "application/pdf".into(),
            }],
        );
        assert_eq!(msg.sender, Sender::User);
        assert_eq!(msg.attachments.len(), 1);
        assert_eq!(msg.attachments[0].name, "report.pdf");
    }

    #[test]
    fn session_from_stored_file_strips_extension() {
        let session = ChatSession::from_stored_file("abc.json");
        assert_eq!(session.id, "abc");
        assert_eq!(session.title, "abc");

        // No extension: used verbatim.
        let session = ChatSession::from_stored_file("abc");
        assert_eq!(session.id, "abc");
    }
}
