//! In-memory message log for the active session.
//!
//! Append-only while a session is active; replaced wholesale (never merged)
//! when a different session is loaded.

use super::types::Message;

#[derive(Debug, Default)]
pub struct MessageLog {
    messages: Vec<Message>,
}

impl MessageLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one message. Messages are never individually edited or removed.
    pub fn append(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// Replace the whole log with a freshly decoded sequence.
    pub fn replace(&mut self, messages: Vec<Message>) {
        self.messages = messages;
    }

    /// Drop every message (session deleted or a new session started).
    pub fn clear(&mut self) {
        self.messages.clear();
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_preserves_order() {
        let mut log = MessageLog::new();
        log.append(Message::user("one", vec![]));
        log.append(Message::bot("two"));
        log.append(Message::user("three", vec![]));

        let texts: Vec<&str> = log.messages().iter().map(|m| m.text.as_str()).collect();
        assert_eq!(texts, vec!["one", "two", "three"]);
    }

    #[test]
    fn replace_is_wholesale() {
        let mut log = MessageLog::new();
        log.append(Message::user("old", vec![]));

        log.replace(vec![Message::bot("new")]);
        assert_eq!(log.len(), 1);
        assert_eq!(log.messages()[0].text, "new");
    }

    #[test]
    fn clear_empties_the_log() {
        let mut log = MessageLog::new();
        log.append(Message::user("x", vec![]));
        log.clear();
        assert!(log.is_empty());
    }
}
