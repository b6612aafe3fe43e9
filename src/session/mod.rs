//! Session state — message types, the flat-text transcript codec, the
//! in-memory message log, and the session index.

pub mod log;
pub mod store;
pub mod transcript;
pub mod types;

pub use log::MessageLog;
pub use store::SessionStore;
pub use types::{AttachmentRef, ChatSession, Message, Sender};
