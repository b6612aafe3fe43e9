#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::doc_markdown,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::new_without_default,
    clippy::return_self_not_must_use,
    clippy::uninlined_format_args
)]

//! Chat session and transcript synchronization engine.
//!
//! Everything the assistant chat UI needs to talk to the backend: named
//! session lifecycle, the append-only in-memory message log, the flat-text
//! transcript codec, and the request/response turn cycle. Rendering, auth,
//! routing, and capture stay outside; this crate exposes state snapshots
//! and operations and nothing visual.

pub mod api;
pub mod assistants;
pub mod config;
pub mod error;
pub mod session;
pub mod sync;

pub use config::Config;
pub use error::{ApiError, SyncError};
pub use sync::{SyncController, TURN_FAILURE_NOTICE};
