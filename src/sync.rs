//! Protocol orchestration for one assistant context.
//!
//! The controller owns the session index and the active message log, and
//! drives every backend exchange: session create / list / load / delete and
//! the send-turn cycle. Operations are serialized through a single async
//! gate so overlapping send / select / delete calls cannot interleave, and
//! a generation counter guards the fire-and-forget context persist against
//! applying after the active session has moved on.

use crate::api::BackendClient;
use crate::error::SyncError;
use crate::session::{
    transcript, AttachmentRef, ChatSession, Message, MessageLog, SessionStore,
};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, warn};

/// Synthetic bot reply recorded in the log when a turn exchange fails.
/// Part of the wire-visible UX contract, not a free-form string.
pub const TURN_FAILURE_NOTICE: &str = "Sorry, there was an error processing your request.";

#[derive(Default)]
struct EngineState {
    store: SessionStore,
    log: MessageLog,
}

/// Session and transcript synchronization engine for one assistant context.
///
/// Cheap snapshot accessors (`messages`, `sessions`, `active_session`) serve
/// the presentation layer; the async operations mutate state only after the
/// relevant backend call settles, except for the deliberately optimistic
/// user-message append inside [`send_turn`](Self::send_turn).
pub struct SyncController {
    assistant_title: String,
    client: Arc<BackendClient>,
    state: Arc<parking_lot::Mutex<EngineState>>,
    /// Single-flight gate: one operation per context at a time, FIFO.
    gate: tokio::sync::Mutex<()>,
    /// Bumped on every active-session change; stale persist tasks compare
    /// against their captured value and drop themselves.
    generation: Arc<AtomicU64>,
}

impl SyncController {
    pub fn new(client: BackendClient, assistant_title: impl Into<String>) -> Self {
        Self {
            assistant_title: assistant_title.into(),
            client: Arc::new(client),
            state: Arc::new(parking_lot::Mutex::new(EngineState::default())),
            gate: tokio::sync::Mutex::new(()),
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn assistant_title(&self) -> &str {
        &self.assistant_title
    }

    // ── Snapshots for the presentation layer ─────────────────────

    pub fn messages(&self) -> Vec<Message> {
        self.state.lock().log.messages().to_vec()
    }

    pub fn sessions(&self) -> Vec<ChatSession> {
        self.state.lock().store.sessions().to_vec()
    }

    pub fn active_session(&self) -> Option<String> {
        self.state.lock().store.active().map(str::to_string)
    }

    // ── Operations ───────────────────────────────────────────────

    /// Re-request the backend's session enumeration and replace the index.
    ///
    /// On failure the in-memory list is left unchanged; the caller is
    /// expected to present what it has and surface the error.
    pub async fn refresh_sessions(&self) -> Result<Vec<ChatSession>, SyncError> {
        let _gate = self.gate.lock().await;
        self.reconcile_listing().await.map_err(SyncError::SessionListFailed)
    }

    /// Send one user turn and append the resulting assistant turn.
    ///
    /// Creates a session first when none is active (aborting wholesale if
    /// that fails). The user message is appended optimistically before the
    /// exchange; a failed exchange appends [`TURN_FAILURE_NOTICE`] as a
    /// permanent bot message and reports [`SyncError::TurnExchangeFailed`],
    /// so the log grows by exactly two messages either way. On success the
    /// updated context is persisted asynchronously; persist failures are
    /// diagnostics-only and never touch the log.
    pub async fn send_turn(
        &self,
        text: &str,
        attachments: Vec<AttachmentRef>,
        model: Option<&str>,
    ) -> Result<Message, SyncError> {
        let _gate = self.gate.lock().await;

        // Step 1: make sure a session exists before anything is appended.
        if self.state.lock().store.active().is_none() {
            let created = self
                .client
                .create_history(&self.assistant_title)
                .await
                .map_err(SyncError::SessionCreateFailed)?;
            {
                let mut st = self.state.lock();
                st.store.upsert(ChatSession::new(created.id.clone()));
                st.store.set_active(&created.id);
            }
            self.generation.fetch_add(1, Ordering::SeqCst);
            debug!(session = %created.id, "created session for first turn");

            // Reconcile the listing; the turn proceeds even if this fails.
            if let Err(e) = self.reconcile_listing().await {
                warn!(error = %e, "session listing refresh failed after create");
            }
        }

        // Step 2: optimistic user append, ahead of the exchange call.
        {
            let mut st = self.state.lock();
            st.log.append(Message::user(text, attachments));
        }

        // Step 3: the outgoing context is the entire log, just-appended
        // user message included.
        let context = {
            let st = self.state.lock();
            transcript::encode(st.log.messages())
        };

        // Step 4: exchange.
        match self.client.chat(&context, model).await {
            Ok(reply) => {
                let bot = Message::bot(reply.clone());
                self.state.lock().log.append(bot.clone());

                // Step 5: persist the stored transcript, fire and forget.
                let session_id = self
                    .active_session()
                    .unwrap_or_default();
                self.spawn_persist(session_id, format!("{context}\nbot: {reply}"));
                Ok(bot)
            }
            Err(e) => {
                warn!(error = %e, "turn exchange failed, recording failure notice");
                self.state.lock().log.append(Message::bot(TURN_FAILURE_NOTICE));
                Err(SyncError::TurnExchangeFailed(e))
            }
        }
    }

    /// Switch to a stored session and replace the log with its transcript.
    ///
    /// The active pointer moves before the fetch (the UI follows the
    /// selection immediately). On fetch failure the previous log stays
    /// visible and the pointer is reverted, and the error is reported.
    pub async fn load_session(&self, id: &str) -> Result<(), SyncError> {
        let _gate = self.gate.lock().await;

        let previous = {
            let mut st = self.state.lock();
            let previous = st.store.active().map(str::to_string);
            st.store.set_active(id);
            previous
        };
        self.generation.fetch_add(1, Ordering::SeqCst);

        match self.client.fetch_history(&self.assistant_title, id).await {
            Ok(context) => {
                let messages = transcript::decode(&context);
                self.state.lock().log.replace(messages);
                Ok(())
            }
            Err(e) => {
                {
                    let mut st = self.state.lock();
                    match previous.as_deref() {
                        Some(prev) => st.store.set_active(prev),
                        None => st.store.clear_active(),
                    }
                }
                self.generation.fetch_add(1, Ordering::SeqCst);
                warn!(session = id, error = %e, "session load failed, pointer reverted");
                Err(SyncError::SessionLoadFailed(e))
            }
        }
    }

    /// Create a fresh session unconditionally, clear the log, and make the
    /// new session active.
    pub async fn new_session(&self) -> Result<ChatSession, SyncError> {
        let _gate = self.gate.lock().await;

        let created = self
            .client
            .create_history(&self.assistant_title)
            .await
            .map_err(SyncError::SessionCreateFailed)?;

        let session = ChatSession::new(created.id);
        {
            let mut st = self.state.lock();
            st.log.clear();
            st.store.upsert(session.clone());
            st.store.set_active(&session.id);
        }
        self.generation.fetch_add(1, Ordering::SeqCst);

        if let Err(e) = self.reconcile_listing().await {
            warn!(error = %e, "session listing refresh failed after new session");
        }
        Ok(session)
    }

    /// Delete a stored session. No optimistic removal: the in-memory list
    /// only changes after the backend confirms. Deleting the active session
    /// clears the log and the active pointer.
    pub async fn delete_session(&self, id: &str) -> Result<(), SyncError> {
        let _gate = self.gate.lock().await;

        self.client
            .delete_history(&self.assistant_title, id)
            .await
            .map_err(SyncError::SessionDeleteFailed)?;

        let was_active = {
            let mut st = self.state.lock();
            st.store.remove(id);
            let was_active = st.store.active() == Some(id);
            if was_active {
                st.log.clear();
                st.store.clear_active();
            }
            was_active
        };
        if was_active {
            self.generation.fetch_add(1, Ordering::SeqCst);
        }
        Ok(())
    }

    /// Upload one file and return the reference to record on a message.
    ///
    /// The bytes are owned by the caller until handed over here; the engine
    /// keeps only the returned metadata.
    pub async fn upload_attachment(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<AttachmentRef, SyncError> {
        let size = bytes.len() as u64;
        self.client
            .upload(&self.assistant_title, file_name, bytes, content_type)
            .await
            .map_err(SyncError::UploadFailed)?;
        Ok(AttachmentRef {
            name: file_name.to_string(),
            size,
            content_type: content_type.to_string(),
        })
    }

    // ── Internal helpers ─────────────────────────────────────────

    /// Fetch the backend's listing and replace the session index with it.
    async fn reconcile_listing(&self) -> Result<Vec<ChatSession>, crate::error::ApiError> {
        let files = self.client.list_histories().await?;
        let sessions: Vec<ChatSession> = files
            .iter()
            .map(|f| ChatSession::from_stored_file(f))
            .collect();
        self.state.lock().store.replace_all(sessions.clone());
        Ok(sessions)
    }

    /// Persist the updated context without blocking the turn. The task
    /// drops itself when the active session changed since it was spawned;
    /// a persist failure is logged and the in-memory log is not rolled
    /// back, so log and stored transcript may diverge until the next load.
    fn spawn_persist(&self, session_id: String, context: String) {
        let client = Arc::clone(&self.client);
        let generation = Arc::clone(&self.generation);
        let expected = generation.load(Ordering::SeqCst);
        let assistant_title = self.assistant_title.clone();

        tokio::spawn(async move {
            if generation.load(Ordering::SeqCst) != expected {
                debug!(session = %session_id, "skipping context persist for stale session");
                return;
            }
            if let Err(e) = client
                .update_chat_context(&session_id, &assistant_title, &context)
                .await
            {
                warn!(
                    session = %session_id,
                    error = %SyncError::ContextPersistFailed(e),
                    "context persist failed; stored transcript may lag the log"
                );
            }
        });
    }
}
