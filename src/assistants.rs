//! Assistant directory — the namespaces that sessions live under.
//!
//! A thin, cached view over the backend's assistant endpoints. Mutations
//! follow the same discipline as the session index: the cache only changes
//! after the backend confirms, never optimistically.

use crate::api::{AssistantRecord, BackendClient};
use crate::error::SyncError;
use std::sync::Arc;

pub struct AssistantDirectory {
    client: Arc<BackendClient>,
    cache: parking_lot::Mutex<Vec<AssistantRecord>>,
}

impl AssistantDirectory {
    pub fn new(client: BackendClient) -> Self {
        Self {
            client: Arc::new(client),
            cache: parking_lot::Mutex::new(Vec::new()),
        }
    }

    /// The last fetched listing.
    pub fn cached(&self) -> Vec<AssistantRecord> {
        self.cache.lock().clone()
    }

    /// Fetch the assistant listing and replace the cache.
    pub async fn list(&self) -> Result<Vec<AssistantRecord>, SyncError> {
        let assistants = self
            .client
            .list_assistants()
            .await
            .map_err(SyncError::AssistantOpFailed)?;
        *self.cache.lock() = assistants.clone();
        Ok(assistants)
    }

    /// Create an assistant with an initial role setting.
    pub async fn create(&self, title: &str, role_setting: &str) -> Result<(), SyncError> {
        self.client
            .create_assistant(title, role_setting)
            .await
            .map_err(SyncError::AssistantOpFailed)?;
        self.cache.lock().push(AssistantRecord {
            title: title.to_string(),
            avatar: None,
            role_setting: Some(role_setting.to_string()),
        });
        Ok(())
    }

    pub async fn rename(&self, current_title: &str, new_title: &str) -> Result<(), SyncError> {
        self.client
            .rename_assistant(current_title, new_title)
            .await
            .map_err(SyncError::AssistantOpFailed)?;
        let mut cache = self.cache.lock();
        if let Some(record) = cache.iter_mut().find(|r| r.title == current_title) {
            record.title = new_title.to_string();
        }
        Ok(())
    }

    pub async fn delete(&self, title: &str) -> Result<(), SyncError> {
        self.client
            .delete_assistant(title)
            .await
            .map_err(SyncError::AssistantOpFailed)?;
        self.cache.lock().retain(|r| r.title != title);
        Ok(())
    }

    pub async fn role_setting(&self, title: &str) -> Result<String, SyncError> {
        self.client
            .role_setting(title)
            .await
            .map_err(SyncError::AssistantOpFailed)
    }

    pub async fn update_role_setting(
        &self,
        title: &str,
        role_setting: &str,
    ) -> Result<(), SyncError> {
        self.client
            .update_role_setting(title, role_setting)
            .await
            .map_err(SyncError::AssistantOpFailed)?;
        let mut cache = self.cache.lock();
        if let Some(record) = cache.iter_mut().find(|r| r.title == title) {
            record.role_setting = Some(role_setting.to_string());
        }
        Ok(())
    }
}
