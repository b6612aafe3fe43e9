//! HTTP client for the assistant backend.
//!
//! All endpoints are JSON over HTTP against a single fixed origin. The
//! request and response field names (`assistantTitle`, `chatHistoryID`,
//! `historyID`, `chatHistory`, `roleSetting`, …) are part of the wire
//! contract and reproduced exactly via serde renames.

use crate::error::ApiError;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(120);
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

// ── Wire types ───────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct CreateHistoryRequest<'a> {
    #[serde(rename = "assistantTitle")]
    assistant_title: &'a str,
}

#[derive(Debug, Deserialize)]
struct CreateHistoryResponse {
    #[serde(rename = "chatHistory")]
    chat_history: CreatedHistory,
}

/// The backend's record of a freshly created session.
#[derive(Debug, Deserialize)]
pub struct CreatedHistory {
    pub id: String,
}

#[derive(Debug, Deserialize)]
struct ListHistoriesResponse {
    /// Session ids, one per stored file.
    files: Vec<String>,
}

#[derive(Debug, Serialize)]
struct DeleteHistoryRequest<'a> {
    #[serde(rename = "assistantTitle")]
    assistant_title: &'a str,
    #[serde(rename = "chatHistoryID")]
    chat_history_id: &'a str,
}

#[derive(Debug, Serialize)]
struct FetchHistoryRequest<'a> {
    #[serde(rename = "assistantTitle")]
    assistant_title: &'a str,
    #[serde(rename = "historyID")]
    history_id: &'a str,
}

#[derive(Debug, Deserialize)]
struct FetchHistoryResponse {
    context: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    context: &'a str,
    /// Optional explicit model. Omitted when unset so the original wire
    /// shape is preserved.
    #[serde(skip_serializing_if = "Option::is_none")]
    model: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    response: String,
}

#[derive(Debug, Serialize)]
struct UpdateContextRequest<'a> {
    #[serde(rename = "assistantTitle")]
    assistant_title: &'a str,
    context: &'a str,
}

/// One assistant as listed by the backend.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct AssistantRecord {
    pub title: String,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default, rename = "roleSetting")]
    pub role_setting: Option<String>,
}

#[derive(Debug, Serialize)]
struct CreateAssistantRequest<'a> {
    title: &'a str,
    #[serde(rename = "roleSetting")]
    role_setting: &'a str,
}

#[derive(Debug, Serialize)]
struct RenameAssistantRequest<'a> {
    #[serde(rename = "currentTitle")]
    current_title: &'a str,
    #[serde(rename = "newTitle")]
    new_title: &'a str,
}

#[derive(Debug, Deserialize)]
struct RoleSettingResponse {
    #[serde(rename = "roleSetting")]
    role_setting: String,
}

// ── Client ───────────────────────────────────────────────────────

/// Thin reqwest wrapper over the backend's endpoints.
///
/// One call per method; no state, no retries. Timeouts belong to the
/// transport and surface as [`ApiError::Transport`] like any other
/// transport failure.
pub struct BackendClient {
    base_url: String,
    client: Client,
}

impl BackendClient {
    pub fn new(base_url: &str) -> Self {
        Self::with_timeouts(base_url, DEFAULT_REQUEST_TIMEOUT, DEFAULT_CONNECT_TIMEOUT)
    }

    pub fn with_timeouts(base_url: &str, request: Duration, connect: Duration) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: Client::builder()
                .timeout(request)
                .connect_timeout(connect)
                .build()
                .unwrap_or_else(|_| Client::new()),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    // ── Session endpoints ────────────────────────────────────────

    /// `GET /chat-history` — enumerate stored session files.
    pub async fn list_histories(&self) -> Result<Vec<String>, ApiError> {
        const EP: &str = "/chat-history";
        let response = self
            .client
            .get(self.url(EP))
            .send()
            .await
            .map_err(|e| ApiError::transport(EP, e))?;
        let response = expect_success(EP, response).await?;
        let body: ListHistoriesResponse =
            response.json().await.map_err(|e| ApiError::transport(EP, e))?;
        Ok(body.files)
    }

    /// `POST /create-history` — create a new session for the assistant.
    pub async fn create_history(&self, assistant_title: &str) -> Result<CreatedHistory, ApiError> {
        const EP: &str = "/create-history";
        let response = self
            .client
            .post(self.url(EP))
            .json(&CreateHistoryRequest { assistant_title })
            .send()
            .await
            .map_err(|e| ApiError::transport(EP, e))?;
        let response = expect_success(EP, response).await?;
        let body: CreateHistoryResponse =
            response.json().await.map_err(|e| ApiError::transport(EP, e))?;
        Ok(body.chat_history)
    }

    /// `DELETE /delete-history` — delete a stored session.
    pub async fn delete_history(
        &self,
        assistant_title: &str,
        history_id: &str,
    ) -> Result<(), ApiError> {
        const EP: &str = "/delete-history";
        let response = self
            .client
            .delete(self.url(EP))
            .json(&DeleteHistoryRequest {
                assistant_title,
                chat_history_id: history_id,
            })
            .send()
            .await
            .map_err(|e| ApiError::transport(EP, e))?;
        expect_success(EP, response).await?;
        Ok(())
    }

    /// `POST /fetch-history` — fetch the stored transcript for a session.
    pub async fn fetch_history(
        &self,
        assistant_title: &str,
        history_id: &str,
    ) -> Result<String, ApiError> {
        const EP: &str = "/fetch-history";
        let response = self
            .client
            .post(self.url(EP))
            .json(&FetchHistoryRequest {
                assistant_title,
                history_id,
            })
            .send()
            .await
            .map_err(|e| ApiError::transport(EP, e))?;
        let response = expect_success(EP, response).await?;
        let body: FetchHistoryResponse =
            response.json().await.map_err(|e| ApiError::transport(EP, e))?;
        Ok(body.context)
    }

    /// `POST /chat` — exchange the encoded context for an assistant reply.
    pub async fn chat(&self, context: &str, model: Option<&str>) -> Result<String, ApiError> {
        const EP: &str = "/chat";
        let response = self
            .client
            .post(self.url(EP))
            .json(&ChatRequest { context, model })
            .send()
            .await
            .map_err(|e| ApiError::transport(EP, e))?;
        let response = expect_success(EP, response).await?;
        let body: ChatResponse = response.json().await.map_err(|e| ApiError::transport(EP, e))?;
        Ok(body.response)
    }

    /// `PUT /update-chat-context/{id}` — persist the updated transcript.
    pub async fn update_chat_context(
        &self,
        history_id: &str,
        assistant_title: &str,
        context: &str,
    ) -> Result<(), ApiError> {
        const EP: &str = "/update-chat-context";
        let response = self
            .client
            .put(self.url(&format!("{EP}/{history_id}")))
            .json(&UpdateContextRequest {
                assistant_title,
                context,
            })
            .send()
            .await
            .map_err(|e| ApiError::transport(EP, e))?;
        expect_success(EP, response).await?;
        Ok(())
    }

    /// `POST /upload?title={assistantTitle}` — upload one attachment as
    /// multipart form data.
    pub async fn upload(
        &self,
        assistant_title: &str,
        file_name: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<(), ApiError> {
        const EP: &str = "/upload";
        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str(content_type)
            .map_err(|e| ApiError::transport(EP, e))?;
        let form = reqwest::multipart::Form::new().part("file", part);

        let response = self
            .client
            .post(self.url(EP))
            .query(&[("title", assistant_title)])
            .multipart(form)
            .send()
            .await
            .map_err(|e| ApiError::transport(EP, e))?;
        expect_success(EP, response).await?;
        Ok(())
    }

    // ── Assistant directory endpoints ────────────────────────────

    /// `GET /listAssistants` — enumerate assistants.
    pub async fn list_assistants(&self) -> Result<Vec<AssistantRecord>, ApiError> {
        const EP: &str = "/listAssistants";
        let response = self
            .client
            .get(self.url(EP))
            .send()
            .await
            .map_err(|e| ApiError::transport(EP, e))?;
        let response = expect_success(EP, response).await?;
        response.json().await.map_err(|e| ApiError::transport(EP, e))
    }

    /// `POST /createAssistant` — create an assistant with a role setting.
    pub async fn create_assistant(
        &self,
        title: &str,
        role_setting: &str,
    ) -> Result<(), ApiError> {
        const EP: &str = "/createAssistant";
        let response = self
            .client
            .post(self.url(EP))
            .json(&CreateAssistantRequest {
                title,
                role_setting,
            })
            .send()
            .await
            .map_err(|e| ApiError::transport(EP, e))?;
        expect_success(EP, response).await?;
        Ok(())
    }

    /// `PUT /renameAssistant` — rename an assistant.
    pub async fn rename_assistant(
        &self,
        current_title: &str,
        new_title: &str,
    ) -> Result<(), ApiError> {
        const EP: &str = "/renameAssistant";
        let response = self
            .client
            .put(self.url(EP))
            .json(&RenameAssistantRequest {
                current_title,
                new_title,
            })
            .send()
            .await
            .map_err(|e| ApiError::transport(EP, e))?;
        expect_success(EP, response).await?;
        Ok(())
    }

    /// `DELETE /deleteAssistant?title={title}` — delete an assistant.
    pub async fn delete_assistant(&self, title: &str) -> Result<(), ApiError> {
        const EP: &str = "/deleteAssistant";
        let response = self
            .client
            .delete(self.url(EP))
            .query(&[("title", title)])
            .send()
            .await
            .map_err(|e| ApiError::transport(EP, e))?;
        expect_success(EP, response).await?;
        Ok(())
    }

    /// `GET /getRoleSetting?title={title}` — fetch an assistant's role prompt.
    pub async fn role_setting(&self, title: &str) -> Result<String, ApiError> {
        const EP: &str = "/getRoleSetting";
        let response = self
            .client
            .get(self.url(EP))
            .query(&[("title", title)])
            .send()
            .await
            .map_err(|e| ApiError::transport(EP, e))?;
        let response = expect_success(EP, response).await?;
        let body: RoleSettingResponse =
            response.json().await.map_err(|e| ApiError::transport(EP, e))?;
        Ok(body.role_setting)
    }

    /// `PUT /updateAssistant` — update an assistant's role prompt.
    pub async fn update_role_setting(
        &self,
        title: &str,
        role_setting: &str,
    ) -> Result<(), ApiError> {
        const EP: &str = "/updateAssistant";
        let response = self
            .client
            .put(self.url(EP))
            .json(&serde_json::json!({
                "title": title,
                "roleSetting": role_setting,
            }))
            .send()
            .await
            .map_err(|e| ApiError::transport(EP, e))?;
        expect_success(EP, response).await?;
        Ok(())
    }
}

/// Map a non-2xx response into [`ApiError::Status`] with the body attached.
async fn expect_success(
    endpoint: &'static str,
    response: reqwest::Response,
) -> Result<reqwest::Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(ApiError::Status {
        endpoint,
        status: status.as_u16(),
        body,
    })
}
