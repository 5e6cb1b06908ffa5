//! Client for the remote summarization service.
//!
//! Three JSON endpoints: `/bookmark` enriches an extracted page, `/chat`
//! answers a question over the stored context and `/summarize_chat`
//! condenses a chat transcript.

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::types::bookmark::Bookmark;
use crate::types::errors::RemoteError;
use crate::types::page::{ChatMessage, ChatRequest, PageContent};
use crate::types::settings::ServiceSettings;

/// Summary returned for an empty transcript without calling the service.
pub const EMPTY_TRANSCRIPT_SUMMARY: &str = "No messages found.";

/// The remote service seam. Calls carry no timeout unless configured.
#[async_trait]
pub trait RemoteService: Send + Sync {
    async fn enrich_bookmark(&self, page: &PageContent) -> Result<Bookmark, RemoteError>;
    async fn chat(&self, request: &ChatRequest) -> Result<String, RemoteError>;
    async fn summarize_chat(&self, messages: &[ChatMessage]) -> Result<String, RemoteError>;
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    reply: String,
}

#[derive(Debug, Deserialize)]
struct SummaryReply {
    summary: String,
}

#[derive(Debug, Serialize)]
struct SummarizeBody<'a> {
    messages: &'a [ChatMessage],
}

/// `RemoteService` over HTTP.
pub struct HttpRemoteService {
    client: reqwest::Client,
    base_url: String,
}

impl HttpRemoteService {
    pub fn new(settings: &ServiceSettings) -> Result<Self, RemoteError> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = settings.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| RemoteError::NetworkError(e.to_string()))?;
        Ok(Self {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// POSTs `body` and decodes the reply, mapping transport, status and `success:false` failures.
    async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, RemoteError> {
        let url = format!("{}/{}", self.base_url, path);
        debug!("POST {}", url);
        let resp = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                warn!("request to {} failed: {}", url, e);
                RemoteError::NetworkError(e.to_string())
            })?;

        let status = resp.status();
        let text = resp
            .text()
            .await
            .map_err(|e| RemoteError::NetworkError(e.to_string()))?;

        if !status.is_success() {
            warn!("{} returned {}", url, status);
            let body = serde_json::from_str::<Value>(&text)
                .ok()
                .and_then(|v| v.get("error").and_then(Value::as_str).map(str::to_string))
                .unwrap_or(text);
            return Err(RemoteError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let value: Value =
            serde_json::from_str(&text).map_err(|e| RemoteError::DecodeError(e.to_string()))?;
        if value.get("success").and_then(Value::as_bool) == Some(false) {
            let error = value
                .get("error")
                .and_then(Value::as_str)
                .unwrap_or("unknown error")
                .to_string();
            return Err(RemoteError::ServiceError(error));
        }
        serde_json::from_value(value).map_err(|e| RemoteError::DecodeError(e.to_string()))
    }
}

#[async_trait]
impl RemoteService for HttpRemoteService {
    async fn enrich_bookmark(&self, page: &PageContent) -> Result<Bookmark, RemoteError> {
        self.post("bookmark", page).await
    }

    async fn chat(&self, request: &ChatRequest) -> Result<String, RemoteError> {
        let reply: ChatReply = self.post("chat", request).await?;
        Ok(reply.reply)
    }

    async fn summarize_chat(&self, messages: &[ChatMessage]) -> Result<String, RemoteError> {
        if messages.is_empty() {
            return Ok(EMPTY_TRANSCRIPT_SUMMARY.to_string());
        }
        let reply: SummaryReply = self.post("summarize_chat", &SummarizeBody { messages }).await?;
        Ok(reply.summary)
    }
}
