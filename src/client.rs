use serde::{Deserialize, Serialize};
use tracing::error;

use crate::blocks::{Attachment, Block, MessageMetadata};
use crate::error::SlackError;
use crate::types::MessageTs;

pub const DEFAULT_SLACK_API_URL: &str = "https://slack.com/api";

const HISTORY_LIMIT: &str = "1000";

/// Body shared by `chat.postMessage` and `chat.update`.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ChatMessage {
    pub channel: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ts: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thread_ts: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub blocks: Vec<Block>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<Attachment>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<MessageMetadata>,
    pub unfurl_links: bool,
    pub unfurl_media: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct HistoryMetadata {
    #[serde(default)]
    pub event_type: String,
    #[serde(default)]
    pub event_payload: Option<serde_json::Map<String, serde_json::Value>>,
}

impl HistoryMetadata {
    pub fn matches(&self, event_type: &str, key: &str, value: &str) -> bool {
        self.event_type == event_type
            && self
                .event_payload
                .as_ref()
                .and_then(|p| p.get(key))
                .and_then(|v| v.as_str())
                == Some(value)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct HistoryMessage {
    pub ts: String,
    #[serde(default)]
    pub metadata: Option<HistoryMetadata>,
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    ok: bool,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    ts: Option<String>,
    #[serde(default)]
    messages: Vec<HistoryMessage>,
}

/// Thin async client for the handful of Web API methods the reporter needs.
#[derive(Debug, Clone)]
pub struct SlackClient {
    http: reqwest::Client,
    api_url: String,
    token: String,
}

impl SlackClient {
    pub fn new(token: impl Into<String>) -> Self {
        Self::with_api_url(token, DEFAULT_SLACK_API_URL)
    }

    pub fn with_api_url(token: impl Into<String>, api_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_url: api_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
        }
    }

    pub async fn post_message(&self, message: &ChatMessage) -> Result<MessageTs, SlackError> {
        self.send_chat("chat.postMessage", message).await
    }

    pub async fn update_message(&self, message: &ChatMessage) -> Result<MessageTs, SlackError> {
        self.send_chat("chat.update", message).await
    }

    pub async fn conversation_history(&self, channel: &str) -> Result<Vec<HistoryMessage>, SlackError> {
        let method = "conversations.history";
        let query = [
            ("channel", channel),
            ("include_all_metadata", "true"),
            ("limit", HISTORY_LIMIT),
        ];
        let res = self.get(method, &query).await?;
        Ok(res.messages)
    }

    pub async fn conversation_replies(
        &self,
        channel: &str,
        ts: &MessageTs,
    ) -> Result<Vec<HistoryMessage>, SlackError> {
        let method = "conversations.replies";
        let query = [
            ("channel", channel),
            ("ts", ts.as_str()),
            ("include_all_metadata", "true"),
            ("limit", HISTORY_LIMIT),
        ];
        let res = self.get(method, &query).await?;
        Ok(res.messages)
    }

    async fn send_chat(&self, method: &'static str, message: &ChatMessage) -> Result<MessageTs, SlackError> {
        let res = self
            .http
            .post(format!("{}/{}", self.api_url, method))
            .bearer_auth(&self.token)
            .json(message)
            .send()
            .await
            .map_err(|source| SlackError::Http { method, source })?;
        let body = Self::read_response(method, res).await?;
        body.ts
            .and_then(MessageTs::new)
            .ok_or(SlackError::MissingTs { method })
    }

    async fn get(&self, method: &'static str, query: &[(&str, &str)]) -> Result<ApiResponse, SlackError> {
        let res = self
            .http
            .get(format!("{}/{}", self.api_url, method))
            .bearer_auth(&self.token)
            .query(query)
            .send()
            .await
            .map_err(|source| SlackError::Http { method, source })?;
        Self::read_response(method, res).await
    }

    async fn read_response(method: &'static str, res: reqwest::Response) -> Result<ApiResponse, SlackError> {
        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            error!("Slack {} failed: {} - {}", method, status, body);
            return Err(SlackError::Api {
                method,
                error: format!("HTTP {}", status),
            });
        }
        let body: ApiResponse = res
            .json()
            .await
            .map_err(|source| SlackError::Http { method, source })?;
        if !body.ok {
            let error = body.error.unwrap_or_else(|| "unknown_error".to_string());
            error!("Slack {} returned error: {}", method, error);
            return Err(SlackError::Api { method, error });
        }
        Ok(body)
    }
}
