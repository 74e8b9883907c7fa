use std::sync::Mutex;

use async_trait::async_trait;
use tracing::debug;

use crate::blocks::MessageMetadata;
use crate::client::{ChatMessage, SlackClient};
use crate::error::SlackError;
use crate::report::{Environment, Report, ReportConfig};
use crate::slack::{build_environment_report, build_summary_report_blocks};
use crate::types::MessageTs;

pub const SUMMARY_EVENT_TYPE: &str = "bring_up_healthcheck";
pub const ENVIRONMENT_EVENT_TYPE: &str = "bring_up_healthcheck_environment";

/// Timestamp the dry-run notifier hands back for the summary message.
pub const DRY_RUN_TS: &str = "dry-run";

/// Sends (or overwrites) the summary message and the per-environment replies.
#[async_trait]
pub trait SlackNotifier: Send + Sync {
    /// Posts a new summary, or updates `update_ts` when given.
    async fn send_summary_report(
        &self,
        report: &Report,
        update_ts: Option<&MessageTs>,
    ) -> Result<MessageTs, SlackError>;

    /// Replies under `parent_ts`, or updates the existing reply `update_ts`.
    async fn send_environment_report(
        &self,
        parent_ts: &MessageTs,
        env: &Environment,
        update_ts: Option<&MessageTs>,
    ) -> Result<(), SlackError>;
}

pub struct SlackWebNotifier {
    channel: String,
    report_config: ReportConfig,
    client: SlackClient,
    username: Option<String>,
}

impl SlackWebNotifier {
    pub fn new(client: SlackClient, channel: impl Into<String>, report_config: ReportConfig) -> Self {
        Self {
            channel: channel.into(),
            report_config,
            client,
            username: None,
        }
    }

    pub fn with_username(mut self, username: Option<String>) -> Self {
        self.username = username;
        self
    }

    fn base_message(&self, metadata: MessageMetadata) -> ChatMessage {
        ChatMessage {
            channel: self.channel.clone(),
            username: self.username.clone(),
            metadata: Some(metadata),
            ..Default::default()
        }
    }
}

#[async_trait]
impl SlackNotifier for SlackWebNotifier {
    async fn send_summary_report(
        &self,
        report: &Report,
        update_ts: Option<&MessageTs>,
    ) -> Result<MessageTs, SlackError> {
        let mut message = self.base_message(MessageMetadata::new(
            SUMMARY_EVENT_TYPE,
            "date",
            &self.report_config.report_date,
        ));
        message.blocks = build_summary_report_blocks(&self.report_config, report);

        match update_ts {
            Some(ts) => {
                debug!(ts = %ts, "Updating existing summary report");
                message.ts = Some(ts.to_string());
                self.client.update_message(&message).await
            }
            None => {
                debug!("Creating new summary report");
                self.client.post_message(&message).await
            }
        }
    }

    async fn send_environment_report(
        &self,
        parent_ts: &MessageTs,
        env: &Environment,
        update_ts: Option<&MessageTs>,
    ) -> Result<(), SlackError> {
        let mut message = self.base_message(MessageMetadata::new(
            ENVIRONMENT_EVENT_TYPE,
            "environment",
            &env.name,
        ));
        message.attachments = build_environment_report(env);

        match update_ts {
            Some(ts) => {
                debug!(env = %env.name, ts = %ts, "Updating existing environment report");
                message.ts = Some(ts.to_string());
                self.client.update_message(&message).await?;
            }
            None => {
                debug!(env = %env.name, "Creating new environment report");
                message.thread_ts = Some(parent_ts.to_string());
                self.client.post_message(&message).await?;
            }
        }
        Ok(())
    }
}

/// Dry-run notifier. Renders everything, sends nothing, and keeps the
/// pretty-printed JSON of each message so the output can be compared byte
/// for byte.
pub struct DebugNotifier {
    report_config: ReportConfig,
    transcript: Mutex<Vec<String>>,
}

impl DebugNotifier {
    pub fn new(report_config: ReportConfig) -> Self {
        Self {
            report_config,
            transcript: Mutex::new(Vec::new()),
        }
    }

    /// Everything rendered so far, one JSON document per message.
    pub fn transcript(&self) -> String {
        match self.transcript.lock() {
            Ok(entries) => entries.join("\n"),
            Err(poisoned) => poisoned.into_inner().join("\n"),
        }
    }

    fn record(&self, rendered: String) {
        debug!("{}\n", rendered);
        match self.transcript.lock() {
            Ok(mut entries) => entries.push(rendered),
            Err(poisoned) => poisoned.into_inner().push(rendered),
        }
    }
}

#[async_trait]
impl SlackNotifier for DebugNotifier {
    async fn send_summary_report(
        &self,
        report: &Report,
        _update_ts: Option<&MessageTs>,
    ) -> Result<MessageTs, SlackError> {
        let blocks = build_summary_report_blocks(&self.report_config, report);
        self.record(serde_json::to_string_pretty(&blocks)?);
        MessageTs::new(DRY_RUN_TS).ok_or(SlackError::MissingTs { method: "dry-run" })
    }

    async fn send_environment_report(
        &self,
        _parent_ts: &MessageTs,
        env: &Environment,
        _update_ts: Option<&MessageTs>,
    ) -> Result<(), SlackError> {
        let attachments = build_environment_report(env);
        self.record(serde_json::to_string_pretty(&attachments)?);
        Ok(())
    }
}
