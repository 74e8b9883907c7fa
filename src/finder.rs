use async_trait::async_trait;
use tracing::debug;

use crate::client::{HistoryMessage, SlackClient};
use crate::error::SlackError;
use crate::notifier::{ENVIRONMENT_EVENT_TYPE, SUMMARY_EVENT_TYPE};
use crate::types::MessageTs;

/// Finds messages a previous run already posted, by their metadata marker.
/// `Ok(None)` means "not found", which is not an error.
#[async_trait]
pub trait ReportFinder: Send + Sync {
    async fn find_report(&self, date: &str) -> Result<Option<MessageTs>, SlackError>;

    async fn find_environment_report(
        &self,
        environment: &str,
        summary_ts: &MessageTs,
    ) -> Result<Option<MessageTs>, SlackError>;
}

pub struct SlackReportFinder {
    channel: String,
    client: SlackClient,
}

impl SlackReportFinder {
    pub fn new(client: SlackClient, channel: impl Into<String>) -> Self {
        Self {
            channel: channel.into(),
            client,
        }
    }
}

fn first_match(messages: &[HistoryMessage], event_type: &str, key: &str, value: &str) -> Option<MessageTs> {
    messages
        .iter()
        .find(|m| m.metadata.as_ref().is_some_and(|meta| meta.matches(event_type, key, value)))
        .and_then(|m| MessageTs::new(m.ts.clone()))
}

#[async_trait]
impl ReportFinder for SlackReportFinder {
    async fn find_report(&self, date: &str) -> Result<Option<MessageTs>, SlackError> {
        let messages = self.client.conversation_history(&self.channel).await?;
        debug!("Scanning {} messages for the {} report", messages.len(), date);
        Ok(first_match(&messages, SUMMARY_EVENT_TYPE, "date", date))
    }

    async fn find_environment_report(
        &self,
        environment: &str,
        summary_ts: &MessageTs,
    ) -> Result<Option<MessageTs>, SlackError> {
        let messages = self.client.conversation_replies(&self.channel, summary_ts).await?;
        Ok(first_match(&messages, ENVIRONMENT_EVENT_TYPE, "environment", environment))
    }
}

/// Used for dry runs: nothing is ever found.
pub struct NoOpReportFinder;

#[async_trait]
impl ReportFinder for NoOpReportFinder {
    async fn find_report(&self, _date: &str) -> Result<Option<MessageTs>, SlackError> {
        Ok(None)
    }

    async fn find_environment_report(
        &self,
        _environment: &str,
        _summary_ts: &MessageTs,
    ) -> Result<Option<MessageTs>, SlackError> {
        Ok(None)
    }
}
