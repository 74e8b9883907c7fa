use std::fmt;

use serde::Serialize;

#[derive(Debug, Clone)]
pub struct Config {
    pub channel: String,
    pub token: String,
    pub report_date: String,
    pub report_base_url: String,
    pub update_environments: bool,
    pub update_message_ts: Option<MessageTs>,
    pub lookup_last_report: bool,
    pub dry_run: bool,
    pub verbose: bool,
    pub username: Option<String>,
    pub build_url: Option<String>,
    pub build_label: Option<String>,
    pub slack_api_url: String,
}

/// Timestamp Slack hands back for a posted message. It doubles as the
/// message id for `chat.update` and as the thread id for replies.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct MessageTs(String);

impl MessageTs {
    /// Returns `None` for an empty token so "no target" never hides inside
    /// an empty string.
    pub fn new(ts: impl Into<String>) -> Option<Self> {
        let ts = ts.into();
        if ts.is_empty() {
            None
        } else {
            Some(Self(ts))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MessageTs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Printed to stdout once the run completes.
#[derive(Debug, Serialize)]
pub struct Output {
    pub response_timestamp: MessageTs,
}
