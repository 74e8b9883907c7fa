use thiserror::Error;

use crate::types::MessageTs;

/// Failures talking to the Slack Web API, or rendering a payload for it.
#[derive(Debug, Error)]
pub enum SlackError {
    #[error("request to {method} failed: {source}")]
    Http {
        method: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{method} returned an error: {error}")]
    Api { method: &'static str, error: String },

    #[error("{method} response did not include a message ts")]
    MissingTs { method: &'static str },

    #[error("could not serialize message: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Fatal outcomes of a notification run.
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("could not read report from {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("could not parse report: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("options '{0}' and '{1}' are mutually exclusive")]
    MutuallyExclusive(&'static str, &'static str),

    #[error("failed to look up last report for {date}: {source}")]
    Lookup {
        date: String,
        #[source]
        source: SlackError,
    },

    #[error("failed to send summary report: {0}")]
    Summary(#[source] SlackError),

    #[error("failed to look up environment report for {environment} (summary {summary_ts}): {source}")]
    EnvironmentLookup {
        environment: String,
        summary_ts: MessageTs,
        #[source]
        source: SlackError,
    },

    #[error("failed to send environment report for {environment} (summary {summary_ts}): {source}")]
    Environment {
        environment: String,
        summary_ts: MessageTs,
        #[source]
        source: SlackError,
    },
}

impl NotifyError {
    /// Summary message that was already sent before the run aborted, if any.
    pub fn summary_ts(&self) -> Option<&MessageTs> {
        match self {
            NotifyError::EnvironmentLookup { summary_ts, .. }
            | NotifyError::Environment { summary_ts, .. } => Some(summary_ts),
            _ => None,
        }
    }
}
