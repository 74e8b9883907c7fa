use tracing::{debug, info, warn};

use crate::config::{ENV_LOOKUP_LAST_REPORT, ENV_UPDATE_MESSAGE_TS};
use crate::error::NotifyError;
use crate::finder::ReportFinder;
use crate::notifier::SlackNotifier;
use crate::report::{Environment, Report};
use crate::types::{Config, MessageTs};

/// The slice of configuration that drives create-vs-update decisions.
#[derive(Debug, Clone, Default)]
pub struct DispatchOptions {
    pub report_date: String,
    pub update_message_ts: Option<MessageTs>,
    pub lookup_last_report: bool,
    pub update_environments: bool,
}

impl DispatchOptions {
    pub fn from_config(cfg: &Config) -> Self {
        Self {
            report_date: cfg.report_date.clone(),
            update_message_ts: cfg.update_message_ts.clone(),
            lookup_last_report: cfg.lookup_last_report,
            update_environments: cfg.update_environments,
        }
    }
}

/// Where the summary message goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SummaryTarget {
    /// Overwrite the message given explicitly.
    Explicit(MessageTs),
    /// Overwrite the message a previous run posted for the same date.
    Found(MessageTs),
    /// Lookup was requested but nothing matched; post a new message.
    NotFound,
    /// Post a new message.
    New,
}

impl SummaryTarget {
    pub fn update_ts(&self) -> Option<&MessageTs> {
        match self {
            SummaryTarget::Explicit(ts) | SummaryTarget::Found(ts) => Some(ts),
            SummaryTarget::NotFound | SummaryTarget::New => None,
        }
    }
}

/// Decides whether the summary is a new message or an update, from either an
/// explicit timestamp or a lookup against channel history. The two are
/// mutually exclusive.
pub async fn determine_update(
    options: &DispatchOptions,
    finder: &dyn ReportFinder,
) -> Result<SummaryTarget, NotifyError> {
    match (&options.update_message_ts, options.lookup_last_report) {
        (Some(_), true) => Err(NotifyError::MutuallyExclusive(
            ENV_UPDATE_MESSAGE_TS,
            ENV_LOOKUP_LAST_REPORT,
        )),
        (Some(ts), false) => {
            debug!("Using explicit update message timestamp: {}", ts);
            Ok(SummaryTarget::Explicit(ts.clone()))
        }
        (None, true) => {
            let found = finder
                .find_report(&options.report_date)
                .await
                .map_err(|source| NotifyError::Lookup {
                    date: options.report_date.clone(),
                    source,
                })?;
            match found {
                Some(ts) => {
                    debug!("Found previous report: {}", ts);
                    Ok(SummaryTarget::Found(ts))
                }
                None => {
                    warn!(
                        "could not find last report for {} - Falling back to sending a new message",
                        options.report_date
                    );
                    Ok(SummaryTarget::NotFound)
                }
            }
        }
        (None, false) => Ok(SummaryTarget::New),
    }
}

/// Drives one run: summary first, then each environment in report order.
/// The first failure stops the run; messages already sent stay in place.
pub struct Dispatcher<'a> {
    notifier: &'a dyn SlackNotifier,
    finder: &'a dyn ReportFinder,
    options: &'a DispatchOptions,
}

impl<'a> Dispatcher<'a> {
    pub fn new(
        notifier: &'a dyn SlackNotifier,
        finder: &'a dyn ReportFinder,
        options: &'a DispatchOptions,
    ) -> Self {
        Self {
            notifier,
            finder,
            options,
        }
    }

    /// Resolves the summary target and sends everything. Returns the summary
    /// message timestamp.
    pub async fn run(&self, report: &Report) -> Result<MessageTs, NotifyError> {
        let target = determine_update(self.options, self.finder).await?;
        self.send_notifications(report, target.update_ts()).await
    }

    pub async fn send_notifications(
        &self,
        report: &Report,
        update_ts: Option<&MessageTs>,
    ) -> Result<MessageTs, NotifyError> {
        info!("Building summary report");
        let summary_ts = self
            .notifier
            .send_summary_report(report, update_ts)
            .await
            .map_err(NotifyError::Summary)?;

        info!("Building detailed environment reports");
        for env in &report.environments {
            if self.options.update_environments {
                debug!(env = %env.name, "Looking up existing environment");
                let existing = self
                    .finder
                    .find_environment_report(&env.name, &summary_ts)
                    .await
                    .map_err(|source| NotifyError::EnvironmentLookup {
                        environment: env.name.clone(),
                        summary_ts: summary_ts.clone(),
                        source,
                    })?;
                self.send_environment(&summary_ts, env, existing.as_ref()).await?;
            } else if env.is_completed() {
                self.send_environment(&summary_ts, env, None).await?;
            } else {
                warn!(
                    environment = %env.name,
                    "Not sending environment report for {} as it has status {}",
                    env.name,
                    env.status
                );
            }
        }

        Ok(summary_ts)
    }

    async fn send_environment(
        &self,
        summary_ts: &MessageTs,
        env: &Environment,
        update_ts: Option<&MessageTs>,
    ) -> Result<(), NotifyError> {
        self.notifier
            .send_environment_report(summary_ts, env, update_ts)
            .await
            .map_err(|source| NotifyError::Environment {
                environment: env.name.clone(),
                summary_ts: summary_ts.clone(),
                source,
            })
    }
}
