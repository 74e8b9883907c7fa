use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

use slack_health_reporter::{
    load_config, read_report_source, Cli, Config, DebugNotifier, DispatchOptions, Dispatcher,
    NoOpReportFinder, Output, ReportFinder, SlackClient, SlackNotifier, SlackReportFinder,
    SlackWebNotifier,
};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let cfg = load_config(&cli)?;
    init_tracing(&cfg);

    let report = read_report_source(&cli.file).context("could not read json report")?;
    for problem in report.validate() {
        warn!("{}", problem);
    }
    info!("Loaded report with {} environments", report.environments.len());
    if cfg.dry_run {
        debug!("Parsed report:\n{}", serde_json::to_string_pretty(&report)?);
    }

    let (notifier, finder) = build_backends(&cfg);
    let options = DispatchOptions::from_config(&cfg);
    let dispatcher = Dispatcher::new(notifier.as_ref(), finder.as_ref(), &options);

    let summary_ts = match dispatcher.run(&report).await {
        Ok(ts) => ts,
        Err(err) => {
            if let Some(ts) = err.summary_ts() {
                error!("Summary report {} was sent before the failure", ts);
            }
            return Err(err.into());
        }
    };

    let output = Output {
        response_timestamp: summary_ts,
    };
    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}

/// Picks live or dry-run backends once, up front.
fn build_backends(cfg: &Config) -> (Box<dyn SlackNotifier>, Box<dyn ReportFinder>) {
    if cfg.dry_run {
        info!("Dry run: messages are rendered but not sent");
        return (
            Box::new(DebugNotifier::new(cfg.report_config())),
            Box::new(NoOpReportFinder),
        );
    }

    let client = SlackClient::with_api_url(cfg.token.clone(), cfg.slack_api_url.clone());
    let notifier = SlackWebNotifier::new(client.clone(), cfg.channel.clone(), cfg.report_config())
        .with_username(cfg.username.clone());
    let finder = SlackReportFinder::new(client, cfg.channel.clone());
    (Box::new(notifier), Box::new(finder))
}

fn init_tracing(cfg: &Config) {
    let default_level = if cfg.verbose || cfg.dry_run { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
