//! Command-line surface. Every setting can also come from the environment;
//! a value given on the command line wins.

use clap::Parser;

const EXAMPLES: &str = "\
Examples:
  # Look up today's report and update it, or post a new one if there is none
  slack-health-reporter --channel alerts --token xoxb-redacted --report-base-url https://my-reports --lookup-last-report report.json

  # Send the report for a specific date, updating it if it already exists
  slack-health-reporter --channel alerts --token xoxb-redacted --report-base-url https://my-reports --lookup-last-report --report-date 03-01-2023 report.json

  # Overwrite a specific message (fails if the message does not exist)
  slack-health-reporter --channel alerts --token xoxb-redacted --report-base-url https://my-reports --update-message-ts 1700000000.000100 report.json

  # Read the report from stdin and post a brand new message
  my-report.sh | slack-health-reporter --channel alerts --token xoxb-redacted --report-base-url https://my-reports -

  # Configure through the environment instead of flags
  TOKEN=xoxb-redacted CHANNEL=alerts REPORT_BASE_URL=https://my-reports slack-health-reporter report.json";

/// Parses a health-check report and sends it to Slack.
#[derive(Debug, Default, Parser)]
#[command(name = "slack-health-reporter")]
#[command(version)]
#[command(long_about = "Parses a report JSON document, either from a file or from stdin, \
and posts a summary message plus one threaded reply per environment to Slack. \
Earlier messages can be updated instead of posting new ones.")]
#[command(after_long_help = EXAMPLES)]
pub struct Cli {
    /// Report JSON file, or `-` to read from stdin
    #[arg(value_name = "FILE")]
    pub file: String,

    /// [REQUIRED] Slack channel to send to [env: CHANNEL]
    #[arg(long)]
    pub channel: Option<String>,

    /// [REQUIRED] Slack API token [env: TOKEN]
    #[arg(long)]
    pub token: Option<String>,

    /// [REQUIRED] Base URL used to build links to reports [env: REPORT_BASE_URL]
    #[arg(long)]
    pub report_base_url: Option<String>,

    /// Report date in dd-mm-yyyy format, defaults to today [env: REPORT_DATE]
    #[arg(long)]
    pub report_date: Option<String>,

    /// Whether to update existing environment messages, default true [env: UPDATE_ENVIRONMENTS]
    #[arg(long, value_name = "BOOL", num_args = 0..=1, default_missing_value = "true")]
    pub update_environments: Option<bool>,

    /// Timestamp of a message to update and reply to [env: UPDATE_MESSAGE_TS]
    #[arg(long, conflicts_with = "lookup_last_report")]
    pub update_message_ts: Option<String>,

    /// Look up the report for the report date automatically [env: LOOKUP_LAST_REPORT]
    #[arg(long)]
    pub lookup_last_report: bool,

    /// Render messages without sending anything [env: DRY_RUN]
    #[arg(long)]
    pub dry_run: bool,

    /// Show debug log output [env: VERBOSE]
    #[arg(long, short)]
    pub verbose: bool,

    /// Display name for the bot [env: USERNAME]
    #[arg(long)]
    pub username: Option<String>,
}
