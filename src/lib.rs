// Public modules
pub mod types;
pub mod cli;
pub mod error;
pub mod config;
pub mod report;
pub mod parsing;
pub mod blocks;
pub mod slack;
pub mod client;
pub mod notifier;
pub mod finder;
pub mod dispatch;

// Re-export commonly used items
pub use types::*;
pub use cli::Cli;
pub use error::{NotifyError, SlackError};
pub use config::{load_config, load_config_with_env, EnvironmentProvider, SystemEnvironment, MockEnvironment};
pub use report::{Environment, Namespace, Report, ReportConfig, Section, Status, ValidationError};
pub use parsing::{parse_report, read_report_source};
pub use slack::{build_environment_report, build_summary_report_blocks};
pub use client::SlackClient;
pub use notifier::{DebugNotifier, SlackNotifier, SlackWebNotifier};
pub use finder::{NoOpReportFinder, ReportFinder, SlackReportFinder};
pub use dispatch::{determine_update, DispatchOptions, Dispatcher, SummaryTarget};
