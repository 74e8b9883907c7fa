use anyhow::{anyhow, Result};
use std::collections::HashMap;

use crate::cli::Cli;
use crate::client::DEFAULT_SLACK_API_URL;
use crate::report::ReportConfig;
use crate::types::{Config, MessageTs};

pub const ENV_CHANNEL: &str = "CHANNEL";
pub const ENV_TOKEN: &str = "TOKEN";
pub const ENV_REPORT_DATE: &str = "REPORT_DATE";
pub const ENV_REPORT_BASE_URL: &str = "REPORT_BASE_URL";
pub const ENV_UPDATE_ENVIRONMENTS: &str = "UPDATE_ENVIRONMENTS";
pub const ENV_UPDATE_MESSAGE_TS: &str = "UPDATE_MESSAGE_TS";
pub const ENV_LOOKUP_LAST_REPORT: &str = "LOOKUP_LAST_REPORT";
pub const ENV_DRY_RUN: &str = "DRY_RUN";
pub const ENV_VERBOSE: &str = "VERBOSE";

/// Trait for abstracting environment variable access
pub trait EnvironmentProvider {
    fn get_var(&self, key: &str) -> Option<String>;
}

/// Production implementation using std::env
pub struct SystemEnvironment;

impl EnvironmentProvider for SystemEnvironment {
    fn get_var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

/// Mock implementation for testing
#[derive(Debug, Default)]
pub struct MockEnvironment {
    vars: HashMap<String, String>,
}

impl MockEnvironment {
    pub fn new() -> Self {
        Self {
            vars: HashMap::new(),
        }
    }

    pub fn set_var<K, V>(&mut self, key: K, value: V) -> &mut Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.vars.insert(key.into(), value.into());
        self
    }

    pub fn with_var<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.set_var(key, value);
        self
    }
}

impl EnvironmentProvider for MockEnvironment {
    fn get_var(&self, key: &str) -> Option<String> {
        self.vars.get(key).cloned()
    }
}

fn parse_bool(value: Option<String>, default: bool) -> bool {
    value
        .map(|v| matches!(v.as_str(), "1" | "true" | "TRUE" | "True"))
        .unwrap_or(default)
}

fn trimmed(value: &str) -> Option<String> {
    Some(value.trim().to_string()).filter(|v| !v.is_empty())
}

fn non_empty<E: EnvironmentProvider>(env: &E, key: &str) -> Option<String> {
    env.get_var(key).as_deref().and_then(trimmed)
}

/// A command-line value if given, otherwise the environment variable.
fn setting<E: EnvironmentProvider>(flag: Option<&String>, env: &E, key: &str) -> Option<String> {
    flag.and_then(|v| trimmed(v)).or_else(|| non_empty(env, key))
}

/// A set switch always wins; an unset one defers to the environment.
fn switch<E: EnvironmentProvider>(flag: bool, env: &E, key: &str) -> bool {
    flag || parse_bool(env.get_var(key), false)
}

/// Today's date in the `dd-mm-yyyy` form used to key reports.
pub fn default_report_date() -> String {
    chrono::Local::now().format("%d-%m-%Y").to_string()
}

pub fn load_config(cli: &Cli) -> Result<Config> {
    load_config_with_env(cli, &SystemEnvironment)
}

pub fn load_config_with_env<E: EnvironmentProvider>(cli: &Cli, env: &E) -> Result<Config> {
    let dry_run = switch(cli.dry_run, env, ENV_DRY_RUN);

    let report_base_url = setting(cli.report_base_url.as_ref(), env, ENV_REPORT_BASE_URL)
        .ok_or_else(|| anyhow!("--report-base-url or {} must be set", ENV_REPORT_BASE_URL))?;

    // Channel and token only matter when talking to Slack.
    let channel = setting(cli.channel.as_ref(), env, ENV_CHANNEL).unwrap_or_default();
    let token = setting(cli.token.as_ref(), env, ENV_TOKEN).unwrap_or_default();
    if !dry_run {
        let missing: Vec<&str> = [(ENV_CHANNEL, &channel), (ENV_TOKEN, &token)]
            .into_iter()
            .filter(|(_, v)| v.is_empty())
            .map(|(k, _)| k)
            .collect();
        if !missing.is_empty() {
            return Err(anyhow!("Required setting not provided: {}", missing.join(", ")));
        }
    }

    let report_date =
        setting(cli.report_date.as_ref(), env, ENV_REPORT_DATE).unwrap_or_else(default_report_date);
    let update_environments = cli
        .update_environments
        .unwrap_or_else(|| parse_bool(env.get_var(ENV_UPDATE_ENVIRONMENTS), true));

    Ok(Config {
        channel,
        token,
        report_date,
        report_base_url: report_base_url.trim_end_matches('/').to_string(),
        update_environments,
        update_message_ts: setting(cli.update_message_ts.as_ref(), env, ENV_UPDATE_MESSAGE_TS)
            .and_then(MessageTs::new),
        lookup_last_report: switch(cli.lookup_last_report, env, ENV_LOOKUP_LAST_REPORT),
        dry_run,
        verbose: switch(cli.verbose, env, ENV_VERBOSE),
        username: setting(cli.username.as_ref(), env, "USERNAME"),
        build_url: non_empty(env, "BUILD_URL"),
        build_label: non_empty(env, "BUILD_LABEL"),
        slack_api_url: non_empty(env, "SLACK_API_URL").unwrap_or_else(|| DEFAULT_SLACK_API_URL.to_string()),
    })
}

impl Config {
    pub fn report_config(&self) -> ReportConfig {
        ReportConfig {
            report_date: self.report_date.clone(),
            base_url: self.report_base_url.clone(),
            build_url: self.build_url.clone(),
            build_label: self.build_label.clone(),
        }
    }
}
