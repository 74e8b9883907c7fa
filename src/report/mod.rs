use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// Health-check report for every environment, as produced by the checker.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Report {
    #[serde(deserialize_with = "null_as_default")]
    pub environments: Vec<Environment>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Environment {
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub status: Status,
    #[serde(deserialize_with = "null_as_default")]
    pub namespaces: Vec<Namespace>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Namespace {
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub sections: Vec<Section>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Section {
    #[serde(deserialize_with = "null_as_default")]
    pub icon: String,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub failures: Vec<String>,
}

/// Treats an explicit `null` like a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Run status of an environment. Values the checker may add later are kept
/// verbatim in `Unknown` and rendered as an unknown failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Status {
    Pending,
    Completed,
    Errored,
    Unknown(String),
}

impl Default for Status {
    fn default() -> Self {
        Status::Unknown(String::new())
    }
}

impl From<String> for Status {
    fn from(value: String) -> Self {
        match value.as_str() {
            "pending" => Status::Pending,
            "completed" => Status::Completed,
            "errored" => Status::Errored,
            _ => Status::Unknown(value),
        }
    }
}

impl From<Status> for String {
    fn from(status: Status) -> Self {
        status.as_str().to_string()
    }
}

impl Status {
    pub fn as_str(&self) -> &str {
        match self {
            Status::Pending => "pending",
            Status::Completed => "completed",
            Status::Errored => "errored",
            Status::Unknown(other) => other,
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Status::Unknown(other) if other.is_empty() => f.write_str("<unset>"),
            _ => f.write_str(self.as_str()),
        }
    }
}

/// Display and link metadata that travels alongside the report.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReportConfig {
    pub report_date: String,
    pub base_url: String,
    pub build_url: Option<String>,
    pub build_label: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("environment {index} has an empty name")]
    EmptyEnvironmentName { index: usize },
}

impl Report {
    /// Data-quality problems that do not stop a run. Callers decide what to
    /// do with them.
    pub fn validate(&self) -> Vec<ValidationError> {
        self.environments
            .iter()
            .enumerate()
            .filter(|(_, env)| env.name.is_empty())
            .map(|(index, _)| ValidationError::EmptyEnvironmentName { index })
            .collect()
    }
}

impl Environment {
    /// Total failures across every section of every namespace.
    pub fn error_count(&self) -> usize {
        self.namespaces
            .iter()
            .flat_map(|ns| ns.sections.iter())
            .map(|s| s.failures.len())
            .sum()
    }

    pub fn is_healthy(&self) -> bool {
        self.error_count() == 0
    }

    pub fn is_completed(&self) -> bool {
        self.status == Status::Completed
    }
}
