use std::io::Read;

use crate::error::NotifyError;
use crate::report::Report;

/// Reads the report from a file, or from stdin when `path` is `-`.
pub fn read_report_source(path: &str) -> Result<Report, NotifyError> {
    let mut bytes = Vec::new();
    let read = if path == "-" {
        std::io::stdin().lock().read_to_end(&mut bytes)
    } else {
        std::fs::File::open(path).and_then(|mut f| f.read_to_end(&mut bytes))
    };
    read.map_err(|source| NotifyError::Read {
        path: path.to_string(),
        source,
    })?;

    parse_report(&bytes)
}

pub fn parse_report(bytes: &[u8]) -> Result<Report, NotifyError> {
    Ok(serde_json::from_slice(bytes)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::Status;
    use std::io::Write;

    const MINIMAL: &str = r#"{
        "environments": [
            {
                "name": "dev1",
                "status": "completed",
                "namespaces": [
                    {
                        "name": "apps",
                        "sections": [
                            {"icon": ":package:", "name": "Failed Deployments", "failures": ["foo", "bar"]}
                        ]
                    }
                ]
            },
            {"name": "dev2", "status": "pending"}
        ]
    }"#;

    #[test]
    fn test_parse_minimal_report() {
        let report = parse_report(MINIMAL.as_bytes()).unwrap();

        assert_eq!(report.environments.len(), 2);
        assert_eq!(report.environments[0].name, "dev1");
        assert_eq!(report.environments[0].status, Status::Completed);
        assert_eq!(report.environments[0].namespaces[0].sections[0].failures, vec!["foo", "bar"]);
        assert_eq!(report.environments[1].status, Status::Pending);
        assert!(report.environments[1].namespaces.is_empty());
    }

    #[test]
    fn test_parse_is_deterministic() {
        let first = parse_report(MINIMAL.as_bytes()).unwrap();
        let second = parse_report(MINIMAL.as_bytes()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_missing_status_is_unknown() {
        let report = parse_report(br#"{"environments": [{"name": "abx-xyz-foo-2"}]}"#).unwrap();
        assert_eq!(report.environments[0].status, Status::Unknown(String::new()));
    }

    #[test]
    fn test_null_fields_read_as_empty() {
        let report = parse_report(
            br#"{"environments": [
                {"name": "dev1", "status": null, "namespaces": null},
                {"name": null, "status": "completed", "namespaces": [
                    {"name": "apps", "sections": [
                        {"icon": null, "name": "Failed Deployments", "failures": null}
                    ]},
                    {"name": "infra", "sections": null}
                ]}
            ]}"#,
        )
        .unwrap();

        let dev1 = &report.environments[0];
        assert_eq!(dev1.status, Status::Unknown(String::new()));
        assert!(dev1.namespaces.is_empty());

        let second = &report.environments[1];
        assert_eq!(second.name, "");
        let section = &second.namespaces[0].sections[0];
        assert_eq!(section.icon, "");
        assert!(section.failures.is_empty());
        assert!(second.namespaces[1].sections.is_empty());
        assert!(second.is_healthy());
    }

    #[test]
    fn test_null_environments_is_an_empty_report() {
        let report = parse_report(br#"{"environments": null}"#).unwrap();
        assert!(report.environments.is_empty());
    }

    #[test]
    fn test_report_round_trips_as_pretty_json() {
        // Dry runs log the parsed report in this form.
        let report = parse_report(MINIMAL.as_bytes()).unwrap();
        let pretty = serde_json::to_string_pretty(&report).unwrap();
        assert!(pretty.contains("\"status\": \"completed\""));
        assert_eq!(parse_report(pretty.as_bytes()).unwrap(), report);
    }

    #[test]
    fn test_malformed_report_is_an_error() {
        let result = parse_report(b"{\"environments\": [");
        assert!(matches!(result, Err(NotifyError::Parse(_))));

        let result = parse_report(br#"{"environments": {"name": "dev1"}}"#);
        assert!(matches!(result, Err(NotifyError::Parse(_))));
    }

    #[test]
    fn test_read_report_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(MINIMAL.as_bytes()).unwrap();

        let report = read_report_source(file.path().to_str().unwrap()).unwrap();
        assert_eq!(report.environments[0].name, "dev1");
    }

    #[test]
    fn test_read_missing_file_names_path() {
        let err = read_report_source("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, NotifyError::Read { .. }));
        assert!(err.to_string().contains("/definitely/not/here.json"));
    }
}
