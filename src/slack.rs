use chrono::NaiveDate;
use tracing::debug;

use crate::blocks::{link_button, markdown, plaintext, Attachment, Block, TextObject};
use crate::report::{Environment, Namespace, Report, ReportConfig, Section, Status};

pub const HEALTHY_COLOUR: &str = "#00FF00";
pub const UNHEALTHY_COLOUR: &str = "#FF0000";

const REPORT_DATE_FORMAT: &str = "%d-%m-%Y";

pub fn build_report_url(cfg: &ReportConfig, env: &Environment) -> String {
    format!("{}/{}/{}", cfg.base_url, cfg.report_date, env.name)
}

/// Link to the report one day before `report_date`, falling back to the base
/// URL when the date is not `dd-mm-yyyy`.
fn previous_report_url(cfg: &ReportConfig) -> String {
    NaiveDate::parse_from_str(&cfg.report_date, REPORT_DATE_FORMAT)
        .ok()
        .and_then(|d| d.pred_opt())
        .map(|d| format!("{}/{}", cfg.base_url, d.format(REPORT_DATE_FORMAT)))
        .unwrap_or_else(|| cfg.base_url.clone())
}

/// Colour for attachment side bars. Depends on failures only, never on status.
pub fn attachment_colour(env: &Environment) -> &'static str {
    if env.is_healthy() {
        HEALTHY_COLOUR
    } else {
        UNHEALTHY_COLOUR
    }
}

/// One line per environment in the top-level summary message.
pub fn summary_health_message(env: &Environment) -> String {
    match &env.status {
        Status::Pending => format!(":hourglass: *{}* | Pending", env.name),
        Status::Completed if env.is_healthy() => format!(":white_check_mark: *{}* | Healthy", env.name),
        Status::Completed => format!(
            ":rotating_light: *{}* | Unhealthy - {} issues",
            env.name,
            env.error_count()
        ),
        Status::Errored | Status::Unknown(_) => format!(":x: *{}* | Unknown failure", env.name),
    }
}

/// Health line used in the header of each environment reply.
pub fn environment_health_message(env: &Environment) -> String {
    if env.is_healthy() {
        ":white_check_mark: Healthy".to_string()
    } else {
        format!(":rotating_light: Unhealthy - {} issues", env.error_count())
    }
}

fn build_environment_summary_section(cfg: &ReportConfig, env: &Environment) -> Block {
    Block::Section {
        text: Some(markdown(summary_health_message(env))),
        fields: vec![],
        accessory: Some(link_button(":clipboard: See report", build_report_url(cfg, env))),
    }
}

fn build_info_fields(cfg: &ReportConfig) -> Vec<TextObject> {
    let build = match (&cfg.build_url, &cfg.build_label) {
        (Some(url), Some(label)) => format!("<{}|{}>", url, label),
        (Some(url), None) => format!("<{}>", url),
        (None, _) => "_not provided_".to_string(),
    };
    vec![
        markdown(format!(":date: *Date:* {}", cfg.report_date)),
        markdown(format!(":rocket: *Build:* {}", build)),
    ]
}

pub fn build_summary_report_blocks(cfg: &ReportConfig, report: &Report) -> Vec<Block> {
    let mut blocks = vec![
        Block::Header {
            text: plaintext(":stethoscope: Bring-up Healthchecks"),
        },
        Block::Section {
            text: None,
            fields: build_info_fields(cfg),
            accessory: None,
        },
        Block::Context {
            elements: vec![markdown("Non-prod environments")],
        },
        Block::Divider,
    ];

    blocks.extend(
        report
            .environments
            .iter()
            .map(|env| build_environment_summary_section(cfg, env)),
    );

    blocks.push(Block::Actions {
        elements: vec![
            link_button(":arrow_left: Yesterday's report", previous_report_url(cfg)),
            link_button(":information_source: Learn more", cfg.base_url.clone()),
        ],
    });

    blocks
}

fn build_namespace_report_header(ns: &Namespace) -> Block {
    Block::Section {
        text: None,
        fields: vec![markdown(format!("*Namespace:* {}", ns.name))],
        accessory: None,
    }
}

/// Sections without failures render nothing.
pub fn build_section_report(section: &Section) -> Vec<Block> {
    if section.failures.is_empty() {
        return Vec::new();
    }

    vec![
        Block::Context {
            elements: vec![markdown(format!("{} {}", section.icon, section.name))],
        },
        Block::Divider,
        Block::Section {
            text: Some(markdown(section.failures.join("\n"))),
            fields: vec![],
            accessory: None,
        },
    ]
}

fn build_environment_report_header(env: &Environment) -> Attachment {
    Attachment {
        color: attachment_colour(env).to_string(),
        author_name: Some("Environment".to_string()),
        author_subname: Some(env.name.clone()),
        text: Some(environment_health_message(env)),
        blocks: vec![],
    }
}

/// Attachments for one environment reply: a header, then one attachment per
/// namespace. Environments that have not completed only get the header.
pub fn build_environment_report(env: &Environment) -> Vec<Attachment> {
    let mut attachments = vec![build_environment_report_header(env)];

    if !env.is_completed() {
        return attachments;
    }

    debug!(environment = %env.name, "Generating blocks for {} namespaces", env.namespaces.len());

    for ns in &env.namespaces {
        let mut blocks = vec![build_namespace_report_header(ns)];
        for section in &ns.sections {
            blocks.extend(build_section_report(section));
        }
        attachments.push(Attachment {
            color: attachment_colour(env).to_string(),
            blocks,
            ..Default::default()
        });
    }

    attachments
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cfg() -> ReportConfig {
        ReportConfig {
            report_date: "01-01-2024".to_string(),
            base_url: "https://reports.example.com".to_string(),
            build_url: Some("https://ci.example.com/job/1289".to_string()),
            build_label: Some("1289".to_string()),
        }
    }

    fn env(name: &str, status: Status, failures: &[&[&str]]) -> Environment {
        Environment {
            name: name.to_string(),
            status,
            namespaces: vec![Namespace {
                name: "apps".to_string(),
                sections: failures
                    .iter()
                    .enumerate()
                    .map(|(i, f)| Section {
                        icon: ":package:".to_string(),
                        name: format!("section-{}", i),
                        failures: f.iter().map(|s| s.to_string()).collect(),
                    })
                    .collect(),
            }],
        }
    }

    fn section_text(block: &Block) -> &str {
        match block {
            Block::Section { text: Some(text), .. } => text.text(),
            other => panic!("expected section with text, got {:?}", other),
        }
    }

    #[test]
    fn test_summary_health_message_per_status() {
        assert_eq!(
            summary_health_message(&env("dev1", Status::Pending, &[])),
            ":hourglass: *dev1* | Pending"
        );
        assert_eq!(
            summary_health_message(&env("dev1", Status::Completed, &[&[]])),
            ":white_check_mark: *dev1* | Healthy"
        );
        assert_eq!(
            summary_health_message(&env("dev1", Status::Completed, &[&["a", "b"], &["c"]])),
            ":rotating_light: *dev1* | Unhealthy - 3 issues"
        );
        assert_eq!(
            summary_health_message(&env("dev1", Status::Errored, &[])),
            ":x: *dev1* | Unknown failure"
        );
        assert_eq!(
            summary_health_message(&env("dev1", Status::Unknown("weird".to_string()), &[])),
            ":x: *dev1* | Unknown failure"
        );
    }

    #[test]
    fn test_colour_depends_only_on_failures() {
        assert_eq!(attachment_colour(&env("a", Status::Completed, &[&[]])), HEALTHY_COLOUR);
        assert_eq!(attachment_colour(&env("a", Status::Pending, &[])), HEALTHY_COLOUR);
        assert_eq!(attachment_colour(&env("a", Status::Completed, &[&["x"]])), UNHEALTHY_COLOUR);
        assert_eq!(attachment_colour(&env("a", Status::Errored, &[&["x"]])), UNHEALTHY_COLOUR);
    }

    #[test]
    fn test_summary_blocks_layout() {
        let report = Report {
            environments: vec![
                env("dev1", Status::Completed, &[&["foo", "bar"]]),
                env("dev2", Status::Pending, &[]),
            ],
        };

        let blocks = build_summary_report_blocks(&cfg(), &report);

        assert_eq!(blocks.len(), 7);
        assert!(matches!(blocks[0], Block::Header { .. }));
        assert!(matches!(blocks[2], Block::Context { .. }));
        assert_eq!(blocks[3], Block::Divider);

        match &blocks[1] {
            Block::Section { fields, .. } => {
                assert_eq!(fields[0].text(), ":date: *Date:* 01-01-2024");
                assert_eq!(fields[1].text(), ":rocket: *Build:* <https://ci.example.com/job/1289|1289>");
            }
            other => panic!("unexpected block {:?}", other),
        }

        assert!(section_text(&blocks[4]).contains("dev1"));
        assert!(section_text(&blocks[4]).contains("Unhealthy - 2 issues"));
        assert!(section_text(&blocks[5]).contains("dev2"));

        match &blocks[4] {
            Block::Section { accessory: Some(crate::blocks::Element::Button { url, .. }), .. } => {
                assert_eq!(url, "https://reports.example.com/01-01-2024/dev1");
            }
            other => panic!("unexpected block {:?}", other),
        }

        match &blocks[6] {
            Block::Actions { elements } => {
                assert_eq!(elements.len(), 2);
                let crate::blocks::Element::Button { url, .. } = &elements[0];
                assert_eq!(url, "https://reports.example.com/31-12-2023");
            }
            other => panic!("unexpected block {:?}", other),
        }
    }

    #[test]
    fn test_previous_report_falls_back_to_base_url() {
        let cfg = ReportConfig {
            report_date: "yesterday-ish".to_string(),
            base_url: "https://reports.example.com".to_string(),
            ..Default::default()
        };
        assert_eq!(previous_report_url(&cfg), "https://reports.example.com");
        assert_eq!(build_info_fields(&cfg)[1].text(), ":rocket: *Build:* _not provided_");
    }

    #[test]
    fn test_section_report_blocks() {
        let empty = Section::default();
        assert!(build_section_report(&empty).is_empty());

        let section = Section {
            icon: ":package:".to_string(),
            name: "Failed Deployments".to_string(),
            failures: vec!["foo".to_string(), "bar".to_string(), "baz".to_string()],
        };
        let blocks = build_section_report(&section);
        assert_eq!(blocks.len(), 3);
        match &blocks[0] {
            Block::Context { elements } => assert_eq!(elements[0].text(), ":package: Failed Deployments"),
            other => panic!("unexpected block {:?}", other),
        }
        assert_eq!(blocks[1], Block::Divider);
        assert_eq!(section_text(&blocks[2]), "foo\nbar\nbaz");
    }

    #[test]
    fn test_environment_report_for_completed_environment() {
        let env = env("dev1", Status::Completed, &[&["foo", "bar"], &[]]);

        let attachments = build_environment_report(&env);

        assert_eq!(attachments.len(), 2);
        assert_eq!(attachments[0].author_subname.as_deref(), Some("dev1"));
        assert_eq!(attachments[0].text.as_deref(), Some(":rotating_light: Unhealthy - 2 issues"));
        assert_eq!(attachments[0].color, UNHEALTHY_COLOUR);

        let ns_blocks = &attachments[1].blocks;
        assert_eq!(ns_blocks.len(), 4);
        match &ns_blocks[0] {
            Block::Section { fields, .. } => assert_eq!(fields[0].text(), "*Namespace:* apps"),
            other => panic!("unexpected block {:?}", other),
        }
        assert_eq!(ns_blocks[2], Block::Divider);
        assert_eq!(section_text(&ns_blocks[3]), "foo\nbar");
        assert_eq!(attachments[1].color, UNHEALTHY_COLOUR);
    }

    #[test]
    fn test_environment_report_short_circuits_unfinished() {
        for status in [Status::Pending, Status::Errored, Status::Unknown("x".to_string())] {
            let env = env("dev1", status, &[&["foo"]]);
            let attachments = build_environment_report(&env);
            assert_eq!(attachments.len(), 1);
            assert!(attachments[0].blocks.is_empty());
        }
    }
}
