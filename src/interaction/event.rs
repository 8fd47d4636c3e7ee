//! Loading the issue event payload written by the platform.

use std::path::Path;

use anyhow::Context as _;

use crate::{
    base::types::{IssueEvent, IssueEventPayload},
    prelude::*,
};

/// Read and parse the JSON event payload at `path`.
#[instrument(skip_all, fields(path = %path.display()))]
pub fn load_event(path: &Path) -> Res<IssueEventPayload> {
    let raw = std::fs::read_to_string(path).with_context(|| format!("Failed to read event payload at {}", path.display()))?;
    let payload = serde_json::from_str(&raw).with_context(|| format!("Failed to parse event payload at {}", path.display()))?;

    Ok(payload)
}

/// Load the event named by the configuration (`GITHUB_EVENT_PATH`, `GITHUB_REPOSITORY`).
pub fn load_configured_event(config: &Config) -> Res<IssueEvent> {
    let path = config.github_event_path.as_deref().ok_or_else(|| anyhow!("GITHUB_EVENT_PATH not set"))?;
    let payload = load_event(path)?;

    IssueEvent::from_payload(payload, config.github_repository.as_deref())
}

// Tests.

#[cfg(test)]
mod tests {
    use std::{io::Write, sync::Arc};

    use super::*;
    use crate::base::config::ConfigInner;

    fn write_event(json: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(json.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_event() {
        let file = write_event(
            r#"{
                "action": "opened",
                "issue": { "number": 42, "title": "Bug: crash on startup", "body": "Boom.", "labels": [{ "name": "bug", "color": "d73a4a" }] },
                "repository": { "full_name": "octo-org/widgets", "private": false },
                "sender": { "login": "octocat" }
            }"#,
        );

        let payload = load_event(file.path()).unwrap();

        assert_eq!(payload.action.as_deref(), Some("opened"));
        assert_eq!(payload.issue.number, 42);
        assert_eq!(payload.issue.labels[0].name, "bug");
    }

    #[test]
    fn test_load_event_errors_name_the_path() {
        let file = write_event("{ not json");
        let err = format!("{:#}", load_event(file.path()).unwrap_err());
        assert!(err.contains(&file.path().display().to_string()));

        let err = format!("{:#}", load_event(Path::new("/definitely/not/here.json")).unwrap_err());
        assert!(err.contains("/definitely/not/here.json"));
    }

    #[test]
    fn test_load_configured_event_requires_path() {
        let config = Config {
            inner: Arc::new(ConfigInner::default()),
        };

        let err = load_configured_event(&config).unwrap_err().to_string();
        assert!(err.contains("GITHUB_EVENT_PATH"));
    }

    #[test]
    fn test_load_configured_event_uses_repository_variable() {
        let file = write_event(r#"{ "action": "opened", "issue": { "number": 3, "title": "t", "body": null }, "repository": { "full_name": "octo-org/widgets" } }"#);

        let config = Config {
            inner: Arc::new(ConfigInner {
                github_event_path: Some(file.path().to_path_buf()),
                github_repository: Some("octo-org/gadgets".to_string()),
                ..Default::default()
            }),
        };

        let event = load_configured_event(&config).unwrap();

        assert_eq!(event.issue_id, 3);
        assert_eq!(event.repository.to_string(), "octo-org/gadgets");
    }
}
