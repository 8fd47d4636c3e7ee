use std::{collections::BTreeSet, fmt, str::FromStr};

use serde::Deserialize;
use serde_with::{DefaultOnNull, serde_as};

pub type Err = anyhow::Error;
pub type Res<T> = Result<T, Err>;
pub type Void = Res<()>;

// Secrets.

/// An opaque credential that never shows up in `Debug` output (and therefore never in logs).
#[derive(Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Get the raw secret value.
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// Whether the secret is missing in practice (empty or whitespace only).
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret([redacted])")
    }
}

/// The two credentials every invocation needs.
#[derive(Debug, Clone)]
pub struct Credentials {
    /// Source-control API credential (`GITHUB_TOKEN`).
    pub github_token: Secret,
    /// Language-model API credential (`ANTHROPIC_API_KEY`).
    pub anthropic_api_key: Secret,
}

// Repositories.

/// A repository in `owner/name` form.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepoRef {
    pub owner: String,
    pub name: String,
}

impl RepoRef {
    /// The project name used when talking to the model.
    pub fn project(&self) -> &str {
        &self.name
    }
}

impl FromStr for RepoRef {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Res<Self> {
        let (owner, name) = s
            .trim()
            .split_once('/')
            .ok_or_else(|| anyhow::anyhow!("Invalid repo '{s}', expected owner/repo"))?;

        if owner.is_empty() || name.is_empty() || name.contains('/') {
            return Err(anyhow::anyhow!("Invalid repo '{s}', expected owner/repo"));
        }

        Ok(Self {
            owner: owner.to_string(),
            name: name.to_string(),
        })
    }
}

impl fmt::Display for RepoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

// Event payloads.

/// The subset of the platform's `issues` webhook payload that the handler reads.
#[derive(Debug, Clone, Deserialize)]
pub struct IssueEventPayload {
    /// The event action (e.g., `opened`, `edited`).
    #[serde(default)]
    pub action: Option<String>,
    pub issue: PayloadIssue,
    #[serde(default)]
    pub repository: Option<PayloadRepository>,
}

#[serde_as]
#[derive(Debug, Clone, Deserialize)]
pub struct PayloadIssue {
    pub number: u64,
    pub title: String,
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    pub body: String,
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default)]
    pub labels: Vec<PayloadLabel>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PayloadLabel {
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PayloadRepository {
    pub full_name: String,
}

/// An issue-opened event, as seen by the handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueEvent {
    pub issue_id: u64,
    pub title: String,
    pub body: String,
    pub labels: BTreeSet<String>,
    pub repository: RepoRef,
    pub action: Option<String>,
}

impl IssueEvent {
    /// Build the event from the raw payload.
    ///
    /// The repository comes from `repository_override` (usually `GITHUB_REPOSITORY`) when set,
    /// and from the payload otherwise.
    pub fn from_payload(payload: IssueEventPayload, repository_override: Option<&str>) -> Res<Self> {
        let repository = match (repository_override, &payload.repository) {
            (Some(repo), _) if !repo.trim().is_empty() => repo.parse()?,
            (_, Some(repo)) => repo.full_name.parse()?,
            _ => return Err(anyhow::anyhow!("GITHUB_REPOSITORY not set and the event payload names no repository.")),
        };

        Ok(Self {
            issue_id: payload.issue.number,
            title: payload.issue.title,
            body: payload.issue.body,
            labels: payload.issue.labels.into_iter().map(|l| l.name).collect(),
            repository,
            action: payload.action,
        })
    }
}

// Issues and analyses.

/// Issue details as fetched from the tracker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssueDetails {
    pub number: u64,
    pub title: String,
    pub body: String,
}

/// The result of running the analysis prompt against an issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Analysis {
    /// The complete model response.
    pub full_response: String,
    /// The trimmed content of the `<response>` tag, if the model produced one.
    pub response: Option<String>,
}

impl Analysis {
    pub fn from_response(full_response: String) -> Self {
        let response = crate::base::prompts::extract_response_tag(&full_response);
        Self { full_response, response }
    }

    /// The comment to post, if any.
    pub fn comment(&self) -> Option<&str> {
        self.response.as_deref().filter(|r| !r.is_empty())
    }
}

/// What the handler did with an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandlerOutcome {
    /// A reply was posted on the issue.
    Commented { url: String },
    /// The model decided no reply was needed.
    NoComment,
    /// The event was not analyzed.
    Skipped { reason: String },
}

/// How the binary was asked to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunMode {
    /// Triggered by the platform: read the event payload, comment on the issue.
    Workflow,
    /// Analyze an existing issue and print the results without posting.
    LocalTest { repo: RepoRef, issue: u64 },
}

// Tests.

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repo_ref_parse() {
        let repo: RepoRef = "octo-org/widgets".parse().unwrap();

        assert_eq!(repo.owner, "octo-org");
        assert_eq!(repo.name, "widgets");
        assert_eq!(repo.project(), "widgets");
        assert_eq!(repo.to_string(), "octo-org/widgets");
    }

    #[test]
    fn test_repo_ref_rejects_malformed() {
        assert!("widgets".parse::<RepoRef>().is_err());
        assert!("/widgets".parse::<RepoRef>().is_err());
        assert!("octo-org/".parse::<RepoRef>().is_err());
        assert!("a/b/c".parse::<RepoRef>().is_err());
    }

    #[test]
    fn test_secret_debug_is_redacted() {
        let secret = Secret::new("ghp_supersecret");

        assert_eq!(format!("{secret:?}"), "Secret([redacted])");
        assert_eq!(secret.expose(), "ghp_supersecret");
        assert!(Secret::new("   ").is_blank());
    }

    #[test]
    fn test_payload_with_null_body() {
        let payload: IssueEventPayload = serde_json::from_value(serde_json::json!({
            "action": "opened",
            "issue": { "number": 7, "title": "Bug: crash on startup", "body": null, "labels": [] },
            "repository": { "full_name": "octo-org/widgets" }
        }))
        .unwrap();

        let event = IssueEvent::from_payload(payload, None).unwrap();

        assert_eq!(event.issue_id, 7);
        assert_eq!(event.body, "");
        assert!(event.labels.is_empty());
        assert_eq!(event.repository.to_string(), "octo-org/widgets");
    }

    #[test]
    fn test_repository_override_wins() {
        let payload: IssueEventPayload = serde_json::from_value(serde_json::json!({
            "issue": { "number": 1, "title": "t", "labels": [{ "name": "bug" }] },
            "repository": { "full_name": "octo-org/widgets" }
        }))
        .unwrap();

        let event = IssueEvent::from_payload(payload, Some("other/gadgets")).unwrap();

        assert_eq!(event.repository.to_string(), "other/gadgets");
        assert!(event.labels.contains("bug"));
        assert_eq!(event.action, None);
    }

    #[test]
    fn test_missing_repository_is_an_error() {
        let payload: IssueEventPayload = serde_json::from_value(serde_json::json!({
            "issue": { "number": 1, "title": "t" }
        }))
        .unwrap();

        assert!(IssueEvent::from_payload(payload, None).is_err());
    }

    #[test]
    fn test_analysis_comment_requires_content() {
        let analysis = Analysis::from_response("<decision>OTHER</decision>".to_string());
        assert_eq!(analysis.comment(), None);

        let analysis = Analysis::from_response("<response>  \n </response>".to_string());
        assert_eq!(analysis.comment(), None);

        let analysis = Analysis::from_response("<response>Please share an MRE.</response>".to_string());
        assert_eq!(analysis.comment(), Some("Please share an MRE."));
    }
}
