//! Handling of issue-opened events.

use crate::{
    base::types::{HandlerOutcome, IssueEvent},
    interaction::analysis::analyze_issue,
    prelude::*,
    service::{issues::IssueClient, llm::LlmClient},
};

/// Handles an issue-opened event.
///
/// Fetches the issue, runs the analysis once, and posts the `<response>` content as a comment
/// when the model produced one. Events for other actions, or issues that the label filter
/// rejects, are skipped before any network call.
#[instrument(skip_all, fields(repo = %event.repository, issue = event.issue_id))]
pub async fn handle_issue_opened(event: &IssueEvent, config: &Config, llm: &LlmClient, issues: &IssueClient) -> Res<HandlerOutcome> {
    if let Some(action) = event.action.as_deref().filter(|a| *a != "opened") {
        info!("Ignoring `{action}` event.");
        return Ok(HandlerOutcome::Skipped {
            reason: format!("event action is `{action}`"),
        });
    }

    if !config.labels_pass_filter(event.labels.iter()) {
        info!("Issue carries none of the filtered labels; skipping.");
        return Ok(HandlerOutcome::Skipped {
            reason: "no label matches the label filter".to_string(),
        });
    }

    info!("Analyzing issue.");
    debug!("Issue title: {}", event.title);

    let details = issues.get_issue(&event.repository, event.issue_id).await?;
    let analysis = analyze_issue(config, llm, &event.repository, &details).await?;

    match analysis.comment() {
        Some(comment) => {
            let url = issues.post_comment(&event.repository, event.issue_id, comment).await?;
            Ok(HandlerOutcome::Commented { url })
        }
        None => {
            info!("No response tag content; not commenting.");
            Ok(HandlerOutcome::NoComment)
        }
    }
}
