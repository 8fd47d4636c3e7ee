//! The analysis step shared by every run mode.

use crate::{
    base::{
        prompts::render_prompt,
        types::{Analysis, IssueDetails, RepoRef},
    },
    prelude::*,
    service::llm::LlmClient,
};

/// Render the analysis prompt for an issue and run it through the model once.
#[instrument(skip_all, fields(repo = %repo, issue = details.number))]
pub async fn analyze_issue(config: &Config, llm: &LlmClient, repo: &RepoRef, details: &IssueDetails) -> Res<Analysis> {
    let prompt = render_prompt(&config.analysis_prompt, repo.project(), &details.title, &details.body);

    debug!("Rendered analysis prompt ({} bytes).", prompt.len());

    let full_response = llm.get_analysis(&prompt).await?;
    let analysis = Analysis::from_response(full_response);

    info!("Full model response:\n{}", analysis.full_response);

    Ok(analysis)
}
