//! GitHub issue integration, backed by `octocrab`.

use std::sync::Arc;

use anyhow::Context as _;
use async_trait::async_trait;
use octocrab::Octocrab;
use tracing::{info, instrument};

use crate::base::{
    config::Config,
    types::{IssueDetails, RepoRef, Res, Secret},
};

use super::{GenericIssueClient, IssueClient};

// Extra methods on `IssueClient` applied by the github implementation.

impl IssueClient {
    /// Creates a new GitHub issue client.
    pub fn github(config: &Config, token: &Secret) -> Res<Self> {
        let client = GitHubIssueClient::new(config, token)?;
        Ok(Self { inner: Arc::new(client) })
    }
}

// Structs.

/// GitHub client implementation.
#[derive(Clone)]
pub struct GitHubIssueClient {
    client: Octocrab,
}

impl GitHubIssueClient {
    /// Build the client; no requests are made here.
    #[instrument(name = "GitHubIssueClient::new", skip_all)]
    pub fn new(config: &Config, token: &Secret) -> Res<Self> {
        let mut builder = Octocrab::builder().personal_token(token.expose().to_string());

        if let Some(api_url) = config.github_api_url.as_deref().filter(|u| !u.trim().is_empty()) {
            builder = builder.base_uri(api_url).with_context(|| format!("Invalid GITHUB_API_URL: {api_url}"))?;
        }

        Ok(Self { client: builder.build()? })
    }
}

#[async_trait]
impl GenericIssueClient for GitHubIssueClient {
    #[instrument(name = "GitHubIssueClient::get_issue", skip(self))]
    async fn get_issue(&self, repo: &RepoRef, number: u64) -> Res<IssueDetails> {
        let issue = self
            .client
            .issues(&repo.owner, &repo.name)
            .get(number)
            .await
            .with_context(|| format!("GitHub API error fetching {repo}#{number}"))?;

        Ok(IssueDetails {
            number: issue.number,
            title: issue.title,
            body: issue.body.unwrap_or_default(),
        })
    }

    #[instrument(name = "GitHubIssueClient::post_comment", skip(self, body))]
    async fn post_comment(&self, repo: &RepoRef, number: u64, body: &str) -> Res<String> {
        let comment = self
            .client
            .issues(&repo.owner, &repo.name)
            .create_comment(number, body)
            .await
            .with_context(|| format!("GitHub API error commenting on {repo}#{number}"))?;

        info!("Posted comment: {}", comment.html_url);

        Ok(comment.html_url.to_string())
    }
}

// Tests.
