//! Runtime services and shared state for the issue analyzer.

use tracing::{info, instrument};

use crate::{
    base::{
        config::Config,
        types::{HandlerOutcome, Res, RunMode, Void},
    },
    interaction::{event::load_configured_event, issue_opened::handle_issue_opened, local_test::run_local_test},
    service::{issues::IssueClient, llm::LlmClient},
};

/// Runtime service context for a single invocation.
///
/// This struct holds the configuration and the service clients. It is designed
/// to be trivially cloneable, allowing it to be passed around without the need
/// for `Arc` or `Mutex`.
#[derive(Clone)]
pub struct Runtime {
    /// The configuration for the application.
    pub config: Config,
    /// The LLM client instance.
    pub llm: LlmClient,
    /// The issue tracker client instance.
    pub issues: IssueClient,
}

impl Runtime {
    /// Create a new runtime instance.
    ///
    /// Fails when either credential is missing; no network calls happen here.
    #[instrument(skip_all)]
    pub fn new(config: Config) -> Res<Self> {
        let credentials = config.credentials()?;

        // Initialize the LLM client.
        let llm = LlmClient::anthropic(&config, &credentials.anthropic_api_key)?;

        // Initialize the issue tracker client.
        let issues = IssueClient::github(&config, &credentials.github_token)?;

        Ok(Self { config, llm, issues })
    }

    /// Run the requested mode to completion.
    #[instrument(skip(self))]
    pub async fn run(&self, mode: &RunMode) -> Void {
        match mode {
            RunMode::Workflow => {
                let event = load_configured_event(&self.config)?;

                match handle_issue_opened(&event, &self.config, &self.llm, &self.issues).await? {
                    HandlerOutcome::Commented { url } => info!("Replied to issue: {url}"),
                    HandlerOutcome::NoComment => info!("Analysis complete; no reply needed."),
                    HandlerOutcome::Skipped { reason } => info!("Skipped: {reason}"),
                }
            }
            RunMode::LocalTest { repo, issue } => {
                let report = run_local_test(repo, *issue, &self.config, &self.llm, &self.issues).await?;
                println!("{report}");
            }
        }

        Ok(())
    }
}
