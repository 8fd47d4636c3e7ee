pub mod github;

use std::{ops::Deref, sync::Arc};

use async_trait::async_trait;

use crate::base::types::{IssueDetails, RepoRef, Res};

// Traits.

/// Generic issue tracker trait that clients must implement.
///
/// This trait defines the core functionality for reading issues and replying to them.
/// Implementing this trait allows different source-control platforms to be used with
/// the issue analyzer.
#[async_trait]
pub trait GenericIssueClient: Send + Sync + 'static {
    /// Fetch the title and body of an issue.
    async fn get_issue(&self, repo: &RepoRef, number: u64) -> Res<IssueDetails>;

    /// Post a comment on an issue.
    ///
    /// Returns the URL of the new comment.
    async fn post_comment(&self, repo: &RepoRef, number: u64, body: &str) -> Res<String>;
}

// Structs.

/// Issue tracker client for the application.
///
/// It is designed to be trivially cloneable, allowing it to be passed around
/// without the need for `Arc` or `Mutex`.
#[derive(Clone)]
pub struct IssueClient {
    inner: Arc<dyn GenericIssueClient>,
}

impl Deref for IssueClient {
    type Target = dyn GenericIssueClient;

    fn deref(&self) -> &Self::Target {
        &*self.inner
    }
}

impl IssueClient {
    pub fn new(inner: Arc<dyn GenericIssueClient>) -> Self {
        Self { inner }
    }
}
