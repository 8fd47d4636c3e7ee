//! Library root for `issue-analyzer`.
//!
//! Issue-analyzer is an Anthropic-powered assistant for GitHub issue trackers designed to:
//! - Run once per newly opened issue, from a GitHub Actions workflow
//! - Decide whether the issue is a bug report that is not actionable
//! - Reply with a short explanation of what a minimal reproducible example would look like
//!
//! The analyzer integrates with GitHub for issues and Anthropic for analysis. The
//! architecture is built around traits that allow for different implementations of each
//! service.

pub mod base;
pub mod interaction;
pub mod prelude;
pub mod runtime;
pub mod service;

use base::{
    config::Config,
    types::{RunMode, Void},
};
use rustls::crypto;
use tracing::{debug, info};

/// Public async entry for the binary crate.
///
/// Sets up necessary services and runs the issue analyzer once:
/// - Initializes the crypto provider
/// - Creates the runtime context with the LLM and issue tracker clients
/// - Runs the requested mode to completion
pub async fn start(config: Config, mode: RunMode) -> Void {
    info!("Starting issue-analyzer ...");

    // Start the crypto provider.
    if crypto::ring::default_provider().install_default().is_err() {
        debug!("A crypto provider is already installed.");
    }

    // Initialize the runtime.
    let runtime = runtime::Runtime::new(config)?;

    // Run the requested mode.
    runtime.run(&mode).await?;

    Ok(())
}
