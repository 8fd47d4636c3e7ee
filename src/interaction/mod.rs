//! Event handling for the issue analyzer.
//!
//! This module provides the flows that tie the services together:
//! - Loading the issue event delivered by the platform
//! - Analyzing an issue and replying when the model asks for an MRE
//! - Running the same analysis locally, without posting

pub mod analysis;
pub mod event;
pub mod issue_opened;
