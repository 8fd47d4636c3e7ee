//! Service integrations for external APIs and clients.
//!
//! This module contains implementations for the services used by the issue analyzer:
//! - Issue trackers (e.g., GitHub)
//! - LLM services (e.g., Anthropic)
//!
//! Each service module defines both generic traits and concrete implementations,
//! allowing for extensibility and easy testing.

pub mod issues;
pub mod llm;
