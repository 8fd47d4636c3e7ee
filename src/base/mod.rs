//! Core components, types, and utilities for the issue analyzer.
//!
//! This module contains fundamental building blocks used throughout the application:
//! - Configuration handling and environment variables.
//! - The analysis prompt and response-tag extraction.
//! - Common types and result handling.

pub mod config;
pub mod prompts;
pub mod types;
