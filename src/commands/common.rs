//! Common types and utilities for rivt commands.
//!
//! This module provides the section-selector resolution shared by the run
//! command and the diagnostic message constants used across commands.

use crate::config::Config;
use crate::error::{Result, RivtError};
use crate::harness::RunMode;

/// Sentinel selector value for exploratory mode.
pub const EXPLORATORY_SELECTOR: i64 = 0;

/// Resolves the integer section selector against the configured section
/// list.
///
/// Selector 0 picks the exploratory fixture directory (no grading); 1-based
/// selectors index the ordered validation sections. Anything else is a usage
/// error raised before any case runs.
pub fn resolve_section(selector: i64, config: &Config) -> Result<(String, RunMode)> {
    if selector == EXPLORATORY_SELECTOR {
        return Ok((config.exploratory_section.clone(), RunMode::Exploratory));
    }

    let index = selector
        .checked_sub(1)
        .and_then(|i| usize::try_from(i).ok())
        .filter(|i| *i < config.sections.len());
    match index {
        Some(i) => Ok((config.sections[i].clone(), RunMode::Validation)),
        None => Err(RivtError::Usage(format!(
            "invalid section selector {} (expected 0 or 1..={})",
            selector,
            config.sections.len()
        ))),
    }
}

/// Standard error message templates.
pub mod error_messages {
    /// Error when the suite root does not exist.
    pub const SUITE_ROOT_NOT_EXIST: &str = "Suite root does not exist";

    /// Error when the suite root is not a directory.
    pub const SUITE_ROOT_NOT_DIR: &str = "Suite root is not a directory";
}
