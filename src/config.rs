//! Configuration module for the rivt CLI.
//!
//! This module handles loading, saving, and managing configuration
//! settings for the rivt test harness: where the fixture suites live,
//! how to invoke the external compiler and emulator, and the shared
//! runtime library appended to every generated artifact.

use dirs::{config_dir, home_dir};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Result, RivtError};

/// Default configuration file name.
pub const CONFIG_FILE_NAME: &str = "rivt.toml";

/// Application configuration structure.
///
/// This struct represents the complete configuration for the rivt CLI.
/// Every field has a default, so a missing config file is not an error.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// Global verbose setting.
    #[serde(default)]
    pub verbose: bool,

    /// Root directory containing one subdirectory per test section.
    #[serde(default = "default_suite_root")]
    pub suite_root: String,

    /// Ordered list of validation section names. The CLI section selector
    /// indexes into this list (1-based).
    #[serde(default = "default_sections")]
    pub sections: Vec<String>,

    /// Section directory used by exploratory mode (selector 0).
    #[serde(default = "default_exploratory_section")]
    pub exploratory_section: String,

    /// File extension of primary source fixtures.
    #[serde(default = "default_source_ext")]
    pub source_ext: String,

    /// Compiler invocation prefix; the fixture source path is appended.
    #[serde(default = "default_compiler")]
    pub compiler: Vec<String>,

    /// Emulator invocation prefix; the assembled artifact path is appended.
    #[serde(default = "default_emulator")]
    pub emulator: Vec<String>,

    /// Shared runtime/support library appended last to every artifact.
    #[serde(default = "default_runtime_lib")]
    pub runtime_lib: String,

    /// Per-invocation timeout for external processes, in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

/// Default value functions for configuration fields.
fn default_suite_root() -> String {
    "suites".to_string()
}

fn default_sections() -> Vec<String> {
    ["part1", "part2", "part3", "part4", "part5", "part6", "integration"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_exploratory_section() -> String {
    "scratch".to_string()
}

fn default_source_ext() -> String {
    "riv".to_string()
}

fn default_compiler() -> Vec<String> {
    vec!["./rivcc".to_string(), "-c".to_string()]
}

fn default_emulator() -> Vec<String> {
    vec!["rive".to_string()]
}

fn default_runtime_lib() -> String {
    "lib/print.s".to_string()
}

fn default_timeout_secs() -> u64 {
    60
}

impl Default for Config {
    fn default() -> Self {
        Self {
            verbose: false,
            suite_root: default_suite_root(),
            sections: default_sections(),
            exploratory_section: default_exploratory_section(),
            source_ext: default_source_ext(),
            compiler: default_compiler(),
            emulator: default_emulator(),
            runtime_lib: default_runtime_lib(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Config {
    /// Load configuration from the default location.
    ///
    /// Searches for configuration in the following order:
    /// 1. Current directory
    /// 2. User's home directory
    /// 3. System configuration directory
    ///
    /// Returns the default configuration if no config file is found.
    pub fn load() -> Result<Self> {
        let config_path = Self::find_config_file()?;

        match config_path {
            Some(path) => Self::load_from_path(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load configuration from a specific path.
    ///
    /// # Arguments
    /// * `path` - Path to the configuration file
    ///
    /// # Returns
    /// * `Result<Config>` - The loaded configuration or an error
    pub fn load_from_path(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(RivtError::Config(format!(
                "Configuration file not found: {}",
                path.display()
            )));
        }

        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| RivtError::Config(format!("Failed to parse configuration: {}", e)))?;

        Ok(config)
    }

    /// Check for config in current directory.
    fn check_current_dir_config() -> Option<PathBuf> {
        let path = PathBuf::from(CONFIG_FILE_NAME);
        path.exists().then_some(path)
    }

    /// Check for config in home directory.
    fn check_home_config() -> Option<PathBuf> {
        home_dir()
            .map(|dir| dir.join(".config").join("rivt").join(CONFIG_FILE_NAME))
            .filter(|path| path.exists())
    }

    /// Check for config in system config directory.
    fn check_system_config() -> Option<PathBuf> {
        config_dir()
            .map(|dir| dir.join("rivt").join(CONFIG_FILE_NAME))
            .filter(|path| path.exists())
    }

    /// Find the configuration file in standard locations.
    ///
    /// # Returns
    /// * `Result<Option<PathBuf>>` - Path to config file if found, None otherwise
    fn find_config_file() -> Result<Option<PathBuf>> {
        Ok(Self::check_current_dir_config()
            .or_else(Self::check_home_config)
            .or_else(Self::check_system_config))
    }
}
