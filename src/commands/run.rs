//! Run command implementation.
//!
//! Drives every discovered fixture of the selected section through the
//! compile → assemble → emulate → compare pipeline and reports the section
//! summary. Selector 0 runs exploratory mode: the pipeline executes but no
//! comparison or counting happens.

use std::path::{Path, PathBuf};

use crate::commands::common::{error_messages, resolve_section};
use crate::commands::traits::{Command, CommandDescription};
use crate::config::Config;
use crate::error::{Result, RivtError};
use crate::harness::{Pipeline, SectionSummary, SystemRunner};

/// Arguments for the run command.
#[derive(Debug, Clone)]
pub struct RunArgs {
    /// Section selector: 0 for exploratory mode, 1-based index otherwise.
    pub section: i64,
    /// Override for the configured suite root.
    pub suite_root: Option<PathBuf>,
    /// Enable verbose output.
    pub verbose: bool,
}

impl Default for RunArgs {
    fn default() -> Self {
        Self {
            section: 0,
            suite_root: None,
            verbose: false,
        }
    }
}

/// Run command handler.
pub struct RunCommand {
    args: RunArgs,
    config: Config,
}

impl RunCommand {
    /// Create a RunCommand with an explicit configuration.
    pub fn with_config(args: RunArgs, config: Config) -> Self {
        Self { args, config }
    }

    /// Execute the command.
    pub fn run(&self) -> Result<SectionSummary> {
        let config = self.effective_config();
        let (section, mode) = resolve_section(self.args.section, &config)?;
        Self::validate_suite_root(Path::new(&config.suite_root))?;

        if self.args.verbose {
            eprintln!(
                "Running section '{}' from {} ({:?} mode)",
                section, config.suite_root, mode
            );
        }

        let runner = SystemRunner;
        Pipeline::new(&config, &runner, section, mode).run()
    }

    /// Configuration with CLI overrides applied.
    fn effective_config(&self) -> Config {
        let mut config = self.config.clone();
        if let Some(ref root) = self.args.suite_root {
            config.suite_root = root.display().to_string();
        }
        config
    }

    /// Validate that the suite root exists and is a directory.
    fn validate_suite_root(root: &Path) -> Result<()> {
        if !root.exists() {
            return Err(RivtError::Config(format!(
                "{}: {}",
                error_messages::SUITE_ROOT_NOT_EXIST,
                root.display()
            )));
        }
        if !root.is_dir() {
            return Err(RivtError::Config(format!(
                "{}: {}",
                error_messages::SUITE_ROOT_NOT_DIR,
                root.display()
            )));
        }
        Ok(())
    }
}

impl Command for RunCommand {
    type Args = RunArgs;
    type Output = SectionSummary;

    fn new(args: Self::Args) -> Self {
        Self {
            args,
            config: Config::default(),
        }
    }

    fn execute(&self) -> Result<Self::Output> {
        self.run()
    }

    fn name() -> &'static str {
        "run"
    }
}

impl CommandDescription for RunCommand {
    fn description() -> &'static str {
        "Run a section of conformance tests"
    }

    fn help() -> &'static str {
        "Discovers fixtures in the selected section, compiles each through \
         the external compiler, assembles a self-contained artifact, runs \
         the emulator, and compares captured output against references."
    }
}

/// Run the run command.
pub fn run_tests(args: RunArgs, config: Config) -> Result<SectionSummary> {
    let command = RunCommand::with_config(args, config);
    command.run()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_run_args_default() {
        let args = RunArgs::default();
        assert_eq!(args.section, 0);
        assert!(args.suite_root.is_none());
        assert!(!args.verbose);
    }

    #[test]
    fn test_run_command_name() {
        assert_eq!(<RunCommand as Command>::name(), "run");
    }

    #[test]
    fn test_out_of_range_selector_fails_before_any_case() {
        let suite = TempDir::new().unwrap();
        let args = RunArgs {
            section: 99,
            suite_root: Some(suite.path().to_path_buf()),
            verbose: false,
        };
        let err = run_tests(args, Config::default()).unwrap_err();
        assert!(matches!(err, RivtError::Usage(_)));
    }

    #[test]
    fn test_missing_suite_root_is_config_error() {
        let args = RunArgs {
            section: 1,
            suite_root: Some(PathBuf::from("/nonexistent/suites")),
            verbose: false,
        };
        let err = run_tests(args, Config::default()).unwrap_err();
        assert!(matches!(err, RivtError::Config(_)));
    }

    #[test]
    fn test_suite_root_override_applies() {
        let suite = TempDir::new().unwrap();
        let args = RunArgs {
            section: 1,
            suite_root: Some(suite.path().to_path_buf()),
            verbose: false,
        };
        let command = RunCommand::with_config(args, Config::default());
        assert_eq!(
            command.effective_config().suite_root,
            suite.path().display().to_string()
        );
    }

    #[test]
    fn test_empty_section_runs_to_empty_summary() {
        // A present but empty inputs directory discovers zero cases and
        // still completes with a 0/0 summary.
        let suite = TempDir::new().unwrap();
        std::fs::create_dir_all(suite.path().join("part1/inputs")).unwrap();

        let args = RunArgs {
            section: 1,
            suite_root: Some(suite.path().to_path_buf()),
            verbose: false,
        };
        let summary = run_tests(args, Config::default()).unwrap();
        assert_eq!(summary.total_tests, 0);
        assert_eq!(summary.tests_passed, 0);
    }
}
