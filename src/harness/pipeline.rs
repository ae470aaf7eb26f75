//! The per-case test pipeline and section-level result aggregation.
//!
//! Each discovered case flows sequentially through compile, assemble,
//! emulate, and (in validation mode) compare. A stage failure short-circuits
//! only that case; the run always continues with the next one and still
//! reports a meaningful summary.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::{debug, error, warn};

use crate::config::Config;
use crate::error::Result;
use crate::harness::discovery::{discover_cases, CaseStatus, TestCase};
use crate::harness::exec::{CommandRunner, ExecOutcome, ExitDisposition};

/// Whether a run grades its output or only surfaces artifacts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// Compare captured output against references and count results.
    Validation,
    /// Run compile/assemble/emulate for manual inspection; no comparison,
    /// no counting, no summary.
    Exploratory,
}

/// Aggregate over all cases in one section. Created at run start, finalized
/// at run end, never persisted beyond the process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionSummary {
    pub section_name: String,
    pub total_tests: usize,
    pub tests_passed: usize,
}

impl SectionSummary {
    pub fn new(section_name: impl Into<String>) -> Self {
        Self {
            section_name: section_name.into(),
            total_tests: 0,
            tests_passed: 0,
        }
    }
}

/// Drives every discovered case of one section through the pipeline.
pub struct Pipeline<'a> {
    config: &'a Config,
    runner: &'a dyn CommandRunner,
    section: String,
    mode: RunMode,
}

impl<'a> Pipeline<'a> {
    pub fn new(
        config: &'a Config,
        runner: &'a dyn CommandRunner,
        section: impl Into<String>,
        mode: RunMode,
    ) -> Self {
        Self {
            config,
            runner,
            section: section.into(),
            mode,
        }
    }

    /// Runs the full pipeline over the section and returns its summary.
    ///
    /// In validation mode the summary line is printed to stdout; exploratory
    /// mode stays silent and leaves the counters at zero.
    pub fn run(&self) -> Result<SectionSummary> {
        let section_dir = Path::new(&self.config.suite_root).join(&self.section);
        let inputs_dir = section_dir.join("inputs");
        let outputs_dir = section_dir.join("outputs");
        let expected_dir = section_dir.join("expected");

        std::fs::create_dir_all(&outputs_dir)?;

        let mut cases = discover_cases(
            &inputs_dir,
            &outputs_dir,
            &expected_dir,
            &self.config.source_ext,
        )?;

        let mut summary = SectionSummary::new(&self.section);
        for case in &mut cases {
            self.run_case(case, &mut summary);
        }

        if self.mode == RunMode::Validation {
            println!(
                "{}: {}/{} Tests Passed",
                summary.section_name, summary.tests_passed, summary.total_tests
            );
        }

        Ok(summary)
    }

    /// Runs one case through every stage it can reach. Never returns an
    /// error: per-case failures become statuses and diagnostics.
    fn run_case(&self, case: &mut TestCase, summary: &mut SectionSummary) {
        debug!(case = %case.base_name, "running case");

        if !self.compile(case) {
            return;
        }
        if self.mode == RunMode::Validation {
            summary.total_tests += 1;
        }

        if !self.assemble(case) {
            return;
        }

        self.emulate(case);

        if self.mode == RunMode::Exploratory {
            return;
        }

        if self.compare(case) {
            summary.tests_passed += 1;
        }
    }

    fn timeout(&self) -> Duration {
        Duration::from_secs(self.config.timeout_secs)
    }

    /// Invokes the compiler and captures its stdout verbatim into the
    /// artifact file, truncating prior content. Returns false when the case
    /// must be excluded from all further stages.
    fn compile(&self, case: &mut TestCase) -> bool {
        let mut argv = self.config.compiler.clone();
        argv.push(case.source_path.display().to_string());

        let outcome = match self.runner.run(&argv, self.timeout()) {
            Ok(outcome) => outcome,
            Err(e) => {
                case.status = CaseStatus::CompileError;
                error!(case = %case.base_name, "failed to invoke compiler: {}", e);
                return false;
            }
        };

        // The artifact is written even on failure, mirroring a shell
        // redirection: a partial artifact is useful when debugging.
        if let Err(e) = std::fs::write(&case.artifact_path, &outcome.stdout) {
            case.status = CaseStatus::CompileError;
            error!(case = %case.base_name, "failed to write artifact: {}", e);
            return false;
        }

        match outcome.disposition {
            ExitDisposition::Exited(0) => {
                case.status = CaseStatus::Compiled;
                true
            }
            ExitDisposition::Exited(code) => {
                case.status = CaseStatus::CompileError;
                error!(
                    case = %case.base_name,
                    code,
                    "Error in compiling the test: {}",
                    String::from_utf8_lossy(&outcome.stderr).trim_end()
                );
                false
            }
            ExitDisposition::TimedOut => {
                case.status = CaseStatus::TimedOut;
                error!(
                    case = %case.base_name,
                    "compiler timed out after {}s",
                    self.config.timeout_secs
                );
                false
            }
        }
    }

    /// Appends the optional hand-written assembly fixtures and then the
    /// shared runtime library to the artifact, in that fixed order. The
    /// runtime library must come last: downstream symbol resolution depends
    /// on definition order.
    fn assemble(&self, case: &mut TestCase) -> bool {
        let runtime_lib = PathBuf::from(&self.config.runtime_lib);
        let mut sources: Vec<&Path> =
            case.aux_assembly_paths.iter().map(PathBuf::as_path).collect();
        sources.push(&runtime_lib);

        match append_files(&case.artifact_path, &sources) {
            Ok(()) => {
                case.status = CaseStatus::Assembled;
                true
            }
            Err(e) => {
                case.status = CaseStatus::Failed;
                error!(
                    case = %case.base_name,
                    "failed to assemble artifact {}: {}",
                    case.artifact_path.display(),
                    e
                );
                false
            }
        }
    }

    /// Invokes the emulator on the assembled artifact, capturing stdout to
    /// the case's actual-output file. A nonzero exit or timeout is recorded
    /// but does not gate comparison: a crash is itself a divergence to
    /// surface via diff.
    fn emulate(&self, case: &mut TestCase) {
        let mut argv = self.config.emulator.clone();
        argv.push(case.artifact_path.display().to_string());

        let outcome = match self.runner.run(&argv, self.timeout()) {
            Ok(outcome) => outcome,
            Err(e) => {
                case.status = CaseStatus::EmulationError;
                error!(case = %case.base_name, "failed to invoke emulator: {}", e);
                // Leave an empty output file so comparison still surfaces
                // the divergence.
                ExecOutcome {
                    disposition: ExitDisposition::Exited(-1),
                    stdout: Vec::new(),
                    stderr: Vec::new(),
                }
            }
        };

        if let Err(e) = std::fs::write(&case.actual_output_path, &outcome.stdout) {
            case.status = CaseStatus::EmulationError;
            error!(case = %case.base_name, "failed to write emulator output: {}", e);
            return;
        }

        match outcome.disposition {
            ExitDisposition::Exited(0) => case.status = CaseStatus::Emulated,
            ExitDisposition::Exited(code) => {
                case.status = CaseStatus::EmulationError;
                warn!(case = %case.base_name, code, "emulator exited nonzero");
            }
            ExitDisposition::TimedOut => {
                case.status = CaseStatus::TimedOut;
                warn!(
                    case = %case.base_name,
                    "emulator timed out after {}s",
                    self.config.timeout_secs
                );
            }
        }
    }

    /// Byte-level comparison of captured output against the reference.
    /// Returns true on a pass.
    fn compare(&self, case: &mut TestCase) -> bool {
        let actual = std::fs::read(&case.actual_output_path).unwrap_or_default();
        let expected = match std::fs::read(&case.expected_output_path) {
            Ok(bytes) => bytes,
            Err(e) => {
                case.status = CaseStatus::Failed;
                error!(
                    case = %case.base_name,
                    "missing reference output {}: {}",
                    case.expected_output_path.display(),
                    e
                );
                return false;
            }
        };

        case.status = CaseStatus::Compared;
        if actual == expected {
            case.status = CaseStatus::Passed;
            true
        } else {
            case.status = CaseStatus::Failed;
            error!(
                "Difference between output and expected output for {}. Run:\n\n\
                 diff {} {}\n\n\
                 To view the differences.",
                case.base_name,
                case.actual_output_path.display(),
                case.expected_output_path.display()
            );
            false
        }
    }
}

/// Appends the contents of each source file to `dest`, in order.
fn append_files(dest: &Path, sources: &[&Path]) -> std::io::Result<()> {
    let mut out = std::fs::OpenOptions::new().append(true).open(dest)?;
    for source in sources {
        let bytes = std::fs::read(source)?;
        out.write_all(&bytes)?;
    }
    Ok(())
}
