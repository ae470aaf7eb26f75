//! Fixture discovery for the test harness.
//!
//! Scans a section's `inputs/` directory, groups filenames by base name into
//! recognized fixture roles, and produces one `TestCase` per base name that
//! has a primary source fixture. Output is sorted by base name so a fixed
//! directory snapshot always yields the same case list.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::Result;

/// Pipeline status of a single test case.
///
/// Statuses only ever move forward: no stage is re-entered for a case.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaseStatus {
    /// Discovered, nothing run yet.
    Pending,
    /// Compiler produced an artifact.
    Compiled,
    /// Aux assembly and runtime library appended to the artifact.
    Assembled,
    /// Emulator ran and its output was captured.
    Emulated,
    /// Output comparison performed (exploratory mode stops at Emulated).
    Compared,
    /// Output matched the reference byte for byte.
    Passed,
    /// Output differed from the reference.
    Failed,
    /// Compiler exited nonzero or could not be invoked; case excluded
    /// from all later stages.
    CompileError,
    /// Emulator exited nonzero; the captured output is still compared.
    EmulationError,
    /// An external process exceeded the configured timeout and was killed.
    TimedOut,
}

/// One fixture under test, with the paths of every artifact the pipeline
/// will produce or consume for it.
#[derive(Debug, Clone)]
pub struct TestCase {
    /// Identifier shared across all artifacts for this case.
    pub base_name: String,
    /// Primary source fixture, `<base>.<source_ext>`.
    pub source_path: PathBuf,
    /// Hand-written assembly fixtures with a matching base name, in append
    /// order (`.S` before `.s`). At most one is expected; if both exist,
    /// both are appended.
    pub aux_assembly_paths: Vec<PathBuf>,
    /// Assembled artifact, `outputs/<base>-output.s`.
    pub artifact_path: PathBuf,
    /// Captured emulator output, `outputs/<base>.out`.
    pub actual_output_path: PathBuf,
    /// Reference output, `expected/<base>.out`.
    pub expected_output_path: PathBuf,
    /// Current pipeline status.
    pub status: CaseStatus,
}

/// Fixture roles recognized for a single base name.
#[derive(Debug, Default)]
struct CaseFiles {
    source: Option<PathBuf>,
    aux_upper: Option<PathBuf>,
    aux_lower: Option<PathBuf>,
}

/// Scans `inputs_dir` and returns the ordered case set.
///
/// Filenames not matching any recognized fixture role are ignored, as are
/// aux assembly files without a corresponding source fixture. Reading
/// directory entries is the only side effect.
pub fn discover_cases(
    inputs_dir: &Path,
    outputs_dir: &Path,
    expected_dir: &Path,
    source_ext: &str,
) -> Result<Vec<TestCase>> {
    let roles = collect_roles(inputs_dir, source_ext)?;

    let cases = roles
        .into_iter()
        .filter_map(|(base_name, files)| {
            let source_path = files.source?;
            let aux_assembly_paths = [files.aux_upper, files.aux_lower]
                .into_iter()
                .flatten()
                .collect();
            Some(TestCase {
                artifact_path: outputs_dir.join(format!("{}-output.s", base_name)),
                actual_output_path: outputs_dir.join(format!("{}.out", base_name)),
                expected_output_path: expected_dir.join(format!("{}.out", base_name)),
                base_name,
                source_path,
                aux_assembly_paths,
                status: CaseStatus::Pending,
            })
        })
        .collect();

    Ok(cases)
}

/// Maps each base name in the directory to the set of fixture roles found
/// for it. BTreeMap keeps the result ordered and the discovery idempotent.
fn collect_roles(inputs_dir: &Path, source_ext: &str) -> Result<BTreeMap<String, CaseFiles>> {
    let mut roles: BTreeMap<String, CaseFiles> = BTreeMap::new();

    for entry in std::fs::read_dir(inputs_dir)? {
        let entry = entry?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }

        let Some((base, ext)) = split_name(&path) else {
            continue;
        };

        if ext == source_ext {
            roles.entry(base).or_default().source = Some(path);
        } else if ext == "S" {
            roles.entry(base).or_default().aux_upper = Some(path);
        } else if ext == "s" {
            roles.entry(base).or_default().aux_lower = Some(path);
        }
    }

    Ok(roles)
}

/// Splits a path into (base name, extension), or None when the filename has
/// no extension or is not valid UTF-8.
fn split_name(path: &Path) -> Option<(String, String)> {
    let stem = path.file_stem()?.to_str()?;
    let ext = path.extension()?.to_str()?;
    Some((stem.to_string(), ext.to_string()))
}
