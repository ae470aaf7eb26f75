//! CLI interface E2E tests.
//!
//! These tests drive the rivt binary end to end: comparator exit codes,
//! usage errors, and a full harness run against a shell-script stand-in
//! toolchain.

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Get the path to the rivt binary.
fn rivt_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_rivt"))
}

fn rivt() -> Command {
    Command::new(rivt_bin())
}

/// Writes a 12-row LAYER file with the given value in every row.
fn write_layers(dir: &Path, name: &str, value: &str) -> PathBuf {
    let path = dir.join(name);
    let content: String = (0..12).map(|i| format!("LAYER{},{}\n", i, value)).collect();
    std::fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_cli_help() {
    rivt()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("rivt"));
}

#[test]
fn test_cli_version() {
    rivt()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("0."));
}

#[test]
fn test_compare_layers_pass_prints_passed() {
    let dir = TempDir::new().unwrap();
    let actual = write_layers(dir.path(), "actual.txt", "0.5");
    let reference = write_layers(dir.path(), "reference.txt", "0.5");

    rivt()
        .args(["compare-layers"])
        .arg(&actual)
        .arg(&reference)
        .assert()
        .success()
        .stdout(predicate::str::diff("Passed\n"));
}

#[test]
fn test_compare_layers_numeric_mismatch_exits_one() {
    let dir = TempDir::new().unwrap();
    let actual = write_layers(dir.path(), "actual.txt", "0.5");
    let reference = write_layers(dir.path(), "reference.txt", "0.75");

    rivt()
        .args(["compare-layers"])
        .arg(&actual)
        .arg(&reference)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("is wrong"));
}

#[test]
fn test_compare_layers_tag_mismatch_exits_two() {
    let dir = TempDir::new().unwrap();
    let reference = write_layers(dir.path(), "reference.txt", "0.5");

    // Row 3 carries the wrong tag; this must be a format error (exit 2),
    // reported before any of row 3's values are compared.
    let mut rows: Vec<String> = (0..12).map(|i| format!("LAYER{},0.5", i)).collect();
    rows[3] = "LAYER7,999.0".to_string();
    let actual = dir.path().join("actual.txt");
    std::fs::write(&actual, rows.join("\n")).unwrap();

    rivt()
        .args(["compare-layers"])
        .arg(&actual)
        .arg(&reference)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("layer 3"));
}

#[test]
fn test_compare_output_missing_arguments_exits_two() {
    rivt().args(["compare-output", "only-one.txt"]).assert().code(2);
}

#[test]
fn test_run_out_of_range_selector_is_usage_error() {
    let suite = TempDir::new().unwrap();
    rivt()
        .args(["run", "--section", "42"])
        .arg("--suite-root")
        .arg(suite.path())
        .assert()
        .code(2)
        .stderr(predicate::str::contains("invalid section selector"));
}

// ============================================================================
// Full harness runs against a shell-script toolchain
// ============================================================================

#[cfg(unix)]
mod harness_e2e {
    use super::*;
    use std::os::unix::fs::PermissionsExt;

    struct Suite {
        dir: TempDir,
        config_path: PathBuf,
    }

    fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
        let mut perms = std::fs::metadata(&path).unwrap().permissions();
        perms.set_mode(0o755);
        std::fs::set_permissions(&path, perms).unwrap();
        path
    }

    /// Builds a suite with stand-in compiler/emulator scripts and a config
    /// file pointing at them. The compiler prints `ASM`, failing for any
    /// source whose path contains "baz"; the emulator prints `hello`.
    fn make_suite(sections: &[&str]) -> Suite {
        let dir = TempDir::new().unwrap();
        let root = dir.path();

        let compiler = write_script(
            root,
            "rivcc",
            "case \"$2\" in *baz*) echo nope >&2; exit 1;; esac\necho ASM",
        );
        let emulator = write_script(root, "rive", "echo hello");
        let runtime_lib = root.join("print.s");
        std::fs::write(&runtime_lib, "RUNTIME\n").unwrap();

        let suite_root = root.join("suites");
        for section in sections {
            std::fs::create_dir_all(suite_root.join(section).join("inputs")).unwrap();
            std::fs::create_dir_all(suite_root.join(section).join("expected")).unwrap();
        }

        let config_path = root.join("rivt.toml");
        let config = format!(
            "suite_root = {:?}\ncompiler = [{:?}, \"-c\"]\nemulator = [{:?}]\nruntime_lib = {:?}\ntimeout_secs = 10\n",
            suite_root.display().to_string(),
            compiler.display().to_string(),
            emulator.display().to_string(),
            runtime_lib.display().to_string(),
        );
        std::fs::write(&config_path, config).unwrap();

        Suite { dir, config_path }
    }

    impl Suite {
        fn section(&self, name: &str) -> PathBuf {
            self.dir.path().join("suites").join(name)
        }
    }

    #[test]
    fn test_validation_run_reports_summary() {
        let suite = make_suite(&["part1"]);
        let section = suite.section("part1");
        std::fs::write(section.join("inputs/foo.riv"), "src").unwrap();
        std::fs::write(section.join("expected/foo.out"), "hello\n").unwrap();

        rivt()
            .arg("--config")
            .arg(&suite.config_path)
            .args(["run", "--section", "1"])
            .assert()
            .success()
            .stdout(predicate::str::contains("part1: 1/1 Tests Passed"));

        let artifact =
            std::fs::read_to_string(section.join("outputs/foo-output.s")).unwrap();
        assert_eq!(artifact, "ASM\nRUNTIME\n");
    }

    #[test]
    fn test_aux_assembly_lands_between_compiler_output_and_runtime() {
        let suite = make_suite(&["part1"]);
        let section = suite.section("part1");
        std::fs::write(section.join("inputs/bar.riv"), "src").unwrap();
        std::fs::write(section.join("inputs/bar.s"), "AUX\n").unwrap();
        std::fs::write(section.join("expected/bar.out"), "hello\n").unwrap();

        rivt()
            .arg("--config")
            .arg(&suite.config_path)
            .args(["run", "--section", "1"])
            .assert()
            .success();

        let artifact =
            std::fs::read_to_string(section.join("outputs/bar-output.s")).unwrap();
        assert_eq!(artifact, "ASM\nAUX\nRUNTIME\n");
    }

    #[test]
    fn test_compile_failure_does_not_abort_the_run() {
        let suite = make_suite(&["part1"]);
        let section = suite.section("part1");
        std::fs::write(section.join("inputs/baz.riv"), "bad").unwrap();
        std::fs::write(section.join("inputs/foo.riv"), "src").unwrap();
        std::fs::write(section.join("expected/foo.out"), "hello\n").unwrap();

        rivt()
            .arg("--config")
            .arg(&suite.config_path)
            .args(["run", "--section", "1"])
            .assert()
            .success()
            .stdout(predicate::str::contains("part1: 1/1 Tests Passed"));

        // baz never reached the emulator.
        assert!(!section.join("outputs/baz.out").exists());
    }

    #[test]
    fn test_exploratory_mode_emits_no_summary() {
        let suite = make_suite(&["scratch"]);
        let section = suite.section("scratch");
        std::fs::write(section.join("inputs/foo.riv"), "src").unwrap();

        rivt()
            .arg("--config")
            .arg(&suite.config_path)
            .args(["run", "--section", "0"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Tests Passed").not());

        // The pipeline still surfaced its artifacts for inspection.
        assert!(section.join("outputs/foo-output.s").exists());
        assert!(section.join("outputs/foo.out").exists());
    }

    #[test]
    fn test_failing_comparison_names_fixture_and_repro_command() {
        let suite = make_suite(&["part1"]);
        let section = suite.section("part1");
        std::fs::write(section.join("inputs/foo.riv"), "src").unwrap();
        std::fs::write(section.join("expected/foo.out"), "goodbye\n").unwrap();

        rivt()
            .arg("--config")
            .arg(&suite.config_path)
            .args(["run", "--section", "1"])
            .assert()
            .success()
            .stdout(predicate::str::contains("part1: 0/1 Tests Passed"))
            .stderr(predicate::str::contains("diff ").and(predicate::str::contains("foo")));
    }
}
