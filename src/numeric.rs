//! Numeric trace comparison against reference vectors.
//!
//! Validates row-tagged numeric files (layered pipeline traces tagged
//! `LAYER<i>`, final output vectors tagged `PAR<i>`) against a reference
//! within an absolute tolerance. Tag or dimension violations are format
//! errors, distinct from numeric mismatches; the first numeric mismatch
//! halts comparison immediately.

use std::path::Path;

use crate::error::{Result, RivtError};

/// Absolute tolerance for value equality.
pub const TOLERANCE: f64 = 1e-10;

/// Number of rows a layer trace must carry.
pub const LAYER_ROWS: usize = 12;

/// Which row-tag family a file is expected to carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagKind {
    /// `LAYER<i>` rows; the file must have exactly [`LAYER_ROWS`] rows.
    Layer,
    /// `PAR<i>` rows; every line of the actual file is compared.
    Par,
}

impl TagKind {
    fn prefix(&self) -> &'static str {
        match self {
            Self::Layer => "LAYER",
            Self::Par => "PAR",
        }
    }

    /// Human-readable row noun used in diagnostics.
    fn noun(&self) -> &'static str {
        match self {
            Self::Layer => "layer",
            Self::Par => "output",
        }
    }

    /// Number of rows to compare, given the actual file's contents.
    fn row_count(&self, actual_lines: usize) -> usize {
        match self {
            Self::Layer => LAYER_ROWS,
            Self::Par => actual_lines,
        }
    }
}

/// Compares two row-tagged numeric files.
///
/// Success means every row's tag, dimension, and values matched. The error
/// distinguishes format violations (`RivtError::Format`) from numeric
/// mismatches (`RivtError::Mismatch`); their exit codes differ.
pub fn compare_files(actual: &Path, reference: &Path, kind: TagKind) -> Result<()> {
    let actual_text = std::fs::read_to_string(actual)?;
    let reference_text = std::fs::read_to_string(reference)?;
    compare_rows(&actual_text, &reference_text, kind)
}

/// Core comparison over in-memory file contents.
pub fn compare_rows(actual: &str, reference: &str, kind: TagKind) -> Result<()> {
    let actual_lines: Vec<&str> = actual.lines().collect();
    let reference_lines: Vec<&str> = reference.lines().collect();

    for i in 0..kind.row_count(actual_lines.len()) {
        let in_fields = tagged_row(&actual_lines, i, kind, "input")?;
        let ref_fields = tagged_row(&reference_lines, i, kind, "reference")?;

        if in_fields.len() != ref_fields.len() {
            return Err(RivtError::Format(format!(
                "dimensionality error in {} {} (expected: {}, was: {})",
                kind.noun(),
                i,
                ref_fields.len(),
                in_fields.len()
            )));
        }

        // Field 0 is the tag; values start at 1. The first mismatch wins.
        for j in 1..in_fields.len() {
            let actual_value = parse_value(in_fields[j], i, kind, "input")?;
            let expected_value = parse_value(ref_fields[j], i, kind, "reference")?;

            if (actual_value - expected_value).abs() > TOLERANCE {
                return Err(RivtError::Mismatch(format!(
                    "value {} at {} {} is wrong: {} (should be {})",
                    j,
                    kind.noun(),
                    i,
                    actual_value,
                    expected_value
                )));
            }
        }
    }

    Ok(())
}

/// Returns row `i` split on commas, after validating its leading tag.
/// A missing row or wrong tag is a format error naming the offending file.
fn tagged_row<'a>(
    lines: &'a [&'a str],
    i: usize,
    kind: TagKind,
    role: &str,
) -> Result<Vec<&'a str>> {
    let invalid = || {
        RivtError::Format(format!(
            "invalid {} data for {} {}",
            role,
            kind.noun(),
            i
        ))
    };

    let Some(line) = lines.get(i) else {
        return Err(invalid());
    };
    let fields: Vec<&str> = line.split(',').collect();
    let expected_tag = format!("{}{}", kind.prefix(), i);
    if fields[0] != expected_tag {
        return Err(invalid());
    }
    Ok(fields)
}

fn parse_value(field: &str, i: usize, kind: TagKind, role: &str) -> Result<f64> {
    field.trim().parse::<f64>().map_err(|_| {
        RivtError::Format(format!(
            "invalid {} data for {} {}",
            role,
            kind.noun(),
            i
        ))
    })
}
