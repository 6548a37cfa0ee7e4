//! Serializes aggregated outcomes into the remediation script.
//!
//! The artifact format is consumed by downstream tooling and is fixed: a
//! two-line header, then one block per differing object: an identifying
//! comment, the remediation script, and a batch-separator line.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::model::{DiffOutcome, ObjectCategory};
use crate::remediation::BATCH_SEPARATOR;

/// Failure to produce the main output artifact. Fatal for the run.
#[derive(Debug, Error)]
#[error("failed to write output script {path}: {source}")]
pub struct WriteError {
    pub path: PathBuf,
    #[source]
    pub source: io::Error,
}

/// Deterministic artifact name for one comparison run:
/// `schema-diff-<sourceDb>-<targetDb>-<CATEGORIES>-<runId>.sql`.
pub fn script_file_name(
    source_db: &str,
    target_db: &str,
    categories: &[ObjectCategory],
    run_id: &str,
) -> String {
    let categories = categories
        .iter()
        .map(|category| category.as_str())
        .collect::<Vec<_>>()
        .join("-");
    format!("schema-diff-{source_db}-{target_db}-{categories}-{run_id}.sql")
}

/// Writes the remediation script artifact.
pub struct ScriptWriter {
    path: PathBuf,
}

impl ScriptWriter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the full artifact. Outcomes are expected in their final order;
    /// the writer never reorders or mutates them.
    pub fn write(&self, outcomes: &[DiffOutcome]) -> Result<(), WriteError> {
        self.write_to_file(outcomes).map_err(|source| WriteError {
            path: self.path.clone(),
            source,
        })
    }

    fn write_to_file(&self, outcomes: &[DiffOutcome]) -> io::Result<()> {
        let mut file = BufWriter::new(File::create(&self.path)?);

        writeln!(file, "-- Schema comparison script")?;
        writeln!(file, "-- Differences found between databases")?;
        writeln!(file)?;

        for outcome in outcomes {
            writeln!(file, "-- Object: {}", outcome.object)?;
            write!(file, "{}", outcome.remediation_script)?;
            if !outcome.remediation_script.ends_with('\n') {
                writeln!(file)?;
            }
            writeln!(file, "{BATCH_SEPARATOR}")?;
            writeln!(file)?;
        }

        file.flush()
    }
}
