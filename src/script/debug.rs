//! Normalized definition snapshots for differing objects.
//!
//! When debug logging is enabled, every differing object gets one file per
//! side under a run-scoped directory, holding the normalized text that the
//! comparison actually saw. Snapshot failures are reported and swallowed;
//! they never fail the run.

use std::io;
use std::path::{Path, PathBuf};

use log::warn;

use crate::model::{SchemaObject, Side};

/// Run-scoped directory of per-object definition snapshots.
pub struct DebugSink {
    dir: PathBuf,
}

impl DebugSink {
    /// Create `logs-<sourceDb>-<targetDb>-<runId>/` in the working
    /// directory.
    pub fn create(source_db: &str, target_db: &str, run_id: &str) -> io::Result<Self> {
        Self::create_in(Path::new("."), source_db, target_db, run_id)
    }

    /// Create the snapshot directory under `base`.
    pub fn create_in(
        base: &Path,
        source_db: &str,
        target_db: &str,
        run_id: &str,
    ) -> io::Result<Self> {
        let dir = base.join(format!("logs-{source_db}-{target_db}-{run_id}"));
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Write one side's normalized definition as
    /// `<SOURCE|TARGET>-<kind>-<schema>-<name>.sql`.
    pub async fn write_snapshot(&self, side: Side, object: &SchemaObject, normalized: &str) {
        let file_name = format!(
            "{}-{}-{}-{}.sql",
            side.snapshot_prefix(),
            object.kind.type_desc(),
            object.schema,
            object.name,
        );
        let path = self.dir.join(file_name);

        if let Err(e) = tokio::fs::write(&path, normalized).await {
            warn!(
                "failed to write {side} definition snapshot {}: {e}",
                path.display()
            );
        }
    }
}
