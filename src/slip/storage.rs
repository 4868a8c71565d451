use super::types::{PersistedSnapshot, SNAPSHOT_VERSION};
use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use std::fs::File;
use std::path::{Path, PathBuf};

/// Where a score sheet keeps its snapshot.
pub trait SlipStore {
    /// Read the saved snapshot. `Ok(None)` means nothing has been saved yet.
    fn read(&self) -> Result<Option<PersistedSnapshot>>;

    /// Replace the saved snapshot.
    fn write(&mut self, snapshot: &PersistedSnapshot) -> Result<()>;
}

/// Snapshot stored as a JSON file (default: ~/.config/points-slip/slip.json).
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SlipStore for JsonFileStore {
    /// If the file doesn't exist, returns `Ok(None)`.
    /// If the file exists but has an unsupported version, returns an error.
    fn read(&self) -> Result<Option<PersistedSnapshot>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let file = File::open(&self.path)
            .with_context(|| format!("Failed to open slip file at {}", self.path.display()))?;

        let snapshot: PersistedSnapshot =
            serde_json::from_reader(file).context("Failed to load slip")?;

        if snapshot.version != SNAPSHOT_VERSION {
            anyhow::bail!("Unsupported slip version: {}", snapshot.version);
        }

        Ok(Some(snapshot))
    }

    /// Uses atomic-write-file so the slip is never left half-written.
    fn write(&mut self, snapshot: &PersistedSnapshot) -> Result<()> {
        crate::config::ensure_parent_dir(&self.path)?;

        let mut file = AtomicWriteFile::open(&self.path).with_context(|| {
            format!("Failed to open atomic write file at {}", self.path.display())
        })?;

        serde_json::to_writer_pretty(&mut file, snapshot).context("Failed to serialize slip")?;

        file.commit().context("Failed to save slip")?;

        Ok(())
    }
}

/// In-memory store for tests and dry runs.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    pub snapshot: Option<PersistedSnapshot>,
    pub writes: usize,
    /// When set, every write fails
    pub fail_writes: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_snapshot(snapshot: PersistedSnapshot) -> Self {
        Self {
            snapshot: Some(snapshot),
            ..Self::default()
        }
    }
}

impl SlipStore for MemoryStore {
    fn read(&self) -> Result<Option<PersistedSnapshot>> {
        Ok(self.snapshot.clone())
    }

    fn write(&mut self, snapshot: &PersistedSnapshot) -> Result<()> {
        if self.fail_writes {
            anyhow::bail!("Failed to save slip: store is read-only");
        }
        self.snapshot = Some(snapshot.clone());
        self.writes += 1;
        Ok(())
    }
}
