// Durable per-subscription cursor storage

use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;
use watcher_core::Cursor;

/// One JSON file per subscription under a configured directory.
/// Writes go through a temp file and rename so a crash mid-write
/// never leaves a torn cursor behind.
#[derive(Debug)]
pub struct CursorStore {
    dir: PathBuf,
}

impl CursorStore {
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .with_context(|| format!("creating cursor directory {}", dir.display()))?;
        Ok(Self { dir })
    }

    fn path_for(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.json"))
    }

    /// Load the cursor for `name`; a missing file means the
    /// subscription has never been polled.
    pub fn load(&self, name: &str) -> Result<Cursor> {
        let path = self.path_for(name);
        if !path.exists() {
            return Ok(Cursor::new());
        }
        let raw = fs::read_to_string(&path)
            .with_context(|| format!("reading cursor {}", path.display()))?;
        serde_json::from_str(&raw).with_context(|| format!("decoding cursor {}", path.display()))
    }

    pub fn save(&self, name: &str, cursor: &Cursor) -> Result<()> {
        let path = self.path_for(name);
        let tmp = self.dir.join(format!("{name}.json.tmp"));
        let raw = serde_json::to_string_pretty(cursor)?;
        fs::write(&tmp, raw).with_context(|| format!("writing cursor {}", tmp.display()))?;
        fs::rename(&tmp, &path)
            .with_context(|| format!("committing cursor {}", path.display()))?;
        Ok(())
    }
}
