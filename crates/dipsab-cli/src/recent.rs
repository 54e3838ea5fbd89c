use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;

/// File holding the recent-projects list, relative to the working directory.
pub const RECENTS_FILE: &str = ".dipsab";
/// Number of projects remembered.
pub const RECENTS_LIMIT: usize = 5;

/// Most-recently-used project paths, newest first.
///
/// Stored as `[[path, ...]]` so the outer array can grow more settings later.
#[derive(Debug, Default)]
pub struct RecentFiles {
    store: PathBuf,
    names: Vec<String>,
}

impl RecentFiles {
    /// Loads the list from `store`; a missing or unreadable file gives an empty list.
    pub fn load(store: impl Into<PathBuf>) -> Self {
        let store = store.into();
        let names = fs::read_to_string(&store)
            .ok()
            .and_then(|text| serde_json::from_str::<Vec<Vec<String>>>(&text).ok())
            .and_then(|mut outer| (!outer.is_empty()).then(|| outer.swap_remove(0)))
            .unwrap_or_default();
        Self { store, names }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Moves `candidate` to the front, drops the oldest beyond the limit and persists.
    pub fn update(&mut self, candidate: &Path) -> anyhow::Result<()> {
        let candidate = candidate.to_string_lossy().into_owned();
        self.names.retain(|n| *n != candidate);
        self.names.insert(0, candidate);
        self.names.truncate(RECENTS_LIMIT);
        let json = serde_json::to_string_pretty(&[&self.names])?;
        fs::write(&self.store, json)
            .with_context(|| format!("write {}", self.store.display()))?;
        Ok(())
    }

    /// The newest entry, if it still exists on disk.
    pub fn top(&self) -> Option<PathBuf> {
        self.names
            .first()
            .map(PathBuf::from)
            .filter(|p| p.is_file())
    }
}
