//! JSON-file snapshot history: the last complete snapshot per item slug.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

use anyhow::Context;
use dropp_core::Snapshot;

#[derive(Debug)]
pub(crate) struct HistoryStore {
    path: PathBuf,
    snapshots: BTreeMap<String, Snapshot>,
}

impl HistoryStore {
    /// Loads the history at `path`. A missing file is an empty history.
    pub(crate) fn load(path: &Path) -> anyhow::Result<Self> {
        let snapshots = match std::fs::read_to_string(path) {
            Ok(content) => serde_json::from_str(&content)
                .with_context(|| format!("failed to parse history file {}", path.display()))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                return Err(e)
                    .with_context(|| format!("failed to read history file {}", path.display()))
            }
        };

        Ok(Self {
            path: path.to_path_buf(),
            snapshots,
        })
    }

    pub(crate) fn get(&self, slug: &str) -> Option<&Snapshot> {
        self.snapshots.get(slug)
    }

    /// Replaces the stored snapshot for `slug`, returning the one it superseded.
    pub(crate) fn insert(&mut self, slug: String, snapshot: Snapshot) -> Option<Snapshot> {
        self.snapshots.insert(slug, snapshot)
    }

    /// Drops every entry whose slug is not in `keep`, returning how many
    /// were removed.
    pub(crate) fn retain_slugs(&mut self, keep: &BTreeSet<String>) -> usize {
        let before = self.snapshots.len();
        self.snapshots.retain(|slug, _| keep.contains(slug));
        before - self.snapshots.len()
    }

    pub(crate) fn len(&self) -> usize {
        self.snapshots.len()
    }

    /// Writes the history atomically: a sibling temp file is renamed over
    /// the target.
    pub(crate) fn save(&self) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }

        let json = serde_json::to_string_pretty(&self.snapshots)?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, json)
            .with_context(|| format!("failed to write {}", tmp.display()))?;
        std::fs::rename(&tmp, &self.path)
            .with_context(|| format!("failed to replace {}", self.path.display()))?;
        Ok(())
    }
}
