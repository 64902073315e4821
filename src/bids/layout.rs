use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use tracing::{debug, info};
use walkdir::{DirEntry, WalkDir};

use crate::bids::{BidsName, Dataset, EntityFilter};

const DATATYPES: &[&str] = &[
    "anat", "func", "dwi", "fmap", "perf", "beh", "eeg", "meg", "ieeg", "pet",
];

#[derive(Debug, Clone)]
struct IndexedFile {
    path: PathBuf,
    name: BidsName,
    datatype: Option<String>,
}

/// In-memory index of every BIDS-named file below a derivative root.
#[derive(Debug, Clone)]
pub struct BidsLayout {
    root: PathBuf,
    files: Vec<IndexedFile>,
}

impl BidsLayout {
    pub fn open(root: &Path) -> Result<Self> {
        if !root.is_dir() {
            bail!("dataset root {} is not a directory", root.display());
        }

        let mut files = Vec::new();
        let walker = WalkDir::new(root)
            .min_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| !is_hidden(e));
        for entry in walker {
            let entry =
                entry.with_context(|| format!("failed to index {}", root.display()))?;
            if !entry.file_type().is_file() {
                continue;
            }
            let Some(name) = BidsName::from_path(entry.path()) else {
                debug!(path = %entry.path().display(), "skipping non-BIDS file");
                continue;
            };
            files.push(IndexedFile {
                datatype: datatype_of(entry.path()),
                path: entry.path().to_path_buf(),
                name,
            });
        }
        files.sort_by(|a, b| a.path.cmp(&b.path));

        info!(root = %root.display(), files = files.len(), "dataset_indexed");
        Ok(Self {
            root: root.to_path_buf(),
            files,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    fn entity_values(&self, key: &str) -> Vec<String> {
        let values: BTreeSet<&str> = self.files.iter().filter_map(|f| f.name.get(key)).collect();
        values.into_iter().map(str::to_string).collect()
    }
}

impl Dataset for BidsLayout {
    fn get(&self, filter: &EntityFilter) -> Result<Vec<PathBuf>> {
        Ok(self
            .files
            .iter()
            .filter(|f| filter.matches(&f.name, f.datatype.as_deref()))
            .map(|f| f.path.clone())
            .collect())
    }

    fn subjects(&self) -> Vec<String> {
        self.entity_values("sub")
    }

    fn tasks(&self) -> Vec<String> {
        self.entity_values("task")
    }
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.depth() > 0
        && entry
            .file_name()
            .to_str()
            .map(|s| s.starts_with('.'))
            .unwrap_or(false)
}

fn datatype_of(path: &Path) -> Option<String> {
    let parent = path.parent()?.file_name()?.to_str()?;
    if DATATYPES.contains(&parent) {
        Some(parent.to_string())
    } else {
        None
    }
}
