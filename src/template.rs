use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::info;

use crate::bids::BidsName;
use crate::error::QcError;

/// Standard space every reference and scan mask is compared in.
pub const TEMPLATE: &str = "MNI152NLin2009cAsym";
pub const TEMPLATE_RESOLUTION: &str = "01";

pub trait TemplateRepository {
    fn get(&self, template: &str, desc: &str, suffix: &str, resolution: &str) -> Result<PathBuf>;
}

/// Local TemplateFlow home, laid out as
/// `tpl-<name>/tpl-<name>_res-<res>_desc-<desc>_<suffix>.nii.gz`.
#[derive(Debug, Clone)]
pub struct TemplateFlowDir {
    home: PathBuf,
}

impl TemplateFlowDir {
    pub fn new(home: impl Into<PathBuf>) -> Self {
        Self { home: home.into() }
    }

    pub fn default_home() -> PathBuf {
        match std::env::var_os("HOME") {
            Some(home) => PathBuf::from(home).join(".cache").join("templateflow"),
            None => PathBuf::from(".templateflow"),
        }
    }

    pub fn home(&self) -> &Path {
        &self.home
    }

    pub fn brain_mask(&self) -> Result<PathBuf> {
        self.get(TEMPLATE, "brain", "mask", TEMPLATE_RESOLUTION)
    }
}

impl TemplateRepository for TemplateFlowDir {
    fn get(&self, template: &str, desc: &str, suffix: &str, resolution: &str) -> Result<PathBuf> {
        let query = format!(
            "tpl-{}_res-{}_desc-{}_{}",
            template, resolution, desc, suffix
        );
        let dir = self.home.join(format!("tpl-{}", template));
        if !dir.is_dir() {
            return Err(QcError::TemplateNotFound(format!(
                "{} (no directory {})",
                query,
                dir.display()
            ))
            .into());
        }

        let mut matches = Vec::new();
        for entry in std::fs::read_dir(&dir)
            .with_context(|| format!("failed to list {}", dir.display()))?
        {
            let path = entry?.path();
            let Some(name) = BidsName::from_path(&path) else {
                continue;
            };
            if name.get("tpl") == Some(template)
                && name.get("res").is_some_and(|r| same_resolution(r, resolution))
                && name.get("desc") == Some(desc)
                && name.suffix.as_deref() == Some(suffix)
                && (name.extension == ".nii.gz" || name.extension == ".nii")
            {
                matches.push(path);
            }
        }
        matches.sort();

        match matches.len() {
            0 => Err(QcError::TemplateNotFound(query).into()),
            1 => {
                let path = matches.remove(0);
                info!(template = template, path = %path.display(), "template_resolved");
                Ok(path)
            }
            count => Err(QcError::AmbiguousTemplate { query, count }.into()),
        }
    }
}

// `res-1` and `res-01` name the same resolution.
fn same_resolution(a: &str, b: &str) -> bool {
    match (a.parse::<u32>(), b.parse::<u32>()) {
        (Ok(x), Ok(y)) => x == y,
        _ => a == b,
    }
}
