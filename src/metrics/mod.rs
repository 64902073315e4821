use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::Serialize;

#[cfg(feature = "mt")]
use rayon::prelude::*;

use crate::bids::{EntityFilter, ScanIdentifier};
use crate::template::TEMPLATE;

pub mod anatomical;
pub mod functional;
pub mod motion;
pub mod reference;

pub use anatomical::compute_anatomical_metrics;
pub use functional::compute_functional_metrics;
pub use motion::motion_record;
pub use reference::{AnalysisLevel, FunctionalReference, GroupMaskOptions, ReferenceMasks, resolve_references};

const MASK_EXTENSION: &str = "nii.gz";

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MotionRecord {
    pub timeseries_length: usize,
    pub mean_fd_raw: Option<f64>,
    pub mean_fd_scrubbed: Option<f64>,
    pub proportion_kept: f64,
}

/// Per-scan row. A field stays `None` when its phase produced nothing for
/// the scan.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FunctionalMetrics {
    pub motion: Option<MotionRecord>,
    pub functional_dice: Option<f64>,
}

impl FunctionalMetrics {
    pub fn mean_fd_raw(&self) -> Option<f64> {
        self.motion.and_then(|m| m.mean_fd_raw)
    }

    pub fn proportion_kept(&self) -> Option<f64> {
        self.motion.map(|m| m.proportion_kept)
    }
}

pub type FunctionalMetricsTable = BTreeMap<ScanIdentifier, FunctionalMetrics>;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AnatomicalMetrics {
    pub anatomical_dice: f64,
    pub pass_qc: bool,
}

pub type AnatomicalMetricsTable = BTreeMap<String, AnatomicalMetrics>;

pub fn confounds_filter(subjects: &[String], tasks: &[String]) -> EntityFilter {
    EntityFilter::new()
        .subjects(subjects.iter().cloned())
        .tasks(tasks.iter().cloned())
        .desc("confounds")
        .extension("tsv")
}

pub fn functional_mask_filter(subjects: &[String], tasks: &[String]) -> EntityFilter {
    EntityFilter::new()
        .subjects(subjects.iter().cloned())
        .tasks(tasks.iter().cloned())
        .space(TEMPLATE)
        .desc("brain")
        .suffix("mask")
        .extension(MASK_EXTENSION)
        .datatype("func")
}

pub fn anatomical_mask_filter(subject: &str) -> EntityFilter {
    EntityFilter::new()
        .subjects([subject])
        .space(TEMPLATE)
        .desc("brain")
        .suffix("mask")
        .extension(MASK_EXTENSION)
        .datatype("anat")
}

// Per-file work is independent; results keep the input order.
pub(crate) fn map_files<T, F>(paths: &[PathBuf], f: F) -> Result<Vec<T>>
where
    T: Send,
    F: Fn(&Path) -> Result<T> + Sync + Send,
{
    #[cfg(feature = "mt")]
    {
        paths.par_iter().map(|p| f(p)).collect()
    }
    #[cfg(not(feature = "mt"))]
    {
        paths.iter().map(|p| f(p)).collect()
    }
}
