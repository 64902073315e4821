use std::collections::BTreeSet;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use serde::Serialize;
use tracing::{info, warn};

use crate::bids::{BidsName, Dataset};
use crate::error::QcError;
use crate::metrics::{functional_mask_filter, map_files};
use crate::template::{TEMPLATE, TEMPLATE_RESOLUTION, TemplateRepository};
use crate::volume::{MaskVolume, intersect_masks, nifti_io};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisLevel {
    Participant,
    Group,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GroupMaskOptions {
    pub threshold: f64,
    pub connected: bool,
}

impl Default for GroupMaskOptions {
    fn default() -> Self {
        Self {
            threshold: 0.5,
            connected: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FunctionalReference {
    Template,
    GroupIntersection {
        n_masks: usize,
        uncovered_subjects: Vec<String>,
    },
}

/// Reference masks shared read-only by both metric calculators.
#[derive(Debug, Clone)]
pub struct ReferenceMasks {
    pub anat: Arc<MaskVolume>,
    pub func: Arc<MaskVolume>,
    pub template_path: PathBuf,
    pub func_source: FunctionalReference,
}

impl ReferenceMasks {
    pub fn is_group_level(&self) -> bool {
        matches!(self.func_source, FunctionalReference::GroupIntersection { .. })
    }
}

pub fn resolve_references<D, T>(
    level: AnalysisLevel,
    subjects: &[String],
    tasks: &[String],
    dataset: &D,
    templates: &T,
    options: &GroupMaskOptions,
) -> Result<ReferenceMasks>
where
    D: Dataset + ?Sized,
    T: TemplateRepository + ?Sized,
{
    if subjects.is_empty() {
        return Err(QcError::NoInputScans("no subjects requested".to_string()).into());
    }

    let template_path = templates.get(TEMPLATE, "brain", "mask", TEMPLATE_RESOLUTION)?;
    let anat = Arc::new(nifti_io::read_mask(&template_path)?);

    if level != AnalysisLevel::Group || subjects.len() < 2 {
        return Ok(ReferenceMasks {
            func: Arc::clone(&anat),
            anat,
            template_path,
            func_source: FunctionalReference::Template,
        });
    }

    info!(subjects = subjects.len(), "Create dataset level functional brain mask");
    let paths = dataset.get(&functional_mask_filter(subjects, tasks))?;
    if paths.is_empty() {
        return Err(QcError::NoInputScans(format!(
            "no functional brain masks in space {} for the requested subjects",
            TEMPLATE
        ))
        .into());
    }

    let covered: BTreeSet<String> = paths
        .iter()
        .filter_map(|p| BidsName::from_path(p))
        .filter_map(|n| n.get("sub").map(str::to_string))
        .collect();
    let uncovered_subjects: Vec<String> = subjects
        .iter()
        .filter(|s| !covered.contains(*s))
        .cloned()
        .collect();
    for subject in &uncovered_subjects {
        warn!(subject = %subject, "no functional mask contributes to the group reference");
    }

    let masks = map_files(&paths, nifti_io::read_mask)?;
    let func = intersect_masks(&masks, options.threshold, options.connected)?;
    info!(
        masks = masks.len(),
        voxels = func.count(),
        "group_functional_mask_ready"
    );

    Ok(ReferenceMasks {
        anat,
        func: Arc::new(func),
        template_path,
        func_source: FunctionalReference::GroupIntersection {
            n_masks: masks.len(),
            uncovered_subjects,
        },
    })
}
