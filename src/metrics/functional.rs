use std::path::Path;

use anyhow::Result;
use tracing::{info, warn};

use crate::bids::{BidsName, Dataset, ScanIdentifier};
use crate::error::QcError;
use crate::io::confounds::read_framewise_displacement;
use crate::metrics::{
    FunctionalMetricsTable, MotionRecord, ReferenceMasks, confounds_filter, functional_mask_filter,
    map_files, motion_record,
};
use crate::qc::QcThresholds;
use crate::volume::{dice_with_reference, nifti_io};

/// Motion statistics from every confounds file and Dice against the
/// functional reference for every functional brain mask, merged per scan.
pub fn compute_functional_metrics<D>(
    subjects: &[String],
    tasks: &[String],
    dataset: &D,
    references: &ReferenceMasks,
    thresholds: &QcThresholds,
) -> Result<FunctionalMetricsTable>
where
    D: Dataset + ?Sized,
{
    let mut table = FunctionalMetricsTable::new();

    let confounds = dataset.get(&confounds_filter(subjects, tasks))?;
    info!(files = confounds.len(), "Motion...");
    let scrub = thresholds.scrubbing_fd;
    let motion = map_files(&confounds, |path| -> Result<(ScanIdentifier, MotionRecord)> {
        let id = identifier_of(path)?;
        let fd = read_framewise_displacement(path)?;
        Ok((id, motion_record(&fd, scrub)))
    })?;
    for (id, record) in motion {
        let row = table.entry(id.clone()).or_default();
        if row.motion.is_some() {
            warn!(identifier = %id, "several confounds files map to one scan; keeping the last");
        }
        row.motion = Some(record);
    }

    let masks = dataset.get(&functional_mask_filter(subjects, tasks))?;
    info!(files = masks.len(), "Functional dice...");
    let reference = references.func.as_ref();
    let overlap = map_files(&masks, |path| -> Result<(ScanIdentifier, f64)> {
        let id = identifier_of(path)?;
        let scan = nifti_io::read_mask(path)?;
        Ok((id, dice_with_reference(&scan, reference)?))
    })?;
    for (id, dice) in overlap {
        let row = table.entry(id.clone()).or_default();
        if row.functional_dice.is_some() {
            warn!(identifier = %id, "several functional masks map to one scan; keeping the last");
        }
        row.functional_dice = Some(dice);
    }

    info!(scans = table.len(), "functional_metrics_ready");
    Ok(table)
}

pub(crate) fn identifier_of(path: &Path) -> Result<ScanIdentifier> {
    BidsName::from_path(path)
        .and_then(|name| name.scan_identifier())
        .ok_or_else(|| {
            QcError::InvalidIdentifier {
                identifier: path.display().to_string(),
                reason: "file name does not start with BIDS acquisition entities".to_string(),
            }
            .into()
        })
}
