use anyhow::Result;
use tracing::info;

use crate::bids::Dataset;
use crate::error::QcError;
use crate::metrics::{AnatomicalMetrics, AnatomicalMetricsTable, ReferenceMasks, anatomical_mask_filter, map_files};
use crate::qc::QcThresholds;
use crate::volume::{dice_with_reference, nifti_io};

/// Dice of each subject's anatomical brain mask against the template mask.
/// Every subject must have exactly one mask.
pub fn compute_anatomical_metrics<D>(
    subjects: &[String],
    dataset: &D,
    references: &ReferenceMasks,
    thresholds: &QcThresholds,
) -> Result<AnatomicalMetricsTable>
where
    D: Dataset + ?Sized,
{
    info!(subjects = subjects.len(), "Calculate the anatomical dice score.");

    let mut paths = Vec::with_capacity(subjects.len());
    for subject in subjects {
        let mut found = dataset.get(&anatomical_mask_filter(subject))?;
        match found.len() {
            0 => {
                return Err(QcError::MissingAnatomicalMask {
                    subject: subject.clone(),
                }
                .into());
            }
            1 => paths.push(found.remove(0)),
            count => {
                return Err(QcError::AmbiguousAnatomicalMask {
                    subject: subject.clone(),
                    count,
                }
                .into());
            }
        }
    }

    let reference = references.anat.as_ref();
    let scores = map_files(&paths, |path| {
        let mask = nifti_io::read_mask(path)?;
        dice_with_reference(&mask, reference)
    })?;

    let table: AnatomicalMetricsTable = subjects
        .iter()
        .cloned()
        .zip(scores)
        .map(|(subject, anatomical_dice)| {
            let metrics = AnatomicalMetrics {
                anatomical_dice,
                pass_qc: thresholds.passes_anatomical(anatomical_dice),
            };
            (subject, metrics)
        })
        .collect();

    info!(subjects = table.len(), "anatomical_metrics_ready");
    Ok(table)
}
