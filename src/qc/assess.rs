use anyhow::Result;
use tracing::info;

use crate::bids::ScanIdentifier;
use crate::error::QcError;
use crate::metrics::{AnatomicalMetricsTable, FunctionalMetrics, FunctionalMetricsTable};
use crate::qc::QcThresholds;

#[derive(Debug, Clone, PartialEq)]
pub struct QcRow {
    pub identifier: ScanIdentifier,
    pub metrics: FunctionalMetrics,
    pub pass_func_qc: bool,
    pub anatomical_dice: f64,
    pub pass_anat_qc: bool,
    pub pass_all_qc: bool,
}

/// One row per functional scan, in identifier order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CombinedQcTable {
    pub rows: Vec<QcRow>,
}

impl CombinedQcTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn passed(&self) -> usize {
        self.rows.iter().filter(|r| r.pass_all_qc).count()
    }

    pub fn passed_functional(&self) -> usize {
        self.rows.iter().filter(|r| r.pass_func_qc).count()
    }

    pub fn passed_anatomical(&self) -> usize {
        self.rows.iter().filter(|r| r.pass_anat_qc).count()
    }

    pub fn summary_line(&self) -> String {
        format!(
            "{} out of {} functional scans passed automatic QC.",
            self.passed(),
            self.len()
        )
    }
}

/// Applies the thresholds to the functional rows and joins each with its
/// subject's anatomical result.
pub fn assess_quality(
    functional: &FunctionalMetricsTable,
    anatomical: &AnatomicalMetricsTable,
    thresholds: &QcThresholds,
) -> Result<CombinedQcTable> {
    let mut rows = Vec::with_capacity(functional.len());
    for (identifier, metrics) in functional {
        let subject = identifier.subject().ok_or_else(|| QcError::InvalidIdentifier {
            identifier: identifier.to_string(),
            reason: "no sub entity".to_string(),
        })?;
        let anat = anatomical
            .get(subject)
            .ok_or_else(|| QcError::UnknownSubject {
                identifier: identifier.to_string(),
                subject: subject.to_string(),
            })?;

        let pass_func_qc = thresholds.passes_functional(metrics);
        rows.push(QcRow {
            identifier: identifier.clone(),
            metrics: *metrics,
            pass_func_qc,
            anatomical_dice: anat.anatomical_dice,
            pass_anat_qc: anat.pass_qc,
            pass_all_qc: pass_func_qc && anat.pass_qc,
        });
    }

    let table = CombinedQcTable { rows };
    info!(
        passed = table.passed(),
        total = table.len(),
        "{}",
        table.summary_line()
    );
    Ok(table)
}
