use std::collections::BTreeMap;

use serde::Serialize;

use crate::metrics::AnalysisLevel;
use crate::qc::QcThresholds;

#[derive(Debug, Clone, Serialize)]
pub struct InputMeta {
    pub derivatives: String,
    pub analysis_level: AnalysisLevel,
    pub subjects: Vec<String>,
    pub tasks: Vec<String>,
    pub template: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FunctionalReferenceKind {
    Template,
    GroupIntersection,
}

#[derive(Debug, Clone, Serialize)]
pub struct References {
    pub anat: String,
    pub func: FunctionalReferenceKind,
    pub func_masks: Option<usize>,
    pub uncovered_subjects: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScanReport {
    pub identifier: String,
    pub entities: BTreeMap<String, String>,
    pub timeseries_length: Option<usize>,
    pub mean_fd_raw: Option<f64>,
    pub mean_fd_scrubbed: Option<f64>,
    pub proportion_kept: Option<f64>,
    pub functional_dice: Option<f64>,
    pub anatomical_dice: f64,
    pub pass_func_qc: bool,
    pub pass_anat_qc: bool,
    pub pass_all_qc: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct Counts {
    pub total: usize,
    pub passed_func: usize,
    pub passed_anat: usize,
    pub passed_all: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct AutoQcV1 {
    pub tool: String,
    pub version: String,
    pub schema_version: String,
    pub input_meta: InputMeta,
    pub thresholds: QcThresholds,
    pub references: References,
    pub scans: Vec<ScanReport>,
    pub counts: Counts,
    pub warnings: Vec<String>,
}
