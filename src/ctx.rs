use std::path::PathBuf;

use anyhow::Context;

use crate::bids::BidsLayout;
use crate::metrics::{
    AnalysisLevel, AnatomicalMetricsTable, FunctionalMetricsTable, GroupMaskOptions, ReferenceMasks,
};
use crate::qc::{AnnotatedQcTable, QcThresholds};

#[derive(Debug, Clone)]
pub struct OutputPaths {
    pub out_dir: PathBuf,
    pub json_path: PathBuf,
    pub group_mask_path: PathBuf,
}

impl OutputPaths {
    pub fn new(out_dir: PathBuf) -> Self {
        Self {
            json_path: out_dir.join("autoqc.json"),
            group_mask_path: out_dir.join("group_func_mask.nii.gz"),
            out_dir,
        }
    }

    /// `task-<name>_report.tsv`, several tasks joined with `+`.
    pub fn tsv_path(&self, tasks: &[String]) -> PathBuf {
        let label = if tasks.is_empty() {
            "all".to_string()
        } else {
            tasks.join("+")
        };
        self.out_dir.join(format!("task-{}_report.tsv", label))
    }
}

#[derive(Debug)]
pub struct Ctx {
    pub derivatives: PathBuf,
    pub analysis_level: AnalysisLevel,
    pub subjects: Vec<String>,
    pub tasks: Vec<String>,
    pub templateflow_home: PathBuf,
    pub thresholds: QcThresholds,
    pub group_mask: GroupMaskOptions,
    pub save_group_mask: bool,
    pub write_json: bool,
    pub threads: usize,
    pub layout: Option<BidsLayout>,
    pub references: Option<ReferenceMasks>,
    pub functional_metrics: Option<FunctionalMetricsTable>,
    pub anatomical_metrics: Option<AnatomicalMetricsTable>,
    pub qc_table: Option<AnnotatedQcTable>,
    pub warnings: Vec<String>,
    pub output: OutputPaths,
}

impl Ctx {
    pub fn new(
        derivatives: PathBuf,
        out_dir: PathBuf,
        analysis_level: AnalysisLevel,
        subjects: Vec<String>,
        tasks: Vec<String>,
        templateflow_home: PathBuf,
    ) -> Self {
        Self {
            derivatives,
            analysis_level,
            subjects,
            tasks,
            templateflow_home,
            thresholds: QcThresholds::STANDARD,
            group_mask: GroupMaskOptions::default(),
            save_group_mask: false,
            write_json: false,
            threads: 0,
            layout: None,
            references: None,
            functional_metrics: None,
            anatomical_metrics: None,
            qc_table: None,
            warnings: Vec::new(),
            output: OutputPaths::new(out_dir),
        }
    }

    pub fn layout(&self) -> anyhow::Result<&BidsLayout> {
        self.layout.as_ref().context("dataset layout not indexed")
    }

    pub fn references(&self) -> anyhow::Result<&ReferenceMasks> {
        self.references.as_ref().context("reference masks not resolved")
    }

    pub fn qc_table(&self) -> anyhow::Result<&AnnotatedQcTable> {
        self.qc_table.as_ref().context("QC table not assessed")
    }

    pub fn tsv_path(&self) -> PathBuf {
        self.output.tsv_path(&self.tasks)
    }
}
