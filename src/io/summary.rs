use anyhow::Result;

use crate::bids::Dataset;
use crate::ctx::Ctx;
use crate::metrics::{
    AnalysisLevel, FunctionalReference, anatomical_mask_filter, confounds_filter,
    functional_mask_filter,
};

pub fn format_summary(ctx: &Ctx) -> Result<String> {
    let version = env!("CARGO_PKG_VERSION");
    let annotated = ctx.qc_table()?;
    let references = ctx.references()?;
    let level = match ctx.analysis_level {
        AnalysisLevel::Participant => "participant",
        AnalysisLevel::Group => "group",
    };

    let mut out = String::new();
    out.push_str(&format!("fmriprep-autoqc v{}\n", version));
    out.push_str(&format!(
        "Input: {} subjects, tasks={}, level={}\n",
        ctx.subjects.len(),
        ctx.tasks.join(","),
        level
    ));
    match &references.func_source {
        FunctionalReference::Template => {
            out.push_str("Functional reference: template mask\n");
        }
        FunctionalReference::GroupIntersection { n_masks, .. } => {
            out.push_str(&format!(
                "Functional reference: group intersection of {} masks\n",
                n_masks
            ));
        }
    }
    out.push_str(&format!("{}\n", annotated.table.summary_line()));
    Ok(out)
}

/// Per-subject file inventory for the `validate` command. `problems`
/// would abort a full run, `warnings` would only drop rows.
#[derive(Debug, Clone, Default)]
pub struct Inventory {
    pub lines: Vec<String>,
    pub problems: Vec<String>,
    pub warnings: Vec<String>,
}

pub fn inventory<D>(dataset: &D, subjects: &[String], tasks: &[String]) -> Result<Inventory>
where
    D: Dataset + ?Sized,
{
    let mut inv = Inventory::default();
    inv.lines
        .push("subject\tconfounds\tfunc_masks\tanat_masks".to_string());
    for subject in subjects {
        let one = std::slice::from_ref(subject);
        let confounds = dataset.get(&confounds_filter(one, tasks))?.len();
        let func = dataset.get(&functional_mask_filter(one, tasks))?.len();
        let anat = dataset.get(&anatomical_mask_filter(subject))?.len();
        inv.lines.push(format!(
            "sub-{}\t{}\t{}\t{}",
            subject, confounds, func, anat
        ));
        if anat != 1 {
            inv.problems.push(format!(
                "sub-{}: expected exactly one anatomical brain mask, found {}",
                subject, anat
            ));
        }
        if confounds == 0 && func == 0 {
            inv.warnings
                .push(format!("sub-{}: no functional data for the requested tasks", subject));
        }
    }
    Ok(inv)
}
