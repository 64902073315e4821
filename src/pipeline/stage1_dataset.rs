use anyhow::Result;
use tracing::{info, warn};

use crate::bids::{BidsLayout, Dataset, normalize_label};
use crate::ctx::Ctx;
use crate::error::QcError;
use crate::pipeline::Stage;

pub struct Stage1Dataset;

impl Stage1Dataset {
    pub fn new() -> Self {
        Self
    }
}

impl Stage for Stage1Dataset {
    fn name(&self) -> &'static str {
        "stage1_dataset"
    }

    fn run(&self, ctx: &mut Ctx) -> Result<()> {
        let layout = BidsLayout::open(&ctx.derivatives)?;

        let (subjects, warnings) = select_labels(&ctx.subjects, layout.subjects(), "sub");
        ctx.warnings.extend(warnings);
        let (tasks, warnings) = select_labels(&ctx.tasks, layout.tasks(), "task");
        ctx.warnings.extend(warnings);

        if subjects.is_empty() {
            return Err(QcError::NoInputScans(format!(
                "no subjects found in {}",
                ctx.derivatives.display()
            ))
            .into());
        }
        if tasks.is_empty() {
            return Err(QcError::NoInputScans(format!(
                "no functional tasks found in {}",
                ctx.derivatives.display()
            ))
            .into());
        }

        info!(
            subjects = subjects.len(),
            tasks = %tasks.join(","),
            "dataset_ready"
        );
        ctx.subjects = subjects;
        ctx.tasks = tasks;
        ctx.layout = Some(layout);
        Ok(())
    }
}

/// Requested labels (prefix-normalised), or everything available when
/// nothing was requested. Labels absent from the dataset are kept and
/// reported.
fn select_labels(requested: &[String], available: Vec<String>, key: &str) -> (Vec<String>, Vec<String>) {
    if requested.is_empty() {
        return (available, Vec::new());
    }
    let mut selected: Vec<String> = requested.iter().map(|l| normalize_label(l, key)).collect();
    selected.sort();
    selected.dedup();

    let mut warnings = Vec::new();
    for label in &selected {
        if !available.contains(label) {
            warn!(entity = key, label = %label, "requested label not found in dataset");
            warnings.push(format!("{}-{} not found in dataset", key, label));
        }
    }
    (selected, warnings)
}
