use anyhow::Result;
use tracing::info;

use crate::ctx::Ctx;
use crate::metrics::compute_functional_metrics;
use crate::pipeline::{Stage, run_in_pool};

pub struct Stage3Functional;

impl Stage3Functional {
    pub fn new() -> Self {
        Self
    }
}

impl Stage for Stage3Functional {
    fn name(&self) -> &'static str {
        "stage3_functional"
    }

    fn run(&self, ctx: &mut Ctx) -> Result<()> {
        let layout = ctx.layout()?;
        let references = ctx.references()?;
        let (subjects, tasks, thresholds) = (&ctx.subjects, &ctx.tasks, ctx.thresholds);

        let table = run_in_pool(ctx.threads, move || {
            compute_functional_metrics(subjects, tasks, layout, references, &thresholds)
        })??;

        let missing_dice = table.values().filter(|m| m.functional_dice.is_none()).count();
        let missing_motion = table.values().filter(|m| m.motion.is_none()).count();
        if missing_dice > 0 {
            ctx.warnings
                .push(format!("{} scans have no functional brain mask", missing_dice));
        }
        if missing_motion > 0 {
            ctx.warnings
                .push(format!("{} scans have no confounds file", missing_motion));
        }

        info!(scans = table.len(), "functional_ready");
        ctx.functional_metrics = Some(table);
        Ok(())
    }
}
