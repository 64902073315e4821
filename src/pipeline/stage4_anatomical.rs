use anyhow::Result;
use tracing::info;

use crate::ctx::Ctx;
use crate::metrics::compute_anatomical_metrics;
use crate::pipeline::{Stage, run_in_pool};

pub struct Stage4Anatomical;

impl Stage4Anatomical {
    pub fn new() -> Self {
        Self
    }
}

impl Stage for Stage4Anatomical {
    fn name(&self) -> &'static str {
        "stage4_anatomical"
    }

    fn run(&self, ctx: &mut Ctx) -> Result<()> {
        let layout = ctx.layout()?;
        let references = ctx.references()?;
        let (subjects, thresholds) = (&ctx.subjects, ctx.thresholds);

        let table = run_in_pool(ctx.threads, move || {
            compute_anatomical_metrics(subjects, layout, references, &thresholds)
        })??;

        let failed = table.values().filter(|m| !m.pass_qc).count();
        info!(subjects = table.len(), failed = failed, "anatomical_ready");
        ctx.anatomical_metrics = Some(table);
        Ok(())
    }
}
