use anyhow::{Context, Result};
use tracing::info;

use crate::ctx::Ctx;
use crate::pipeline::Stage;
use crate::qc::{assess_quality, parse_identifiers};

pub struct Stage5Assess;

impl Stage5Assess {
    pub fn new() -> Self {
        Self
    }
}

impl Stage for Stage5Assess {
    fn name(&self) -> &'static str {
        "stage5_assess"
    }

    fn run(&self, ctx: &mut Ctx) -> Result<()> {
        let functional = ctx
            .functional_metrics
            .as_ref()
            .context("functional metrics missing")?;
        let anatomical = ctx
            .anatomical_metrics
            .as_ref()
            .context("anatomical metrics missing")?;

        let table = assess_quality(functional, anatomical, &ctx.thresholds)?;
        let annotated = parse_identifiers(table)?;

        info!(
            entities = %annotated.entities.headers().join(","),
            "qc_table_ready"
        );
        ctx.qc_table = Some(annotated);
        Ok(())
    }
}
