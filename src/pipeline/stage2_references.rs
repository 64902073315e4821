use anyhow::Result;
use tracing::info;

use crate::ctx::Ctx;
use crate::metrics::{FunctionalReference, resolve_references};
use crate::pipeline::Stage;
use crate::template::TemplateFlowDir;
use crate::volume::nifti_io;

pub struct Stage2References;

impl Stage2References {
    pub fn new() -> Self {
        Self
    }
}

impl Stage for Stage2References {
    fn name(&self) -> &'static str {
        "stage2_references"
    }

    fn run(&self, ctx: &mut Ctx) -> Result<()> {
        let templates = TemplateFlowDir::new(&ctx.templateflow_home);
        let references = resolve_references(
            ctx.analysis_level,
            &ctx.subjects,
            &ctx.tasks,
            ctx.layout()?,
            &templates,
            &ctx.group_mask,
        )?;

        if let FunctionalReference::GroupIntersection {
            uncovered_subjects, ..
        } = &references.func_source
        {
            for subject in uncovered_subjects {
                ctx.warnings.push(format!(
                    "sub-{} has no functional mask in the group reference",
                    subject
                ));
            }
            if ctx.save_group_mask {
                nifti_io::write_mask(&ctx.output.group_mask_path, &references.func)?;
                info!(path = %ctx.output.group_mask_path.display(), "group_mask_written");
            }
        }

        info!(
            template = %references.template_path.display(),
            group = references.is_group_level(),
            "references_ready"
        );
        ctx.references = Some(references);
        Ok(())
    }
}
