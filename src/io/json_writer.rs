use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};

use crate::ctx::Ctx;
use crate::metrics::FunctionalReference;
use crate::schema::v1::{
    AutoQcV1, Counts, FunctionalReferenceKind, InputMeta, References, ScanReport,
};
use crate::template::TEMPLATE;

pub fn build_report(ctx: &Ctx) -> Result<AutoQcV1> {
    let annotated = ctx.qc_table()?;
    let masks = ctx.references()?;

    let input_meta = InputMeta {
        derivatives: ctx.derivatives.display().to_string(),
        analysis_level: ctx.analysis_level,
        subjects: ctx.subjects.clone(),
        tasks: ctx.tasks.clone(),
        template: TEMPLATE.to_string(),
    };

    let references = match &masks.func_source {
        FunctionalReference::Template => References {
            anat: masks.template_path.display().to_string(),
            func: FunctionalReferenceKind::Template,
            func_masks: None,
            uncovered_subjects: Vec::new(),
        },
        FunctionalReference::GroupIntersection {
            n_masks,
            uncovered_subjects,
        } => References {
            anat: masks.template_path.display().to_string(),
            func: FunctionalReferenceKind::GroupIntersection,
            func_masks: Some(*n_masks),
            uncovered_subjects: uncovered_subjects.clone(),
        },
    };

    let headers = annotated.entities.headers();
    let scans = annotated
        .table
        .rows
        .iter()
        .zip(&annotated.entities.rows)
        .map(|(row, values)| {
            let motion = row.metrics.motion;
            let entities: BTreeMap<String, String> =
                headers.iter().cloned().zip(values.iter().cloned()).collect();
            ScanReport {
                identifier: row.identifier.to_string(),
                entities,
                timeseries_length: motion.map(|m| m.timeseries_length),
                mean_fd_raw: motion.and_then(|m| m.mean_fd_raw),
                mean_fd_scrubbed: motion.and_then(|m| m.mean_fd_scrubbed),
                proportion_kept: motion.map(|m| m.proportion_kept),
                functional_dice: row.metrics.functional_dice,
                anatomical_dice: row.anatomical_dice,
                pass_func_qc: row.pass_func_qc,
                pass_anat_qc: row.pass_anat_qc,
                pass_all_qc: row.pass_all_qc,
            }
        })
        .collect::<Vec<_>>();

    let counts = Counts {
        total: annotated.table.len(),
        passed_func: annotated.table.passed_functional(),
        passed_anat: annotated.table.passed_anatomical(),
        passed_all: annotated.table.passed(),
    };

    Ok(AutoQcV1 {
        tool: "fmriprep-autoqc".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        schema_version: "v1".to_string(),
        input_meta,
        thresholds: ctx.thresholds,
        references,
        scans,
        counts,
        warnings: ctx.warnings.clone(),
    })
}

pub fn write_json(path: &Path, ctx: &Ctx) -> Result<()> {
    let report = build_report(ctx)?;
    let file = std::fs::File::create(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    let writer = std::io::BufWriter::new(file);
    serde_json::to_writer_pretty(writer, &report)?;
    Ok(())
}
