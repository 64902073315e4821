use std::io::{BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result, bail};

use crate::ctx::Ctx;
use crate::io::MISSING;
use crate::qc::AnnotatedQcTable;

const METRIC_COLUMNS: &[&str] = &[
    "timeseries_length",
    "mean_fd_raw",
    "mean_fd_scrubbed",
    "proportion_kept",
    "functional_dice",
    "pass_func_qc",
    "anatomical_dice",
    "pass_anat_qc",
    "pass_all_qc",
];

pub fn write_tsv(path: &Path, ctx: &Ctx) -> Result<()> {
    write_table(path, ctx.qc_table()?)
}

/// `identifier`, the parsed entity columns, then metrics and decisions.
pub fn write_table(path: &Path, annotated: &AnnotatedQcTable) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    let mut w = BufWriter::new(file);

    let entities = &annotated.entities;
    let rows = &annotated.table.rows;
    if entities.rows.len() != rows.len() {
        bail!(
            "entity rows length mismatch: {} != {}",
            entities.rows.len(),
            rows.len()
        );
    }

    let mut header = vec!["identifier".to_string()];
    header.extend(entities.headers());
    header.extend(METRIC_COLUMNS.iter().map(|c| c.to_string()));
    writeln!(w, "{}", header.join("\t"))?;

    for (row, values) in rows.iter().zip(&entities.rows) {
        let motion = row.metrics.motion;
        let mut fields = vec![row.identifier.to_string()];
        fields.extend(values.iter().cloned());
        fields.push(
            motion
                .map(|m| m.timeseries_length.to_string())
                .unwrap_or_else(|| MISSING.to_string()),
        );
        fields.push(float(motion.and_then(|m| m.mean_fd_raw)));
        fields.push(float(motion.and_then(|m| m.mean_fd_scrubbed)));
        fields.push(float(motion.map(|m| m.proportion_kept)));
        fields.push(float(row.metrics.functional_dice));
        fields.push(boolean(row.pass_func_qc));
        fields.push(float(Some(row.anatomical_dice)));
        fields.push(boolean(row.pass_anat_qc));
        fields.push(boolean(row.pass_all_qc));
        writeln!(w, "{}", fields.join("\t"))?;
    }

    w.flush()?;
    Ok(())
}

fn float(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => format!("{:.6}", v),
        _ => MISSING.to_string(),
    }
}

fn boolean(value: bool) -> String {
    if value { "True" } else { "False" }.to_string()
}
