use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result, bail};

use crate::error::QcError;
use crate::io::open_maybe_gz;

pub const FRAMEWISE_DISPLACEMENT: &str = "framewise_displacement";

const MISSING_TOKENS: &[&str] = &["", "n/a", "na", "nan"];

pub fn read_framewise_displacement(path: &Path) -> Result<Vec<f64>> {
    read_tsv_column(path, FRAMEWISE_DISPLACEMENT)
}

/// One numeric column of a tab-separated file with a header row.
/// Missing values (`n/a`, empty, `NaN`) come back as NaN.
pub fn read_tsv_column(path: &Path, column: &str) -> Result<Vec<f64>> {
    let mut content = String::new();
    open_maybe_gz(path)?
        .read_to_string(&mut content)
        .with_context(|| format!("failed to read {}", path.display()))?;
    parse_tsv_column(&content, column, path)
}

fn parse_tsv_column(content: &str, column: &str, source: &Path) -> Result<Vec<f64>> {
    let mut lines = content.lines();
    let header = lines
        .next()
        .with_context(|| format!("{} is empty", source.display()))?;
    let col = header
        .split('\t')
        .position(|h| h.trim() == column)
        .ok_or_else(|| QcError::MissingColumn {
            column: column.to_string(),
            path: source.to_path_buf(),
        })?;

    let mut values = Vec::new();
    for (idx, line) in lines.enumerate() {
        let line_no = idx + 2;
        if line.trim().is_empty() {
            continue;
        }
        let field = line.split('\t').nth(col).with_context(|| {
            format!(
                "{}:{} row has fewer than {} columns",
                source.display(),
                line_no,
                col + 1
            )
        })?;
        let field = field.trim();
        if MISSING_TOKENS.iter().any(|m| field.eq_ignore_ascii_case(m)) {
            values.push(f64::NAN);
            continue;
        }
        match field.parse::<f64>() {
            Ok(v) => values.push(v),
            Err(_) => bail!(
                "{}:{} invalid value '{}' in column {}",
                source.display(),
                line_no,
                field,
                column
            ),
        }
    }
    Ok(values)
}
