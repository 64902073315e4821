use anyhow::Result;

use crate::bids::{ENTITY_SEPARATOR, KEY_VALUE_SEPARATOR, ScanIdentifier};
use crate::error::QcError;
use crate::qc::CombinedQcTable;

pub const PARTICIPANT_COLUMN: &str = "participant_id";

/// Identifier entities split into columns. Every row carries the same
/// ordered entity keys as the first one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntityColumns {
    pub keys: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl EntityColumns {
    pub fn from_identifiers<'a, I>(identifiers: I) -> Result<Self>
    where
        I: IntoIterator<Item = &'a ScanIdentifier>,
    {
        let mut columns = EntityColumns::default();
        for (idx, identifier) in identifiers.into_iter().enumerate() {
            let entities = identifier.entities();
            let keys: Vec<&str> = entities.iter().map(|(k, _)| *k).collect();
            if idx == 0 {
                columns.keys = keys.iter().map(|k| k.to_string()).collect();
            } else if keys != columns.keys {
                return Err(QcError::IdentifierMismatch {
                    identifier: identifier.to_string(),
                    expected: columns.keys.join(", "),
                    found: keys.join(", "),
                }
                .into());
            }
            columns
                .rows
                .push(entities.iter().map(|(_, v)| v.to_string()).collect());
        }
        Ok(columns)
    }

    /// Column headers, with `sub` reported as `participant_id`.
    pub fn headers(&self) -> Vec<String> {
        self.keys
            .iter()
            .map(|k| {
                if k == "sub" {
                    PARTICIPANT_COLUMN.to_string()
                } else {
                    k.clone()
                }
            })
            .collect()
    }

    pub fn value(&self, row: usize, header: &str) -> Option<&str> {
        let col = self.headers().iter().position(|h| h == header)?;
        self.rows.get(row).map(|r| r[col].as_str())
    }

    /// Re-encodes a row into its identifier text.
    pub fn reconstruct(&self, row: usize) -> Option<String> {
        let values = self.rows.get(row)?;
        let tokens: Vec<String> = self
            .keys
            .iter()
            .zip(values)
            .map(|(k, v)| format!("{}{}{}", k, KEY_VALUE_SEPARATOR, v))
            .collect();
        Some(tokens.join(ENTITY_SEPARATOR.to_string().as_str()))
    }
}

/// The combined QC table with its identifiers split into entity columns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnnotatedQcTable {
    pub entities: EntityColumns,
    pub table: CombinedQcTable,
}

pub fn parse_identifiers(table: CombinedQcTable) -> Result<AnnotatedQcTable> {
    let entities = EntityColumns::from_identifiers(table.rows.iter().map(|r| &r.identifier))?;
    Ok(AnnotatedQcTable { entities, table })
}
