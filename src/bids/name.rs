use std::fmt;
use std::path::Path;
use std::str::FromStr;

use anyhow::Result;
use serde::Serialize;

use crate::error::QcError;

pub const ENTITY_SEPARATOR: char = '_';
pub const KEY_VALUE_SEPARATOR: char = '-';

// Entities that name an acquisition rather than a derivative of it.
const ACQUISITION_ENTITIES: &[&str] = &[
    "sub", "ses", "task", "acq", "ce", "rec", "dir", "run", "echo", "part", "inv", "mt", "flip",
    "chunk",
];

/// A BIDS file name split into its ordered entities, suffix and extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BidsName {
    pub entities: Vec<(String, String)>,
    pub suffix: Option<String>,
    pub extension: String,
}

impl BidsName {
    pub fn parse(file_name: &str) -> Option<Self> {
        let (stem, extension) = match file_name.find('.') {
            Some(pos) => (&file_name[..pos], &file_name[pos..]),
            None => (file_name, ""),
        };
        if stem.is_empty() {
            return None;
        }

        let tokens: Vec<&str> = stem.split(ENTITY_SEPARATOR).collect();
        let mut entities = Vec::with_capacity(tokens.len());
        let mut suffix = None;
        for (i, token) in tokens.iter().enumerate() {
            match split_token(token) {
                Some((key, value)) => entities.push((key.to_string(), value.to_string())),
                None if i + 1 == tokens.len() && is_label(token) => {
                    suffix = Some(token.to_string())
                }
                None => return None,
            }
        }
        if entities.is_empty() {
            return None;
        }

        Some(Self {
            entities,
            suffix,
            extension: extension.to_string(),
        })
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        path.file_name()
            .and_then(|s| s.to_str())
            .and_then(Self::parse)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entities
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Leading acquisition entities of the name, e.g. `sub-01_task-rest`
    /// for `sub-01_task-rest_space-X_desc-brain_mask.nii.gz`.
    pub fn scan_identifier(&self) -> Option<ScanIdentifier> {
        let leading: Vec<(&str, &str)> = self
            .entities
            .iter()
            .take_while(|(k, _)| ACQUISITION_ENTITIES.contains(&k.as_str()))
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        match leading.first() {
            Some(("sub", _)) => Some(ScanIdentifier::from_entities(leading)),
            _ => None,
        }
    }
}

/// Canonical scan key: ordered `key-value` tokens joined by `_`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct ScanIdentifier(String);

impl ScanIdentifier {
    pub fn parse(text: &str) -> Result<Self> {
        if text.is_empty() {
            return Err(invalid(text, "empty identifier"));
        }
        for token in text.split(ENTITY_SEPARATOR) {
            if split_token(token).is_none() {
                return Err(invalid(
                    text,
                    &format!("token '{}' is not a key-value pair", token),
                ));
            }
        }
        Ok(Self(text.to_string()))
    }

    pub fn from_entities<'a, I>(entities: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut text = String::new();
        for (k, v) in entities {
            if !text.is_empty() {
                text.push(ENTITY_SEPARATOR);
            }
            text.push_str(k);
            text.push(KEY_VALUE_SEPARATOR);
            text.push_str(v);
        }
        Self(text)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn entities(&self) -> Vec<(&str, &str)> {
        self.0.split(ENTITY_SEPARATOR).filter_map(split_token).collect()
    }

    pub fn keys(&self) -> Vec<&str> {
        self.entities().into_iter().map(|(k, _)| k).collect()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entities()
            .into_iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v)
    }

    pub fn subject(&self) -> Option<&str> {
        self.get("sub")
    }
}

impl fmt::Display for ScanIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ScanIdentifier {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Accepts both `01` and `sub-01`.
pub fn normalize_label(label: &str, key: &str) -> String {
    let prefix = format!("{}{}", key, KEY_VALUE_SEPARATOR);
    label.strip_prefix(&prefix).unwrap_or(label).to_string()
}

fn split_token(token: &str) -> Option<(&str, &str)> {
    let (key, value) = token.split_once(KEY_VALUE_SEPARATOR)?;
    if is_label(key) && is_label(value) {
        Some((key, value))
    } else {
        None
    }
}

fn is_label(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric())
}

fn invalid(identifier: &str, reason: &str) -> anyhow::Error {
    QcError::InvalidIdentifier {
        identifier: identifier.to_string(),
        reason: reason.to_string(),
    }
    .into()
}
