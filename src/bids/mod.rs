mod filter;
mod layout;
mod name;

use std::path::PathBuf;

use anyhow::Result;

pub use filter::EntityFilter;
pub use layout::BidsLayout;
pub use name::{BidsName, ENTITY_SEPARATOR, KEY_VALUE_SEPARATOR, ScanIdentifier, normalize_label};

/// Query contract the metric calculators depend on.
pub trait Dataset {
    fn get(&self, filter: &EntityFilter) -> Result<Vec<PathBuf>>;
    fn subjects(&self) -> Vec<String>;
    fn tasks(&self) -> Vec<String>;
}
