pub mod assess;
pub mod identifiers;
pub mod thresholds;

pub use assess::{CombinedQcTable, QcRow, assess_quality};
pub use identifiers::{AnnotatedQcTable, EntityColumns, PARTICIPANT_COLUMN, parse_identifiers};
pub use thresholds::QcThresholds;
