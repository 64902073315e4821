pub mod bids;
pub mod cli;
pub mod ctx;
pub mod error;
pub mod io;
pub mod metrics;
pub mod pipeline;
pub mod qc;
pub mod schema;
pub mod template;
pub mod volume;
