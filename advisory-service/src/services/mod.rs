pub mod advisor;
pub mod formatter;
pub mod metrics;
pub mod parser;
pub mod providers;

pub use advisor::{AdvisoryError, AdvisoryService};
