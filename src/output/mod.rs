//! Output module for reporting run results
//!
//! The persisted artifacts themselves live in [`crate::storage`]; this module
//! only covers the counts shown to the user when a run ends.

pub mod stats;

pub use stats::{print_report, RunOutcome, RunReport};
