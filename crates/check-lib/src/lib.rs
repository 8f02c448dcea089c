//! Shared library for the UBNT HTTP monitoring tools
//!
//! This crate provides the pieces shared by the Nagios check plugin and
//! the MRTG probe:
//! - Threshold range parsing and evaluation
//! - The check engine accumulating status and performance data
//! - Dotted-path lookup into decoded JSON
//! - A whitelisted arithmetic formula evaluator
//! - The cookie/login HTTP session against the radio web UI

pub mod check;
pub mod formula;
pub mod lookup;
pub mod session;
pub mod threshold;

pub use check::{CheckEngine, PerfData, Status};
pub use threshold::{DefaultRangeParser, RangeParser, Threshold, ThresholdError, ThresholdSet};
