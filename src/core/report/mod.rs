//! Run reporting
//!
//! The aggregator keeps the append-only action ledger and the run counters.
//! A finalized [`RunReport`] is rendered to CSV and JSON by pure functions of
//! the report, so both artifacts always agree.

mod aggregator;
mod render;
mod writer;


pub use aggregator::{ReportAggregator, RunReport};
pub use render::{CSV_HEADER, render_csv, render_json};
pub use writer::{ReportPaths, ReportWriter};
