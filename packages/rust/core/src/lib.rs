//! Run orchestration for threadpull.
//!
//! Ties the browser session, the two collection passes, and the output
//! layer into end-to-end workflows (`collect_run`, `enrich_run`).

pub mod output;
pub mod pipeline;
