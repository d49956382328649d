//! The scrolling set collector.
//!
//! One invocation of [`collect_ids`] is one pass: it drives a [`PageSource`]
//! through reveal steps until a target count of distinct identifiers is
//! reached, the page provably stops growing, or the round ceiling is hit.

use std::collections::HashSet;

use tracing::{debug, info, warn};

use threadpull_shared::Result;

use crate::extract::id_from_locator;
use crate::source::{Candidate, PageSource};

/// Tuning for one collection pass.
#[derive(Debug, Clone)]
pub struct PassOptions {
    /// Maximum number of distinct identifiers to return.
    pub quota: usize,
    /// Ceiling on reveal iterations. The baseline termination rule (quota or
    /// extent freeze) has no bound of its own; a page that keeps growing
    /// without yielding new identifiers would otherwise loop forever.
    pub max_rounds: u32,
}

impl Default for PassOptions {
    fn default() -> Self {
        Self {
            quota: 5,
            max_rounds: 50,
        }
    }
}

/// Run one collection pass over `source`.
///
/// Candidates surviving `keep` have identifiers extracted via
/// [`id_from_locator`]; unextractable and already-seen identifiers are
/// skipped. The result preserves first-seen order, contains no duplicates,
/// and never exceeds `opts.quota`. Returning with fewer than `quota`
/// identifiers means the page was exhausted (or the round ceiling was hit) —
/// both are normal termination, not errors. Only page-source failures
/// propagate.
pub async fn collect_ids<S: PageSource>(
    source: &mut S,
    opts: &PassOptions,
    keep: impl Fn(&Candidate) -> bool,
) -> Result<Vec<String>> {
    let mut accepted: Vec<String> = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();

    if opts.quota == 0 {
        return Ok(accepted);
    }

    let mut last_extent = source.extent().await?;
    let mut rounds: u32 = 0;

    loop {
        for candidate in source.candidates().await? {
            if !keep(&candidate) {
                continue;
            }
            let Some(id) = id_from_locator(&candidate.locator) else {
                debug!(locator = %candidate.locator, "unextractable locator, skipping");
                continue;
            };
            // Re-rendered items are absorbed here, never re-appended.
            if !seen.insert(id.clone()) {
                continue;
            }

            debug!(%id, count = accepted.len() + 1, quota = opts.quota, "accepted");
            accepted.push(id);

            if accepted.len() >= opts.quota {
                info!(count = accepted.len(), rounds, "pass met quota");
                return Ok(accepted);
            }
        }

        if rounds >= opts.max_rounds {
            warn!(
                count = accepted.len(),
                quota = opts.quota,
                max_rounds = opts.max_rounds,
                "round ceiling hit before quota, stopping pass"
            );
            return Ok(accepted);
        }

        let new_extent = source.advance().await?;
        rounds += 1;

        if new_extent == last_extent {
            info!(
                count = accepted.len(),
                quota = opts.quota,
                rounds,
                "page exhausted"
            );
            return Ok(accepted);
        }
        last_extent = new_extent;
    }
}
