//! Scripted page source for deterministic engine tests.

use threadpull_shared::{Result, ThreadpullError};

use crate::source::{Candidate, PageSource};

/// A [`PageSource`] that replays scripted candidate batches and extents.
///
/// `extents` is consumed left to right: the first value answers the initial
/// `extent()` read, subsequent values answer `advance()` calls. A frozen page
/// is scripted by repeating the last extent; in [`failing_after`] mode,
/// running past the script instead fails like a destroyed session.
///
/// [`failing_after`]: ScriptedSource::failing_after
pub(crate) struct ScriptedSource {
    batches: Vec<Vec<Candidate>>,
    extents: Vec<u64>,
    batch_cursor: usize,
    extent_cursor: usize,
    advances: usize,
    fail_past_script: bool,
}

impl ScriptedSource {
    pub(crate) fn new(batches: Vec<Vec<Candidate>>, extents: Vec<u64>) -> Self {
        Self {
            batches,
            extents,
            batch_cursor: 0,
            extent_cursor: 0,
            advances: 0,
            fail_past_script: false,
        }
    }

    pub(crate) fn failing_after(batches: Vec<Vec<Candidate>>, extents: Vec<u64>) -> Self {
        Self {
            fail_past_script: true,
            ..Self::new(batches, extents)
        }
    }

    /// Number of candidate batches the engine actually read.
    pub(crate) fn batches_read(&self) -> usize {
        self.batch_cursor
    }

    /// Number of reveal actions the engine performed.
    pub(crate) fn advances(&self) -> usize {
        self.advances
    }

    fn next_extent(&mut self) -> Result<u64> {
        if let Some(&extent) = self.extents.get(self.extent_cursor) {
            self.extent_cursor += 1;
            return Ok(extent);
        }
        if self.fail_past_script {
            return Err(ThreadpullError::session("scripted session destroyed"));
        }
        // Past the script the page is frozen at its last extent.
        Ok(self.extents.last().copied().unwrap_or(0))
    }
}

impl PageSource for ScriptedSource {
    async fn extent(&mut self) -> Result<u64> {
        self.next_extent()
    }

    async fn candidates(&mut self) -> Result<Vec<Candidate>> {
        let batch = self
            .batches
            .get(self.batch_cursor)
            .cloned()
            .unwrap_or_default();
        self.batch_cursor += 1;
        Ok(batch)
    }

    async fn advance(&mut self) -> Result<u64> {
        self.advances += 1;
        self.next_extent()
    }
}
