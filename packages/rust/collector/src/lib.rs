//! Incremental collection engine for dynamically-loading pages.
//!
//! The engine drives an abstract [`PageSource`] through successive
//! reveal-more steps, extracting canonical identifiers from the candidates
//! visible after each step, until a pass either meets its quota or the page
//! provably stops growing. Two specializations compose into a run: the post
//! pass over a search timeline, then one reply pass per collected post.

pub mod engine;
pub mod extract;
pub mod passes;
pub mod source;

pub use engine::{PassOptions, collect_ids};
pub use extract::id_from_locator;
pub use passes::{collect_posts, collect_replies};
pub use source::{Candidate, CandidateRole, PageSource};

#[cfg(test)]
pub(crate) mod sim;
