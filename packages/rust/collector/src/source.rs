//! The page-source seam between the collection engine and the real browser.
//!
//! The engine never touches a DOM or a network. It sees only this capability:
//! a finite batch of currently-visible candidates, a monotonic content
//! extent, and a reveal action. Concrete implementations live in
//! `threadpull-browser`; tests script the trait directly.

use threadpull_shared::Result;

/// Role the page assigns to a rendered item.
///
/// Conversation pages tag their first rendered article [`Root`]; items
/// carrying the reply marker are [`Reply`]; everything else is [`Post`].
/// Filtering on the tag (instead of comparing identifiers) keeps a root from
/// ever leaking into its own reply list.
///
/// [`Root`]: CandidateRole::Root
/// [`Reply`]: CandidateRole::Reply
/// [`Post`]: CandidateRole::Post
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CandidateRole {
    /// The page's own subject (first rendered item on a detail view).
    Root,
    /// A top-level post.
    Post,
    /// A reply to the page's subject.
    Reply,
}

/// One currently-visible item: its detail-page locator plus its role.
#[derive(Debug, Clone)]
pub struct Candidate {
    /// Detail-page locator (href), absolute or path-relative.
    pub locator: String,
    /// Role assigned by the page source.
    pub role: CandidateRole,
}

impl Candidate {
    pub fn new(locator: impl Into<String>, role: CandidateRole) -> Self {
        Self {
            locator: locator.into(),
            role,
        }
    }
}

/// A stateful, incrementally-loading page.
///
/// `advance` triggers the reveal action (scroll), waits a bounded time for
/// content to load, and reports the new extent. An extent unchanged across
/// one `advance` means the source is exhausted. Irrecoverable failures
/// (session gone) surface as errors and abort the pass.
// Generic use only; the engine never holds a `dyn PageSource`.
#[allow(async_fn_in_trait)]
pub trait PageSource {
    /// Current loaded-content extent, without revealing anything.
    async fn extent(&mut self) -> Result<u64>;

    /// The finite batch of items currently visible, in render order.
    async fn candidates(&mut self) -> Result<Vec<Candidate>>;

    /// Reveal more content, wait, and return the new extent.
    async fn advance(&mut self) -> Result<u64>;
}
