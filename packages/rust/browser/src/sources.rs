//! Concrete [`PageSource`] implementations for the two page kinds a run
//! drives: the search timeline (post pass) and a single post's conversation
//! page (reply pass).
//!
//! Both share the same reveal mechanics — scroll to the bottom, wait a fixed
//! delay for content to load, report the new scroll height as the extent.
//! They differ only in how candidates are enumerated and role-tagged.

use std::time::Duration;

use tracing::{debug, instrument};
use url::Url;

use threadpull_collector::{Candidate, CandidateRole, PageSource};
use threadpull_shared::{Result, ThreadpullError};

use crate::client::{Browser, ElementRef};

const SEARCH_URL: &str = "https://x.com/search";
const TWEET_ARTICLE: &str = r#"article[data-testid="tweet"]"#;
const STATUS_LINK: &str = r#"a[href*="/status/"]"#;
const REPLY_MARKER: &str = r#"[data-testid="reply"]"#;

/// How long to wait for the first articles after navigation.
const RENDER_WAIT: Duration = Duration::from_secs(10);

// ---------------------------------------------------------------------------
// Search timeline
// ---------------------------------------------------------------------------

/// Search-results view for a fixed query expression.
pub struct SearchTimeline<'a> {
    browser: &'a Browser,
    scroll_wait: Duration,
}

impl<'a> SearchTimeline<'a> {
    /// Navigate to the live search results for `query`.
    #[instrument(skip_all, fields(query = %query))]
    pub async fn open(browser: &'a Browser, query: &str, scroll_wait: Duration) -> Result<Self> {
        let url = Url::parse_with_params(SEARCH_URL, &[("q", query), ("f", "live")])
            .map_err(|e| ThreadpullError::validation(format!("search query: {e}")))?;
        browser.goto(url.as_str()).await?;

        // Give the first batch time to render; an empty result set is fine,
        // the pass will just exhaust immediately.
        if browser.wait_for(TWEET_ARTICLE, RENDER_WAIT).await?.is_none() {
            debug!("no articles rendered on search page");
        }

        Ok(Self {
            browser,
            scroll_wait,
        })
    }
}

impl PageSource for SearchTimeline<'_> {
    async fn extent(&mut self) -> Result<u64> {
        self.browser.scroll_height().await
    }

    async fn candidates(&mut self) -> Result<Vec<Candidate>> {
        let articles = self.browser.find_all(TWEET_ARTICLE).await?;
        let mut candidates = Vec::with_capacity(articles.len());
        for article in &articles {
            if let Some(locator) = status_link(self.browser, article).await? {
                candidates.push(Candidate::new(locator, CandidateRole::Post));
            }
        }
        Ok(candidates)
    }

    async fn advance(&mut self) -> Result<u64> {
        scroll_and_settle(self.browser, self.scroll_wait).await
    }
}

// ---------------------------------------------------------------------------
// Conversation page
// ---------------------------------------------------------------------------

/// Detail view of a single post and its replies.
pub struct ConversationPage<'a> {
    browser: &'a Browser,
    scroll_wait: Duration,
}

impl<'a> ConversationPage<'a> {
    /// Navigate to the conversation page for `post_id`.
    #[instrument(skip_all, fields(post_id = %post_id))]
    pub async fn open(browser: &'a Browser, post_id: &str, scroll_wait: Duration) -> Result<Self> {
        let url = format!("https://x.com/i/web/status/{post_id}");
        browser.goto(&url).await?;

        if browser.wait_for(TWEET_ARTICLE, RENDER_WAIT).await?.is_none() {
            debug!(%post_id, "no articles rendered on conversation page");
        }

        Ok(Self {
            browser,
            scroll_wait,
        })
    }
}

impl PageSource for ConversationPage<'_> {
    async fn extent(&mut self) -> Result<u64> {
        self.browser.scroll_height().await
    }

    async fn candidates(&mut self) -> Result<Vec<Candidate>> {
        let articles = self.browser.find_all(TWEET_ARTICLE).await?;
        let mut candidates = Vec::with_capacity(articles.len());
        for (index, article) in articles.iter().enumerate() {
            let Some(locator) = status_link(self.browser, article).await? else {
                continue;
            };
            // The page renders its own subject first; tag it so the reply
            // filter can exclude it by role rather than by identifier.
            let role = if index == 0 {
                CandidateRole::Root
            } else if self.browser.find_in(article, REPLY_MARKER).await?.is_some() {
                CandidateRole::Reply
            } else {
                CandidateRole::Post
            };
            candidates.push(Candidate::new(locator, role));
        }
        Ok(candidates)
    }

    async fn advance(&mut self) -> Result<u64> {
        scroll_and_settle(self.browser, self.scroll_wait).await
    }
}

// ---------------------------------------------------------------------------
// Shared mechanics
// ---------------------------------------------------------------------------

/// The detail-page href of an article, if it carries one. Articles without a
/// status link (promoted cards, stripped renders) are skipped by the caller.
async fn status_link(browser: &Browser, article: &ElementRef) -> Result<Option<String>> {
    let Some(link) = browser.find_in(article, STATUS_LINK).await? else {
        debug!("article without status link, skipping");
        return Ok(None);
    };
    browser.attribute(&link, "href").await
}

/// Scroll to the bottom, wait the fixed delay, and read the new extent.
async fn scroll_and_settle(browser: &Browser, wait: Duration) -> Result<u64> {
    browser
        .execute("window.scrollTo(0, document.body.scrollHeight);")
        .await?;
    tokio::time::sleep(wait).await;
    browser.scroll_height().await
}
