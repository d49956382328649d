//! Real page-source implementation over a W3C WebDriver session.
//!
//! The collection engine only knows the `PageSource` seam; this crate
//! provides the concrete side of it: a thin HTTP client for a WebDriver
//! endpoint (e.g., a local geckodriver), the login/cookie session
//! establishment flow, and the two page kinds a run drives — the search
//! timeline and a single post's conversation page.

pub mod auth;
pub mod client;
pub mod sources;

pub use auth::{Credentials, establish_session};
pub use client::{Browser, ElementRef};
pub use sources::{ConversationPage, SearchTimeline};
