//! The two concrete collection passes.
//!
//! Both are thin role-filter bindings over [`collect_ids`]; the page source
//! decides what "search results" or "one post's conversation" mean.

use tracing::instrument;

use threadpull_shared::Result;

use crate::engine::{PassOptions, collect_ids};
use crate::source::{CandidateRole, PageSource};

/// Collect up to `opts.quota` top-level post identifiers from a
/// search-results source. Accepts every candidate the page does not mark as
/// its own root.
#[instrument(skip_all, fields(quota = opts.quota))]
pub async fn collect_posts<S: PageSource>(source: &mut S, opts: &PassOptions) -> Result<Vec<String>> {
    collect_ids(source, opts, |c| c.role != CandidateRole::Root).await
}

/// Collect up to `opts.quota` reply identifiers from a single post's
/// conversation source.
///
/// Only candidates the page explicitly marks [`CandidateRole::Reply`] are
/// kept. The root post is excluded by its role tag, not by identifier
/// comparison — its identifier equals the post's own id and would otherwise
/// be indistinguishable from a self-reply.
#[instrument(skip_all, fields(quota = opts.quota))]
pub async fn collect_replies<S: PageSource>(
    source: &mut S,
    opts: &PassOptions,
) -> Result<Vec<String>> {
    collect_ids(source, opts, |c| c.role == CandidateRole::Reply).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::ScriptedSource;
    use crate::source::Candidate;

    #[tokio::test]
    async fn post_pass_accepts_all_candidates() {
        let mut source = ScriptedSource::new(
            vec![vec![
                Candidate::new("/a/status/1", CandidateRole::Post),
                Candidate::new("/b/status/2", CandidateRole::Post),
            ]],
            vec![100, 100],
        );

        let opts = PassOptions {
            quota: 5,
            max_rounds: 50,
        };
        let ids = collect_posts(&mut source, &opts).await.unwrap();
        assert_eq!(ids, vec!["1", "2"]);
    }

    #[tokio::test]
    async fn reply_pass_excludes_root_by_role() {
        // The root renders first on every scroll; its locator would pass
        // extraction fine, so only the role tag keeps it out.
        let root_id = "555";
        let mut source = ScriptedSource::new(
            vec![
                vec![
                    Candidate::new(format!("/op/status/{root_id}"), CandidateRole::Root),
                    Candidate::new("/a/status/900", CandidateRole::Reply),
                ],
                vec![
                    Candidate::new(format!("/op/status/{root_id}"), CandidateRole::Root),
                    Candidate::new("/b/status/901", CandidateRole::Reply),
                    Candidate::new("/c/status/902", CandidateRole::Post),
                ],
            ],
            vec![100, 200, 200],
        );

        let opts = PassOptions {
            quota: 10,
            max_rounds: 50,
        };
        let ids = collect_replies(&mut source, &opts).await.unwrap();

        assert_eq!(ids, vec!["900", "901"]);
        assert!(!ids.contains(&root_id.to_string()), "root must never appear in replies");
    }

    #[tokio::test]
    async fn reply_pass_ignores_non_reply_roles() {
        let mut source = ScriptedSource::new(
            vec![vec![
                Candidate::new("/op/status/1", CandidateRole::Root),
                Candidate::new("/x/status/2", CandidateRole::Post),
                Candidate::new("/y/status/3", CandidateRole::Reply),
            ]],
            vec![50, 50],
        );

        let opts = PassOptions {
            quota: 10,
            max_rounds: 50,
        };
        let ids = collect_replies(&mut source, &opts).await.unwrap();
        assert_eq!(ids, vec!["3"]);
    }
}
