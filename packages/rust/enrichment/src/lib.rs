//! Downstream enrichment stage: full-content fetch and sentiment scoring.
//!
//! Reads the identifier dataset a collection run produced, flattens post and
//! reply identifiers into one deduplicated list, fetches full content in
//! batches with field selection, and attaches a lexicon sentiment score
//! normalized to [0, 1].

pub mod fetch;
pub mod sentiment;

use tracing::{info, instrument};

use threadpull_shared::{CollectionResult, EnrichedPost, Result};

pub use fetch::ContentClient;

/// Flatten a collection result into a single identifier list: every post id
/// followed by its reply ids, first-seen-deduplicated across the whole run.
pub fn flatten_ids(result: &CollectionResult) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    let mut ids = Vec::with_capacity(result.id_count());

    for post in &result.posts {
        if seen.insert(post.id.clone()) {
            ids.push(post.id.clone());
        }
        for reply in &post.replies {
            if seen.insert(reply.clone()) {
                ids.push(reply.clone());
            }
        }
    }

    ids
}

/// Enrich a collection result: fetch full content for every identifier and
/// score each text. Identifiers the API cannot return (deleted or protected
/// posts) are absent from the output, not errors.
#[instrument(skip_all, fields(ids = result.id_count()))]
pub async fn enrich(result: &CollectionResult, client: &ContentClient) -> Result<Vec<EnrichedPost>> {
    let ids = flatten_ids(result);
    info!(unique_ids = ids.len(), "starting enrichment");

    let fetched = client.fetch_all(&ids).await?;

    let enriched: Vec<EnrichedPost> = fetched
        .into_iter()
        .map(|tweet| {
            let sentiment_score = sentiment::score(&tweet.text);
            EnrichedPost {
                id: tweet.id,
                text: tweet.text,
                lang: tweet.lang,
                created_at: tweet.created_at,
                public_metrics: tweet.public_metrics,
                sentiment_score,
            }
        })
        .collect();

    info!(enriched = enriched.len(), "enrichment complete");
    Ok(enriched)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use threadpull_shared::Post;

    fn result_with(posts: Vec<(&str, Vec<&str>)>) -> CollectionResult {
        CollectionResult {
            posts: posts
                .into_iter()
                .map(|(id, replies)| Post {
                    id: id.into(),
                    replies: replies.into_iter().map(String::from).collect(),
                    collected_on: NaiveDate::from_ymd_opt(2024, 11, 5).unwrap(),
                })
                .collect(),
        }
    }

    #[test]
    fn flatten_dedups_across_posts_and_replies() {
        // "20" is both a reply to the first post and a top-level post;
        // "30" replies to two different posts.
        let result = result_with(vec![
            ("10", vec!["20", "30"]),
            ("20", vec!["30", "40"]),
        ]);

        let ids = flatten_ids(&result);
        assert_eq!(ids, vec!["10", "20", "30", "40"]);
    }

    #[test]
    fn flatten_preserves_discovery_order() {
        let result = result_with(vec![("3", vec!["1"]), ("2", vec![])]);
        assert_eq!(flatten_ids(&result), vec!["3", "1", "2"]);
    }

    #[test]
    fn flatten_empty_result() {
        let result = result_with(vec![]);
        assert!(flatten_ids(&result).is_empty());
    }
}
