//! Core domain types for threadpull collection runs.
//!
//! The serde renames pin the on-disk JSON to the dataset shape the
//! enrichment stage consumes: `{"tweets": [{"tweet_id", "replies",
//! "collection_date"}]}`.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Post / CollectionResult
// ---------------------------------------------------------------------------

/// One collected top-level post with its reply identifiers.
///
/// `replies` holds identifiers in discovery order and never contains
/// duplicates or the post's own id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    /// Canonical identifier of the top-level post.
    #[serde(rename = "tweet_id")]
    pub id: String,

    /// Reply identifiers in discovery order.
    pub replies: Vec<String>,

    /// Date of the run that collected this post (YYYY-MM-DD).
    #[serde(rename = "collection_date")]
    pub collected_on: NaiveDate,
}

/// The complete output of one collection run. Written once, at completion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionResult {
    /// Collected posts in discovery order.
    #[serde(rename = "tweets")]
    pub posts: Vec<Post>,
}

impl CollectionResult {
    /// Total number of identifiers (posts + replies) in the result.
    pub fn id_count(&self) -> usize {
        self.posts.iter().map(|p| 1 + p.replies.len()).sum()
    }
}

// ---------------------------------------------------------------------------
// Enriched output
// ---------------------------------------------------------------------------

/// Engagement counters returned by the content API.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicMetrics {
    #[serde(default)]
    pub retweet_count: u64,
    #[serde(default)]
    pub reply_count: u64,
    #[serde(default)]
    pub like_count: u64,
    #[serde(default)]
    pub quote_count: u64,
}

/// A post after full-content fetch and sentiment scoring.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrichedPost {
    /// Canonical identifier.
    pub id: String,

    /// Full post text.
    pub text: String,

    /// BCP-47 language tag, when the API reports one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lang: Option<String>,

    /// Creation timestamp as reported by the API (RFC 3339).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,

    /// Engagement counters.
    #[serde(default)]
    pub public_metrics: PublicMetrics,

    /// Lexicon sentiment score normalized to [0, 1].
    pub sentiment_score: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> CollectionResult {
        CollectionResult {
            posts: vec![
                Post {
                    id: "1853991811".into(),
                    replies: vec!["1853991902".into(), "1853992044".into()],
                    collected_on: NaiveDate::from_ymd_opt(2024, 11, 5).unwrap(),
                },
                Post {
                    id: "1853993377".into(),
                    replies: vec![],
                    collected_on: NaiveDate::from_ymd_opt(2024, 11, 5).unwrap(),
                },
            ],
        }
    }

    #[test]
    fn collection_result_wire_names() {
        let json = serde_json::to_value(sample()).expect("serialize");
        let tweets = json.get("tweets").expect("tweets key").as_array().unwrap();
        assert_eq!(tweets.len(), 2);
        assert_eq!(tweets[0]["tweet_id"], "1853991811");
        assert_eq!(tweets[0]["collection_date"], "2024-11-05");
        assert_eq!(tweets[0]["replies"][1], "1853992044");
    }

    #[test]
    fn collection_result_roundtrip() {
        let original = sample();
        let json = serde_json::to_string_pretty(&original).expect("serialize");
        let parsed: CollectionResult = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(parsed, original);
        // Reply order must survive the trip.
        assert_eq!(parsed.posts[0].replies, original.posts[0].replies);
    }

    #[test]
    fn id_count_spans_posts_and_replies() {
        assert_eq!(sample().id_count(), 4);
    }

    #[test]
    fn enriched_post_serialization() {
        let post = EnrichedPost {
            id: "123".into(),
            text: "great service today".into(),
            lang: Some("en".into()),
            created_at: None,
            public_metrics: PublicMetrics {
                like_count: 3,
                ..Default::default()
            },
            sentiment_score: 0.75,
        };
        let json = serde_json::to_value(&post).expect("serialize");
        assert_eq!(json["sentiment_score"], 0.75);
        assert_eq!(json["public_metrics"]["like_count"], 3);
        assert!(json.get("created_at").is_none());
    }
}
