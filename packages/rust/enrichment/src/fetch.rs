//! Bulk full-content fetch from the platform's HTTP API.

use serde::Deserialize;
use tracing::{debug, warn};

use threadpull_shared::{PublicMetrics, Result, ThreadpullError};

/// The API accepts at most this many ids per lookup request.
const BATCH_SIZE: usize = 100;

/// Fields requested for every post.
const TWEET_FIELDS: &str = "created_at,text,public_metrics,lang,conversation_id";

/// One post as returned by the content API.
#[derive(Debug, Clone, Deserialize)]
pub struct FetchedTweet {
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub lang: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub public_metrics: PublicMetrics,
}

/// Per-id lookup failure reported alongside successful data.
#[derive(Debug, Clone, Deserialize)]
struct LookupError {
    #[serde(default)]
    value: Option<String>,
    #[serde(default)]
    title: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LookupResponse {
    #[serde(default)]
    data: Vec<FetchedTweet>,
    #[serde(default)]
    errors: Vec<LookupError>,
}

/// Bearer-authenticated client for the bulk content endpoint.
pub struct ContentClient {
    http: reqwest::Client,
    base_url: String,
    bearer_token: String,
}

impl ContentClient {
    pub fn new(base_url: &str, bearer_token: &str) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .map_err(|e| ThreadpullError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            bearer_token: bearer_token.to_string(),
        })
    }

    /// Fetch full content for every id, in batches of [`BATCH_SIZE`].
    ///
    /// Ids the API reports as unavailable (deleted, protected) are logged and
    /// omitted; transport and status failures abort the fetch.
    pub async fn fetch_all(&self, ids: &[String]) -> Result<Vec<FetchedTweet>> {
        let mut fetched = Vec::with_capacity(ids.len());

        for batch in ids.chunks(BATCH_SIZE) {
            let response = self.lookup(batch).await?;

            for error in &response.errors {
                warn!(
                    id = error.value.as_deref().unwrap_or("?"),
                    reason = error.title.as_deref().unwrap_or("unknown"),
                    "id unavailable, skipping"
                );
            }

            debug!(
                requested = batch.len(),
                returned = response.data.len(),
                "lookup batch complete"
            );
            fetched.extend(response.data);
        }

        Ok(fetched)
    }

    async fn lookup(&self, ids: &[String]) -> Result<LookupResponse> {
        let url = format!("{}/2/tweets", self.base_url);
        let resp = self
            .http
            .get(&url)
            .bearer_auth(&self.bearer_token)
            .query(&[("ids", ids.join(",")), ("tweet.fields", TWEET_FIELDS.into())])
            .send()
            .await
            .map_err(|e| ThreadpullError::Network(format!("{url}: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(ThreadpullError::Api {
                status: status.as_u16(),
                message,
            });
        }

        resp.json::<LookupResponse>()
            .await
            .map_err(|e| ThreadpullError::Network(format!("{url}: malformed response: {e}")))
    }
}
