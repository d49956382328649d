//! Thin HTTP client for the W3C WebDriver wire protocol.
//!
//! Covers exactly the commands the collection flow needs: session
//! lifecycle, navigation, script execution, element lookup, attribute
//! reads, key input, and cookies. Any transport or protocol failure is a
//! session-fatal [`ThreadpullError::Session`] — with one deliberate
//! exception: "no such element" answers become `Ok(None)` so a missing
//! sub-element can be skipped by the caller instead of aborting a pass.

use std::time::Duration;

use serde_json::{Value, json};
use tracing::{debug, info};

use threadpull_shared::{Result, ThreadpullError};

/// W3C element identifier key in WebDriver responses.
const ELEMENT_KEY: &str = "element-6066-11e4-a52e-4f735466cecf";

/// WebDriver key code for Return, appended to text to submit a field.
pub const KEY_RETURN: char = '\u{e006}';

/// HTTP timeout for individual WebDriver commands.
const COMMAND_TIMEOUT: Duration = Duration::from_secs(30);

/// Poll interval for [`Browser::wait_for`].
const POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Opaque handle to a DOM element within the current session.
#[derive(Debug, Clone)]
pub struct ElementRef(String);

/// One WebDriver session against a remote driver endpoint.
pub struct Browser {
    http: reqwest::Client,
    base_url: String,
    session_id: String,
}

impl Browser {
    /// Open a new session against `webdriver_url` (e.g., a local geckodriver).
    pub async fn connect(webdriver_url: &str, headless: bool) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(COMMAND_TIMEOUT)
            .build()
            .map_err(|e| ThreadpullError::session(format!("failed to build HTTP client: {e}")))?;

        let mut args: Vec<&str> = Vec::new();
        if headless {
            args.push("-headless");
        }
        let body = json!({
            "capabilities": {
                "alwaysMatch": {
                    "browserName": "firefox",
                    "moz:firefoxOptions": { "args": args }
                }
            }
        });

        let base_url = webdriver_url.trim_end_matches('/').to_string();
        let value = post_command(&http, &format!("{base_url}/session"), &body).await?;
        let session_id = value
            .get("sessionId")
            .and_then(Value::as_str)
            .ok_or_else(|| ThreadpullError::session("driver returned no sessionId"))?
            .to_string();

        info!(%session_id, "webdriver session established");

        Ok(Self {
            http,
            base_url,
            session_id,
        })
    }

    /// End the session. Consumes the handle; the driver closes the browser.
    pub async fn quit(self) -> Result<()> {
        let url = self.command_url("");
        let resp = self
            .http
            .delete(url.trim_end_matches('/'))
            .send()
            .await
            .map_err(|e| ThreadpullError::session(format!("quit: {e}")))?;
        check_status(resp).await?;
        debug!(session_id = %self.session_id, "webdriver session closed");
        Ok(())
    }

    /// Navigate to `url` and wait for the document to load.
    pub async fn goto(&self, url: &str) -> Result<()> {
        self.post("url", &json!({ "url": url })).await?;
        Ok(())
    }

    /// Reload the current page.
    pub async fn refresh(&self) -> Result<()> {
        self.post("refresh", &json!({})).await?;
        Ok(())
    }

    /// Execute synchronous JavaScript in the page and return its value.
    pub async fn execute(&self, script: &str) -> Result<Value> {
        self.post("execute/sync", &json!({ "script": script, "args": [] }))
            .await
    }

    /// Current document scroll height, the pass's content extent.
    pub async fn scroll_height(&self) -> Result<u64> {
        let value = self.execute("return document.body.scrollHeight").await?;
        value
            .as_u64()
            .ok_or_else(|| ThreadpullError::session(format!("non-numeric scrollHeight: {value}")))
    }

    /// Find all elements matching a CSS selector. An empty match is `Ok(vec![])`.
    pub async fn find_all(&self, css: &str) -> Result<Vec<ElementRef>> {
        let value = self
            .post("elements", &json!({ "using": "css selector", "value": css }))
            .await?;
        parse_element_list(&value)
    }

    /// Find the first element matching a CSS selector, if any.
    pub async fn find(&self, css: &str) -> Result<Option<ElementRef>> {
        self.find_optional("element", css).await
    }

    /// Find the first matching descendant of `parent`, if any.
    pub async fn find_in(&self, parent: &ElementRef, css: &str) -> Result<Option<ElementRef>> {
        self.find_optional(&format!("element/{}/element", parent.0), css)
            .await
    }

    /// Read an attribute value from an element.
    pub async fn attribute(&self, element: &ElementRef, name: &str) -> Result<Option<String>> {
        let url = self.command_url(&format!("element/{}/attribute/{name}", element.0));
        let resp = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| ThreadpullError::session(format!("attribute {name}: {e}")))?;
        let value = check_status(resp).await?;
        Ok(value.as_str().map(String::from))
    }

    /// Type `text` into an element (append [`KEY_RETURN`] to submit).
    pub async fn send_keys(&self, element: &ElementRef, text: &str) -> Result<()> {
        self.post(
            &format!("element/{}/value", element.0),
            &json!({ "text": text }),
        )
        .await?;
        Ok(())
    }

    /// Add a cookie to the current browsing context.
    pub async fn add_cookie(&self, cookie: &Value) -> Result<()> {
        self.post("cookie", &json!({ "cookie": cookie })).await?;
        Ok(())
    }

    /// Poll for an element until it appears or `timeout` elapses.
    pub async fn wait_for(&self, css: &str, timeout: Duration) -> Result<Option<ElementRef>> {
        let deadline = tokio::time::Instant::now() + timeout;
        loop {
            if let Some(element) = self.find(css).await? {
                return Ok(Some(element));
            }
            if tokio::time::Instant::now() >= deadline {
                return Ok(None);
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }

    // -- plumbing ----------------------------------------------------------

    fn command_url(&self, command: &str) -> String {
        format!("{}/session/{}/{command}", self.base_url, self.session_id)
    }

    async fn post(&self, command: &str, body: &Value) -> Result<Value> {
        post_command(&self.http, &self.command_url(command), body).await
    }

    async fn find_optional(&self, command: &str, css: &str) -> Result<Option<ElementRef>> {
        let url = self.command_url(command);
        let body = json!({ "using": "css selector", "value": css });
        let resp = self
            .http
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| ThreadpullError::session(format!("find {css}: {e}")))?;

        match check_status(resp).await {
            Ok(value) => Ok(Some(parse_element(&value)?)),
            // Absent sub-elements are a skip condition, not a failure.
            Err(ThreadpullError::Session(msg)) if msg.contains("no such element") => Ok(None),
            Err(e) => Err(e),
        }
    }
}

/// POST a command body and unwrap the W3C `value` envelope.
async fn post_command(http: &reqwest::Client, url: &str, body: &Value) -> Result<Value> {
    let resp = http
        .post(url)
        .json(body)
        .send()
        .await
        .map_err(|e| ThreadpullError::session(format!("{url}: {e}")))?;
    check_status(resp).await
}

/// Unwrap the response envelope, mapping protocol errors to session errors.
async fn check_status(resp: reqwest::Response) -> Result<Value> {
    let status = resp.status();
    let body: Value = resp
        .json()
        .await
        .map_err(|e| ThreadpullError::session(format!("malformed driver response: {e}")))?;
    let value = body.get("value").cloned().unwrap_or(Value::Null);

    if status.is_success() {
        return Ok(value);
    }

    let error = value
        .get("error")
        .and_then(Value::as_str)
        .unwrap_or("unknown error");
    let message = value
        .get("message")
        .and_then(Value::as_str)
        .unwrap_or_default();
    Err(ThreadpullError::session(format!(
        "driver error ({status}): {error}: {message}"
    )))
}

fn parse_element(value: &Value) -> Result<ElementRef> {
    value
        .get(ELEMENT_KEY)
        .and_then(Value::as_str)
        .map(|id| ElementRef(id.to_string()))
        .ok_or_else(|| ThreadpullError::session(format!("malformed element response: {value}")))
}

fn parse_element_list(value: &Value) -> Result<Vec<ElementRef>> {
    value
        .as_array()
        .ok_or_else(|| ThreadpullError::session(format!("malformed element list: {value}")))?
        .iter()
        .map(parse_element)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn connected(server: &MockServer) -> Browser {
        Mock::given(method("POST"))
            .and(path("/session"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "value": { "sessionId": "abc123", "capabilities": {} }
            })))
            .mount(server)
            .await;
        Browser::connect(&server.uri(), true).await.unwrap()
    }

    #[tokio::test]
    async fn connect_extracts_session_id() {
        let server = MockServer::start().await;
        let browser = connected(&server).await;
        assert_eq!(browser.session_id, "abc123");
    }

    #[tokio::test]
    async fn connect_requests_headless_firefox() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/session"))
            .and(body_partial_json(json!({
                "capabilities": { "alwaysMatch": {
                    "browserName": "firefox",
                    "moz:firefoxOptions": { "args": ["-headless"] }
                }}
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "value": { "sessionId": "xyz" }
            })))
            .expect(1)
            .mount(&server)
            .await;

        Browser::connect(&server.uri(), true).await.unwrap();
    }

    #[tokio::test]
    async fn find_all_parses_element_refs() {
        let server = MockServer::start().await;
        let browser = connected(&server).await;

        Mock::given(method("POST"))
            .and(path("/session/abc123/elements"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "value": [
                    { "element-6066-11e4-a52e-4f735466cecf": "el-1" },
                    { "element-6066-11e4-a52e-4f735466cecf": "el-2" }
                ]
            })))
            .mount(&server)
            .await;

        let elements = browser.find_all("article").await.unwrap();
        assert_eq!(elements.len(), 2);
        assert_eq!(elements[0].0, "el-1");
    }

    #[tokio::test]
    async fn missing_element_is_none_not_error() {
        let server = MockServer::start().await;
        let browser = connected(&server).await;

        Mock::given(method("POST"))
            .and(path("/session/abc123/element"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "value": {
                    "error": "no such element",
                    "message": "Unable to locate element: .missing"
                }
            })))
            .mount(&server)
            .await;

        let found = browser.find(".missing").await.unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn other_driver_errors_are_session_fatal() {
        let server = MockServer::start().await;
        let browser = connected(&server).await;

        Mock::given(method("POST"))
            .and(path("/session/abc123/element"))
            .respond_with(ResponseTemplate::new(404).set_body_json(json!({
                "value": {
                    "error": "invalid session id",
                    "message": "session deleted"
                }
            })))
            .mount(&server)
            .await;

        let err = browser.find("article").await.unwrap_err();
        assert!(matches!(err, ThreadpullError::Session(_)));
        assert!(err.to_string().contains("invalid session id"));
    }

    #[tokio::test]
    async fn attribute_reads_value() {
        let server = MockServer::start().await;
        let browser = connected(&server).await;

        Mock::given(method("GET"))
            .and(path("/session/abc123/element/el-1/attribute/href"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "value": "https://x.com/u/status/42"
            })))
            .mount(&server)
            .await;

        let href = browser
            .attribute(&ElementRef("el-1".into()), "href")
            .await
            .unwrap();
        assert_eq!(href.as_deref(), Some("https://x.com/u/status/42"));
    }

    #[tokio::test]
    async fn scroll_height_rejects_non_numeric() {
        let server = MockServer::start().await;
        let browser = connected(&server).await;

        Mock::given(method("POST"))
            .and(path("/session/abc123/execute/sync"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "value": "tall"
            })))
            .mount(&server)
            .await;

        let err = browser.scroll_height().await.unwrap_err();
        assert!(err.to_string().contains("scrollHeight"));
    }
}
