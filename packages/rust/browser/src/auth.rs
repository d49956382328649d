//! Session establishment: credentials, cookie bypass, and the login flow.
//!
//! Credentials come from the env vars named in `[session]` config, with an
//! interactive prompt fallback for ad-hoc runs. A cookies JSON file, when
//! present, bypasses the login flow entirely.

use std::path::Path;
use std::time::Duration;

use serde_json::Value;
use tracing::{info, instrument, warn};

use threadpull_shared::{Result, SessionConfig, ThreadpullError};

use crate::client::{Browser, KEY_RETURN};

const HOME_URL: &str = "https://x.com";
const LOGIN_URL: &str = "https://x.com/i/flow/login";

const USERNAME_INPUT: &str = r#"input[autocomplete="username"]"#;
const VERIFY_INPUT: &str = r#"input[data-testid="ocfEnterTextTextInput"]"#;
const PASSWORD_INPUT: &str = r#"input[name="password"]"#;
const HOME_LINK: &str = r#"a[data-testid="AppTabBar_Home_Link"]"#;

/// How long to wait for each login-flow element.
const LOGIN_WAIT: Duration = Duration::from_secs(20);
/// The verification interstitial only sometimes appears; probe briefly.
const VERIFY_WAIT: Duration = Duration::from_secs(3);

/// Account credentials for the login flow.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    /// Resolve credentials from the configured env vars, prompting
    /// interactively for whichever is absent.
    pub fn resolve(config: &SessionConfig) -> Result<Self> {
        let username = match std::env::var(&config.username_env) {
            Ok(val) if !val.is_empty() => val,
            _ => dialoguer::Input::new()
                .with_prompt("Account username")
                .interact_text()
                .map_err(|e| ThreadpullError::config(format!("username prompt: {e}")))?,
        };

        let password = match std::env::var(&config.password_env) {
            Ok(val) if !val.is_empty() => val,
            _ => dialoguer::Password::new()
                .with_prompt("Account password")
                .interact()
                .map_err(|e| ThreadpullError::config(format!("password prompt: {e}")))?,
        };

        Ok(Self { username, password })
    }
}

/// Establish an authenticated session: cookie bypass when available,
/// interactive login otherwise.
#[instrument(skip_all)]
pub async fn establish_session(browser: &Browser, config: &SessionConfig) -> Result<()> {
    browser.goto(HOME_URL).await?;

    if let Some(cookies_file) = &config.cookies_file {
        if load_cookies(browser, Path::new(cookies_file)).await? {
            info!("cookies loaded, skipping login");
            browser.refresh().await?;
            return Ok(());
        }
    }

    info!("no usable cookies, proceeding with login");
    let credentials = Credentials::resolve(config)?;
    login(browser, &credentials).await
}

/// Load cookies from a JSON file into the session. Returns `false` (without
/// error) when the file is absent, so the caller can fall back to login.
pub async fn load_cookies(browser: &Browser, path: &Path) -> Result<bool> {
    if !path.exists() {
        info!(?path, "no cookies file found");
        return Ok(false);
    }

    let content =
        std::fs::read_to_string(path).map_err(|e| ThreadpullError::io(path, e))?;
    let cookies: Vec<Value> = serde_json::from_str(&content).map_err(|e| {
        ThreadpullError::validation(format!("cookies file {}: {e}", path.display()))
    })?;

    for cookie in &cookies {
        browser.add_cookie(cookie).await?;
    }

    info!(count = cookies.len(), "cookies applied to session");
    Ok(true)
}

/// Drive the login flow: username, optional verification step, password,
/// then confirm via the home-link probe. Failure is session-fatal.
#[instrument(skip_all)]
pub async fn login(browser: &Browser, credentials: &Credentials) -> Result<()> {
    browser.goto(LOGIN_URL).await?;

    let username_input = browser
        .wait_for(USERNAME_INPUT, LOGIN_WAIT)
        .await?
        .ok_or_else(|| ThreadpullError::session("login page did not show a username field"))?;
    browser
        .send_keys(
            &username_input,
            &format!("{}{KEY_RETURN}", credentials.username),
        )
        .await?;

    // Unusual-activity interstitial; asks for the username again.
    if let Some(verify_input) = browser.wait_for(VERIFY_INPUT, VERIFY_WAIT).await? {
        warn!("verification step encountered, re-submitting username");
        browser
            .send_keys(
                &verify_input,
                &format!("{}{KEY_RETURN}", credentials.username),
            )
            .await?;
    }

    let password_input = browser
        .wait_for(PASSWORD_INPUT, LOGIN_WAIT)
        .await?
        .ok_or_else(|| ThreadpullError::session("login page did not show a password field"))?;
    browser
        .send_keys(
            &password_input,
            &format!("{}{KEY_RETURN}", credentials.password),
        )
        .await?;

    match browser.wait_for(HOME_LINK, LOGIN_WAIT).await? {
        Some(_) => {
            info!("login successful");
            Ok(())
        }
        None => Err(ThreadpullError::session(
            "login failed: home timeline never appeared",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credentials_resolve_from_env() {
        // Unique var names so parallel tests cannot collide.
        unsafe {
            std::env::set_var("TP_TEST_AUTH_USER", "operator");
            std::env::set_var("TP_TEST_AUTH_PASS", "hunter2");
        }
        let config = SessionConfig {
            username_env: "TP_TEST_AUTH_USER".into(),
            password_env: "TP_TEST_AUTH_PASS".into(),
            ..Default::default()
        };

        let creds = Credentials::resolve(&config).expect("resolve");
        assert_eq!(creds.username, "operator");
        assert_eq!(creds.password, "hunter2");
    }
}
