//! Lightweight OAuth2 Authorization Code flow for desktop use.
//!
//! 1. Opens browser to authorization URL
//! 2. Starts a tiny localhost HTTP server to receive the callback
//! 3. Exchanges the code for an access token (+ refresh token)
//!
//! Persistence is the caller's job: both `authorize` and `refresh`
//! return the issued tokens, and whoever called decides how to merge
//! and store them. There is no hidden on-token-received side channel.

use chrono::{DateTime, Duration, Utc};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};
use std::net::TcpListener;

use crate::error::SyncError;
use crate::storage::config::GoogleConfig;

const GOOGLE_AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const GOOGLE_TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const CALENDAR_SCOPE: &str = "https://www.googleapis.com/auth/calendar.events";

/// Upper bound on a token endpoint call. A stalled exchange or refresh
/// is cut off and surfaces as a network error.
const TOKEN_REQUEST_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(30);

/// Tokens issued by the provider for one authorization or refresh.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OAuthTokens {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
    pub token_type: String,
    pub scope: Option<String>,
}

/// OAuth client configuration for the calendar provider.
#[derive(Debug, Clone)]
pub struct OAuthConfig {
    pub client_id: String,
    pub client_secret: String,
    pub auth_url: String,
    pub token_url: String,
    pub scopes: Vec<String>,
    pub redirect_port: u16,
    /// Per-request timeout on token endpoint calls.
    pub timeout: std::time::Duration,
}

impl OAuthConfig {
    /// Build the Google config from application configuration.
    pub fn google(config: &GoogleConfig) -> Self {
        Self {
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            auth_url: GOOGLE_AUTH_URL.to_string(),
            token_url: GOOGLE_TOKEN_URL.to_string(),
            scopes: vec![CALENDAR_SCOPE.to_string()],
            redirect_port: config.redirect_port,
            timeout: TOKEN_REQUEST_TIMEOUT,
        }
    }

    pub fn redirect_uri(&self) -> String {
        format!("http://localhost:{}/callback", self.redirect_port)
    }

    pub fn auth_url_full(&self) -> String {
        let scopes = self.scopes.join(" ");
        format!(
            "{}?client_id={}&redirect_uri={}&response_type=code&scope={}&access_type=offline&prompt=consent",
            self.auth_url,
            urlencoding::encode(&self.client_id),
            urlencoding::encode(&self.redirect_uri()),
            urlencoding::encode(&scopes),
        )
    }
}

/// Run the full OAuth2 flow: open browser -> listen for callback ->
/// exchange code. Returns the issued tokens for the caller to persist.
pub async fn authorize(config: &OAuthConfig) -> Result<OAuthTokens, SyncError> {
    if config.client_id.is_empty() || config.client_secret.is_empty() {
        return Err(SyncError::Config(
            "google client_id / client_secret not configured".to_string(),
        ));
    }

    // Open browser
    let auth_url = config.auth_url_full();
    open::that(&auth_url).map_err(|e| SyncError::Authorization(e.to_string()))?;

    // Listen for callback
    let listener = TcpListener::bind(format!("127.0.0.1:{}", config.redirect_port))?;
    listener.set_nonblocking(false)?;

    let (mut stream, _) = listener.accept()?;
    let mut buf = [0u8; 4096];
    let n = stream.read(&mut buf)?;
    let request = String::from_utf8_lossy(&buf[..n]);

    // Extract code from GET /callback?code=XXX&...
    let code = extract_code(&request)
        .ok_or_else(|| SyncError::Authorization("no code in callback".to_string()))?;

    // Send success response to browser
    let response = "HTTP/1.1 200 OK\r\nContent-Type: text/html\r\n\r\n<html><body><h2>Authentication successful!</h2><p>You can close this tab.</p><script>window.close()</script></body></html>";
    stream.write_all(response.as_bytes())?;
    drop(stream);
    drop(listener);

    // Exchange code for tokens
    exchange_code(config, &code).await
}

/// Exchange authorization code for tokens.
async fn exchange_code(config: &OAuthConfig, code: &str) -> Result<OAuthTokens, SyncError> {
    let redirect_uri = config.redirect_uri();
    let params = [
        ("client_id", config.client_id.as_str()),
        ("client_secret", config.client_secret.as_str()),
        ("code", code),
        ("grant_type", "authorization_code"),
        ("redirect_uri", redirect_uri.as_str()),
    ];

    let body: serde_json::Value = Client::new()
        .post(&config.token_url)
        .timeout(config.timeout)
        .form(&params)
        .send()
        .await?
        .json()
        .await?;

    if let Some(error) = body.get("error") {
        return Err(SyncError::Authorization(format!("OAuth error: {error}")));
    }

    Ok(parse_token_response(&body))
}

/// Refresh an access token using a refresh token.
///
/// The response may or may not carry a new refresh token; merging it
/// into the stored credential is the caller's responsibility (see
/// `CredentialRecord::merge_refresh`).
pub async fn refresh(config: &OAuthConfig, refresh_token: &str) -> Result<OAuthTokens, SyncError> {
    let params = [
        ("client_id", config.client_id.as_str()),
        ("client_secret", config.client_secret.as_str()),
        ("refresh_token", refresh_token),
        ("grant_type", "refresh_token"),
    ];

    let body: serde_json::Value = Client::new()
        .post(&config.token_url)
        .timeout(config.timeout)
        .form(&params)
        .send()
        .await?
        .json()
        .await?;

    if let Some(error) = body.get("error") {
        return Err(SyncError::TokenRefresh(error.to_string()));
    }

    Ok(parse_token_response(&body))
}

fn parse_token_response(body: &serde_json::Value) -> OAuthTokens {
    let expires_in = body.get("expires_in").and_then(|v| v.as_i64());
    let expires_at = expires_in.map(|ei| Utc::now() + Duration::seconds(ei));

    OAuthTokens {
        access_token: body["access_token"].as_str().unwrap_or_default().to_string(),
        refresh_token: body
            .get("refresh_token")
            .and_then(|v| v.as_str())
            .map(String::from),
        expires_at,
        token_type: body["token_type"].as_str().unwrap_or("Bearer").to_string(),
        scope: body.get("scope").and_then(|v| v.as_str()).map(String::from),
    }
}

fn extract_code(request: &str) -> Option<String> {
    let first_line = request.lines().next()?;
    let path = first_line.split_whitespace().nth(1)?;
    let url = url::Url::parse(&format!("http://localhost{path}")).ok()?;
    url.query_pairs()
        .find(|(k, _)| k == "code")
        .map(|(_, v)| v.to_string())
}

// Simple urlencoding helper
mod urlencoding {
    pub fn encode(s: &str) -> String {
        url::form_urlencoded::Serializer::new(String::new())
            .append_key_only(s)
            .finish()
    }
}
