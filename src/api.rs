//! HTTP client for the data API.
//!
//! Session, dataset, name resolution, logout and export all go through
//! here. The session travels as a `Cookie` header taken from the config.

use reqwest::Method;
use reqwest::header::COOKIE;
use serde::Deserialize;

use crate::error::{ApiError, Result};
use crate::export::ExportRequest;
use crate::model::Dataset;

/// Shown when the user has no avatar of their own
pub const DEFAULT_AVATAR_URL: &str = "https://cdn.discordapp.com/embed/avatars/0.png";

/// Identity as reported by the auth service
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct User {
    pub id: String,
    pub tag: String,
    pub allowed: bool,
    #[serde(default)]
    pub avatar: Option<String>,
}

impl User {
    pub fn avatar_url(&self) -> &str {
        self.avatar
            .as_deref()
            .filter(|url| !url.is_empty())
            .unwrap_or(DEFAULT_AVATAR_URL)
    }
}

/// `GET /auth/me` response (partial)
#[derive(Debug, Deserialize)]
struct SessionResponse {
    #[serde(default)]
    ok: bool,
    #[serde(default)]
    user: Option<User>,
}

/// `GET /resolve/discord-user/{id}` success body
#[derive(Debug, Deserialize)]
struct ResolvedName {
    name: String,
}

/// Error body the server sends with non-2xx statuses
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

/// Decode the session check; anything but `ok: true` with a user is "no user"
fn parse_session(body: &str) -> Option<Option<User>> {
    let session: SessionResponse = serde_json::from_str(body).ok()?;
    Some(if session.ok { session.user } else { None })
}

/// Build a status error, preferring the server's `error` text
fn status_error(status: u16, body: &str, fallback: &str) -> ApiError {
    let message = serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.error)
        .filter(|e| !e.is_empty())
        .unwrap_or_else(|| fallback.to_string());
    ApiError::Status { status, message }
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    base: String,
    session: Option<String>,
    http: reqwest::Client,
}

impl ApiClient {
    pub fn new(base: &str, session: Option<String>) -> Self {
        let http = reqwest::Client::builder()
            .user_agent(format!("Datadeck/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_default();

        ApiClient {
            base: base.trim_end_matches('/').to_string(),
            session: session.filter(|s| !s.trim().is_empty()),
            http,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    /// Where the browser goes to start the OAuth flow
    pub fn login_url(&self) -> String {
        self.url("/auth/discord")
    }

    /// Name lookup URL with `id` encoded as a single path segment
    fn resolve_url(&self, id: &str) -> Result<reqwest::Url> {
        let mut url = reqwest::Url::parse(&self.url("/resolve/discord-user"))
            .map_err(|e| ApiError::Url(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| ApiError::Url(self.base.clone()))?
            .push(id);
        Ok(url)
    }

    fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        self.with_session(self.http.request(method, self.url(path)))
    }

    fn with_session(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.session {
            Some(cookie) => builder.header(COOKIE, cookie.as_str()),
            None => builder,
        }
    }

    /// Who is signed in, if anyone
    pub async fn current_user(self) -> Result<Option<User>> {
        let response = self.request(Method::GET, "/auth/me").send().await?;
        let status = response.status();
        let body = response.text().await?;

        match parse_session(&body) {
            Some(user) => Ok(user),
            None => Err(status_error(status.as_u16(), &body, "Session check failed")),
        }
    }

    /// The whole database, collection by collection
    pub async fn fetch_dataset(self) -> Result<Dataset> {
        let response = self.request(Method::GET, "/data").send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(status_error(status.as_u16(), &body, "Failed to fetch data"));
        }
        let json: serde_json::Value = serde_json::from_str(&body)?;
        Dataset::from_json(&json)
    }

    /// Display name for a user id
    pub async fn resolve_name(self, id: String) -> Result<String> {
        let url = self.resolve_url(&id)?;
        let response = self.with_session(self.http.get(url)).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(status_error(status.as_u16(), &body, "Failed to resolve"));
        }
        let resolved: ResolvedName = serde_json::from_str(&body)?;
        Ok(resolved.name)
    }

    pub async fn logout(self) -> Result<()> {
        let response = self.request(Method::POST, "/auth/logout").send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(status_error(status.as_u16(), &body, "Logout failed"));
        }
        Ok(())
    }

    /// Raw export bytes, serialised by the server
    pub async fn export(
        self,
        request: ExportRequest,
        active_collection: Option<String>,
        search: String,
    ) -> Result<Vec<u8>> {
        let response = self
            .request(Method::GET, "/export")
            .query(&request.query_pairs(active_collection.as_deref(), &search))
            .send()
            .await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(status_error(status.as_u16(), &body, "Export failed"));
        }
        Ok(response.bytes().await?.to_vec())
    }

    /// Avatar image bytes (no session cookie; this is a public CDN)
    pub async fn fetch_avatar(self, url: String) -> Result<Vec<u8>> {
        let response = self.http.get(&url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                message: format!("Avatar request failed: {}", status),
            });
        }
        Ok(response.bytes().await?.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_session() {
        let user = parse_session(
            r#"{"ok": true, "user": {"id": "1", "tag": "ada#0001", "allowed": true, "avatar": null}}"#,
        )
        .unwrap()
        .unwrap();
        assert_eq!(user.tag, "ada#0001");
        assert!(user.allowed);
        assert_eq!(user.avatar_url(), DEFAULT_AVATAR_URL);

        assert_eq!(parse_session(r#"{"ok": false}"#), Some(None));
        assert_eq!(
            parse_session(r#"{"ok": false, "user": {"id": "1", "tag": "t", "allowed": true}}"#),
            Some(None)
        );
        assert_eq!(parse_session("<html>"), None);
    }

    #[test]
    fn test_status_error_prefers_server_text() {
        let err = status_error(404, r#"{"error": "Unknown user"}"#, "Failed to resolve");
        assert_eq!(err.to_string(), "Unknown user");

        let err = status_error(502, "Bad Gateway", "Failed to resolve");
        assert_eq!(err.to_string(), "Failed to resolve");

        let err = status_error(500, r#"{"error": ""}"#, "Failed to resolve");
        assert_eq!(err.to_string(), "Failed to resolve");
    }

    #[test]
    fn test_urls() {
        let api = ApiClient::new("http://localhost:3000/", None);
        assert_eq!(api.url("/data"), "http://localhost:3000/data");
        assert_eq!(api.login_url(), "http://localhost:3000/auth/discord");
    }

    #[test]
    fn test_resolve_url_encodes_id() {
        let api = ApiClient::new("http://localhost:3000/api/", None);
        assert_eq!(
            api.resolve_url("123").unwrap().as_str(),
            "http://localhost:3000/api/resolve/discord-user/123"
        );
        assert_eq!(
            api.resolve_url("../a b?c#d").unwrap().as_str(),
            "http://localhost:3000/api/resolve/discord-user/..%2Fa%20b%3Fc%23d"
        );
    }

    #[test]
    fn test_resolve_url_rejects_bad_base() {
        let api = ApiClient::new("not a url", None);
        assert!(matches!(api.resolve_url("1"), Err(ApiError::Url(_))));
    }

    #[test]
    fn test_blank_session_is_dropped() {
        let api = ApiClient::new("http://x", Some("  ".to_string()));
        assert!(api.session.is_none());
    }

    #[test]
    fn test_custom_avatar() {
        let user = User {
            id: "1".to_string(),
            tag: "t".to_string(),
            allowed: true,
            avatar: Some("https://cdn.example/a.png".to_string()),
        };
        assert_eq!(user.avatar_url(), "https://cdn.example/a.png");
    }
}
