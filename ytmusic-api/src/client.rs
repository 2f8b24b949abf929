//! HTTP client for the YouTube Music InnerTube API.
//!
//! Every call is a JSON `POST` to `https://music.youtube.com/youtubei/v1/{endpoint}`
//! whose body carries a `context` object identifying the client:
//!
//! ```json
//! {
//!   "context": { "client": { "clientName": "WEB_REMIX", "clientVersion": "1.20240918.01.00", "hl": "en", "gl": "US" } },
//!   "browseId": "VLPL..."
//! }
//! ```
//!
//! Follow-up pages of a result set reuse the same endpoint and body with the
//! continuation token appended to the query string
//! (`&ctoken=…&continuation=…&type=next`).
//!
//! Failures are reported as [`Error::Status`](crate::Error::Status) for
//! non-2xx responses and [`Error::Api`](crate::Error::Api) when the body holds
//! an InnerTube `error` object:
//!
//! ```json
//! { "error": { "code": 404, "message": "Requested entity was not found.", "status": "NOT_FOUND" } }
//! ```

use crate::auth::Session;
use crate::error::{Error, Result};
use reqwest::Client;
use serde_json::{Value, json};
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};
use ytmusic_core::JsonDocument;

/// Default API origin.
pub const DEFAULT_BASE_URL: &str = "https://music.youtube.com";
/// Default request timeout.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
const API_PATH: &str = "/youtubei/v1";
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
    AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0.0.0 Safari/537.36";
/// Longest error body kept in [`Error::Status`].
const MAX_ERROR_BODY: usize = 512;

/// The InnerTube client identity sent with each request.
///
/// Response shapes differ between client types, and the mappers in this
/// crate expect [`web_remix`](Self::web_remix).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientProfile {
    /// `context.client.clientName`.
    pub name: String,
    /// `context.client.clientVersion`.
    pub version: String,
    /// Numeric id sent as `X-YouTube-Client-Name`.
    pub header_id: u32,
}

impl ClientProfile {
    /// The music.youtube.com web client.
    pub fn web_remix() -> Self {
        Self {
            name: "WEB_REMIX".into(),
            version: "1.20240918.01.00".into(),
            header_id: 67,
        }
    }

    /// The YouTube Music Android app.
    pub fn android_music() -> Self {
        Self {
            name: "ANDROID_MUSIC".into(),
            version: "7.21.50".into(),
            header_id: 21,
        }
    }
}

impl Default for ClientProfile {
    fn default() -> Self {
        Self::web_remix()
    }
}

/// Async client for the InnerTube API.
///
/// Cheap to clone: clones share the connection pool. API methods are
/// implemented in separate modules (`playlist`, `search`, `user`) as
/// `impl YtMusicClient` blocks.
#[derive(Debug, Clone)]
pub struct YtMusicClient {
    http: Client,
    base_url: String,
    profile: ClientProfile,
    language: String,
    region: String,
    session: Session,
}

impl YtMusicClient {
    /// Create a client with default settings, loading the session from
    /// the default session file.
    pub fn new() -> Result<Self> {
        Self::builder().session(Session::load()?).build()
    }

    /// Create a client with an explicit [`Session`].
    pub fn with_session(session: Session) -> Result<Self> {
        Self::builder().session(session).build()
    }

    pub fn builder() -> ClientBuilder {
        ClientBuilder::default()
    }

    /// Return a reference to the current session.
    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn profile(&self) -> &ClientProfile {
        &self.profile
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn context(&self) -> Value {
        json!({
            "client": {
                "clientName": self.profile.name,
                "clientVersion": self.profile.version,
                "hl": self.language,
                "gl": self.region,
            },
            "user": {},
        })
    }

    fn url(&self, endpoint: &str, continuation: Option<&str>) -> String {
        let mut url = format!("{}{API_PATH}/{endpoint}?prettyPrint=false", self.base_url);
        if let Some(token) = continuation {
            let token = urlencoding::encode(token);
            url.push_str(&format!("&ctoken={token}&continuation={token}&type=next"));
        }
        url
    }

    /// Send an InnerTube request to `endpoint` (e.g. `browse`, `search`,
    /// `account/account_menu`).
    ///
    /// `body` must be a JSON object; the client `context` is added to it.
    /// When `continuation` is set, the follow-up page for that token is
    /// requested instead of the first one.
    ///
    /// The request is abandoned with [`Error::Cancelled`] as soon as
    /// `cancel` fires.
    pub async fn request(
        &self,
        endpoint: &str,
        mut body: Value,
        continuation: Option<&str>,
        cancel: &CancellationToken,
    ) -> Result<JsonDocument> {
        let Some(fields) = body.as_object_mut() else {
            return Err(Error::Other("request body must be a JSON object".into()));
        };
        fields.insert("context".into(), self.context());

        debug!(endpoint, continuation = continuation.is_some(), "innertube request");
        tokio::select! {
            biased;
            () = cancel.cancelled() => {
                debug!(endpoint, "innertube request cancelled");
                Err(Error::Cancelled)
            }
            res = self.send(endpoint, &body, continuation) => res,
        }
    }

    /// `browse` request: playlists, albums, artists and library pages.
    pub async fn browse(
        &self,
        body: Value,
        continuation: Option<&str>,
        cancel: &CancellationToken,
    ) -> Result<JsonDocument> {
        self.request("browse", body, continuation, cancel).await
    }

    /// `search` request. Typed results are in [`search`](Self::search).
    pub async fn search_raw(
        &self,
        body: Value,
        continuation: Option<&str>,
        cancel: &CancellationToken,
    ) -> Result<JsonDocument> {
        self.request("search", body, continuation, cancel).await
    }

    async fn send(&self, endpoint: &str, body: &Value, continuation: Option<&str>) -> Result<JsonDocument> {
        let url = self.url(endpoint, continuation);
        let mut req = self
            .http
            .post(&url)
            .header("Origin", &self.base_url)
            .header("X-Origin", &self.base_url)
            .header("Referer", format!("{}/", self.base_url))
            .header("X-YouTube-Client-Name", self.profile.header_id.to_string())
            .header("X-YouTube-Client-Version", &self.profile.version)
            .json(body);

        if let Some(cookie) = self.session.cookie_header() {
            req = req.header("Cookie", cookie);
        }
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |d| d.as_secs());
        if let Some(auth) = self.session.authorization(&self.base_url, now) {
            req = req.header("Authorization", auth);
        }

        let resp = req.send().await?;
        let status = resp.status();
        let text = resp.text().await?;
        if !status.is_success() {
            warn!(endpoint, status = status.as_u16(), "innertube request failed");
            let mut body = text;
            if body.len() > MAX_ERROR_BODY {
                let cut = (0..=MAX_ERROR_BODY).rev().find(|&i| body.is_char_boundary(i)).unwrap_or(0);
                body.truncate(cut);
            }
            return Err(Error::Status {
                status: status.as_u16(),
                body,
            });
        }

        let doc = JsonDocument::parse(&text)?;
        let error = doc.root().get("error");
        if !error.is_undefined() {
            let code = error.get("code").as_i64().or(0);
            let message = error.get("message").as_string().or_else(|| "unknown error".to_owned());
            warn!(endpoint, code, %message, "innertube error response");
            return Err(Error::Api { code, message });
        }
        Ok(doc)
    }
}

/// Builder for [`YtMusicClient`].
#[derive(Debug, Clone)]
pub struct ClientBuilder {
    base_url: String,
    profile: ClientProfile,
    language: String,
    region: String,
    user_agent: String,
    timeout: Duration,
    session: Session,
    http: Option<Client>,
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            profile: ClientProfile::default(),
            language: "en".to_owned(),
            region: "US".to_owned(),
            user_agent: USER_AGENT.to_owned(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            session: Session::default(),
            http: None,
        }
    }
}

impl ClientBuilder {
    /// API origin, e.g. a mock server in tests. Trailing slashes are dropped.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_owned();
        self
    }

    pub fn profile(mut self, profile: ClientProfile) -> Self {
        self.profile = profile;
        self
    }

    /// Interface language (`hl`), e.g. `"en"` or `"de"`.
    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Content region (`gl`), e.g. `"US"`.
    pub fn region(mut self, region: impl Into<String>) -> Self {
        self.region = region.into();
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn session(mut self, session: Session) -> Self {
        self.session = session;
        self
    }

    /// Use a preconfigured `reqwest` client. `user_agent` and `timeout` are
    /// then ignored.
    pub fn http_client(mut self, client: Client) -> Self {
        self.http = Some(client);
        self
    }

    pub fn build(self) -> Result<YtMusicClient> {
        let http = match self.http {
            Some(client) => client,
            None => Client::builder()
                .user_agent(self.user_agent)
                .timeout(self.timeout)
                .build()?,
        };
        Ok(YtMusicClient {
            http,
            base_url: self.base_url,
            profile: self.profile,
            language: self.language,
            region: self.region,
            session: self.session,
        })
    }
}
