// HTTP client wrapper for the fleet REST API.
//
// Owns URL construction, bearer-token attachment, 401 reporting and error
// normalization. Resource endpoints (devices, users, etc.) are implemented
// as inherent methods in sibling modules so this file stays focused on
// transport mechanics.

use std::sync::Arc;

use reqwest::header::{AUTHORIZATION, HeaderValue};
use reqwest::{Method, RequestBuilder, StatusCode};
use secrecy::ExposeSecret;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, trace, warn};
use url::Url;

use crate::auth::AuthHook;
use crate::error::{Error, UNEXPECTED_ERROR};
use crate::transport::TransportConfig;

/// Error body shape used by the backend: `{"detail": "..."}` or
/// `{"message": "..."}`. Anything else degrades to a generic message.
#[derive(serde::Deserialize)]
struct ErrorBody {
    #[serde(default)]
    detail: Option<serde_json::Value>,
    #[serde(default)]
    message: Option<serde_json::Value>,
}

/// Async client for the fleet backend.
///
/// Every call is exactly one round trip: no caching, no retries. Failures
/// come back as [`Error`] with the backend's message already extracted.
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    hook: Option<Arc<dyn AuthHook>>,
}

impl ApiClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build a client for `base_url` (e.g. `http://localhost:8000/api/v1`).
    pub fn new(base_url: &str, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Self::from_reqwest(base_url, http)
    }

    /// Wrap an existing `reqwest::Client`.
    pub fn from_reqwest(base_url: &str, http: reqwest::Client) -> Result<Self, Error> {
        let base_url = Self::normalize_base_url(base_url)?;
        Ok(Self {
            http,
            base_url,
            hook: None,
        })
    }

    /// Attach the session owner consulted for tokens and 401 handling.
    pub fn with_auth_hook(mut self, hook: Arc<dyn AuthHook>) -> Self {
        self.hook = Some(hook);
        self
    }

    /// Ensure the base path ends with `/` so relative joins stay beneath it.
    fn normalize_base_url(raw: &str) -> Result<Url, Error> {
        let mut url = Url::parse(raw)?;
        if url.cannot_be_a_base() {
            return Err(Error::InvalidInput(format!("not a base URL: {raw}")));
        }
        let path = url.path().trim_end_matches('/').to_owned();
        url.set_path(&format!("{path}/"));
        Ok(url)
    }

    // ── Accessors ────────────────────────────────────────────────────

    /// The API base URL (always ends with `/`).
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The underlying HTTP client.
    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.http
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Append path segments beneath the base URL.
    ///
    /// Each segment is percent-encoded on its own, so identifiers such as
    /// setting keys can never escape their position in the path. A trailing
    /// empty segment yields a trailing slash (`["devices", ""]` → `devices/`).
    pub(crate) fn url(&self, segments: &[&str]) -> Result<Url, Error> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| Error::InvalidInput(format!("not a base URL: {}", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    // ── Generic request ──────────────────────────────────────────────

    /// Send an arbitrary request and decode the JSON response.
    ///
    /// `path` is relative to the base URL (`"devices/3"`, `"/settings/"`).
    /// Query parameters are sent only for the pairs given.
    pub async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<&serde_json::Value>,
        params: &[(&str, String)],
    ) -> Result<T, Error> {
        let segments: Vec<&str> = path.trim_start_matches('/').split('/').collect();
        let url = self.url(&segments)?;
        debug!("{method} {url}");

        let mut builder = self.http.request(method, url).query(params);
        if let Some(body) = body {
            builder = builder.json(body);
        }
        self.fetch(builder).await
    }

    // ── HTTP verbs ───────────────────────────────────────────────────

    pub(crate) async fn get<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T, Error> {
        self.get_with_params(segments, &[]).await
    }

    pub(crate) async fn get_with_params<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        params: &[(&str, String)],
    ) -> Result<T, Error> {
        let url = self.url(segments)?;
        debug!("GET {url} params={params:?}");

        self.fetch(self.http.get(url).query(params)).await
    }

    pub(crate) async fn post<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        segments: &[&str],
        body: &B,
    ) -> Result<T, Error> {
        let url = self.url(segments)?;
        debug!("POST {url}");

        self.fetch(self.http.post(url).json(body)).await
    }

    pub(crate) async fn post_empty<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T, Error> {
        let url = self.url(segments)?;
        debug!("POST {url}");

        self.fetch(self.http.post(url)).await
    }

    pub(crate) async fn put<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        segments: &[&str],
        body: &B,
    ) -> Result<T, Error> {
        let url = self.url(segments)?;
        debug!("PUT {url}");

        self.fetch(self.http.put(url).json(body)).await
    }

    pub(crate) async fn delete(&self, segments: &[&str]) -> Result<(), Error> {
        let url = self.url(segments)?;
        debug!("DELETE {url}");

        self.send(self.http.delete(url)).await.map(drop)
    }

    // ── Response handling ────────────────────────────────────────────

    /// Send and decode a JSON body.
    pub(crate) async fn fetch<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, Error> {
        let resp = self.send(builder).await?;
        let body = resp.text().await?;
        serde_json::from_str(&body).map_err(|e| {
            let head = preview(&body, 200);
            Error::Deserialization {
                message: format!("{e} (body preview: {head:?})"),
                body: body.clone(),
            }
        })
    }

    /// Attach credentials, send, and turn any non-2xx into an [`Error`].
    async fn send(&self, builder: RequestBuilder) -> Result<reqwest::Response, Error> {
        let resp = self.authorize(builder).send().await?;
        let status = resp.status();
        trace!(%status, "response received");

        if status.is_success() {
            return Ok(resp);
        }

        if status == StatusCode::UNAUTHORIZED {
            warn!("backend answered 401, dropping session");
            if let Some(hook) = &self.hook {
                hook.on_unauthorized();
            }
        }

        Err(Self::parse_error(status, resp).await)
    }

    fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        let Some(token) = self.hook.as_ref().and_then(|h| h.bearer_token()) else {
            return builder;
        };
        match HeaderValue::from_str(&format!("Bearer {}", token.expose_secret())) {
            Ok(mut value) => {
                value.set_sensitive(true);
                builder.header(AUTHORIZATION, value)
            }
            Err(e) => {
                warn!(error = %e, "stored token is not a valid header value, sending anonymously");
                builder
            }
        }
    }

    async fn parse_error(status: StatusCode, resp: reqwest::Response) -> Error {
        let raw = resp.text().await.unwrap_or_default();
        let message = extract_message(status, &raw);

        if status == StatusCode::UNAUTHORIZED {
            Error::Unauthorized { message }
        } else {
            Error::Http {
                status: status.as_u16(),
                message,
            }
        }
    }
}

/// Pick the most useful message out of an error body.
///
/// Precedence: string `detail`, string `message`, then a status line. Only
/// string fields count; FastAPI validation errors (where `detail` is an
/// array) fall through to the status line.
fn extract_message(status: StatusCode, raw: &str) -> String {
    if let Ok(body) = serde_json::from_str::<ErrorBody>(raw) {
        for field in [body.detail, body.message].into_iter().flatten() {
            if let serde_json::Value::String(s) = field {
                if !s.is_empty() {
                    return s;
                }
            }
        }
    }
    if status.is_client_error() || status.is_server_error() {
        format!("Request failed with status code {}", status.as_u16())
    } else {
        UNEXPECTED_ERROR.to_owned()
    }
}

/// First `max_chars` characters of `body`, cut on a char boundary.
fn preview(body: &str, max_chars: usize) -> &str {
    body.char_indices()
        .nth(max_chars)
        .map_or(body, |(end, _)| &body[..end])
}
