// Hand-crafted async HTTP client for the NetBox REST API (v4.x).
//
// Base path: /api/
// Auth: `Authorization: Token <key>` header

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::Error;
use crate::dto::Page;

// ── Error response shape from NetBox ──────────────────────────────────

// NetBox reports either `{"detail": "..."}` or a map of field names to
// message lists; we keep the raw body for the latter.
#[derive(serde::Deserialize)]
struct ErrorResponse {
    #[serde(default)]
    detail: Option<String>,
}

// ── Transport options ─────────────────────────────────────────────────

/// Connection knobs applied when building the underlying HTTP client.
#[derive(Debug, Clone)]
pub struct TransportOptions {
    pub timeout: Duration,
    /// Accept self-signed certificates. Common on lab NetBox instances.
    pub accept_invalid_certs: bool,
}

impl Default for TransportOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            accept_invalid_certs: false,
        }
    }
}

// ── Client ────────────────────────────────────────────────────────────

/// Async client for the NetBox REST API.
///
/// Uses token authentication and communicates via JSON REST endpoints
/// under `/api/`.
pub struct NetBoxClient {
    http: reqwest::Client,
    base_url: Url,
}

/// Page size used when walking list endpoints.
const PAGE_LIMIT: u32 = 200;

impl NetBoxClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build from an API token and transport options.
    ///
    /// Injects `Authorization: Token <key>` as a default header on
    /// every request.
    pub fn from_token(
        base_url: &str,
        token: &secrecy::SecretString,
        transport: &TransportOptions,
    ) -> Result<Self, Error> {
        let mut headers = HeaderMap::new();
        let mut value = HeaderValue::from_str(&format!("Token {}", token.expose_secret()))
            .map_err(|e| Error::Authentication {
                message: format!("invalid token header value: {e}"),
            })?;
        value.set_sensitive(true);
        headers.insert(reqwest::header::AUTHORIZATION, value);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(transport.timeout)
            .danger_accept_invalid_certs(transport.accept_invalid_certs)
            .build()?;
        let base_url = Self::normalize_base_url(base_url)?;

        Ok(Self { http, base_url })
    }

    /// Wrap an existing `reqwest::Client` (caller manages auth headers).
    pub fn from_reqwest(base_url: &str, http: reqwest::Client) -> Result<Self, Error> {
        let base_url = Self::normalize_base_url(base_url)?;
        Ok(Self { http, base_url })
    }

    /// Build the base URL ending in `/api/` regardless of how much of
    /// the path the operator supplied.
    fn normalize_base_url(raw: &str) -> Result<Url, Error> {
        let mut url = Url::parse(raw)?;

        // Strip trailing slash for uniform handling
        let path = url.path().trim_end_matches('/').to_owned();

        if path.ends_with("/api") {
            url.set_path(&format!("{path}/"));
        } else {
            url.set_path(&format!("{path}/api/"));
        }

        Ok(url)
    }

    // ── URL builder ──────────────────────────────────────────────────

    /// Join a relative path (e.g. `"dcim/devices/"`) onto the base URL.
    fn url(&self, path: &str) -> Result<Url, Error> {
        // base_url always ends with `/api/`, so joining `dcim/…` works.
        Ok(self.base_url.join(path)?)
    }

    // ── HTTP verbs ───────────────────────────────────────────────────

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("GET {url} params={params:?}");

        let resp = self.http.get(url).query(params).send().await?;
        Self::handle_response(resp).await
    }

    pub(crate) async fn post<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("POST {url}");

        let resp = self.http.post(url).json(body).send().await?;
        Self::handle_response(resp).await
    }

    pub(crate) async fn patch<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, Error> {
        let url = self.url(path)?;
        debug!("PATCH {url}");

        let resp = self.http.patch(url).json(body).send().await?;
        Self::handle_response(resp).await
    }

    pub(crate) async fn delete(&self, path: &str) -> Result<(), Error> {
        let url = self.url(path)?;
        debug!("DELETE {url}");

        let resp = self.http.delete(url).send().await?;
        Self::handle_empty(resp).await
    }

    // ── Response handling ────────────────────────────────────────────

    async fn handle_response<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, Error> {
        let status = resp.status();
        if status.is_success() {
            let body = resp.text().await?;
            serde_json::from_str(&body).map_err(|e| {
                let preview = &body[..body.len().min(200)];
                Error::Deserialization {
                    message: format!("{e} (body preview: {preview:?})"),
                    body,
                }
            })
        } else {
            Err(Self::parse_error(status, resp).await)
        }
    }

    async fn handle_empty(resp: reqwest::Response) -> Result<(), Error> {
        let status = resp.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(Self::parse_error(status, resp).await)
        }
    }

    async fn parse_error(status: reqwest::StatusCode, resp: reqwest::Response) -> Error {
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Error::InvalidToken;
        }

        let raw = resp.text().await.unwrap_or_default();

        let message = match serde_json::from_str::<ErrorResponse>(&raw) {
            Ok(ErrorResponse { detail: Some(d) }) => d,
            _ if raw.is_empty() => status.to_string(),
            _ => raw,
        };

        Error::Api {
            status: status.as_u16(),
            message,
        }
    }

    // ── List helpers ─────────────────────────────────────────────────

    /// Fetch the first record matching the given filter params, if any.
    ///
    /// Lookups in this crate are exact-match filters, so a result set
    /// larger than one indicates an upstream data problem; the first
    /// record wins.
    pub(crate) async fn find_one<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<Option<T>, Error> {
        let mut params = params.to_vec();
        params.push(("limit", "1".to_owned()));
        let page: Page<T> = self.get(path, &params).await?;
        Ok(page.results.into_iter().next())
    }

    /// Walk a list endpoint to exhaustion, collecting every record.
    pub(crate) async fn list_all<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<Vec<T>, Error> {
        let mut all = Vec::new();
        let mut offset: u64 = 0;

        loop {
            let mut page_params = params.to_vec();
            page_params.push(("limit", PAGE_LIMIT.to_string()));
            page_params.push(("offset", offset.to_string()));

            let page: Page<T> = self.get(path, &page_params).await?;
            let received = page.results.len();
            all.extend(page.results);

            let limit = usize::try_from(PAGE_LIMIT).unwrap_or(usize::MAX);
            if received < limit || u64::try_from(all.len()).unwrap_or(u64::MAX) >= page.count {
                break;
            }

            offset += u64::try_from(received).unwrap_or(u64::MAX);
        }

        Ok(all)
    }
}
