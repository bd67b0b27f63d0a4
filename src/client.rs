//! HTTP client for the upstream modpack catalog.
//!
//! Every catalog request goes through the same pipeline: build the cache
//! key, answer from the cache when possible, otherwise take a rate-limiter
//! slot, issue the GET, map the status, and cache the raw JSON body.

use std::sync::LazyLock;
use std::time::Duration;

use craftcatalog_core::{DetailRecord, SearchQuery, SearchResult, UrlInfo, VersionRecord};
use percent_encoding::percent_decode_str;
use regex::Regex;
use reqwest::header::{
    HeaderMap, HeaderValue, ACCEPT, CONTENT_DISPOSITION, CONTENT_LENGTH, CONTENT_TYPE,
};
use reqwest::{StatusCode, Url};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::cache::{cache_key, CacheStats, CacheStore, Params};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::normalize::{self, ParseError};
use crate::rate_limit::RateLimiter;

const API_KEY_HEADER: &str = "x-api-key";

/// File extensions of archives the server installer understands.
pub const MODPACK_EXTENSIONS: [&str; 3] = [".zip", ".jar", ".mrpack"];

static FILENAME_PARAM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)filename\*?\s*=\s*([^;]+)"#).expect("filename pattern is valid")
});

/// Client for the catalog's search, get-by-id and list-files endpoints.
///
/// Owns one HTTP session for its whole life; connections are pooled and
/// reused across calls and released when the client is closed or dropped.
pub struct CatalogClient {
    http: reqwest::Client,
    api_key: Option<HeaderValue>,
    base_url: String,
    game_id: u32,
    category_id: u32,
    cache_ttl: Duration,
    cache: CacheStore<Value>,
    limiter: RateLimiter,
}

impl CatalogClient {
    /// Opens the HTTP session described by `config`.
    pub fn new(config: &Config) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(config.user_agent.as_str())
            .timeout(config.timeout())
            .build()
            .map_err(|e| Error::Config(format!("failed to build HTTP client: {e}")))?;

        let api_key = match config.api_key() {
            Some(key) => {
                let mut value = HeaderValue::from_str(key)
                    .map_err(|e| Error::Config(format!("invalid API key: {e}")))?;
                value.set_sensitive(true);
                Some(value)
            }
            None => None,
        };

        Ok(Self {
            http,
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            game_id: config.game_id,
            category_id: config.category_id,
            cache_ttl: config.cache_ttl(),
            cache: CacheStore::new(),
            limiter: RateLimiter::new(config.rate_limit.max_requests, config.rate_window()),
        })
    }

    /// Whether requests carry an API key.
    pub fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }

    /// Releases the HTTP session.
    pub fn close(self) {
        debug!("Closing catalog client for {}", self.base_url);
    }

    pub fn rate_limiter(&self) -> &RateLimiter {
        &self.limiter
    }

    pub fn clear_cache(&self) {
        self.cache.clear();
        info!("Catalog cache cleared");
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    async fn fetch(&self, endpoint: &str, params: &Params) -> Result<Value> {
        let key = cache_key(endpoint, params);
        if let Some(cached) = self.cache.get(&key) {
            debug!("Cache hit for {}", key);
            return Ok(cached);
        }
        debug!("Cache miss for {}", key);

        self.limiter.acquire().await;

        let mut request = self
            .http
            .get(format!("{}{}", self.base_url, endpoint))
            .query(params);
        if let Some(key) = &self.api_key {
            request = request.header(API_KEY_HEADER, key.clone());
        }

        let response = request.send().await?;
        let status = response.status();
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(Error::RateLimited("catalog API rate limit exceeded".to_string()));
        }
        if status == StatusCode::NOT_FOUND {
            return Err(Error::NotFound(format!("Resource not found: {endpoint}")));
        }
        if status.is_client_error() || status.is_server_error() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::status(status.as_u16(), &body));
        }

        let data: Value = response.json().await?;
        self.cache.put(key, data.clone(), self.cache_ttl);
        Ok(data)
    }

    /// Searches the catalog.
    ///
    /// The category filter is applied to the normalized results rather than
    /// sent upstream. Records that fail to normalize are skipped.
    pub async fn search(&self, query: &SearchQuery) -> Result<Vec<SearchResult>> {
        let mut params = Params::new();
        params.insert("gameId", self.game_id.to_string());
        params.insert("categoryId", self.category_id.to_string());
        params.insert("sortField", query.sort_field.code().to_string());
        params.insert("sortOrder", query.sort_order.to_string());
        params.insert("pageSize", query.effective_page_size().to_string());
        params.insert("index", query.index.to_string());
        if !query.term.is_empty() {
            params.insert("searchFilter", query.term.clone());
        }

        let response = self.fetch("/mods/search", &params).await?;
        let mut results = normalize_batch(data_items(&response), normalize::search_result);

        if let Some(category) = query.category.as_deref().filter(|c| !c.trim().is_empty()) {
            let wanted = category.trim().to_lowercase();
            results.retain(|r| r.categories.iter().any(|c| c.to_lowercase() == wanted));
        }

        info!("Found {} modpacks for search: '{}'", results.len(), query.term);
        Ok(results)
    }

    /// Fetches full metadata for one catalog entry.
    pub async fn get_details(&self, id: i64) -> Result<DetailRecord> {
        let response = self.fetch(&format!("/mods/{id}"), &Params::new()).await?;

        let data = match response.get("data") {
            Some(Value::Object(map)) if !map.is_empty() => &response["data"],
            _ => return Err(Error::NotFound(format!("Modpack {id} not found"))),
        };

        let details = normalize::detail(data)?;
        info!("Retrieved details for modpack: {} (ID: {})", details.name, id);
        Ok(details)
    }

    /// Lists the files of a catalog entry, newest first.
    pub async fn get_versions(
        &self,
        id: i64,
        game_version: Option<&str>,
    ) -> Result<Vec<VersionRecord>> {
        let mut params = Params::new();
        if let Some(version) = game_version {
            params.insert("gameVersion", version.to_string());
        }

        let response = self.fetch(&format!("/mods/{id}/files"), &params).await?;
        let items = data_items(&response);
        if items.is_empty() {
            warn!("No files found for modpack {}", id);
            return Ok(Vec::new());
        }

        let mut versions = normalize_batch(items, normalize::version);
        versions.sort_by(|a, b| b.file_date.cmp(&a.file_date));

        info!("Found {} versions for modpack {}", versions.len(), id);
        Ok(versions)
    }

    /// Probes a download URL with a HEAD request, following redirects.
    ///
    /// File names without a known modpack extension are flagged in the
    /// result but not rejected.
    pub async fn validate_url(&self, url: &str) -> Result<UrlInfo> {
        let parsed = Url::parse(url).map_err(|e| Error::InvalidUrl(format!("{url}: {e}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(Error::InvalidUrl(format!(
                "{url}: unsupported scheme '{}'",
                parsed.scheme()
            )));
        }

        let response = self.http.head(parsed).send().await?;
        let status = response.status();
        if status.is_client_error() || status.is_server_error() {
            return Err(Error::Api {
                status: Some(status.as_u16()),
                message: format!("URL not accessible: HTTP {}", status.as_u16()),
                source: None,
            });
        }

        let headers = response.headers();
        let size = header_str(headers, CONTENT_LENGTH)
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(0);
        let content_type = header_str(headers, CONTENT_TYPE).unwrap_or_default().to_string();

        let resolved = response.url();
        let file_name = header_str(headers, CONTENT_DISPOSITION)
            .and_then(disposition_file_name)
            .or_else(|| url_file_name(resolved))
            .unwrap_or_else(|| "download".to_string());

        let recognized_archive = has_modpack_extension(&file_name);
        if !recognized_archive {
            warn!("File may not be a valid modpack: {}", file_name);
        }

        Ok(UrlInfo {
            resolved_url: resolved.to_string(),
            file_name,
            size,
            content_type,
            recognized_archive,
        })
    }
}

/// The `data` array of a list response; anything else counts as empty.
fn data_items(response: &Value) -> &[Value] {
    response
        .get("data")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default()
}

fn normalize_batch<T>(items: &[Value], f: fn(&Value) -> std::result::Result<T, ParseError>) -> Vec<T> {
    items
        .iter()
        .filter_map(|item| match f(item) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!("Skipping catalog record: {}", e);
                None
            }
        })
        .collect()
}

fn header_str(headers: &HeaderMap, name: reqwest::header::HeaderName) -> Option<&str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

/// Extracts the file name from a Content-Disposition header value.
fn disposition_file_name(header: &str) -> Option<String> {
    let raw = FILENAME_PARAM.captures(header)?.get(1)?.as_str().trim();
    // RFC 5987 form: charset'language'value
    let raw = match raw.split_once("''") {
        Some((_, name)) => name,
        None => raw,
    };
    let name = decode(raw.trim_matches(|c| c == '"' || c == '\''));
    (!name.is_empty()).then_some(name)
}

fn url_file_name(url: &Url) -> Option<String> {
    url.path_segments()?
        .next_back()
        .map(decode)
        .filter(|s| !s.is_empty())
}

fn decode(raw: &str) -> String {
    percent_decode_str(raw).decode_utf8_lossy().into_owned()
}

pub fn has_modpack_extension(file_name: &str) -> bool {
    let lower = file_name.to_lowercase();
    MODPACK_EXTENSIONS.iter().any(|ext| lower.ends_with(ext))
}
