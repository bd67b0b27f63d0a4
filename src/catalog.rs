//! Catalog access with graceful degradation.
//!
//! [`Catalog`] decides per call whether to ask the upstream catalog or to
//! answer from the offline suggestions. Without an API key it runs in
//! [`Mode::Fallback`] and never contacts the catalog for searches. With a
//! key it runs in [`Mode::Direct`]; a search that fails for any reason
//! other than not-found is answered from the suggestions instead of
//! failing. Detail and version lookups have no meaningful fallback and
//! report their errors.

use craftcatalog_core::{
    CustomSource, DetailRecord, SearchQuery, SearchResult, SortField, SortOrder, SourceKind,
    UrlInfo, VersionRecord,
};
use tracing::{error, info};

use crate::cache::CacheStats;
use crate::client::CatalogClient;
use crate::config::Config;
use crate::error::{ErrorKind, Result};
use crate::fallback;

/// How searches are answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// A credential is configured; searches go to the catalog.
    Direct,
    /// No credential; searches use the offline suggestions.
    Fallback,
}

/// Why a search was answered from the offline suggestions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackReason {
    NoCredential,
    /// The catalog call failed with this kind of error.
    Upstream(ErrorKind),
}

/// Where a set of search results came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultSource {
    Catalog,
    Fallback(FallbackReason),
}

/// Search results together with their provenance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Search {
    pub results: Vec<SearchResult>,
    pub source: ResultSource,
}

pub struct Catalog {
    client: CatalogClient,
    mode: Mode,
}

impl Catalog {
    /// Opens a catalog session. The mode follows credential presence.
    pub fn new(config: &Config) -> Result<Self> {
        let client = CatalogClient::new(config)?;
        Ok(Self::with_client(client))
    }

    pub fn with_client(client: CatalogClient) -> Self {
        let mode = if client.has_credential() {
            Mode::Direct
        } else {
            Mode::Fallback
        };
        Self { client, mode }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn client(&self) -> &CatalogClient {
        &self.client
    }

    /// Releases the underlying HTTP session.
    pub fn close(self) {
        self.client.close();
    }

    pub async fn search(&self, query: &SearchQuery) -> Result<Vec<SearchResult>> {
        Ok(self.search_with_source(query).await?.results)
    }

    /// Like [`search`](Self::search), also reporting whether the results
    /// came from the catalog or the offline suggestions, and why.
    pub async fn search_with_source(&self, query: &SearchQuery) -> Result<Search> {
        let limit = query.effective_page_size() as usize;

        if self.mode == Mode::Fallback {
            info!("No catalog API key available, returning fallback suggestions");
            return Ok(Search {
                results: fallback::search(&query.term, limit),
                source: ResultSource::Fallback(FallbackReason::NoCredential),
            });
        }

        match self.client.search(query).await {
            Ok(results) => Ok(Search {
                results,
                source: ResultSource::Catalog,
            }),
            Err(e) if e.is_not_found() => Err(e),
            Err(e) => {
                error!(kind = %e.kind(), "Failed to search modpacks, falling back to suggestions: {}", e);
                Ok(Search {
                    results: fallback::search(&query.term, limit),
                    source: ResultSource::Fallback(FallbackReason::Upstream(e.kind())),
                })
            }
        }
    }

    /// Most downloaded modpacks.
    pub async fn popular(&self, limit: u32) -> Result<Vec<SearchResult>> {
        self.search(&SearchQuery {
            sort_field: SortField::TotalDownloads,
            sort_order: SortOrder::Descending,
            page_size: limit,
            ..SearchQuery::default()
        })
        .await
    }

    /// Most recently updated modpacks.
    pub async fn recently_updated(&self, limit: u32) -> Result<Vec<SearchResult>> {
        self.search(&SearchQuery {
            sort_field: SortField::LastUpdated,
            sort_order: SortOrder::Descending,
            page_size: limit,
            ..SearchQuery::default()
        })
        .await
    }

    /// Full metadata for one modpack.
    ///
    /// Not-found is reported as is; any other failure is wrapped in a
    /// generic API error carrying the cause.
    pub async fn details(&self, id: i64) -> Result<DetailRecord> {
        self.client.get_details(id).await.map_err(|e| {
            if e.is_not_found() {
                e
            } else {
                error!("Failed to get modpack details for ID {}: {}", id, e);
                e.wrap(format!("Failed to retrieve modpack details for {id}"))
            }
        })
    }

    /// Files of one modpack, newest first.
    pub async fn versions(&self, id: i64, game_version: Option<&str>) -> Result<Vec<VersionRecord>> {
        self.client.get_versions(id, game_version).await.map_err(|e| {
            if e.is_not_found() {
                e
            } else {
                error!("Failed to get modpack versions for ID {}: {}", id, e);
                e.wrap(format!("Failed to retrieve modpack versions for {id}"))
            }
        })
    }

    pub async fn validate_url(&self, url: &str) -> Result<UrlInfo> {
        self.client.validate_url(url).await
    }

    /// Declares a modpack hosted at `download_url`, after checking the URL
    /// is reachable.
    pub async fn create_custom_source(
        &self,
        name: &str,
        download_url: &str,
        description: &str,
        mod_loader: Option<&str>,
        game_version: Option<&str>,
    ) -> Result<CustomSource> {
        let info = self.client.validate_url(download_url).await?;

        Ok(CustomSource {
            name: name.to_string(),
            description: description.to_string(),
            download_url: info.resolved_url,
            file_name: info.file_name,
            mod_loader: mod_loader.map(str::to_string),
            game_version: game_version.map(str::to_string),
            kind: SourceKind::Url,
        })
    }

    pub fn clear_cache(&self) {
        self.client.clear_cache();
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.client.cache_stats()
    }
}
