//! Modpack catalog client for craftcatalog.
//!
//! Searches a remote modpack catalog, fetches modpack details and file
//! listings, and probes custom download URLs. Responses are cached for a
//! short time, outbound requests are rate limited, and searches fall back
//! to a fixed list of well-known modpacks when the catalog is unavailable.
//!
//! # Example
//!
//! ```no_run
//! use craftcatalog::{Catalog, Config, SearchQuery};
//!
//! # async fn demo() -> craftcatalog::Result<()> {
//! let catalog = Catalog::new(&Config::default().with_api_key("my-key"))?;
//! for pack in catalog.search(&SearchQuery::new("skyblock")).await? {
//!     println!("{} ({} downloads)", pack.name, pack.download_count);
//! }
//! catalog.close();
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod catalog;
pub mod client;
pub mod config;
pub mod error;
pub mod fallback;
pub mod normalize;
pub mod rate_limit;

pub use cache::{CacheStats, CacheStore};
pub use catalog::{Catalog, FallbackReason, Mode, ResultSource, Search};
pub use client::CatalogClient;
pub use config::Config;
pub use error::{Error, ErrorKind, Result};
pub use rate_limit::RateLimiter;

pub use craftcatalog_core::{
    CustomSource, DetailRecord, SearchQuery, SearchResult, SortField, SortOrder, SourceKind,
    UrlInfo, VersionRecord,
};
