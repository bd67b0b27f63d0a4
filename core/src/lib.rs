//! Core types for the craftcatalog modpack client.
//!
//! This crate provides the plain data records produced by the catalog
//! client and consumed by whatever application embeds it. None of these
//! types know how to fetch or persist themselves.
//!
//! # Overview
//!
//! The main types are:
//!
//! - [`SearchResult`] - Brief modpack info for listings
//! - [`DetailRecord`] - Full modpack metadata
//! - [`VersionRecord`] - A single downloadable file of a modpack
//! - [`CustomSource`] - A user-declared modpack outside the catalog
//! - [`UrlInfo`] - Metadata gathered by probing a download URL
//! - [`SearchQuery`] - Parameters for searching the catalog
//!
//! The [`server`] and [`configuration`] modules hold the records the
//! storage layer keeps for deployed servers, along with their field
//! validation.
//!
//! # Example
//!
//! ```
//! use craftcatalog_core::{SearchQuery, SortField, SortOrder};
//!
//! let query = SearchQuery {
//!     term: "skyblock".to_string(),
//!     sort_field: SortField::TotalDownloads,
//!     ..SearchQuery::default()
//! };
//!
//! assert_eq!(query.sort_order, SortOrder::Descending);
//! assert_eq!(query.page_size, 20);
//! ```

use std::fmt;
use std::str::FromStr;

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

pub mod configuration;
pub mod server;

pub use configuration::{ConfigType, ConfigValue, ConfigurationEntry, ConfigurationTemplate, UiControl};
pub use server::{ServerInstance, ServerStatus, ValidationError};

/// Largest page the catalog will return for a single search.
pub const MAX_PAGE_SIZE: u32 = 50;

/// Summary information for a modpack.
///
/// Returned by catalog searches. Contains only the fields needed for
/// displaying modpack lists. For full metadata, fetch a [`DetailRecord`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Catalog identifier. Offline suggestions use ids from 1,000,000 up.
    pub id: i64,
    /// Human-readable name.
    pub name: String,
    /// Short description.
    pub summary: String,
    /// Total downloads reported by the catalog.
    pub download_count: u64,
    /// Category names, in catalog order.
    #[serde(default)]
    pub categories: Vec<String>,
    /// Author names, in catalog order.
    #[serde(default)]
    pub authors: Vec<String>,
    /// Logo image URL.
    #[serde(default)]
    pub logo_url: Option<String>,
    /// When the modpack was last modified.
    #[serde(default)]
    pub last_updated: Option<Timestamp>,
}

/// Detailed information for a modpack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetailRecord {
    pub id: i64,
    pub name: String,
    pub summary: String,
    /// Full description, usually HTML.
    pub description: String,
    pub download_count: u64,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub authors: Vec<String>,
    #[serde(default)]
    pub logo_url: Option<String>,
    /// Screenshot image URLs.
    #[serde(default)]
    pub screenshots: Vec<String>,
    #[serde(default)]
    pub last_updated: Option<Timestamp>,
    /// Game version of the most recent file.
    #[serde(default)]
    pub game_version_latest: Option<String>,
    /// Mod loader of the most recent file (e.g. `"Forge"`).
    #[serde(default)]
    pub mod_loader: Option<String>,
}

/// A downloadable file of a modpack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionRecord {
    pub id: i64,
    pub display_name: String,
    pub file_name: String,
    /// When the file was published.
    pub file_date: Timestamp,
    /// Direct download URL. Empty when the author disabled third-party downloads.
    pub download_url: String,
    #[serde(default)]
    pub game_versions: Vec<String>,
    #[serde(default)]
    pub mod_loader: Option<String>,
    /// Size of the file in bytes.
    pub file_size: u64,
}

/// Where a [`CustomSource`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// A direct download URL supplied by the user.
    Url,
    /// A file uploaded by the user.
    Upload,
    /// An entry of the upstream catalog.
    Catalog,
}

/// A user-declared modpack that does not come from a catalog search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomSource {
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Download URL after following redirects.
    pub download_url: String,
    pub file_name: String,
    #[serde(default)]
    pub mod_loader: Option<String>,
    #[serde(default)]
    pub game_version: Option<String>,
    pub kind: SourceKind,
}

/// Metadata gathered by probing a download URL without fetching its body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrlInfo {
    /// Final URL after redirects.
    pub resolved_url: String,
    pub file_name: String,
    /// Reported content length, 0 when unknown.
    pub size: u64,
    #[serde(default)]
    pub content_type: String,
    /// Whether the file name ends in a known modpack archive extension.
    pub recognized_archive: bool,
}

/// Field the catalog sorts search results by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortField {
    Featured,
    #[default]
    Popularity,
    LastUpdated,
    Name,
    Author,
    TotalDownloads,
}

impl SortField {
    /// Numeric code the upstream catalog expects for this field.
    pub fn code(self) -> u8 {
        match self {
            SortField::Featured => 1,
            SortField::Popularity => 2,
            SortField::LastUpdated => 3,
            SortField::Name => 4,
            SortField::Author => 5,
            SortField::TotalDownloads => 6,
        }
    }
}

impl FromStr for SortField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace(['-', '_'], "").as_str() {
            "featured" => Ok(SortField::Featured),
            "popularity" => Ok(SortField::Popularity),
            "lastupdated" => Ok(SortField::LastUpdated),
            "name" => Ok(SortField::Name),
            "author" => Ok(SortField::Author),
            "totaldownloads" => Ok(SortField::TotalDownloads),
            other => Err(format!("unknown sort field: {other}")),
        }
    }
}

/// Direction of a sorted search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortOrder {
    #[serde(rename = "asc")]
    Ascending,
    #[default]
    #[serde(rename = "desc")]
    Descending,
}

impl SortOrder {
    pub fn as_str(self) -> &'static str {
        match self {
            SortOrder::Ascending => "asc",
            SortOrder::Descending => "desc",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortOrder::Ascending),
            "desc" | "descending" => Ok(SortOrder::Descending),
            other => Err(format!("unknown sort order: {other}")),
        }
    }
}

/// Parameters for a catalog search.
///
/// # Example
///
/// ```
/// use craftcatalog_core::SearchQuery;
///
/// let query = SearchQuery {
///     page_size: 500,
///     ..SearchQuery::default()
/// };
///
/// assert_eq!(query.effective_page_size(), 50);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery {
    /// Free-text search term. Empty matches everything.
    #[serde(default)]
    pub term: String,
    /// Only keep results carrying this category (case-insensitive).
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub sort_field: SortField,
    #[serde(default)]
    pub sort_order: SortOrder,
    /// Results per page. Capped at [`MAX_PAGE_SIZE`].
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    /// Zero-based offset of the first result.
    #[serde(default)]
    pub index: u32,
}

fn default_page_size() -> u32 {
    20
}

impl Default for SearchQuery {
    fn default() -> Self {
        Self {
            term: String::new(),
            category: None,
            sort_field: SortField::default(),
            sort_order: SortOrder::default(),
            page_size: default_page_size(),
            index: 0,
        }
    }
}

impl SearchQuery {
    /// Creates a query for `term` with default sorting and paging.
    pub fn new(term: impl Into<String>) -> Self {
        Self {
            term: term.into(),
            ..Self::default()
        }
    }

    /// Page size clamped to `1..=MAX_PAGE_SIZE`.
    pub fn effective_page_size(&self) -> u32 {
        self.page_size.clamp(1, MAX_PAGE_SIZE)
    }
}
