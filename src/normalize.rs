//! Mapping of raw catalog JSON into the stable record types.
//!
//! Each function handles one upstream shape and is pure: the same input
//! always yields the same record. Absent or null optional fields become
//! empty strings, empty lists or `None`. A record fails only when it lacks
//! its identifying fields or carries a timestamp that does not parse.

use craftcatalog_core::{DetailRecord, SearchResult, VersionRecord};
use jiff::Timestamp;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// A single upstream record that could not be normalized.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("record {id} is malformed: {source}")]
    Malformed {
        id: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("record {id} has an invalid {field} '{value}': {source}")]
    Timestamp {
        id: i64,
        field: &'static str,
        value: String,
        #[source]
        source: jiff::Error,
    },
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawMod {
    id: i64,
    name: String,
    #[serde(default, deserialize_with = "nullable")]
    summary: String,
    #[serde(default, deserialize_with = "nullable")]
    description: String,
    #[serde(default, deserialize_with = "count")]
    download_count: u64,
    #[serde(default, deserialize_with = "nullable")]
    categories: Vec<Named>,
    #[serde(default, deserialize_with = "nullable")]
    authors: Vec<Named>,
    #[serde(default)]
    logo: Option<Image>,
    #[serde(default, deserialize_with = "nullable")]
    screenshots: Vec<Image>,
    #[serde(default)]
    date_modified: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    latest_files_indexes: Vec<FileIndex>,
}

#[derive(Debug, Deserialize)]
struct Named {
    #[serde(default, deserialize_with = "nullable")]
    name: String,
}

#[derive(Debug, Deserialize)]
struct Image {
    #[serde(default)]
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FileIndex {
    #[serde(default)]
    game_version: Option<String>,
    #[serde(default)]
    mod_loader: Option<Loader>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawFile {
    id: i64,
    display_name: String,
    file_name: String,
    file_date: String,
    #[serde(default, deserialize_with = "nullable")]
    download_url: String,
    #[serde(default, deserialize_with = "nullable")]
    game_versions: Vec<String>,
    #[serde(default)]
    mod_loader: Option<Loader>,
    #[serde(default, deserialize_with = "count")]
    file_length: u64,
}

/// Mod loaders arrive either by name or as the catalog's numeric code.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Loader {
    Code(i64),
    Name(String),
}

impl Loader {
    fn into_name(self) -> Option<String> {
        match self {
            Loader::Name(name) if name.is_empty() => None,
            Loader::Name(name) => Some(name),
            Loader::Code(code) => {
                let name = match code {
                    1 => "Forge",
                    2 => "Cauldron",
                    3 => "LiteLoader",
                    4 => "Fabric",
                    5 => "Quilt",
                    6 => "NeoForge",
                    _ => return None,
                };
                Some(name.to_string())
            }
        }
    }
}

fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Counts are sometimes sent as floats; negatives clamp to zero.
fn count<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Number>::deserialize(deserializer)?;
    Ok(match value {
        None => 0,
        Some(n) => n
            .as_u64()
            .or_else(|| n.as_f64().map(|f| f.max(0.0).round() as u64))
            .unwrap_or(0),
    })
}

fn record_id(value: &Value) -> String {
    value
        .get("id")
        .map(|id| id.to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

fn read<'a, T: Deserialize<'a>>(value: &'a Value) -> Result<T, ParseError> {
    T::deserialize(value).map_err(|source| ParseError::Malformed {
        id: record_id(value),
        source,
    })
}

fn timestamp(id: i64, field: &'static str, raw: &str) -> Result<Timestamp, ParseError> {
    raw.parse().map_err(|source| ParseError::Timestamp {
        id,
        field,
        value: raw.to_string(),
        source,
    })
}

fn names(items: Vec<Named>) -> Vec<String> {
    items.into_iter().map(|n| n.name).collect()
}

impl RawMod {
    fn last_updated(&self) -> Result<Option<Timestamp>, ParseError> {
        match self.date_modified.as_deref() {
            None | Some("") => Ok(None),
            Some(raw) => timestamp(self.id, "dateModified", raw).map(Some),
        }
    }
}

/// Normalizes one item of a search response.
pub fn search_result(value: &Value) -> Result<SearchResult, ParseError> {
    let raw: RawMod = read(value)?;
    let last_updated = raw.last_updated()?;

    Ok(SearchResult {
        id: raw.id,
        name: raw.name,
        summary: raw.summary,
        download_count: raw.download_count,
        categories: names(raw.categories),
        authors: names(raw.authors),
        logo_url: raw.logo.and_then(|l| l.url),
        last_updated,
    })
}

/// Normalizes the payload of a get-by-id response.
pub fn detail(value: &Value) -> Result<DetailRecord, ParseError> {
    let raw: RawMod = read(value)?;
    let last_updated = raw.last_updated()?;

    let (game_version_latest, mod_loader) = match raw.latest_files_indexes.into_iter().next() {
        Some(index) => (
            index.game_version,
            index.mod_loader.and_then(Loader::into_name),
        ),
        None => (None, None),
    };

    Ok(DetailRecord {
        id: raw.id,
        name: raw.name,
        summary: raw.summary,
        description: raw.description,
        download_count: raw.download_count,
        categories: names(raw.categories),
        authors: names(raw.authors),
        logo_url: raw.logo.and_then(|l| l.url),
        screenshots: raw
            .screenshots
            .into_iter()
            .map(|s| s.url.unwrap_or_default())
            .collect(),
        last_updated,
        game_version_latest,
        mod_loader,
    })
}

/// Normalizes one item of a list-files response.
pub fn version(value: &Value) -> Result<VersionRecord, ParseError> {
    let raw: RawFile = read(value)?;
    let file_date = timestamp(raw.id, "fileDate", &raw.file_date)?;

    Ok(VersionRecord {
        id: raw.id,
        display_name: raw.display_name,
        file_name: raw.file_name,
        file_date,
        download_url: raw.download_url,
        game_versions: raw.game_versions,
        mod_loader: raw.mod_loader.and_then(Loader::into_name),
        file_size: raw.file_length,
    })
}
