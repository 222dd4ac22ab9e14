//! Google Sheets and Drive fetcher
//!
//! Turns the share links users paste into direct export/download URLs,
//! then fetches them. Sheets come back as parsed CSV tables, Drive files
//! are streamed to disk. Failures are reported immediately; there is no
//! retry.

use futures::StreamExt;
use regex::Regex;
use reqwest::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use reqwest::{Client, Response};
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use std::time::Duration;
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use url::Url;

// ============================================================================
// Constants
// ============================================================================

pub const DEFAULT_SHEETS_BASE: &str = "https://docs.google.com";
pub const DEFAULT_DRIVE_BASE: &str = "https://drive.google.com";

static SHEET_ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/spreadsheets/(?:u/\d+/)?d/([A-Za-z0-9_-]+)").unwrap());
static FRAGMENT_GID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:^|&)gid=(\d+)").unwrap());
static DRIVE_FILE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"/file/(?:u/\d+/)?d/([A-Za-z0-9_-]+)").unwrap());
static DRIVE_ID_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").unwrap());
static QUOTED_FILENAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?i)filename="([^"]+)""#).unwrap());
static BARE_FILENAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)filename=([^;]+)").unwrap());

// ============================================================================
// Error Types
// ============================================================================

/// Errors that can occur when fetching sheets or Drive files
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Request to {url} failed with HTTP status {status}")]
    HttpStatus { status: u16, url: String },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Failed to parse CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("Failed to write downloaded file: {0}")]
    Io(#[from] std::io::Error),
}

// ============================================================================
// Configuration
// ============================================================================

/// Configuration for the fetcher
#[derive(Debug, Clone)]
pub struct FetcherConfig {
    /// Request timeout in seconds
    pub timeout_seconds: u64,

    /// Base URL used to build Sheets export links
    pub sheets_base_url: String,

    /// Base URL used to build Drive download links
    pub drive_base_url: String,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 60,
            sheets_base_url: DEFAULT_SHEETS_BASE.to_string(),
            drive_base_url: DEFAULT_DRIVE_BASE.to_string(),
        }
    }
}

impl FetcherConfig {
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout_seconds = seconds;
        self
    }

    pub fn with_sheets_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.sheets_base_url = base_url.into();
        self
    }

    pub fn with_drive_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.drive_base_url = base_url.into();
        self
    }
}

// ============================================================================
// URL Normalization
// ============================================================================

fn parse_http_url(input: &str) -> Result<Url, FetchError> {
    let trimmed = input.trim();
    let parsed =
        Url::parse(trimmed).map_err(|e| FetchError::InvalidUrl(format!("{}: {}", trimmed, e)))?;
    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        other => Err(FetchError::InvalidUrl(format!(
            "{}: unsupported scheme '{}'",
            trimmed, other
        ))),
    }
}

/// Convert a Google Sheets share link into its CSV export URL
///
/// The sheet tab is taken from a `gid` in the query or fragment, defaulting
/// to the first tab.
pub fn normalize_sheet_url(input: &str, base_url: &str) -> Result<String, FetchError> {
    let parsed = parse_http_url(input)?;

    let sheet_id = SHEET_ID_RE
        .captures(parsed.path())
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
        .ok_or_else(|| {
            FetchError::InvalidUrl(format!("{} is not a Google Sheets link", input.trim()))
        })?;

    let gid = parsed
        .query_pairs()
        .find(|(key, _)| key == "gid")
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.is_empty() && value.chars().all(|c| c.is_ascii_digit()))
        .or_else(|| {
            parsed
                .fragment()
                .and_then(|fragment| FRAGMENT_GID_RE.captures(fragment))
                .map(|caps| caps[1].to_string())
        })
        .unwrap_or_else(|| "0".to_string());

    Ok(format!(
        "{}/spreadsheets/d/{}/export?format=csv&gid={}",
        base_url.trim_end_matches('/'),
        sheet_id,
        gid
    ))
}

/// A Drive file resolved to its direct download link
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriveLink {
    pub file_id: String,
    pub download_url: String,
}

/// Convert a Google Drive share link into a direct download URL
///
/// Accepts `/file/d/<id>/view`, `open?id=<id>` and `uc?id=<id>` forms.
pub fn normalize_drive_url(input: &str, base_url: &str) -> Result<DriveLink, FetchError> {
    let parsed = parse_http_url(input)?;

    let file_id = DRIVE_FILE_RE
        .captures(parsed.path())
        .map(|caps| caps[1].to_string())
        .or_else(|| {
            parsed
                .query_pairs()
                .find(|(key, _)| key == "id")
                .map(|(_, value)| value.into_owned())
        })
        .filter(|id| DRIVE_ID_RE.is_match(id))
        .ok_or_else(|| {
            FetchError::InvalidUrl(format!("{} is not a Google Drive file link", input.trim()))
        })?;

    let download_url = format!(
        "{}/uc?export=download&id={}",
        base_url.trim_end_matches('/'),
        file_id
    );

    Ok(DriveLink {
        file_id,
        download_url,
    })
}

// ============================================================================
// Sheet Table
// ============================================================================

/// Tabular sheet contents; the first CSV row supplies the headers
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SheetTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl SheetTable {
    /// Parse CSV text. Rows whose cells are all blank are skipped.
    pub fn from_csv(body: &str) -> Result<Self, FetchError> {
        let body = body.trim_start_matches('\u{feff}');
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(body.as_bytes());
        let mut records = reader.records();

        let headers: Vec<String> = match records.next() {
            Some(record) => record?.iter().map(|h| h.trim().to_string()).collect(),
            None => return Ok(Self::default()),
        };

        let mut rows = Vec::new();
        for record in records {
            let record = record?;
            if record.iter().all(|cell| cell.trim().is_empty()) {
                continue;
            }
            rows.push(record.iter().map(str::to_string).collect());
        }

        Ok(Self { headers, rows })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows keyed by header; short rows are padded with empty strings
    pub fn records(&self) -> Vec<BTreeMap<String, String>> {
        self.rows
            .iter()
            .map(|row| {
                self.headers
                    .iter()
                    .enumerate()
                    .map(|(idx, header)| {
                        (header.clone(), row.get(idx).cloned().unwrap_or_default())
                    })
                    .collect()
            })
            .collect()
    }

    /// All values of the named column
    pub fn column(&self, name: &str) -> Option<Vec<&str>> {
        let idx = self.headers.iter().position(|h| h == name)?;
        Some(
            self.rows
                .iter()
                .map(|row| row.get(idx).map(String::as_str).unwrap_or(""))
                .collect(),
        )
    }
}

// ============================================================================
// Fetcher
// ============================================================================

/// HTTP client for Sheets exports and Drive downloads
#[derive(Debug, Clone)]
pub struct SheetFetcher {
    client: Client,
    config: FetcherConfig,
}

impl SheetFetcher {
    /// Create a new fetcher
    pub fn new(config: FetcherConfig) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;
        Ok(Self { client, config })
    }

    pub fn config(&self) -> &FetcherConfig {
        &self.config
    }

    /// Fetch a Google Sheet as a parsed table
    pub async fn fetch_sheet(&self, url: &str) -> Result<SheetTable, FetchError> {
        let export_url = normalize_sheet_url(url, &self.config.sheets_base_url)?;
        tracing::info!(url = %export_url, "Fetching sheet CSV export");

        let body = self.get(&export_url).await?.text().await?;
        let table = SheetTable::from_csv(&body)?;

        tracing::info!(
            rows = table.len(),
            columns = table.headers.len(),
            "Fetched sheet"
        );
        Ok(table)
    }

    /// Download a Google Drive file into `dest_dir`, returning the written path
    ///
    /// The file name comes from `Content-Disposition` when present, otherwise
    /// the Drive file ID is used.
    pub async fn download_file(&self, url: &str, dest_dir: &Path) -> Result<PathBuf, FetchError> {
        let link = normalize_drive_url(url, &self.config.drive_base_url)?;
        tracing::info!(file_id = %link.file_id, "Downloading Drive file");

        let response = self.get(&link.download_url).await?;

        let is_html = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value.starts_with("text/html"));
        if is_html {
            tracing::warn!(
                file_id = %link.file_id,
                "Drive returned an HTML page; the file may not be shared publicly"
            );
        }

        let file_name = response
            .headers()
            .get(CONTENT_DISPOSITION)
            .and_then(|value| value.to_str().ok())
            .and_then(filename_from_disposition)
            .unwrap_or_else(|| link.file_id.clone());

        tokio::fs::create_dir_all(dest_dir).await?;
        let path = dest_dir.join(&file_name);
        let partial = dest_dir.join(format!(".{}.part", file_name));

        let written = match stream_to_file(response, &partial).await {
            Ok(written) => written,
            Err(e) => {
                if let Err(cleanup) = tokio::fs::remove_file(&partial).await {
                    tracing::debug!(path = %partial.display(), error = %cleanup, "Partial file not removed");
                }
                tracing::warn!(file_id = %link.file_id, error = %e, "Download failed");
                return Err(e);
            }
        };
        tokio::fs::rename(&partial, &path).await?;

        tracing::info!(path = %path.display(), bytes = written, "Download complete");
        Ok(path)
    }

    async fn get(&self, url: &str) -> Result<Response, FetchError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            tracing::warn!(url = %url, status = status.as_u16(), "Fetch failed");
            return Err(FetchError::HttpStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        Ok(response)
    }
}

/// Write a response body to `path`, returning the number of bytes written
async fn stream_to_file(response: Response, path: &Path) -> Result<u64, FetchError> {
    let mut file = tokio::fs::File::create(path).await?;
    let mut written: u64 = 0;
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        file.write_all(&chunk).await?;
        written += chunk.len() as u64;
    }
    file.flush().await?;
    Ok(written)
}

/// Extract a safe file name from a `Content-Disposition` header value
fn filename_from_disposition(value: &str) -> Option<String> {
    let raw = QUOTED_FILENAME_RE
        .captures(value)
        .or_else(|| BARE_FILENAME_RE.captures(value))
        .map(|caps| caps[1].trim().to_string())?;

    let name = raw.rsplit(['/', '\\']).next().unwrap_or("").trim();
    match name {
        "" | "." | ".." => None,
        _ => Some(name.to_string()),
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_sheet_edit_link() {
        let url = normalize_sheet_url(
            "https://docs.google.com/spreadsheets/d/1AbC-d_E/edit#gid=42",
            DEFAULT_SHEETS_BASE,
        )
        .unwrap();
        assert_eq!(
            url,
            "https://docs.google.com/spreadsheets/d/1AbC-d_E/export?format=csv&gid=42"
        );
    }

    #[test]
    fn test_normalize_sheet_defaults_to_first_tab() {
        let url = normalize_sheet_url(
            "https://docs.google.com/spreadsheets/d/sheet123/edit?usp=sharing",
            DEFAULT_SHEETS_BASE,
        )
        .unwrap();
        assert!(url.ends_with("/spreadsheets/d/sheet123/export?format=csv&gid=0"));
    }

    #[test]
    fn test_normalize_sheet_query_gid_and_custom_base() {
        let url = normalize_sheet_url(
            "https://docs.google.com/spreadsheets/d/abc/export?format=csv&gid=7",
            "http://127.0.0.1:8080/",
        )
        .unwrap();
        assert_eq!(
            url,
            "http://127.0.0.1:8080/spreadsheets/d/abc/export?format=csv&gid=7"
        );
    }

    #[test]
    fn test_normalize_sheet_multi_account_link() {
        let url = normalize_sheet_url(
            "https://docs.google.com/spreadsheets/u/0/d/abc123/edit#gid=5",
            DEFAULT_SHEETS_BASE,
        )
        .unwrap();
        assert_eq!(
            url,
            "https://docs.google.com/spreadsheets/d/abc123/export?format=csv&gid=5"
        );
    }

    #[test]
    fn test_normalize_sheet_rejects_bad_input() {
        assert!(matches!(
            normalize_sheet_url("not a url", DEFAULT_SHEETS_BASE),
            Err(FetchError::InvalidUrl(_))
        ));
        assert!(matches!(
            normalize_sheet_url("https://example.com/document/d/abc", DEFAULT_SHEETS_BASE),
            Err(FetchError::InvalidUrl(_))
        ));
        assert!(matches!(
            normalize_sheet_url("ftp://docs.google.com/spreadsheets/d/abc", DEFAULT_SHEETS_BASE),
            Err(FetchError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_normalize_drive_links() {
        let expected = "https://drive.google.com/uc?export=download&id=FILE_id-1";
        for input in [
            "https://drive.google.com/file/d/FILE_id-1/view?usp=sharing",
            "https://drive.google.com/file/u/1/d/FILE_id-1/view",
            "https://drive.google.com/open?id=FILE_id-1",
            "https://drive.google.com/uc?export=download&id=FILE_id-1",
        ] {
            let link = normalize_drive_url(input, DEFAULT_DRIVE_BASE).unwrap();
            assert_eq!(link.file_id, "FILE_id-1");
            assert_eq!(link.download_url, expected);
        }
    }

    #[test]
    fn test_normalize_drive_rejects_missing_id() {
        assert!(matches!(
            normalize_drive_url("https://drive.google.com/drive/folders", DEFAULT_DRIVE_BASE),
            Err(FetchError::InvalidUrl(_))
        ));
        assert!(matches!(
            normalize_drive_url("https://drive.google.com/open?id=../etc", DEFAULT_DRIVE_BASE),
            Err(FetchError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_sheet_table_from_csv() {
        let csv = "\u{feff}topic, duration\n\"Cats, explained\",60\n,\nDogs\n";
        let table = SheetTable::from_csv(csv).unwrap();

        assert_eq!(table.headers, vec!["topic", "duration"]);
        assert_eq!(table.len(), 2);

        let records = table.records();
        assert_eq!(records[0]["topic"], "Cats, explained");
        assert_eq!(records[0]["duration"], "60");
        assert_eq!(records[1]["topic"], "Dogs");
        assert_eq!(records[1]["duration"], "");

        assert_eq!(table.column("topic"), Some(vec!["Cats, explained", "Dogs"]));
        assert_eq!(table.column("missing"), None);
    }

    #[test]
    fn test_sheet_table_empty_body() {
        let table = SheetTable::from_csv("").unwrap();
        assert!(table.is_empty());
        assert!(table.headers.is_empty());
    }

    #[test]
    fn test_filename_from_disposition() {
        assert_eq!(
            filename_from_disposition(
                "attachment; filename=\"clip.mp4\"; filename*=UTF-8''clip.mp4"
            ),
            Some("clip.mp4".to_string())
        );
        assert_eq!(
            filename_from_disposition("attachment; filename=music.mp3"),
            Some("music.mp3".to_string())
        );
        assert_eq!(
            filename_from_disposition("attachment; filename=\"../../etc/passwd\""),
            Some("passwd".to_string())
        );
        assert_eq!(filename_from_disposition("attachment; filename=\"..\""), None);
        assert_eq!(filename_from_disposition("inline"), None);
    }
}
