#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! API request and response types for the address standardization server,
//! plus the server's environment-driven configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Default request body limit (16 MiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 16 * 1024 * 1024;

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiHealth {
    /// Whether the server is healthy.
    pub healthy: bool,
    /// Server version.
    pub version: String,
}

/// Response for a successful upload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiUploadResponse {
    /// Always `true`; failures are reported as `{"error": ...}`.
    pub success: bool,
    /// CSV copy, for `GET /api/download/{filename}`.
    pub csv_filename: String,
    /// Xlsx copy with standardized rows filled green.
    pub xlsx_filename: String,
    /// Rows in the uploaded table.
    pub rows: usize,
    /// Rows that were standardized.
    pub updated_rows: usize,
}

/// Server settings read from the environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// `BIND_ADDR`, default `127.0.0.1`.
    pub bind_addr: String,
    /// `PORT`, default `8080`.
    pub port: u16,
    /// `UPLOAD_DIR`, default the OS temp directory.
    pub upload_dir: PathBuf,
    /// `MAX_UPLOAD_BYTES`, default [`DEFAULT_MAX_UPLOAD_BYTES`]. Applies to
    /// the uploaded file's contents.
    pub max_upload_bytes: usize,
    /// `MAPS_BASE_URL`, if set.
    pub maps_base_url: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

impl ServerConfig {
    /// Reads settings from process environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads settings through `lookup`. Unparseable numbers fall back to
    /// their defaults.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            bind_addr: lookup("BIND_ADDR").unwrap_or_else(|| "127.0.0.1".to_string()),
            port: lookup("PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            upload_dir: lookup("UPLOAD_DIR").map_or_else(std::env::temp_dir, PathBuf::from),
            max_upload_bytes: lookup("MAX_UPLOAD_BYTES")
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_MAX_UPLOAD_BYTES),
            maps_base_url: lookup("MAPS_BASE_URL").filter(|v| !v.is_empty()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_without_environment() {
        let config = ServerConfig::default();
        assert_eq!(config.bind_addr, "127.0.0.1");
        assert_eq!(config.port, 8080);
        assert_eq!(config.upload_dir, std::env::temp_dir());
        assert_eq!(config.max_upload_bytes, DEFAULT_MAX_UPLOAD_BYTES);
        assert_eq!(config.maps_base_url, None);
    }

    #[test]
    fn reads_overrides() {
        let config = ServerConfig::from_lookup(|key| match key {
            "PORT" => Some("9000".to_string()),
            "UPLOAD_DIR" => Some("/srv/uploads".to_string()),
            "MAX_UPLOAD_BYTES" => Some("1024".to_string()),
            "MAPS_BASE_URL" => Some("https://maps.example/?q=".to_string()),
            _ => None,
        });
        assert_eq!(config.port, 9000);
        assert_eq!(config.upload_dir, PathBuf::from("/srv/uploads"));
        assert_eq!(config.max_upload_bytes, 1024);
        assert_eq!(
            config.maps_base_url.as_deref(),
            Some("https://maps.example/?q=")
        );
    }

    #[test]
    fn bad_numbers_fall_back() {
        let config = ServerConfig::from_lookup(|key| (key == "PORT").then(|| "http".to_string()));
        assert_eq!(config.port, 8080);
    }

    #[test]
    fn upload_response_is_camel_case() {
        let json = serde_json::to_value(ApiUploadResponse {
            success: true,
            csv_filename: "updated_a_1.csv".to_string(),
            xlsx_filename: "updated_a_1.xlsx".to_string(),
            rows: 3,
            updated_rows: 2,
        })
        .unwrap();
        assert_eq!(json["csvFilename"], "updated_a_1.csv");
        assert_eq!(json["xlsxFilename"], "updated_a_1.xlsx");
        assert_eq!(json["updatedRows"], 2);
    }
}
