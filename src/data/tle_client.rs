//! Remote TLE lookup by satellite catalogue number

use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;
use thiserror::Error;

/// Public TLE API used when no base URL is configured
pub const DEFAULT_API_BASE: &str = "https://tle.ivanstanojevic.me/api/tle";

/// TLE record as returned by the lookup API
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TleRecord {
    /// Catalogue number echoed back by the API
    #[serde(rename = "satelliteId", default)]
    pub satellite_id: Option<u32>,
    pub name: String,
    /// Epoch as an ISO-8601 string
    #[serde(default)]
    pub date: Option<String>,
    pub line1: String,
    pub line2: String,
}

impl TleRecord {
    /// Both element lines joined by a newline
    pub fn two_line(&self) -> String {
        format!("{}\n{}", self.line1, self.line2)
    }
}

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request for satellite {id} failed: {source}")]
    Transport {
        id: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("lookup for satellite {id} returned HTTP {status}")]
    Status { id: String, status: u16 },
    #[error("could not decode TLE response for satellite {id}: {reason}")]
    Decode { id: String, reason: String },
}

/// Anything that can look up the current TLE for a satellite id
pub trait TleSource: Send + Sync {
    fn fetch(&self, satellite_id: &str) -> Result<TleRecord, FetchError>;
}

/// Blocking HTTP client for the TLE API
pub struct TleClient {
    http: reqwest::blocking::Client,
    api_base: String,
}

impl TleClient {
    pub fn new(api_base: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("satglobe/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            http,
            api_base: api_base.into(),
        })
    }

    /// `{api_base}/{satellite_id}`
    pub fn url_for(&self, satellite_id: &str) -> String {
        format!("{}/{}", self.api_base.trim_end_matches('/'), satellite_id)
    }
}

impl TleSource for TleClient {
    fn fetch(&self, satellite_id: &str) -> Result<TleRecord, FetchError> {
        let url = self.url_for(satellite_id);
        log::info!("Fetching TLE for satellite {} from {}", satellite_id, url);

        let transport = |source| FetchError::Transport {
            id: satellite_id.to_string(),
            source,
        };

        let response = self.http.get(&url).send().map_err(transport)?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                id: satellite_id.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().map_err(transport)?;
        decode_record(satellite_id, &body)
    }
}

/// Parse a lookup response body
pub fn decode_record(satellite_id: &str, body: &str) -> Result<TleRecord, FetchError> {
    let record: TleRecord = serde_json::from_str(body).map_err(|e| FetchError::Decode {
        id: satellite_id.to_string(),
        reason: e.to_string(),
    })?;
    log::debug!("Retrieved TLE for satellite {}: {}", satellite_id, record.name);
    Ok(record)
}
