//! Command-line and environment configuration

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::data::DEFAULT_API_BASE;
use crate::renderer::DEFAULT_EARTH_TEXTURE;

/// Satellites shown on first launch
pub const DEFAULT_SATELLITES: [&str; 3] = ["28654", "47966", "42828"];

#[derive(Parser, Debug, Clone)]
#[command(name = "satglobe", version, about = "Interactive 3D Earth with live satellite positions")]
pub struct AppConfig {
    /// Base URL of the TLE lookup API; ids are appended as a path segment
    #[arg(long, env = "SATGLOBE_API_BASE", default_value = DEFAULT_API_BASE)]
    pub api_base: String,

    /// Satellite catalogue number to show at startup (repeatable)
    #[arg(
        long = "satellite",
        env = "SATGLOBE_SATELLITES",
        value_delimiter = ',',
        default_values_t = DEFAULT_SATELLITES.map(String::from)
    )]
    pub satellites: Vec<String>,

    /// HTTP timeout for a single TLE lookup, in seconds
    #[arg(long, env = "SATGLOBE_HTTP_TIMEOUT_SECS", default_value_t = 15)]
    pub http_timeout_secs: u64,

    /// Start with the camera standing still
    #[arg(long, env = "SATGLOBE_NO_ROTATE")]
    pub no_rotate: bool,

    /// Wait for the initial lookups before opening the window
    #[arg(long, env = "SATGLOBE_SETTLE_ON_START")]
    pub settle_on_start: bool,

    /// Log filter used when RUST_LOG is not set
    #[arg(long, env = "SATGLOBE_LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Equirectangular Earth map; a lit ocean sphere is drawn when it is missing
    #[arg(long, env = "SATGLOBE_EARTH_TEXTURE", default_value = DEFAULT_EARTH_TEXTURE)]
    pub earth_texture: PathBuf,

    /// Seed for the background starfield
    #[arg(long, default_value_t = 42)]
    pub star_seed: u64,
}

impl AppConfig {
    pub fn http_timeout(&self) -> Duration {
        Duration::from_secs(self.http_timeout_secs.max(1))
    }

    /// Startup ids with whitespace trimmed and blanks dropped
    pub fn initial_satellites(&self) -> impl Iterator<Item = String> + '_ {
        self.satellites
            .iter()
            .map(|id| id.trim())
            .filter(|id| !id.is_empty())
            .map(str::to_string)
    }
}
