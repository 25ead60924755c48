//! Configuration management for `ParkSpot`
//!
//! Handles loading configuration from files, environment variables,
//! and provides validation for all configuration settings.

use crate::ParkingError;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Root configuration structure for `ParkSpot`
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ParkspotConfig {
    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Mock search backend configuration
    #[serde(default)]
    pub search: SearchConfig,
    /// Simulated reservation settings
    #[serde(default)]
    pub reservation: ReservationConfig,
    /// Map and imagery passthrough settings
    #[serde(default)]
    pub map: MapConfig,
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP server configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address
    #[serde(default = "default_host")]
    pub host: String,
    /// Listen port
    #[serde(default = "default_port")]
    pub port: u16,
    /// Directory served for every non-API request
    #[serde(default = "default_static_dir")]
    pub static_dir: String,
}

/// Mock search backend settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Simulated network latency in milliseconds (0 disables)
    #[serde(default = "default_latency_ms")]
    pub latency_ms: u64,
    /// Fewest spaces returned per search
    #[serde(default = "default_min_results")]
    pub min_results: usize,
    /// Most spaces returned per search
    #[serde(default = "default_max_results")]
    pub max_results: usize,
    /// Fixed RNG seed for reproducible results
    #[serde(default)]
    pub seed: Option<u64>,
}

/// Simulated reservation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReservationConfig {
    /// Delay before a reservation is confirmed, in milliseconds
    #[serde(default = "default_reservation_delay_ms")]
    pub delay_ms: u64,
}

/// Map style and street view passthrough settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapConfig {
    /// Vector tile style document
    #[serde(default = "default_style_url")]
    pub style_url: String,
    /// Key appended to the style URL
    #[serde(default)]
    pub style_api_key: Option<String>,
    /// Street view static image endpoint
    #[serde(default = "default_street_view_base_url")]
    pub street_view_base_url: String,
    /// Street view API key
    #[serde(default)]
    pub street_view_api_key: Option<String>,
    /// IANA timezone used for date-time display
    #[serde(default = "default_display_timezone")]
    pub display_timezone: String,
}

/// Logging configuration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Log format (pretty or json)
    #[serde(default = "default_log_format")]
    pub format: String,
}

// Default value functions
fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_static_dir() -> String {
    "frontend/dist".to_string()
}

fn default_latency_ms() -> u64 {
    400
}

fn default_min_results() -> usize {
    3
}

fn default_max_results() -> usize {
    5
}

fn default_reservation_delay_ms() -> u64 {
    2000
}

fn default_style_url() -> String {
    "https://api.maptiler.com/maps/streets-v2/style.json".to_string()
}

fn default_street_view_base_url() -> String {
    "https://maps.googleapis.com/maps/api/streetview".to_string()
}

fn default_display_timezone() -> String {
    "Europe/London".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            static_dir: default_static_dir(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            latency_ms: default_latency_ms(),
            min_results: default_min_results(),
            max_results: default_max_results(),
            seed: None,
        }
    }
}

impl Default for ReservationConfig {
    fn default() -> Self {
        Self {
            delay_ms: default_reservation_delay_ms(),
        }
    }
}

impl ReservationConfig {
    #[must_use]
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            style_url: default_style_url(),
            style_api_key: None,
            street_view_base_url: default_street_view_base_url(),
            street_view_api_key: None,
            display_timezone: default_display_timezone(),
        }
    }
}

impl MapConfig {
    /// Style document URL with the key attached, if one is configured
    #[must_use]
    pub fn style_request_url(&self) -> String {
        match &self.style_api_key {
            Some(key) => {
                let separator = if self.style_url.contains('?') { '&' } else { '?' };
                format!("{}{separator}key={}", self.style_url, urlencoding::encode(key))
            }
            None => self.style_url.clone(),
        }
    }

    /// Parsed display timezone
    pub fn timezone(&self) -> crate::Result<chrono_tz::Tz> {
        self.display_timezone.parse().map_err(|_| {
            ParkingError::config(format!(
                "Unknown display timezone '{}'",
                self.display_timezone
            ))
        })
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl ParkspotConfig {
    /// Load configuration from file and environment variables
    pub fn load() -> Result<Self> {
        Self::load_from_path(None)
    }

    /// Load configuration from specified path
    pub fn load_from_path(config_path: Option<PathBuf>) -> Result<Self> {
        let mut builder = Config::builder();

        let config_file = config_path.unwrap_or_else(|| {
            Self::get_config_path().unwrap_or_else(|| PathBuf::from("config.toml"))
        });

        if config_file.exists() {
            builder = builder.add_source(
                File::from(config_file.clone())
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // PARKSPOT_SEARCH__LATENCY_MS=0 style overrides
        builder = builder.add_source(
            Environment::with_prefix("PARKSPOT")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings = builder
            .build()
            .with_context(|| "Failed to build configuration")?;

        let mut config: ParkspotConfig = settings
            .try_deserialize()
            .with_context(|| "Failed to deserialize configuration")?;

        config.apply_defaults();
        config.validate()?;

        Ok(config)
    }

    /// Get the default configuration file path
    #[must_use]
    pub fn get_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("parkspot").join("config.toml"))
    }

    /// Apply default values to empty configuration fields
    pub fn apply_defaults(&mut self) {
        if self.server.host.is_empty() {
            self.server.host = default_host();
        }
        if self.server.static_dir.is_empty() {
            self.server.static_dir = default_static_dir();
        }
        if self.map.style_url.is_empty() {
            self.map.style_url = default_style_url();
        }
        if self.map.street_view_base_url.is_empty() {
            self.map.street_view_base_url = default_street_view_base_url();
        }
        if self.map.display_timezone.is_empty() {
            self.map.display_timezone = default_display_timezone();
        }
        if self.logging.level.is_empty() {
            self.logging.level = default_log_level();
        }
        if self.logging.format.is_empty() {
            self.logging.format = default_log_format();
        }
    }

    /// Validate all configuration settings
    pub fn validate(&self) -> Result<()> {
        self.validate_numeric_ranges()?;
        self.validate_string_values()?;
        Ok(())
    }

    /// Validate numeric configuration ranges
    fn validate_numeric_ranges(&self) -> Result<()> {
        if self.server.port == 0 {
            return Err(ParkingError::config("Server port cannot be 0").into());
        }

        if self.search.latency_ms > 10_000 {
            return Err(
                ParkingError::config("Search latency cannot exceed 10000 ms").into(),
            );
        }

        if self.search.min_results == 0 {
            return Err(ParkingError::config("Minimum results must be at least 1").into());
        }

        if self.search.min_results > self.search.max_results {
            return Err(ParkingError::config(format!(
                "Minimum results ({}) cannot exceed maximum results ({})",
                self.search.min_results, self.search.max_results
            ))
            .into());
        }

        if self.search.max_results > 20 {
            return Err(ParkingError::config("Maximum results cannot exceed 20").into());
        }

        if self.reservation.delay_ms > 60_000 {
            return Err(
                ParkingError::config("Reservation delay cannot exceed 60000 ms").into(),
            );
        }

        Ok(())
    }

    /// Validate string configuration values
    fn validate_string_values(&self) -> Result<()> {
        let valid_log_levels = ["error", "warn", "info", "debug", "trace"];
        if !valid_log_levels.contains(&self.logging.level.as_str()) {
            return Err(ParkingError::config(format!(
                "Invalid log level '{}'. Must be one of: {}",
                self.logging.level,
                valid_log_levels.join(", ")
            ))
            .into());
        }

        let valid_log_formats = ["pretty", "json"];
        if !valid_log_formats.contains(&self.logging.format.as_str()) {
            return Err(ParkingError::config(format!(
                "Invalid log format '{}'. Must be one of: {}",
                self.logging.format,
                valid_log_formats.join(", ")
            ))
            .into());
        }

        for (name, url) in [
            ("Map style URL", &self.map.style_url),
            ("Street view URL", &self.map.street_view_base_url),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(ParkingError::config(format!(
                    "{name} must be a valid HTTP or HTTPS URL"
                ))
                .into());
            }
        }

        for (name, key) in [
            ("Street view API key", &self.map.street_view_api_key),
            ("Map style API key", &self.map.style_api_key),
        ] {
            if key.as_deref().is_some_and(str::is_empty) {
                return Err(ParkingError::config(format!(
                    "{name} cannot be empty if provided. Either remove it or provide a valid key."
                ))
                .into());
            }
        }

        self.map.timezone()?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ParkspotConfig::default();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.search.latency_ms, 400);
        assert_eq!(config.search.min_results, 3);
        assert_eq!(config.search.max_results, 5);
        assert_eq!(config.reservation.delay(), Duration::from_secs(2));
        assert_eq!(config.logging.level, "info");
        assert!(config.search.seed.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation_invalid_log_level() {
        let mut config = ParkspotConfig::default();
        config.logging.level = "invalid".to_string();
        let result = config.validate();
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Invalid log level"));
    }

    #[test]
    fn test_config_validation_result_bounds() {
        let mut config = ParkspotConfig::default();
        config.search.min_results = 6;
        let result = config.validate();
        assert!(result.unwrap_err().to_string().contains("cannot exceed maximum"));

        config.search.min_results = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_validation_timezone() {
        let mut config = ParkspotConfig::default();
        config.map.display_timezone = "Mars/Olympus_Mons".to_string();
        let result = config.validate();
        assert!(result.unwrap_err().to_string().contains("Unknown display timezone"));
    }

    #[test]
    fn test_config_validation_empty_api_key() {
        let mut config = ParkspotConfig::default();
        config.map.street_view_api_key = Some(String::new());
        assert!(config.validate().is_err());

        config.map.street_view_api_key = Some("street_view_key".to_string());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_style_request_url() {
        let mut map = MapConfig::default();
        assert_eq!(map.style_request_url(), default_style_url());

        map.style_api_key = Some("abc".to_string());
        assert_eq!(
            map.style_request_url(),
            "https://api.maptiler.com/maps/streets-v2/style.json?key=abc"
        );
    }

    #[test]
    fn test_apply_defaults_fills_empty_strings() {
        let mut config = ParkspotConfig::default();
        config.logging.format = String::new();
        config.server.host = String::new();
        config.apply_defaults();
        assert_eq!(config.logging.format, "pretty");
        assert_eq!(config.server.host, "0.0.0.0");
    }

    #[test]
    fn test_load_from_file() {
        let path = std::env::temp_dir().join(format!("parkspot-test-{}.toml", std::process::id()));
        std::fs::write(
            &path,
            "[search]\nlatency_ms = 0\nseed = 7\n\n[server]\nport = 8088\n",
        )
        .unwrap();

        let config = ParkspotConfig::load_from_path(Some(path.clone())).unwrap();
        std::fs::remove_file(&path).unwrap();

        assert_eq!(config.search.latency_ms, 0);
        assert_eq!(config.search.seed, Some(7));
        assert_eq!(config.server.port, 8088);
        assert_eq!(config.search.max_results, 5);
    }

    #[test]
    fn test_config_path_generation() {
        if let Some(path) = ParkspotConfig::get_config_path() {
            assert!(path.to_string_lossy().contains("parkspot"));
            assert!(path.to_string_lossy().contains("config.toml"));
        }
    }
}
