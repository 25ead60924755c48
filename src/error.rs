//! Error types and handling for the `ParkSpot` core

use thiserror::Error;

/// Main error type for the `ParkSpot` core
#[derive(Error, Debug)]
pub enum ParkingError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Input validation errors
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// Malformed GeoJSON or space-list payloads
    #[error("Codec error: {message}")]
    Codec { message: String },

    /// Search backend failures
    #[error("Search error: {message}")]
    Search { message: String },

    /// JSON (de)serialization errors
    #[error("JSON error: {source}")]
    Json {
        #[from]
        source: serde_json::Error,
    },

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl ParkingError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a new codec error
    pub fn codec<S: Into<String>>(message: S) -> Self {
        Self::Codec {
            message: message.into(),
        }
    }

    /// Create a new search error
    pub fn search<S: Into<String>>(message: S) -> Self {
        Self::Search {
            message: message.into(),
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            ParkingError::Config { .. } => {
                "Configuration error. Please check your config file.".to_string()
            }
            ParkingError::Validation { message } => format!("Invalid input: {message}"),
            ParkingError::Codec { .. } | ParkingError::Json { .. } => {
                "Search failed: the server sent an unexpected response.".to_string()
            }
            ParkingError::Search { .. } => "Failed to fetch parking spaces".to_string(),
            ParkingError::Io { .. } => {
                "File operation failed. Please check file permissions.".to_string()
            }
        }
    }
}
