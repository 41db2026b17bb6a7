//! Configuration module

use std::env;
use std::path::PathBuf;

/// Origins the bundled frontend is served from during development
pub const DEFAULT_ALLOWED_ORIGINS: [&str; 3] = [
    "http://127.0.0.1:5500",
    "http://localhost:5500",
    "http://localhost:8080",
];

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Bind address
    pub host: String,

    /// Server port
    pub port: u16,

    /// Serialized ONNX graph, loaded once at startup
    pub model_path: PathBuf,

    /// CSV file the normalization bounds are fitted on, re-read per request
    pub reference_data_path: PathBuf,

    /// CORS allow-list
    pub allowed_origins: Vec<String>,

    /// Log output format ("pretty" or "json")
    pub log_format: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self {
            host: env::var("HOST")
                .unwrap_or_else(|_| "0.0.0.0".to_string()),

            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8000),

            model_path: env::var("MODEL_PATH")
                .unwrap_or_else(|_| "pinn_model.onnx".to_string())
                .into(),

            reference_data_path: env::var("REFERENCE_DATA_PATH")
                .unwrap_or_else(|_| "input.csv".to_string())
                .into(),

            allowed_origins: env::var("ALLOWED_ORIGINS")
                .map(|v| parse_origins(&v))
                .unwrap_or_else(|_| DEFAULT_ALLOWED_ORIGINS.iter().map(|o| o.to_string()).collect()),

            log_format: env::var("LOG_FORMAT")
                .unwrap_or_else(|_| "pretty".to_string()),
        }
    }

    /// Check if logs should be emitted as JSON lines
    pub fn json_logs(&self) -> bool {
        self.log_format.eq_ignore_ascii_case("json")
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .map(str::to_string)
        .collect()
}
