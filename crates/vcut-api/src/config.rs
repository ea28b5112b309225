//! API configuration.

use std::time::Duration;

/// API server configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// CORS origins
    pub cors_origins: Vec<String>,
    /// Shared scratch directory for uploads and results
    pub temp_dir: String,
    /// Max request body size (uploads are whole videos)
    pub max_body_size: usize,
    /// Timeout for a single auto-editor invocation
    pub tool_timeout: Duration,
    /// Max concurrent external-tool subprocesses
    pub max_concurrent_tools: usize,
    /// Environment (development/production)
    pub environment: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            // Dev origins of the bundled frontend
            cors_origins: vec![
                "http://localhost:5173".to_string(),
                "http://localhost:3000".to_string(),
                "http://127.0.0.1:5173".to_string(),
            ],
            temp_dir: "temp_files".to_string(),
            max_body_size: 1024 * 1024 * 1024, // 1GiB
            tool_timeout: Duration::from_secs(600),
            max_concurrent_tools: 4,
            environment: "development".to_string(),
        }
    }
}

impl ApiConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            host: std::env::var("API_HOST").unwrap_or(defaults.host),
            port: std::env::var("API_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.port),
            cors_origins: std::env::var("CORS_ORIGINS")
                .map(|s| s.split(',').map(|s| s.trim().to_string()).collect())
                .unwrap_or(defaults.cors_origins),
            temp_dir: std::env::var("TEMP_DIR").unwrap_or(defaults.temp_dir),
            max_body_size: std::env::var("MAX_BODY_SIZE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.max_body_size),
            tool_timeout: Duration::from_secs(
                std::env::var("TOOL_TIMEOUT")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(defaults.tool_timeout.as_secs()),
            ),
            max_concurrent_tools: std::env::var("MAX_CONCURRENT_TOOLS")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|&n| n > 0)
                .unwrap_or(defaults.max_concurrent_tools),
            environment: std::env::var("ENVIRONMENT").unwrap_or(defaults.environment),
        }
    }

    /// Check if running in production mode.
    pub fn is_production(&self) -> bool {
        self.environment.to_lowercase() == "production"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ApiConfig::default();
        assert_eq!(config.port, 8000);
        assert_eq!(config.temp_dir, "temp_files");
        assert_eq!(config.cors_origins.len(), 3);
        assert!(!config.is_production());
    }
}
