//! Runtime settings loaded from environment variables.
//!
//! Every knob has a development-friendly default so the service starts
//! with zero configuration (providers fall back to mock responses when
//! their credentials are absent).

use serde::Deserialize;

/// Service configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// HTTP server bind address.
    pub bind_address: String,
    /// HTTP server port.
    pub port: u16,
    /// Default log level when `RUST_LOG` is unset.
    pub log_level: String,
    /// When set, logs are also written as daily-rotated NDJSON files
    /// under this directory.
    pub log_dir: Option<String>,

    // S3 / MinIO object storage
    pub s3_endpoint: String,
    pub s3_access_key: String,
    pub s3_secret_key: String,
    pub s3_bucket: String,
    pub s3_region: String,

    // OpenAI vision / text models
    pub openai_api_key: Option<String>,
    pub openai_model: String,
    pub openai_vision_model: String,

    // AWS Textract OCR
    pub aws_access_key_id: Option<String>,
    pub aws_secret_access_key: Option<String>,
    pub aws_region: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0".to_string(),
            port: 8000,
            log_level: "info".to_string(),
            log_dir: None,
            s3_endpoint: "http://minio:9000".to_string(),
            s3_access_key: "minioadmin".to_string(),
            s3_secret_key: "minioadmin".to_string(),
            s3_bucket: "blueprints".to_string(),
            s3_region: "us-east-1".to_string(),
            openai_api_key: None,
            openai_model: "gpt-4o".to_string(),
            openai_vision_model: "gpt-4o".to_string(),
            aws_access_key_id: None,
            aws_secret_access_key: None,
            aws_region: "us-east-1".to_string(),
        }
    }
}

impl Settings {
    /// Load configuration from environment variables with sensible defaults.
    pub fn from_env() -> Self {
        let defaults = Settings::default();
        Self {
            bind_address: env_or("BIDFORGE_BIND", &defaults.bind_address),
            port: std::env::var("BIDFORGE_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(defaults.port),
            log_level: env_or("BIDFORGE_LOG_LEVEL", &defaults.log_level),
            log_dir: non_empty(std::env::var("BIDFORGE_LOG_DIR").ok()),
            s3_endpoint: env_or("S3_ENDPOINT", &defaults.s3_endpoint),
            s3_access_key: env_or("S3_ACCESS_KEY", &defaults.s3_access_key),
            s3_secret_key: env_or("S3_SECRET_KEY", &defaults.s3_secret_key),
            s3_bucket: env_or("S3_BUCKET", &defaults.s3_bucket),
            s3_region: env_or("S3_REGION", &defaults.s3_region),
            openai_api_key: non_empty(std::env::var("OPENAI_API_KEY").ok()),
            openai_model: env_or("OPENAI_MODEL", &defaults.openai_model),
            openai_vision_model: env_or("OPENAI_VISION_MODEL", &defaults.openai_vision_model),
            aws_access_key_id: non_empty(std::env::var("AWS_ACCESS_KEY_ID").ok()),
            aws_secret_access_key: non_empty(std::env::var("AWS_SECRET_ACCESS_KEY").ok()),
            aws_region: env_or("AWS_REGION", &defaults.aws_region),
        }
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Treat empty env values the same as unset ones.
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_local_stack() {
        let settings = Settings::default();
        assert_eq!(settings.port, 8000);
        assert_eq!(settings.s3_bucket, "blueprints");
        assert!(settings.openai_api_key.is_none());
        assert!(settings.aws_access_key_id.is_none());
        assert!(settings.log_dir.is_none());
    }

    #[test]
    fn empty_credentials_count_as_unset() {
        assert_eq!(non_empty(Some("".to_string())), None);
        assert_eq!(non_empty(Some("  ".to_string())), None);
        assert_eq!(non_empty(Some("key".to_string())), Some("key".to_string()));
    }
}
