//! Shared application state.
//!
//! The state carries only immutable configuration and a reusable HTTP
//! client; each request builds its own provider clients from it, so no
//! mutable state is shared across requests.

use bidforge_config::Settings;
use bidforge_providers::{BidClient, OcrClient, S3Client, VisionClient};

/// Application state shared across routes.
#[derive(Clone)]
pub struct AppState {
    pub settings: Settings,
    http: reqwest::Client,
}

impl AppState {
    pub fn new(settings: Settings) -> Self {
        Self {
            settings,
            http: reqwest::Client::new(),
        }
    }

    /// Build the object storage client for one request.
    pub fn s3(&self) -> S3Client {
        S3Client::new(
            self.http.clone(),
            &self.settings.s3_endpoint,
            &self.settings.s3_bucket,
            &self.settings.s3_region,
            &self.settings.s3_access_key,
            &self.settings.s3_secret_key,
        )
    }

    /// Build the OCR client for one request.
    pub fn ocr(&self) -> OcrClient {
        OcrClient::new(
            self.http.clone(),
            &self.settings.aws_region,
            self.settings.aws_access_key_id.clone(),
            self.settings.aws_secret_access_key.clone(),
        )
    }

    /// Build the vision model client for one request.
    pub fn vision(&self) -> VisionClient {
        VisionClient::new(
            self.http.clone(),
            self.settings.openai_api_key.clone(),
            &self.settings.openai_vision_model,
        )
    }

    /// Build the bid model client for one request.
    pub fn bid(&self) -> BidClient {
        BidClient::new(
            self.http.clone(),
            self.settings.openai_api_key.clone(),
            &self.settings.openai_model,
        )
    }
}
