//! S3/MinIO object storage client.
//!
//! Path-style URLs against a configurable endpoint with SigV4-signed
//! GETs, plus presigned URL generation for direct access.

use bidforge_core::BidForgeError;
use chrono::Utc;
use tracing::info;

use crate::sign::{presign_url, sign_headers, Credentials};

/// Downloader for blueprint objects.
#[derive(Debug, Clone)]
pub struct S3Client {
    http: reqwest::Client,
    endpoint: String,
    bucket: String,
    region: String,
    credentials: Credentials,
}

impl S3Client {
    pub fn new(
        http: reqwest::Client,
        endpoint: impl Into<String>,
        bucket: impl Into<String>,
        region: impl Into<String>,
        access_key: impl Into<String>,
        secret_key: impl Into<String>,
    ) -> Self {
        let endpoint = endpoint.into();
        Self {
            http,
            endpoint: endpoint.trim_end_matches('/').to_string(),
            bucket: bucket.into(),
            region: region.into(),
            credentials: Credentials {
                access_key: access_key.into(),
                secret_key: secret_key.into(),
            },
        }
    }

    fn object_path(&self, key: &str) -> String {
        format!("/{}/{}", self.bucket, key.trim_start_matches('/'))
    }

    fn split_endpoint(&self) -> Result<(&str, &str), BidForgeError> {
        self.endpoint
            .split_once("://")
            .ok_or_else(|| BidForgeError::Config(format!("invalid S3 endpoint: {}", self.endpoint)))
    }

    /// Download an object by key. Errors surface as storage failures.
    pub async fn download(&self, key: &str) -> Result<Vec<u8>, BidForgeError> {
        let path = self.object_path(key);
        let (_, host) = self.split_endpoint()?;
        let signed = sign_headers(
            &self.credentials,
            &self.region,
            "s3",
            "GET",
            host,
            &path,
            &[],
            &[],
            b"",
            Utc::now(),
        );

        info!(s3_key = key, bucket = %self.bucket, "downloading blueprint object");
        let response = self
            .http
            .get(format!("{}{}", self.endpoint, path))
            .header("authorization", &signed.authorization)
            .header("x-amz-date", &signed.amz_date)
            .header("x-amz-content-sha256", &signed.content_sha256)
            .send()
            .await
            .map_err(|e| BidForgeError::Storage(format!("download of {key} failed: {e}")))?;

        if !response.status().is_success() {
            return Err(BidForgeError::Storage(format!(
                "download of {key} failed with status {}",
                response.status()
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| BidForgeError::Storage(format!("reading body of {key} failed: {e}")))?;
        info!(s3_key = key, size_bytes = bytes.len(), "blueprint object downloaded");
        Ok(bytes.to_vec())
    }

    /// Generate a presigned GET URL for direct client access.
    pub fn presign(&self, key: &str, expires_secs: u64) -> Result<String, BidForgeError> {
        let (scheme, host) = self.split_endpoint()?;
        Ok(presign_url(
            &self.credentials,
            &self.region,
            "s3",
            scheme,
            host,
            &self.object_path(key),
            expires_secs,
            Utc::now(),
        ))
    }
}
