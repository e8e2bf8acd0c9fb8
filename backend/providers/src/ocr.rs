//! OCR text extraction via AWS Textract's `DetectDocumentText` API.
//!
//! When Textract credentials are absent the client returns a fixed mock
//! response instead of failing, which keeps local development and the
//! test suite off the network.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use bidforge_core::{BidForgeError, BoundingBox, OcrResult, TextBlock};
use chrono::Utc;
use serde_json::{json, Value};
use tracing::{info, warn};

use crate::retry::{with_retry, RetryPolicy};
use crate::sign::{sign_headers, Credentials};

const TEXTRACT_TARGET: &str = "Textract.DetectDocumentText";
const TEXTRACT_CONTENT_TYPE: &str = "application/x-amz-json-1.1";

/// Textract-backed OCR client.
#[derive(Debug, Clone)]
pub struct OcrClient {
    http: reqwest::Client,
    region: String,
    credentials: Option<Credentials>,
    retry: RetryPolicy,
}

impl OcrClient {
    pub fn new(
        http: reqwest::Client,
        region: impl Into<String>,
        access_key: Option<String>,
        secret_key: Option<String>,
    ) -> Self {
        let credentials = match (access_key, secret_key) {
            (Some(access_key), Some(secret_key)) => Some(Credentials {
                access_key,
                secret_key,
            }),
            _ => None,
        };
        Self {
            http,
            region: region.into(),
            credentials,
            retry: RetryPolicy::default(),
        }
    }

    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Extract text from one page image.
    pub async fn extract_text(&self, image_bytes: &[u8]) -> Result<OcrResult, BidForgeError> {
        let Some(credentials) = &self.credentials else {
            warn!("no Textract credentials, using mock OCR response");
            return Ok(parse_textract_response(&mock_textract_response()));
        };

        let response = with_retry(&self.retry, "textract.detect_document_text", || {
            self.call_textract(credentials, image_bytes)
        })
        .await?;

        let result = parse_textract_response(&response);
        info!(
            block_count = result.blocks.len(),
            text_length = result.raw_text.len(),
            "OCR extraction complete"
        );
        Ok(result)
    }

    async fn call_textract(
        &self,
        credentials: &Credentials,
        image_bytes: &[u8],
    ) -> Result<Value, BidForgeError> {
        let host = format!("textract.{}.amazonaws.com", self.region);
        let body = json!({
            "Document": { "Bytes": STANDARD.encode(image_bytes) }
        });
        let payload = serde_json::to_vec(&body)
            .map_err(|e| BidForgeError::Ocr(format!("request encoding failed: {e}")))?;

        let signed = sign_headers(
            credentials,
            &self.region,
            "textract",
            "POST",
            &host,
            "/",
            &[],
            &[
                ("content-type", TEXTRACT_CONTENT_TYPE),
                ("x-amz-target", TEXTRACT_TARGET),
            ],
            &payload,
            Utc::now(),
        );

        let response = self
            .http
            .post(format!("https://{host}/"))
            .header("content-type", TEXTRACT_CONTENT_TYPE)
            .header("x-amz-target", TEXTRACT_TARGET)
            .header("authorization", &signed.authorization)
            .header("x-amz-date", &signed.amz_date)
            .header("x-amz-content-sha256", &signed.content_sha256)
            .body(payload)
            .send()
            .await
            .map_err(|e| BidForgeError::Ocr(format!("Textract call failed: {e}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let detail = response.text().await.unwrap_or_default();
            return Err(BidForgeError::Ocr(format!(
                "Textract returned {status}: {detail}"
            )));
        }

        response
            .json()
            .await
            .map_err(|e| BidForgeError::Ocr(format!("Textract response decode failed: {e}")))
    }
}

/// Parse a Textract `DetectDocumentText` response into an [`OcrResult`].
/// Only `LINE` blocks contribute; confidence is normalized from percent.
pub fn parse_textract_response(response: &Value) -> OcrResult {
    let mut blocks = Vec::new();
    let mut raw_text_lines = Vec::new();

    for block in response["Blocks"].as_array().into_iter().flatten() {
        if block["BlockType"].as_str() != Some("LINE") {
            continue;
        }
        let text = block["Text"].as_str().unwrap_or_default().to_string();
        raw_text_lines.push(text.clone());

        let bbox = &block["Geometry"]["BoundingBox"];
        blocks.push(TextBlock {
            text,
            confidence: block["Confidence"].as_f64().unwrap_or(0.0) / 100.0,
            bounding_box: BoundingBox {
                left: bbox["Left"].as_f64().unwrap_or(0.0),
                top: bbox["Top"].as_f64().unwrap_or(0.0),
                width: bbox["Width"].as_f64().unwrap_or(0.0),
                height: bbox["Height"].as_f64().unwrap_or(0.0),
            },
            block_type: "LINE".to_string(),
        });
    }

    OcrResult {
        raw_text: raw_text_lines.join("\n"),
        blocks,
        page_count: 1,
    }
}

/// Fixed response used when no Textract credentials are configured.
fn mock_textract_response() -> Value {
    json!({
        "Blocks": [
            {
                "BlockType": "LINE",
                "Text": "Blueprint - Floor Plan",
                "Confidence": 95.5,
                "Geometry": { "BoundingBox": { "Width": 0.2, "Height": 0.05, "Left": 0.1, "Top": 0.1 } }
            },
            {
                "BlockType": "LINE",
                "Text": "Living Room: 15' x 20'",
                "Confidence": 92.3,
                "Geometry": { "BoundingBox": { "Width": 0.25, "Height": 0.05, "Left": 0.1, "Top": 0.2 } }
            },
            {
                "BlockType": "LINE",
                "Text": "Bedroom: 12' x 14'",
                "Confidence": 91.8,
                "Geometry": { "BoundingBox": { "Width": 0.22, "Height": 0.05, "Left": 0.1, "Top": 0.3 } }
            }
        ]
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_line_blocks_and_joins_text() {
        let result = parse_textract_response(&mock_textract_response());
        assert_eq!(result.blocks.len(), 3);
        assert!(result.raw_text.starts_with("Blueprint - Floor Plan\n"));
        assert!(result.raw_text.contains("Living Room: 15' x 20'"));
        assert_eq!(result.page_count, 1);
    }

    #[test]
    fn confidence_is_normalized_from_percent() {
        let result = parse_textract_response(&mock_textract_response());
        assert!((result.blocks[0].confidence - 0.955).abs() < 1e-9);
        assert!(result.blocks.iter().all(|b| (0.0..=1.0).contains(&b.confidence)));
    }

    #[test]
    fn non_line_blocks_are_skipped() {
        let response = json!({
            "Blocks": [
                { "BlockType": "PAGE" },
                { "BlockType": "WORD", "Text": "ignored", "Confidence": 99.0 },
                { "BlockType": "LINE", "Text": "kept", "Confidence": 90.0,
                  "Geometry": { "BoundingBox": {} } }
            ]
        });
        let result = parse_textract_response(&response);
        assert_eq!(result.blocks.len(), 1);
        assert_eq!(result.raw_text, "kept");
    }

    #[test]
    fn empty_response_yields_empty_result() {
        let result = parse_textract_response(&json!({}));
        assert!(result.blocks.is_empty());
        assert!(result.raw_text.is_empty());
    }

    #[tokio::test]
    async fn missing_credentials_fall_back_to_mock() {
        let client = OcrClient::new(reqwest::Client::new(), "us-east-1", None, None);
        let result = client.extract_text(b"fake image").await.unwrap();
        assert!(result.raw_text.contains("Floor Plan"));
        assert_eq!(result.blocks.len(), 3);
    }

    #[tokio::test]
    async fn partial_credentials_also_fall_back_to_mock() {
        let client = OcrClient::new(
            reqwest::Client::new(),
            "us-east-1",
            Some("key".to_string()),
            None,
        );
        let result = client.extract_text(b"fake image").await.unwrap();
        assert!(!result.blocks.is_empty());
    }
}
