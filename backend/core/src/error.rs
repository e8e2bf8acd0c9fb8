use thiserror::Error;

/// Top-level error type for the BidForge service.
///
/// Variants map onto the failure taxonomy the gateway exposes: request
/// validation problems become 422s, everything else surfaces as a 500 with
/// the message below.
#[derive(Debug, Error)]
pub enum BidForgeError {
    #[error("invalid request: {0}")]
    Validation(String),

    #[error("storage error: {0}")]
    Storage(String),

    #[error("OCR extraction failed: {0}")]
    Ocr(String),

    #[error("vision analysis failed: {0}")]
    Vision(String),

    #[error("bid generation failed: {0}")]
    Bid(String),

    #[error("provider returned an invalid response: {0}")]
    InvalidResponse(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
