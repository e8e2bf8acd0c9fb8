//! External provider clients.
//!
//! Each client is a thin, explicitly constructed dependency object (no
//! hidden process-wide state): the S3 downloader, the Textract-style OCR
//! client, the OpenAI vision client, and the bid-generation client. OCR
//! and the model clients fall back to fixed mock responses when their
//! credentials are absent, so the service stays usable in development.

pub mod bid;
pub mod ocr;
pub mod response;
pub mod retry;
pub mod s3;
pub mod sign;
pub mod vision;

pub use bid::BidClient;
pub use ocr::OcrClient;
pub use retry::{with_retry, RetryPolicy};
pub use s3::S3Client;
pub use vision::VisionClient;
