// OSS upload module - PUT delivery to pre-signed URLs with bounded retries

pub mod client;
pub mod retry;

pub use client::{OssClient, UploadOutcome, UploadRequest};
pub use retry::{RetryConfig, RetryPolicy};
