use thiserror::Error;

#[derive(Error, Debug)]
pub enum NodeError {
    #[error("Image encoding error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Descriptor serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Validation error: {field} - {message}")]
    Validation { field: String, message: String },

    #[error("Unsupported image shape: {shape:?}")]
    UnsupportedShape { shape: Vec<usize> },

    #[error("Upload failed: {reason}")]
    UploadFailed { reason: String },
}

/// Custom result type
pub type NodeResult<T> = Result<T, NodeError>;

impl NodeError {
    pub fn validation(field: &str, message: &str) -> Self {
        Self::Validation {
            field: field.to_string(),
            message: message.to_string(),
        }
    }

    pub fn unsupported_shape(shape: &[usize]) -> Self {
        Self::UnsupportedShape {
            shape: shape.to_vec(),
        }
    }

    pub fn upload_failed(reason: impl Into<String>) -> Self {
        Self::UploadFailed {
            reason: reason.into(),
        }
    }

    /// Whether a later invocation with the same inputs could succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, NodeError::UploadFailed { .. })
    }

    pub fn is_permanent(&self) -> bool {
        matches!(
            self,
            NodeError::Validation { .. }
                | NodeError::UnsupportedShape { .. }
                | NodeError::Image(_)
                | NodeError::Json(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upload_failures_are_retryable() {
        let error = NodeError::upload_failed("exhausted retries");
        assert!(error.is_retryable());
        assert!(!error.is_permanent());
    }

    #[test]
    fn test_input_errors_are_permanent() {
        let validation = NodeError::validation("destination_url", "cannot be empty");
        assert!(validation.is_permanent());
        assert!(!validation.is_retryable());

        let shape = NodeError::unsupported_shape(&[2, 7, 5]);
        assert!(shape.is_permanent());
        assert!(!shape.is_retryable());
    }

    #[test]
    fn test_error_messages_name_the_field() {
        let error = NodeError::validation("destination_url", "cannot be empty");
        let message = error.to_string();
        assert!(message.contains("destination_url"));
        assert!(message.contains("cannot be empty"));
    }
}
