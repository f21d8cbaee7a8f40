use std::any::Any;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GrainError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Color table unavailable: {0}")]
    ColorTableUnavailable(String),

    #[error("Invalid color: {0}")]
    InvalidColor(String),

    #[error("Frame parse error at line {line}: {message}")]
    FrameParse { line: usize, message: String },

    #[error("Invalid bounds: {0}")]
    InvalidBounds(String),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Operation cancelled")]
    OperationCancelled,

    #[error("Job panicked: {0}")]
    JobPanicked(String),
}

pub type Result<T> = std::result::Result<T, GrainError>;

impl GrainError {
    /// Wraps a panic payload caught from a batch job.
    pub(crate) fn job_panicked(payload: Box<dyn Any + Send>) -> Self {
        let message = match payload.downcast::<String>() {
            Ok(message) => *message,
            Err(payload) => payload
                .downcast_ref::<&str>()
                .map_or_else(|| "unknown panic".to_string(), |s| s.to_string()),
        };
        GrainError::JobPanicked(message)
    }

    pub(crate) fn frame_parse(line: usize, message: impl Into<String>) -> Self {
        GrainError::FrameParse {
            line,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Error as IoError, ErrorKind};

    #[test]
    fn test_color_table_error_display() {
        let error = GrainError::ColorTableUnavailable("no entry for 'tab:teal'".to_string());
        assert_eq!(
            error.to_string(),
            "Color table unavailable: no entry for 'tab:teal'"
        );
    }

    #[test]
    fn test_job_panicked_keeps_message() {
        let from_str = GrainError::job_panicked(Box::new("bad vertex"));
        assert_eq!(from_str.to_string(), "Job panicked: bad vertex");

        let from_string = GrainError::job_panicked(Box::new(format!("frame {}", 3)));
        assert_eq!(from_string.to_string(), "Job panicked: frame 3");

        let opaque = GrainError::job_panicked(Box::new(42_u8));
        assert_eq!(opaque.to_string(), "Job panicked: unknown panic");
    }

    #[test]
    fn test_frame_parse_error_display() {
        let error = GrainError::frame_parse(7, "expected 3 vertices");
        assert_eq!(
            error.to_string(),
            "Frame parse error at line 7: expected 3 vertices"
        );
    }

    #[test]
    fn test_error_from_io_error() {
        let io_error = IoError::new(ErrorKind::NotFound, "file not found");
        let error = GrainError::from(io_error);

        match error {
            GrainError::Io(ref err) => assert_eq!(err.kind(), ErrorKind::NotFound),
            _ => panic!("Expected IO error variant"),
        }
    }

    #[test]
    fn test_all_variants_display() {
        let errors = vec![
            GrainError::ColorTableUnavailable("missing".to_string()),
            GrainError::InvalidColor("#12".to_string()),
            GrainError::frame_parse(1, "bad"),
            GrainError::InvalidBounds("xmin >= xmax".to_string()),
            GrainError::OperationCancelled,
        ];

        for error in errors {
            assert!(!error.to_string().is_empty());
        }
    }

    #[test]
    fn test_error_debug() {
        let error = GrainError::InvalidColor("#zzzzzz".to_string());
        let debug_str = format!("{error:?}");
        assert!(debug_str.contains("InvalidColor"));
        assert!(debug_str.contains("#zzzzzz"));
    }
}
