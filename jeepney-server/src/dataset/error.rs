//! Dataset loading error types.

use std::path::PathBuf;

/// Errors that can occur when loading or converting a dataset.
#[derive(Debug, thiserror::Error)]
pub enum DatasetError {
    /// Reading the dataset file failed
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Dataset server returned an error status
    #[error("dataset server returned {status}: {message}")]
    Status { status: u16, message: String },

    /// Failed to parse the dataset JSON
    #[error("JSON parse error: {message}")]
    Json { message: String },

    /// The dataset defines no usable routes
    #[error("dataset contains no usable routes")]
    Empty,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = DatasetError::Io {
            path: PathBuf::from("/data/davao.json"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        };
        assert_eq!(err.to_string(), "failed to read /data/davao.json: gone");

        let err = DatasetError::Status {
            status: 502,
            message: "bad gateway".into(),
        };
        assert_eq!(err.to_string(), "dataset server returned 502: bad gateway");

        assert_eq!(
            DatasetError::Empty.to_string(),
            "dataset contains no usable routes"
        );
    }
}
