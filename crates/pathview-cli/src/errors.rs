use pathview_core::PathviewError;
use thiserror::Error;

/// Errors that can occur while generating thumbnails
#[derive(Debug, Error)]
pub enum ThumbnailError {
    #[error(transparent)]
    Session(#[from] PathviewError),

    #[error("Failed to render session {session}: {source}")]
    SessionFailed {
        session: String,
        #[source]
        source: Box<ThumbnailError>,
    },

    #[error("Not a directory: {0}")]
    NotADirectory(String),

    #[error("Plotting error: {0}")]
    Plot(String),

    #[error("Image encoding error: {0}")]
    Image(#[from] image::ImageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("YAML parsing error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl ThumbnailError {
    /// Attach the name of the session being processed.
    pub fn in_session(self, session: &str) -> Self {
        ThumbnailError::SessionFailed {
            session: session.to_string(),
            source: Box::new(self),
        }
    }
}

pub type Result<T> = std::result::Result<T, ThumbnailError>;
