// Error handling for the LightWAVE viewer

use thiserror::Error;

pub type Result<T> = std::result::Result<T, LightwaveError>;

#[derive(Error, Debug)]
pub enum LightwaveError {
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    MissingSelection(&'static str),

    #[error("Data unavailable: {0}")]
    Unavailable(String),
}

impl LightwaveError {
    /// True for the failures that should show the "not available" text
    /// instead of an error page.
    pub fn is_unavailable(&self) -> bool {
        matches!(
            self,
            LightwaveError::Http(_) | LightwaveError::Json(_) | LightwaveError::Unavailable(_)
        )
    }
}
