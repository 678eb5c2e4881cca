use thiserror::Error;

pub type Result<T> = std::result::Result<T, ChromeError>;

#[derive(Debug, Error)]
pub enum ChromeError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Failed to launch browser: {0}")]
    Launch(String),

    #[error("Browser timed out after {0}s")]
    Timeout(u64),

    #[error("Browser exited with error: {0}")]
    Exit(String),
}
