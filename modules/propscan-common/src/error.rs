use thiserror::Error;

#[derive(Error, Debug)]
pub enum PropscanError {
    #[error("No scraper available for site: {0}")]
    UnsupportedSite(String),

    #[error("Fetch error: {0}")]
    Fetch(String),

    #[error(transparent)]
    Anyhow(#[from] anyhow::Error),
}
