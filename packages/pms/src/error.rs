use thiserror::Error;

#[derive(Debug, Error)]
pub enum PmsError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("{context} returned HTTP {status}")]
    Status { context: &'static str, status: u16 },

    #[error("failed to parse {context} response: {message}")]
    Parse {
        context: &'static str,
        message: String,
    },
}
