//! Aladhan client error types.

/// Errors from the Aladhan HTTP client.
#[derive(Debug, thiserror::Error)]
pub enum AladhanError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned a non-success status code
    #[error("Aladhan API error {status}: {message}")]
    Api { status: u16, message: String },

    /// API answered 200 but the envelope carried an error code
    #[error("Aladhan responded with code {code}: {status}")]
    Upstream { code: u16, status: String },

    /// JSON deserialization failed
    #[error("JSON parse error: {message}")]
    Json {
        message: String,
        body: Option<String>,
    },

    /// Date conversion returned a year that is not a number
    #[error("invalid Hijri year in response: {0:?}")]
    InvalidHijriYear(String),
}
