use thiserror::Error;

/// Longest body excerpt quoted back when the server answers with something other than JSON.
pub const BODY_EXCERPT_CHARS: usize = 200;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("Cannot connect to server at {url}. Is it running?")]
    Connection {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Request to {url} timed out")]
    Timeout { url: String },

    #[error("Server returned non-JSON: {excerpt}")]
    NonJson { excerpt: String },

    #[error("Server returned {status}: {body}")]
    Server { status: u16, body: String },

    #[error("Unexpected response format")]
    UnexpectedFormat,

    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unsupported image format: {0}")]
    UnsupportedFormat(String),

    #[error("Image processing error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Invalid strokes file: {0}")]
    Strokes(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ClientError {
    /// Sorts a transport failure into connection, timeout or generic request errors.
    pub fn from_transport(url: &str, error: reqwest::Error) -> Self {
        if error.is_connect() {
            ClientError::Connection {
                url: url.to_string(),
                source: error,
            }
        } else if error.is_timeout() {
            ClientError::Timeout {
                url: url.to_string(),
            }
        } else {
            ClientError::Http(error)
        }
    }

    pub fn non_json(body: &str) -> Self {
        ClientError::NonJson {
            excerpt: body.chars().take(BODY_EXCERPT_CHARS).collect(),
        }
    }
}
