use thiserror::Error;
use vidtree_extractor_api::{JsonRequestError, TransportError};

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("nothing left to decode after cleanup")]
    Empty,

    #[error("filler token marker still present after cleanup")]
    ResidualToken,

    #[error("invalid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("decoded payload is not UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

#[derive(Debug, Error)]
pub enum FilmixError {
    #[error("invalid content url {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("malformed response: {0}")]
    MalformedResponse(String),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<JsonRequestError> for FilmixError {
    fn from(e: JsonRequestError) -> Self {
        match e {
            JsonRequestError::Transport(e) => FilmixError::Transport(e),
            JsonRequestError::Json { source, .. } => FilmixError::Json(source),
        }
    }
}
