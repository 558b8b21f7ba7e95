use thiserror::Error;

use crate::http::query::QueryEncoding;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Malformed message: {0}")]
    MalformedMessage(String),

    #[error("Invalid request target {0:?}: cannot contain whitespace")]
    InvalidRequestTarget(String),

    #[error("Invalid query encoding: {0:?}")]
    InvalidEncoding(QueryEncoding),

    #[error("Invalid URI: {0}")]
    InvalidUri(#[from] http::uri::InvalidUri),
}

pub type Result<T> = std::result::Result<T, Error>;
