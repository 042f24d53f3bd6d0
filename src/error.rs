use reqwest::StatusCode;
use thiserror::Error;

/// Errors returned by the client and the query builder.
#[derive(Debug, Error)]
pub enum Error {
    /// Transport level failure reported by `reqwest`.
    #[error("{0}")]
    Reqwest(#[from] reqwest::Error),

    /// Neither the call site nor the client supplied an API token.
    #[error("no token defined for webhose API request")]
    MissingToken,

    /// The API answered with something other than `200 OK`.
    #[error("request failed with status {status}: {body}")]
    RequestFailed {
        /// Status code of the failed response.
        status: StatusCode,
        /// Raw response body.
        body: String,
    },

    /// The response body was not the JSON document the API documents.
    #[error("malformed response: {0}")]
    Json(#[from] serde_json::Error),

    /// An endpoint or `next` link could not be parsed as a URL.
    #[error("{0}")]
    Url(#[from] url::ParseError),

    /// A string-keyed query filter name is not recognized.
    #[error("unknown query field `{0}`")]
    UnknownField(String),

    /// A string-keyed query filter got a value it cannot hold.
    #[error("invalid value `{value}` for query field `{field}`")]
    InvalidValue {
        /// Name of the field.
        field: String,
        /// The rejected value.
        value: String,
    },
}
