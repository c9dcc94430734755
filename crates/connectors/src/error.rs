use thiserror::Error;

/// Failures surfaced by the query-execution client.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP transport error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API rejected the request ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("query execution ended in state {0}")]
    ExecutionFailed(String),

    #[error("query execution did not complete after {0} status polls")]
    ExecutionTimedOut(u32),

    #[error("cannot resolve a query ID from reference '{0}'")]
    InvalidQueryRef(String),

    #[error("malformed response payload: {0}")]
    MalformedResponse(String),
}
