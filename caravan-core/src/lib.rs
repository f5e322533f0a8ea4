pub mod dates;
pub mod flights;
pub mod search;
pub mod store;
pub mod supplier;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(String),
    #[error("{0}")]
    Upstream(String),
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

pub type CoreResult<T> = Result<T, CoreError>;
