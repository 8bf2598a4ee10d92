use thiserror::Error;

use crate::indicator::FetchError;
use crate::storage::order::OrderByError;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0}")]
    InvalidRequest(String),
    #[error("{0}")]
    NotFound(String),
    #[error("indicator API unavailable: {0}")]
    UpstreamUnavailable(String),
    #[error("no country data found for indicator {0} between 2012 and 2017")]
    NoDataFound(String),
    #[error("storage error: {0:#}")]
    Storage(#[from] anyhow::Error),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl From<OrderByError> for ServiceError {
    fn from(value: OrderByError) -> Self {
        ServiceError::InvalidRequest(value.to_string())
    }
}

impl ServiceError {
    pub fn from_fetch(indicator_id: &str, err: FetchError) -> Self {
        match err {
            FetchError::Unavailable(reason) => ServiceError::UpstreamUnavailable(reason),
            FetchError::NoData => ServiceError::NoDataFound(indicator_id.to_string()),
        }
    }
}
