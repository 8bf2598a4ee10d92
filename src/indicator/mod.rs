mod client;
mod record;

use async_trait::async_trait;
use thiserror::Error;

pub use client::WorldBankClient;
pub use record::{parse_envelope, IndicatorRecord};
#[cfg(test)]
pub use record::Label;

/// Inclusive year range imported for every indicator.
pub const FIRST_YEAR: u16 = 2012;
pub const LAST_YEAR: u16 = 2017;
/// Large enough for every country and year to arrive in a single page.
pub const PAGE_SIZE: u32 = 1000;

#[derive(Debug, Error, PartialEq)]
pub enum FetchError {
    #[error("{0}")]
    Unavailable(String),
    #[error("no records returned")]
    NoData,
}

#[async_trait]
pub trait IndicatorSource: Send + Sync {
    async fn fetch(&self, indicator_id: &str) -> Result<Vec<IndicatorRecord>, FetchError>;
}
