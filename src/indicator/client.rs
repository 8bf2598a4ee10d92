use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use url::Url;

use super::{parse_envelope, FetchError, IndicatorRecord, IndicatorSource};
use super::{FIRST_YEAR, LAST_YEAR, PAGE_SIZE};

/// HTTP client for the World Bank indicator API (`/v2/countries/all/indicators/{id}`).
#[derive(Clone, Debug)]
pub struct WorldBankClient {
    http: Client,
    base_url: Url,
}

impl WorldBankClient {
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self> {
        if base_url.cannot_be_a_base() {
            anyhow::bail!("upstream url {base_url} cannot be used as a base url");
        }
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .context("building upstream HTTP client")?;
        Ok(Self { http, base_url })
    }

    pub fn indicator_url(&self, indicator_id: &str) -> Result<Url, FetchError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                FetchError::Unavailable(format!("invalid upstream base url {}", self.base_url))
            })?
            .pop_if_empty()
            .extend(["countries", "all", "indicators", indicator_id]);
        url.set_query(Some(&format!(
            "date={FIRST_YEAR}:{LAST_YEAR}&format=json&per_page={PAGE_SIZE}"
        )));
        Ok(url)
    }
}

#[async_trait]
impl IndicatorSource for WorldBankClient {
    async fn fetch(&self, indicator_id: &str) -> Result<Vec<IndicatorRecord>, FetchError> {
        let url = self.indicator_url(indicator_id)?;
        log::debug!("fetching {}", url);

        let response = self
            .http
            .get(url.clone())
            .send()
            .await
            .map_err(|err| FetchError::Unavailable(format!("request to {url} failed: {err}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Unavailable(format!(
                "{url} answered with status {status}"
            )));
        }

        let body = response.bytes().await.map_err(|err| {
            FetchError::Unavailable(format!("reading response from {url} failed: {err}"))
        })?;
        parse_envelope(&body)
    }
}
