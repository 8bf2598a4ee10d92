use serde::Deserialize;
use serde_json::Value;

use super::FetchError;

/// `{"id": "...", "value": "..."}` pairs used by the upstream for indicators and countries.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct Label {
    #[serde(default)]
    pub id: Option<String>,
    pub value: String,
}

/// One country/year observation as returned by the indicator API.
#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct IndicatorRecord {
    pub indicator: Label,
    pub country: Label,
    pub date: String,
    pub value: Option<f64>,
}

/// Decodes the `[metadata, records]` envelope.
///
/// Anything that is not JSON counts as an upstream failure. A JSON document without a
/// usable second element (error envelopes are a single-element array) means no data.
pub fn parse_envelope(body: &[u8]) -> Result<Vec<IndicatorRecord>, FetchError> {
    let document: Value = serde_json::from_slice(body)
        .map_err(|err| FetchError::Unavailable(format!("response is not valid JSON: {err}")))?;

    let data = match document {
        Value::Array(items) if items.len() >= 2 => items.into_iter().nth(1),
        _ => None,
    };

    let records: Vec<IndicatorRecord> = match data {
        None | Some(Value::Null) => return Err(FetchError::NoData),
        Some(data) => serde_json::from_value(data).map_err(|err| {
            FetchError::Unavailable(format!("unexpected record layout: {err}"))
        })?,
    };

    if records.is_empty() {
        return Err(FetchError::NoData);
    }
    Ok(records)
}
