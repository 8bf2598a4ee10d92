use serde::{Deserialize, Serialize};

use crate::storage::{format_creation_time, Collection, CountryEntry};

#[derive(Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub uptime_secs: u64,
}

#[derive(Serialize, Deserialize)]
pub struct ErrorResponse {
    pub message: String,
}

#[derive(Deserialize)]
pub struct ImportParams {
    pub indicator_id: Option<String>,
}

#[derive(Deserialize)]
pub struct OrderParams {
    pub order_by: Option<String>,
}

#[derive(Deserialize)]
pub struct RankParams {
    pub query: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CollectionSummary {
    pub uri: String,
    pub id: i64,
    pub creation_time: String,
    pub indicator_id: String,
}

impl From<&Collection> for CollectionSummary {
    fn from(collection: &Collection) -> Self {
        Self {
            uri: collection.uri(),
            id: collection.id,
            creation_time: format_creation_time(&collection.creation_time),
            indicator_id: collection.indicator_id.clone(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct EntryResponse {
    pub country: String,
    pub date: String,
    pub value: f64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CollectionDetailResponse {
    pub id: i64,
    pub indicator_id: String,
    pub indicator_value: String,
    pub creation_time: String,
    pub entries: Vec<EntryResponse>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub message: String,
    pub id: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CountryValueResponse {
    pub id: i64,
    pub indicator: String,
    pub country: String,
    pub date: String,
    pub value: f64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RankedEntryResponse {
    pub country: String,
    pub value: f64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RankedResponse {
    pub indicator_value: String,
    pub indicator: String,
    pub entries: Vec<RankedEntryResponse>,
}

impl From<CountryEntry> for EntryResponse {
    fn from(entry: CountryEntry) -> Self {
        Self {
            country: entry.country,
            date: entry.date,
            value: entry.value,
        }
    }
}

impl From<CountryEntry> for RankedEntryResponse {
    fn from(entry: CountryEntry) -> Self {
        Self {
            country: entry.country,
            value: entry.value,
        }
    }
}
