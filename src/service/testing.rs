use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Mutex,
};

use async_trait::async_trait;
use tempfile::TempDir;

use crate::indicator::{FetchError, IndicatorRecord, IndicatorSource, Label};
use crate::storage::SqliteStorage;

pub fn temp_storage(dir: &TempDir) -> SqliteStorage {
    let storage = SqliteStorage::new(dir.path().join("indicators.sqlite"));
    storage.init().unwrap();
    storage
}

pub fn record(indicator_id: &str, country: &str, date: &str, value: Option<f64>) -> IndicatorRecord {
    IndicatorRecord {
        indicator: Label {
            id: Some(indicator_id.to_string()),
            value: format!("{indicator_id} name"),
        },
        country: Label {
            id: None,
            value: country.to_string(),
        },
        date: date.to_string(),
        value,
    }
}

/// In-memory indicator source answering every fetch from a fixed table.
#[derive(Default)]
pub struct StaticSource {
    records: Mutex<Vec<(String, Vec<IndicatorRecord>)>>,
    failure: Option<FetchError>,
    calls: AtomicUsize,
}

impl StaticSource {
    pub fn with_records(indicator_id: &str, records: Vec<IndicatorRecord>) -> Self {
        let source = Self::default();
        source.insert(indicator_id, records);
        source
    }

    pub fn failing(err: FetchError) -> Self {
        Self {
            failure: Some(err),
            ..Self::default()
        }
    }

    pub fn insert(&self, indicator_id: &str, records: Vec<IndicatorRecord>) {
        let mut guard = self.records.lock().unwrap();
        guard.retain(|(id, _)| id != indicator_id);
        guard.push((indicator_id.to_string(), records));
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl IndicatorSource for StaticSource {
    async fn fetch(&self, indicator_id: &str) -> Result<Vec<IndicatorRecord>, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = &self.failure {
            return Err(match err {
                FetchError::Unavailable(msg) => FetchError::Unavailable(msg.clone()),
                FetchError::NoData => FetchError::NoData,
            });
        }
        self.records
            .lock()
            .unwrap()
            .iter()
            .find(|(id, _)| id == indicator_id)
            .map(|(_, records)| records.clone())
            .ok_or(FetchError::NoData)
    }
}
