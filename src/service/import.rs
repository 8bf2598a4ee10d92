use chrono::{SubsecRound, Utc};

use crate::error::{ServiceError, ServiceResult};
use crate::indicator::{IndicatorRecord, IndicatorSource};
use crate::storage::{
    Collection, NewCollection, NewCountryEntry, Storage, StorageRead, StorageTx, StorageWrite,
};

#[derive(Clone, Debug, PartialEq)]
pub struct ImportOutcome {
    pub collection: Collection,
    /// Id of the collection this import superseded, if any.
    pub replaced: Option<i64>,
    pub fetched_records: usize,
    pub stored_entries: usize,
}

/// Fetches `indicator_id` upstream and stores it as a fresh collection, replacing any
/// collection previously imported for the same indicator.
///
/// The delete of the old collection and the inserts of the new one share a single
/// transaction, so a failure leaves the previous state untouched.
pub async fn import_collection<S>(
    storage: &S,
    source: &dyn IndicatorSource,
    indicator_id: Option<&str>,
) -> ServiceResult<ImportOutcome>
where
    S: Storage + Sync,
{
    let indicator_id = indicator_id
        .filter(|id| !id.is_empty())
        .ok_or_else(|| ServiceError::InvalidRequest("indicator id not provided".to_string()))?;

    let records = source
        .fetch(indicator_id)
        .await
        .map_err(|err| ServiceError::from_fetch(indicator_id, err))?;

    let indicator_value = records
        .first()
        .map(|record| record.indicator.value.clone())
        .ok_or_else(|| ServiceError::NoDataFound(indicator_id.to_string()))?;
    let entries = country_entries(&records);

    let tx = storage.begin_tx()?;
    let replaced = match tx.find_collection_by_indicator(indicator_id)? {
        Some(existing) => {
            tx.delete_collection(existing.id)?;
            Some(existing.id)
        }
        None => None,
    };
    let collection = tx.insert_collection(&NewCollection {
        indicator_id: indicator_id.to_string(),
        creation_time: Utc::now().naive_utc().trunc_subsecs(6),
        indicator_value,
    })?;
    let stored_entries = tx.insert_entries(collection.id, &entries)?;
    tx.commit()?;

    match replaced {
        Some(old) => log::info!(
            "📥 Imported {} as collection {} (replaced {}): {} records, {} stored",
            indicator_id,
            collection.id,
            old,
            records.len(),
            stored_entries
        ),
        None => log::info!(
            "📥 Imported {} as collection {}: {} records, {} stored",
            indicator_id,
            collection.id,
            records.len(),
            stored_entries
        ),
    }

    Ok(ImportOutcome {
        collection,
        replaced,
        fetched_records: records.len(),
        stored_entries,
    })
}

/// Records without a value are dropped.
fn country_entries(records: &[IndicatorRecord]) -> Vec<NewCountryEntry> {
    records
        .iter()
        .filter_map(|record| {
            record.value.map(|value| NewCountryEntry {
                country: record.country.value.clone(),
                date: record.date.clone(),
                value,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicator::{FetchError, Label};
    use crate::service::testing::{record, temp_storage, StaticSource};
    use crate::storage::{OrderBy, SqliteStorage};
    use tempfile::TempDir;

    fn entries_of(storage: &SqliteStorage, collection_id: i64) -> Vec<(String, String, f64)> {
        storage
            .list_entries(collection_id, &OrderBy::default())
            .unwrap()
            .into_iter()
            .map(|e| (e.country, e.date, e.value))
            .collect()
    }

    #[tokio::test]
    async fn import_stores_collection_and_skips_null_values() {
        let dir = TempDir::new().unwrap();
        let storage = temp_storage(&dir);
        let source = StaticSource::with_records(
            "NY.GDP.MKTP.CD",
            vec![
                record("NY.GDP.MKTP.CD", "Chile", "2015", Some(2.5)),
                record("NY.GDP.MKTP.CD", "Peru", "2015", None),
                record("NY.GDP.MKTP.CD", "Brazil", "2016", Some(9.0)),
            ],
        );

        let outcome = import_collection(&storage, &source, Some("NY.GDP.MKTP.CD"))
            .await
            .unwrap();

        assert_eq!(outcome.collection.indicator_id, "NY.GDP.MKTP.CD");
        assert_eq!(outcome.collection.indicator_value, "NY.GDP.MKTP.CD name");
        assert_eq!(outcome.replaced, None);
        assert_eq!(outcome.fetched_records, 3);
        assert_eq!(outcome.stored_entries, 2);
        assert_eq!(
            entries_of(&storage, outcome.collection.id),
            vec![
                ("Chile".to_string(), "2015".to_string(), 2.5),
                ("Brazil".to_string(), "2016".to_string(), 9.0),
            ]
        );
    }

    #[tokio::test]
    async fn indicator_name_comes_from_first_record() {
        let dir = TempDir::new().unwrap();
        let storage = temp_storage(&dir);
        let mut first = record("SP.POP.TOTL", "Chile", "2015", None);
        first.indicator = Label {
            id: Some("SP.POP.TOTL".to_string()),
            value: "Population, total".to_string(),
        };
        let source = StaticSource::with_records(
            "SP.POP.TOTL",
            vec![first, record("SP.POP.TOTL", "Peru", "2015", Some(1.0))],
        );

        let outcome = import_collection(&storage, &source, Some("SP.POP.TOTL"))
            .await
            .unwrap();
        assert_eq!(outcome.collection.indicator_value, "Population, total");
    }

    #[tokio::test]
    async fn reimport_replaces_previous_collection() {
        let dir = TempDir::new().unwrap();
        let storage = temp_storage(&dir);
        let first = StaticSource::with_records(
            "SP.POP.TOTL",
            vec![
                record("SP.POP.TOTL", "Chile", "2015", Some(1.0)),
                record("SP.POP.TOTL", "Peru", "2015", Some(2.0)),
            ],
        );
        let second = StaticSource::with_records(
            "SP.POP.TOTL",
            vec![record("SP.POP.TOTL", "Uruguay", "2016", Some(3.0))],
        );

        let old = import_collection(&storage, &first, Some("SP.POP.TOTL"))
            .await
            .unwrap();
        let new = import_collection(&storage, &second, Some("SP.POP.TOTL"))
            .await
            .unwrap();

        assert_eq!(new.replaced, Some(old.collection.id));
        assert_ne!(new.collection.id, old.collection.id);

        let all = storage.list_collections(&OrderBy::default()).unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].id, new.collection.id);
        assert!(entries_of(&storage, old.collection.id).is_empty());
        assert_eq!(
            entries_of(&storage, new.collection.id),
            vec![("Uruguay".to_string(), "2016".to_string(), 3.0)]
        );
    }

    #[tokio::test]
    async fn missing_indicator_id_is_rejected_without_fetching() {
        let dir = TempDir::new().unwrap();
        let storage = temp_storage(&dir);
        let source = StaticSource::failing(FetchError::Unavailable("must not be called".into()));

        for id in [None, Some("")] {
            let err = import_collection(&storage, &source, id).await.unwrap_err();
            assert!(matches!(err, ServiceError::InvalidRequest(_)), "{err:?}");
        }
        assert_eq!(source.calls(), 0);
    }

    #[tokio::test]
    async fn no_data_leaves_storage_untouched() {
        let dir = TempDir::new().unwrap();
        let storage = temp_storage(&dir);
        let seeded = StaticSource::with_records(
            "SP.POP.TOTL",
            vec![record("SP.POP.TOTL", "Chile", "2015", Some(1.0))],
        );
        let before = import_collection(&storage, &seeded, Some("SP.POP.TOTL"))
            .await
            .unwrap();

        let empty = StaticSource::failing(FetchError::NoData);
        let err = import_collection(&storage, &empty, Some("SP.POP.TOTL"))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::NoDataFound(ref id) if id == "SP.POP.TOTL"));

        let all = storage.list_collections(&OrderBy::default()).unwrap();
        assert_eq!(all, vec![before.collection.clone()]);
        assert_eq!(entries_of(&storage, before.collection.id).len(), 1);
    }

    #[tokio::test]
    async fn upstream_failure_is_reported() {
        let dir = TempDir::new().unwrap();
        let storage = temp_storage(&dir);
        let source = StaticSource::failing(FetchError::Unavailable("connection refused".into()));

        let err = import_collection(&storage, &source, Some("SP.POP.TOTL"))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::UpstreamUnavailable(ref msg) if msg == "connection refused"));
        assert!(storage.list_collections(&OrderBy::default()).unwrap().is_empty());
    }
}
