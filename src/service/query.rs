use crate::error::{ServiceError, ServiceResult};
use crate::storage::{
    Collection, CollectionField, CountryEntry, EntryField, OrderBy, Storage, StorageRead,
    StorageTx, StorageWrite,
};

use super::window::RankWindow;

#[derive(Clone, Debug, PartialEq)]
pub struct CollectionDetail {
    pub collection: Collection,
    pub entries: Vec<CountryEntry>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct RankedEntries {
    pub collection: Collection,
    pub entries: Vec<CountryEntry>,
}

pub fn parse_collection_id(raw: &str) -> ServiceResult<i64> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| ServiceError::InvalidRequest(format!("invalid collection id {raw:?}")))
}

pub fn list_collections<R>(store: &R, order_by: Option<&str>) -> ServiceResult<Vec<Collection>>
where
    R: StorageRead + ?Sized,
{
    let order = OrderBy::<CollectionField>::parse_opt(order_by)?;
    Ok(store.list_collections(&order)?)
}

fn require_collection<R>(store: &R, id: i64) -> ServiceResult<Collection>
where
    R: StorageRead + ?Sized,
{
    store
        .load_collection(id)?
        .ok_or_else(|| ServiceError::NotFound(format!("no data found for collection {id}")))
}

/// Collection with all of its entries, optionally sorted by `order_by`.
pub fn collection_detail<R>(
    store: &R,
    id: i64,
    order_by: Option<&str>,
) -> ServiceResult<CollectionDetail>
where
    R: StorageRead + ?Sized,
{
    let order = OrderBy::<EntryField>::parse_opt(order_by)?;
    let collection = require_collection(store, id)?;
    let entries = store.list_entries(id, &order)?;
    Ok(CollectionDetail {
        collection,
        entries,
    })
}

/// Deleting an unknown id succeeds; the return value tells whether anything was removed.
pub fn delete_collection<S: Storage>(storage: &S, id: i64) -> ServiceResult<bool> {
    let tx = storage.begin_tx()?;
    let removed = tx.delete_collection(id)?;
    tx.commit()?;
    if removed {
        log::info!("🗑️ Removed collection {}", id);
    } else {
        log::debug!("collection {} not present, nothing removed", id);
    }
    Ok(removed)
}

/// Exact, case-sensitive lookup of one country's value for one year.
pub fn country_entry<R>(
    store: &R,
    id: i64,
    year: &str,
    country: &str,
) -> ServiceResult<(Collection, CountryEntry)>
where
    R: StorageRead + ?Sized,
{
    let collection = require_collection(store, id)?;
    let entry = store.load_entry(id, year, country)?.ok_or_else(|| {
        ServiceError::NotFound(format!(
            "no data found for collection {id}, year {year} and country {country}"
        ))
    })?;
    Ok((collection, entry))
}

/// Top or bottom entries of a year. The window is validated before storage is queried.
pub fn ranked_entries<R>(
    store: &R,
    id: i64,
    year: &str,
    query: Option<&str>,
) -> ServiceResult<RankedEntries>
where
    R: StorageRead + ?Sized,
{
    let window = RankWindow::parse(query)?;
    let collection = require_collection(store, id)?;
    let descending = store.list_year_entries_desc(id, year)?;
    Ok(RankedEntries {
        collection,
        entries: window.apply(descending),
    })
}
