use super::{
    collection::{Collection, CountryEntry, NewCollection, NewCountryEntry},
    order::{CollectionField, EntryField, OrderBy},
};

pub trait StorageRead {
    fn list_collections(&self, order: &OrderBy<CollectionField>) -> anyhow::Result<Vec<Collection>>;
    fn load_collection(&self, id: i64) -> anyhow::Result<Option<Collection>>;
    fn find_collection_by_indicator(&self, indicator_id: &str)
        -> anyhow::Result<Option<Collection>>;
    fn list_entries(
        &self,
        collection_id: i64,
        order: &OrderBy<EntryField>,
    ) -> anyhow::Result<Vec<CountryEntry>>;
    fn load_entry(
        &self,
        collection_id: i64,
        date: &str,
        country: &str,
    ) -> anyhow::Result<Option<CountryEntry>>;
    /// Entries of one year, highest value first.
    fn list_year_entries_desc(
        &self,
        collection_id: i64,
        date: &str,
    ) -> anyhow::Result<Vec<CountryEntry>>;
}

pub trait StorageWrite {
    fn insert_collection(&self, collection: &NewCollection) -> anyhow::Result<Collection>;
    fn insert_entries(&self, collection_id: i64, entries: &[NewCountryEntry])
        -> anyhow::Result<usize>;
    /// Removes the collection and every entry it owns. Returns whether a collection existed.
    fn delete_collection(&self, id: i64) -> anyhow::Result<bool>;
}

pub trait StorageTx: StorageRead + StorageWrite {
    fn commit(self) -> anyhow::Result<()>;
}

pub trait Storage: StorageRead {
    type Tx: StorageTx;

    /// Write transaction; dropping it without `commit` rolls everything back.
    fn begin_tx(&self) -> anyhow::Result<Self::Tx>;
    /// Read handle scoped to one request, all reads see the same snapshot.
    fn begin_read(&self) -> anyhow::Result<Self::Tx>;
}
