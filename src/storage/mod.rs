mod collection;
pub mod order;
pub mod sqlite;
pub mod traits;

pub use collection::{
    format_creation_time, Collection, CountryEntry, NewCollection, NewCountryEntry,
};
pub use order::{CollectionField, EntryField, OrderBy};
pub use sqlite::SqliteStorage;
pub use traits::{Storage, StorageRead, StorageTx, StorageWrite};
