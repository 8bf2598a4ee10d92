//! Import and query operations over stored indicator collections.
//!
//! Every operation takes its storage handle explicitly; HTTP handlers and one-shot
//! commands share these functions.

mod import;
mod query;
#[cfg(test)]
pub(crate) mod testing;
mod window;

pub use import::import_collection;
pub use query::{
    collection_detail, country_entry, delete_collection, list_collections, parse_collection_id,
    ranked_entries,
};
