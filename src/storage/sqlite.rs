use anyhow::Result;
use rusqlite::{params, types::Type, Connection, OptionalExtension};
use std::path::Path;

use super::{
    collection::{
        format_creation_time, parse_creation_time, Collection, CountryEntry, NewCollection,
        NewCountryEntry,
    },
    order::{CollectionField, EntryField, OrderBy},
    traits::{Storage, StorageRead, StorageTx, StorageWrite},
};

const DB_SCHEMA_VERSION: i64 = 1;

const COLLECTION_COLUMNS: &str = "id, indicator, creation_time, indicator_value";
const ENTRY_COLUMNS: &str = "id, country, date, value, collection_id";

#[derive(Clone)]
pub struct SqliteStorage {
    pub path: String,
}

pub struct SqliteTx {
    conn: Connection,
}

impl StorageTx for SqliteTx {
    fn commit(self) -> Result<()> {
        self.conn.execute("COMMIT", [])?;
        Ok(())
    }
}

fn map_collection_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Collection> {
    let creation_time_str: String = row.get(2)?;
    let creation_time = parse_creation_time(&creation_time_str)
        .map_err(|err| rusqlite::Error::FromSqlConversionFailure(2, Type::Text, Box::new(err)))?;
    Ok(Collection {
        id: row.get(0)?,
        indicator_id: row.get(1)?,
        creation_time,
        indicator_value: row.get(3)?,
    })
}

fn map_entry_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<CountryEntry> {
    Ok(CountryEntry {
        id: row.get(0)?,
        country: row.get(1)?,
        date: row.get(2)?,
        value: row.get(3)?,
        collection_id: row.get(4)?,
    })
}

fn db_list_collections(
    conn: &Connection,
    order: &OrderBy<CollectionField>,
) -> rusqlite::Result<Vec<Collection>> {
    let sql = format!(
        "SELECT {COLLECTION_COLUMNS} FROM collections{}",
        order.sql_clause()
    );
    let mut stmt = conn.prepare(&sql)?;
    let mapped = stmt
        .query_map([], map_collection_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(mapped)
}

fn db_load_collection(conn: &Connection, id: i64) -> rusqlite::Result<Option<Collection>> {
    conn.query_row(
        &format!("SELECT {COLLECTION_COLUMNS} FROM collections WHERE id = ?1"),
        params![id],
        map_collection_row,
    )
    .optional()
}

fn db_find_collection_by_indicator(
    conn: &Connection,
    indicator_id: &str,
) -> rusqlite::Result<Option<Collection>> {
    conn.query_row(
        &format!("SELECT {COLLECTION_COLUMNS} FROM collections WHERE indicator = ?1"),
        params![indicator_id],
        map_collection_row,
    )
    .optional()
}

fn db_list_entries(
    conn: &Connection,
    collection_id: i64,
    order: &OrderBy<EntryField>,
) -> rusqlite::Result<Vec<CountryEntry>> {
    let sql = format!(
        "SELECT {ENTRY_COLUMNS} FROM countries WHERE collection_id = ?1{}",
        order.sql_clause()
    );
    let mut stmt = conn.prepare(&sql)?;
    let mapped = stmt
        .query_map(params![collection_id], map_entry_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(mapped)
}

fn db_load_entry(
    conn: &Connection,
    collection_id: i64,
    date: &str,
    country: &str,
) -> rusqlite::Result<Option<CountryEntry>> {
    conn.query_row(
        &format!(
            "SELECT {ENTRY_COLUMNS} FROM countries \
             WHERE collection_id = ?1 AND date = ?2 AND country = ?3 \
             ORDER BY id LIMIT 1"
        ),
        params![collection_id, date, country],
        map_entry_row,
    )
    .optional()
}

fn db_list_year_entries_desc(
    conn: &Connection,
    collection_id: i64,
    date: &str,
) -> rusqlite::Result<Vec<CountryEntry>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {ENTRY_COLUMNS} FROM countries \
         WHERE collection_id = ?1 AND date = ?2 \
         ORDER BY value DESC, id ASC"
    ))?;
    let mapped = stmt
        .query_map(params![collection_id, date], map_entry_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(mapped)
}

fn db_insert_collection(
    conn: &Connection,
    collection: &NewCollection,
) -> rusqlite::Result<Collection> {
    conn.execute(
        "INSERT INTO collections (indicator, creation_time, indicator_value) VALUES (?1, ?2, ?3)",
        params![
            collection.indicator_id,
            format_creation_time(&collection.creation_time),
            collection.indicator_value
        ],
    )?;
    Ok(Collection {
        id: conn.last_insert_rowid(),
        indicator_id: collection.indicator_id.clone(),
        creation_time: collection.creation_time,
        indicator_value: collection.indicator_value.clone(),
    })
}

fn db_insert_entries(
    conn: &Connection,
    collection_id: i64,
    entries: &[NewCountryEntry],
) -> rusqlite::Result<usize> {
    let mut stmt = conn.prepare_cached(
        "INSERT INTO countries (country, date, value, collection_id) VALUES (?1, ?2, ?3, ?4)",
    )?;
    let mut inserted = 0;
    for entry in entries {
        inserted += stmt.execute(params![entry.country, entry.date, entry.value, collection_id])?;
    }
    Ok(inserted)
}

fn db_delete_collection(conn: &Connection, id: i64) -> rusqlite::Result<bool> {
    conn.execute("DELETE FROM countries WHERE collection_id = ?1", params![id])?;
    let removed = conn.execute("DELETE FROM collections WHERE id = ?1", params![id])?;
    Ok(removed > 0)
}

impl StorageRead for SqliteTx {
    fn list_collections(&self, order: &OrderBy<CollectionField>) -> Result<Vec<Collection>> {
        Ok(db_list_collections(&self.conn, order)?)
    }

    fn load_collection(&self, id: i64) -> Result<Option<Collection>> {
        Ok(db_load_collection(&self.conn, id)?)
    }

    fn find_collection_by_indicator(&self, indicator_id: &str) -> Result<Option<Collection>> {
        Ok(db_find_collection_by_indicator(&self.conn, indicator_id)?)
    }

    fn list_entries(
        &self,
        collection_id: i64,
        order: &OrderBy<EntryField>,
    ) -> Result<Vec<CountryEntry>> {
        Ok(db_list_entries(&self.conn, collection_id, order)?)
    }

    fn load_entry(
        &self,
        collection_id: i64,
        date: &str,
        country: &str,
    ) -> Result<Option<CountryEntry>> {
        Ok(db_load_entry(&self.conn, collection_id, date, country)?)
    }

    fn list_year_entries_desc(&self, collection_id: i64, date: &str) -> Result<Vec<CountryEntry>> {
        Ok(db_list_year_entries_desc(&self.conn, collection_id, date)?)
    }
}

impl StorageWrite for SqliteTx {
    fn insert_collection(&self, collection: &NewCollection) -> Result<Collection> {
        Ok(db_insert_collection(&self.conn, collection)?)
    }

    fn insert_entries(&self, collection_id: i64, entries: &[NewCountryEntry]) -> Result<usize> {
        Ok(db_insert_entries(&self.conn, collection_id, entries)?)
    }

    fn delete_collection(&self, id: i64) -> Result<bool> {
        Ok(db_delete_collection(&self.conn, id)?)
    }
}

impl Storage for SqliteStorage {
    type Tx = SqliteTx;

    fn begin_tx(&self) -> Result<Self::Tx> {
        let conn = self.open()?;
        conn.execute("BEGIN IMMEDIATE", [])?;
        Ok(SqliteTx { conn })
    }

    fn begin_read(&self) -> Result<Self::Tx> {
        let conn = self.open()?;
        conn.execute("BEGIN DEFERRED", [])?;
        Ok(SqliteTx { conn })
    }
}

impl SqliteStorage {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_string_lossy().to_string(),
        }
    }

    pub fn reset_all(&self) -> Result<()> {
        for suffix in ["", "-wal", "-shm"] {
            let path = format!("{}{}", self.path, suffix);
            if std::path::Path::new(&path).exists() {
                std::fs::remove_file(&path)?;
            }
        }
        Ok(())
    }

    pub fn init(&self) -> Result<()> {
        self.with_conn(|_conn| Ok(()))?;
        Ok(())
    }

    fn with_conn<F, T>(&self, f: F) -> rusqlite::Result<T>
    where
        F: FnOnce(&Connection) -> rusqlite::Result<T>,
    {
        let conn = self.open()?;
        f(&conn)
    }

    fn open(&self) -> rusqlite::Result<Connection> {
        let conn = Connection::open(&self.path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;
        conn.busy_timeout(std::time::Duration::from_millis(500))?;

        Self::migrate(&conn)?;
        Ok(conn)
    }

    fn migrate(conn: &Connection) -> rusqlite::Result<()> {
        let version: i64 = conn.query_row("PRAGMA user_version", [], |row| row.get(0))?;

        if version == DB_SCHEMA_VERSION {
            return Ok(());
        }

        if version == 0 {
            log::info!(
                "SQLite schema migration: {} -> {}",
                version,
                DB_SCHEMA_VERSION
            );
            conn.execute_batch(
                r#"
            CREATE TABLE IF NOT EXISTS collections (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                indicator TEXT NOT NULL UNIQUE,
                creation_time TEXT NOT NULL,
                indicator_value TEXT NOT NULL
            );
            CREATE TABLE IF NOT EXISTS countries (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                country TEXT NOT NULL,
                date TEXT NOT NULL,
                value REAL NOT NULL,
                collection_id INTEGER NOT NULL
            );
            CREATE INDEX IF NOT EXISTS countries_collection_date_idx
                ON countries(collection_id, date);
        "#,
            )?;
            conn.pragma_update(None, "user_version", DB_SCHEMA_VERSION)?;
            return Ok(());
        }

        Err(rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error::new(rusqlite::ffi::ErrorCode::SchemaChanged as i32),
            Some("database schema version mismatch; please run with --reset option".to_string()),
        ))
    }
}

impl StorageRead for SqliteStorage {
    fn list_collections(&self, order: &OrderBy<CollectionField>) -> Result<Vec<Collection>> {
        Ok(self.with_conn(|conn| db_list_collections(conn, order))?)
    }

    fn load_collection(&self, id: i64) -> Result<Option<Collection>> {
        Ok(self.with_conn(|conn| db_load_collection(conn, id))?)
    }

    fn find_collection_by_indicator(&self, indicator_id: &str) -> Result<Option<Collection>> {
        Ok(self.with_conn(|conn| db_find_collection_by_indicator(conn, indicator_id))?)
    }

    fn list_entries(
        &self,
        collection_id: i64,
        order: &OrderBy<EntryField>,
    ) -> Result<Vec<CountryEntry>> {
        Ok(self.with_conn(|conn| db_list_entries(conn, collection_id, order))?)
    }

    fn load_entry(
        &self,
        collection_id: i64,
        date: &str,
        country: &str,
    ) -> Result<Option<CountryEntry>> {
        Ok(self.with_conn(|conn| db_load_entry(conn, collection_id, date, country))?)
    }

    fn list_year_entries_desc(&self, collection_id: i64, date: &str) -> Result<Vec<CountryEntry>> {
        Ok(self.with_conn(|conn| db_list_year_entries_desc(conn, collection_id, date))?)
    }
}
