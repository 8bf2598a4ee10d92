use std::io::Write;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::cli::Command;
use crate::indicator::IndicatorSource;
use crate::rest::models::{CollectionSummary, DeleteResponse};
use crate::service;
use crate::storage::Storage;

#[derive(Serialize)]
struct ImportReport {
    #[serde(flatten)]
    collection: CollectionSummary,
    replaced: Option<i64>,
    fetched_records: usize,
    stored_entries: usize,
}

impl Command {
    pub async fn run<S, W>(&self, storage: &S, source: &dyn IndicatorSource, out: &mut W) -> Result<()>
    where
        S: Storage + Sync,
        W: Write,
    {
        match self {
            Command::Import { indicator_id } => {
                let outcome =
                    service::import_collection(storage, source, Some(indicator_id.as_str()))
                        .await?;
                let report = ImportReport {
                    collection: CollectionSummary::from(&outcome.collection),
                    replaced: outcome.replaced,
                    fetched_records: outcome.fetched_records,
                    stored_entries: outcome.stored_entries,
                };
                print_json(out, &report)
            }
            Command::List { order_by } => {
                let store = storage.begin_read()?;
                let collections = service::list_collections(&store, order_by.as_deref())?;
                let summaries: Vec<CollectionSummary> =
                    collections.iter().map(CollectionSummary::from).collect();
                print_json(out, &summaries)
            }
            Command::Delete { id } => {
                service::delete_collection(storage, *id)?;
                print_json(
                    out,
                    &DeleteResponse {
                        message: format!("The collection {} was removed from the database!", id),
                        id: *id,
                    },
                )
            }
        }
    }
}

fn print_json<W: Write, T: Serialize>(out: &mut W, value: &T) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, value).context("serializing command output")?;
    writeln!(out)?;
    Ok(())
}
