use std::sync::Arc;

use crate::{context, indicator, storage};
use anyhow::{Context, Result};

pub fn init_data_dir(ctx: &context::Context) -> Result<()> {
    std::fs::create_dir_all(&ctx.data_dir)?;
    Ok(())
}

pub fn init_storage(ctx: &context::Context) -> Result<storage::SqliteStorage> {
    let sqlite = storage::SqliteStorage::new(ctx.db_path());
    if ctx.reset {
        sqlite.reset_all().context("resetting storage")?;
        log::info!("🧹 Storage reset");
    }
    sqlite.init().context("initializing storage")?;
    Ok(sqlite)
}

pub fn build_source(ctx: &context::Context) -> Result<Arc<dyn indicator::IndicatorSource>> {
    let client = indicator::WorldBankClient::new(ctx.upstream_url.clone(), ctx.upstream_timeout)
        .context("failed to create indicator API client")?;
    Ok(Arc::new(client))
}
