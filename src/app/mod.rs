mod wiring;

use crate::{cli, context, indicator, rest, storage};
use anyhow::{Context as AnyhowContext, Result};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

pub struct App {
    pub ctx: context::Context,
    pub storage: storage::SqliteStorage,
    pub source: Arc<dyn indicator::IndicatorSource>,
}

impl App {
    pub fn from_cli() -> Result<(Self, cli::Cli)> {
        let cli = crate::cli::parse();
        let ctx = context::Context::from_cli(&cli)?;

        crate::tracing::init(ctx.log_file.as_deref());
        log::info!("🚀 Starting indicators");
        log::info!("🔗 Indicator API URL: {}", ctx.upstream_url);
        log::info!("📂 Data dir: {}", ctx.data_dir.display());

        wiring::init_data_dir(&ctx).context("initializing data dir")?;
        let storage = wiring::init_storage(&ctx)?;
        let source = wiring::build_source(&ctx)?;

        Ok((
            Self {
                ctx,
                storage,
                source,
            },
            cli,
        ))
    }
}

pub async fn run_daemon(app: App) -> Result<()> {
    log::info!("🌐 REST API: http://{}", app.ctx.api_listen);
    log::info!("⏱️ Upstream timeout: {:?}", app.ctx.upstream_timeout);
    if let Some(path) = app.ctx.log_file.as_deref() {
        log::info!("📝 Log file: {}", path.display());
    }

    let shutdown = CancellationToken::new();

    let api_addr = app.ctx.api_listen;
    let state = rest::AppState::new(app.storage.clone(), app.source.clone());
    let rest_shutdown = shutdown.clone();

    let mut rest_handle =
        tokio::spawn(async move { rest::serve(api_addr, state, rest_shutdown).await });

    let early_exit = tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            log::info!("🧨 Ctrl-C received, shutting down");
            None
        }
        result = &mut rest_handle => Some(result),
    };

    shutdown.cancel();
    let result = match early_exit {
        Some(result) => result,
        None => rest_handle.await,
    };

    match result {
        Ok(Ok(())) => {}
        Ok(Err(e)) => {
            log::error!("REST server error: {:#}", e);
            return Err(e);
        }
        Err(e) => {
            log::error!("REST task failed: {}", e);
            return Err(e.into());
        }
    }

    log::info!("✅ Shutdown complete");
    Ok(())
}

pub async fn run() -> Result<()> {
    let (app, cli) = App::from_cli()?;

    if let Some(cmd) = &cli.cmd {
        // one-shot command mode
        let mut stdout = std::io::stdout().lock();
        cmd.run(&app.storage, app.source.as_ref(), &mut stdout).await?;
        return Ok(());
    }

    run_daemon(app).await
}
