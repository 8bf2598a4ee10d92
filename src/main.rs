mod app;
mod cli;
mod commands;
mod context;
mod error;
mod indicator;
mod rest;
mod service;
mod storage;
mod tracing;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    app::run().await
}
