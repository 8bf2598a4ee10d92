use std::{net::SocketAddr, path::PathBuf, time::Duration};

use anyhow::{Context as AnyhowContext, Result};
use url::Url;

pub const DB_FILE_NAME: &str = "indicators.sqlite";

pub struct Context {
    pub data_dir: PathBuf,
    pub reset: bool,
    pub api_listen: SocketAddr,
    pub upstream_url: Url,
    pub upstream_timeout: Duration,
    pub log_file: Option<PathBuf>,
}

impl Context {
    pub fn from_cli(cli: &crate::cli::Cli) -> Result<Self> {
        let upstream_url = Url::parse(&cli.upstream_url)
            .with_context(|| format!("invalid upstream url {}", cli.upstream_url))?;
        Ok(Self {
            data_dir: PathBuf::from(&cli.data_dir),
            reset: cli.reset,
            api_listen: cli.api_listen,
            upstream_url,
            upstream_timeout: Duration::from_secs(cli.upstream_timeout),
            log_file: cli.log_file.as_ref().map(PathBuf::from),
        })
    }

    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join(DB_FILE_NAME)
    }
}
