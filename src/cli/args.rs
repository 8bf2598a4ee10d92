use clap::Parser;
use std::env;

use crate::cli::command::Command;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Import World Bank indicators into SQLite and serve them over REST",
    long_about = "Downloads country values for a World Bank indicator (2012-2017), stores them as a collection in a local SQLite database and exposes the collections through a small REST API. Without a subcommand the REST server runs until Ctrl-C.",
    subcommand_required = false,
    arg_required_else_help = false
)]
pub struct Cli {
    #[arg(
        long,
        env = "INDICATORS_DATA_DIR",
        default_value = ".indicators/",
        value_name = "DIR",
        help = "Directory to store persistent data"
    )]
    pub data_dir: String,

    #[arg(
        long,
        default_value_t = false,
        help = "Reset all persisted state (delete the SQLite database) before starting"
    )]
    pub reset: bool,

    #[arg(
        long = "api-listen",
        env = "INDICATORS_API_LISTEN",
        value_name = "ADDR",
        default_value = "127.0.0.1:5000",
        help = "REST API listen address (host:port)"
    )]
    pub api_listen: std::net::SocketAddr,

    #[arg(
        long = "upstream-url",
        env = "INDICATORS_UPSTREAM_URL",
        value_name = "URL",
        default_value = "http://api.worldbank.org/v2",
        help = "Base URL of the World Bank indicator API"
    )]
    pub upstream_url: String,

    #[arg(
        long = "upstream-timeout",
        env = "INDICATORS_UPSTREAM_TIMEOUT",
        value_name = "SECS",
        default_value_t = 30u64,
        help = "Timeout in seconds for a single indicator download"
    )]
    pub upstream_timeout: u64,

    #[arg(
        long = "log-file",
        env = "INDICATORS_LOG_FILE",
        value_name = "PATH",
        help = "Write logs to PATH (in addition to stderr)"
    )]
    pub log_file: Option<String>,

    #[command(subcommand)]
    pub cmd: Option<Command>,
}

pub fn parse() -> Cli {
    let dotenv_path = env::var("DOTENV_PATH").unwrap_or(".env".into());
    dotenvy::from_filename(&dotenv_path).ok();
    Cli::parse()
}
