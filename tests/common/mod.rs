#![allow(dead_code)]

use std::net::TcpListener;
use std::process::Command as ProcCommand;

use axum::{extract::Path, routing::get, Json, Router};
use serde_json::{json, Value};
use tempfile::TempDir;

pub const POPULATION: &str = "SP.POP.TOTL";

fn observation(country: &str, date: &str, value: Option<f64>) -> Value {
    json!({
        "indicator": {"id": POPULATION, "value": "Population, total"},
        "country": {"id": &country[..2].to_uppercase(), "value": country},
        "countryiso3code": "",
        "date": date,
        "value": value,
        "unit": "",
        "obs_status": "",
        "decimal": 0
    })
}

async fn indicator(Path(id): Path<String>) -> Json<Value> {
    if id != POPULATION {
        return Json(json!([{"message": [{
            "id": "120",
            "key": "Invalid value",
            "value": "The provided parameter value is not valid"
        }]}]));
    }
    Json(json!([
        {"page": 1, "pages": 1, "per_page": 1000, "total": 5},
        [
            observation("Chile", "2015", Some(17_870_000.0)),
            observation("Peru", "2015", Some(31_380_000.0)),
            observation("Brazil", "2015", Some(204_470_000.0)),
            observation("Uruguay", "2015", Some(3_410_000.0)),
            observation("Bolivia", "2015", None)
        ]
    ]))
}

/// Serves a canned World Bank API on a background thread and returns its base URL.
pub fn spawn_upstream() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind upstream");
    let addr = listener.local_addr().expect("upstream addr");
    listener.set_nonblocking(true).expect("nonblocking upstream");

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .expect("upstream runtime");
        rt.block_on(async move {
            let listener = tokio::net::TcpListener::from_std(listener).expect("tokio listener");
            let app = Router::new().route("/v2/countries/all/indicators/:id", get(indicator));
            axum::serve(listener, app).await.expect("serve upstream");
        });
    });

    format!("http://{addr}/v2")
}

pub fn free_port() -> u16 {
    TcpListener::bind("127.0.0.1:0")
        .expect("bind free port")
        .local_addr()
        .expect("local addr")
        .port()
}

/// Runs the binary with `DOTENV_PATH` pointing at `dotenv_path` and no upstream flag.
pub fn dotenv_cmd(dotenv_path: &std::path::Path, data_dir: &TempDir) -> ProcCommand {
    let mut command = ProcCommand::new(env!("CARGO_BIN_EXE_indicators"));

    command
        .env("DOTENV_PATH", dotenv_path)
        .env_remove("INDICATORS_UPSTREAM_URL")
        .env("RUST_LOG", "warn")
        .arg("--data-dir")
        .arg(data_dir.path());

    command
}

pub fn base_cmd(upstream_url: &str, data_dir: &TempDir) -> ProcCommand {
    let mut command = dotenv_cmd(&data_dir.path().join("missing.env"), data_dir);

    command
        .arg("--upstream-url")
        .arg(upstream_url)
        .arg("--upstream-timeout")
        .arg("5");

    command
}
