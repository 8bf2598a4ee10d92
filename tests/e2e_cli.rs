use serde_json::Value;
use tempfile::TempDir;

mod common;

fn run_json(command: &mut std::process::Command) -> Value {
    let output = command.output().expect("run indicators");
    assert!(output.status.success(), "{:?}", output);
    serde_json::from_slice(&output.stdout).expect("json output")
}

#[test]
fn e2e_import_list_delete() {
    let upstream = common::spawn_upstream();
    let data_dir = TempDir::new().expect("temp dir");

    let imported = run_json(
        common::base_cmd(&upstream, &data_dir)
            .arg("import")
            .arg("--indicator-id")
            .arg(common::POPULATION),
    );
    assert_eq!(imported["indicator_id"], common::POPULATION);
    assert_eq!(imported["fetched_records"], 5);
    assert_eq!(imported["stored_entries"], 4);
    let first_id = imported["id"].as_i64().expect("id");

    let reimported = run_json(
        common::base_cmd(&upstream, &data_dir)
            .arg("import")
            .arg("--indicator-id")
            .arg(common::POPULATION),
    );
    assert_eq!(reimported["replaced"], first_id);
    let id = reimported["id"].as_i64().expect("id");
    assert_ne!(id, first_id);

    let listed = run_json(common::base_cmd(&upstream, &data_dir).arg("list"));
    let listed = listed.as_array().expect("array");
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["uri"], format!("/collections/{id}"));

    let deleted = run_json(
        common::base_cmd(&upstream, &data_dir)
            .arg("delete")
            .arg("--id")
            .arg(id.to_string()),
    );
    assert_eq!(
        deleted["message"],
        format!("The collection {id} was removed from the database!")
    );

    let listed = run_json(common::base_cmd(&upstream, &data_dir).arg("list"));
    assert!(listed.as_array().expect("array").is_empty());
}

#[test]
fn e2e_import_unknown_indicator_fails() {
    let upstream = common::spawn_upstream();
    let data_dir = TempDir::new().expect("temp dir");

    let output = common::base_cmd(&upstream, &data_dir)
        .arg("import")
        .arg("--indicator-id")
        .arg("NOT.AN.INDICATOR")
        .output()
        .expect("run indicators");
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("no country data found for indicator NOT.AN.INDICATOR"),
        "{stderr}"
    );
}

#[test]
fn e2e_reset_clears_collections() {
    let upstream = common::spawn_upstream();
    let data_dir = TempDir::new().expect("temp dir");

    run_json(
        common::base_cmd(&upstream, &data_dir)
            .arg("import")
            .arg("--indicator-id")
            .arg(common::POPULATION),
    );
    let listed = run_json(common::base_cmd(&upstream, &data_dir).arg("--reset").arg("list"));
    assert!(listed.as_array().expect("array").is_empty());
}

#[test]
fn e2e_dotenv_file_configures_upstream() {
    let upstream = common::spawn_upstream();
    let data_dir = TempDir::new().expect("temp dir");
    let dotenv_path = data_dir.path().join("indicators.env");
    std::fs::write(
        &dotenv_path,
        format!("INDICATORS_UPSTREAM_URL={upstream}\nINDICATORS_UPSTREAM_TIMEOUT=5\n"),
    )
    .expect("write dotenv");

    let imported = run_json(
        common::dotenv_cmd(&dotenv_path, &data_dir)
            .arg("import")
            .arg("--indicator-id")
            .arg(common::POPULATION),
    );
    assert_eq!(imported["indicator_id"], common::POPULATION);
    assert_eq!(imported["stored_entries"], 4);
}

#[test]
fn e2e_missing_dotenv_file_is_ignored() {
    let data_dir = TempDir::new().expect("temp dir");
    let missing = data_dir.path().join("does-not-exist.env");
    assert!(!missing.exists());

    let listed = run_json(common::dotenv_cmd(&missing, &data_dir).arg("list"));
    assert!(listed.as_array().expect("array").is_empty());
}
