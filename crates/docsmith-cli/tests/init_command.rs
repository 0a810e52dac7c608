use assert_cmd::Command;
use predicates::str::contains;
use tempfile::TempDir;

#[test]
fn init_creates_seeded_workspace() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    let target = temp.path().join("workspace");

    let mut cmd = cli();
    cmd.args(["init", target.to_str().unwrap()]);

    cmd.assert()
        .success()
        .stdout(contains("Initialized workspace at"))
        .stdout(contains("sample docs"));

    assert!(target.join(".docsmith").is_dir());
    let config = std::fs::read_to_string(target.join(".docsmith/config.yaml"))?;
    assert!(config.contains("storage_key: integrationDocs-localDocs"));
    let snapshot =
        std::fs::read_to_string(target.join(".docsmith/snapshots/integrationDocs-localDocs.json"))?;
    assert!(snapshot.contains("Base Integration"));
    Ok(())
}

#[test]
fn init_empty_writes_blank_frameworks() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    let target = temp.path().join("blank");

    cli()
        .args(["init", target.to_str().unwrap(), "--empty"])
        .assert()
        .success()
        .stdout(contains("empty docs"));

    let snapshot =
        std::fs::read_to_string(target.join(".docsmith/snapshots/integrationDocs-localDocs.json"))?;
    let value: serde_json::Value = serde_json::from_str(&snapshot)?;
    for framework in ["android", "ios", "flutter", "reactnative"] {
        assert_eq!(value[framework]["modules"], serde_json::json!([]));
    }
    Ok(())
}

#[test]
fn init_dry_run_does_not_write() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    let target = temp.path().join("workspace-dry-run");

    let mut cmd = cli();
    cmd.args(["init", target.to_str().unwrap(), "--dry-run"]);

    cmd.assert()
        .success()
        .stdout(contains("Dry run: would initialize workspace"));

    assert!(!target.join(".docsmith").exists());
    Ok(())
}

#[test]
fn init_twice_leaves_workspace_untouched() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    let target = temp.path().join("workspace");
    cli().args(["init", target.to_str().unwrap()]).assert().success();

    let config = target.join(".docsmith/config.yaml");
    std::fs::write(&config, "storage_key: custom\n")?;

    cli()
        .args(["init", target.to_str().unwrap()])
        .assert()
        .success()
        .stdout(contains("Workspace already initialized"));
    assert_eq!(std::fs::read_to_string(&config)?, "storage_key: custom\n");
    Ok(())
}

#[test]
fn init_rejects_nested_workspace() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    let parent = temp.path().join("parent");
    let child = parent.join("child");
    std::fs::create_dir_all(parent.join(".docsmith"))?;

    let mut cmd = cli();
    cmd.args(["init", child.to_str().unwrap()]);

    cmd.assert()
        .failure()
        .code(64)
        .stderr(contains("ancestor workspace"));
    Ok(())
}

#[test]
fn schema_runs_without_workspace() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    cli()
        .current_dir(temp.path())
        .arg("schema")
        .assert()
        .success()
        .stdout(contains("\"FrameworkDocs\""))
        .stdout(contains("\"additionalProperties\""));
    Ok(())
}

#[test]
fn commands_outside_workspace_fail() -> Result<(), Box<dyn std::error::Error>> {
    let temp = TempDir::new()?;
    cli()
        .current_dir(temp.path())
        .arg("status")
        .assert()
        .failure()
        .code(64)
        .stderr(contains("no .docsmith directory found"));
    Ok(())
}

fn cli() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_docsmith"));
    cmd.env_remove("DOCSMITH_REVIEW_URL").env_remove("RUST_LOG");
    cmd
}
