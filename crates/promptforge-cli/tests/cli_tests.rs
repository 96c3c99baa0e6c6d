//! End-to-end tests for the `pforge` binary
//!
//! Every test writes its own config and data files, uses the mock embedding
//! provider, and never reaches a real backend.

use assert_cmd::Command;
use predicates::prelude::*;
use promptforge_config::ENV_OVERRIDES;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

fn write_fixture(dir: &Path, backend: &str) -> PathBuf {
    fs::write(
        dir.join("examples.json"),
        r#"{
            "Translate hello to French": "Bonjour",
            "What is 2 + 2?": "4",
            "Name a primary colour": "Red"
        }"#,
    )
    .unwrap();

    let config_path = dir.join("promptforge.toml");
    fs::write(
        &config_path,
        format!(
            r#"
[model]
name = "test-model"
backend = "{backend}"

[data]
examples = "{examples}"
model_mapping = "{mapping}"

[embedding]
provider = "mock"
model = "mock-embedding"
dimensions = 32

[openai]
api_key_env = "PROMPTFORGE_CLI_TEST_MISSING_KEY"

[local]
endpoint = "http://127.0.0.1:9/v1"
"#,
            examples = dir.join("examples.json").display(),
            mapping = dir.join("model_mapping.json").display(),
        ),
    )
    .unwrap();
    config_path
}

fn pforge(config: &Path) -> Command {
    let mut cmd = Command::cargo_bin("pforge").unwrap();
    for var in ENV_OVERRIDES {
        cmd.env_remove(var);
    }
    cmd.env_remove("PROMPTFORGE_CLI_TEST_MISSING_KEY");
    cmd.arg("-C").arg(config);
    cmd
}

#[test]
fn test_config_show_json() {
    let temp = TempDir::new().unwrap();
    let config = write_fixture(temp.path(), "local");

    let output = pforge(&config)
        .args(["config", "show", "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let shown: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(shown["model"]["name"], "test-model");
    assert_eq!(shown["embedding"]["provider"], "mock");
}

#[test]
fn test_config_show_applies_flag_overrides() {
    let temp = TempDir::new().unwrap();
    let config = write_fixture(temp.path(), "local");

    pforge(&config)
        .args(["config", "show", "--model", "gpt-4o", "--backend", "openai"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#"name = "gpt-4o""#))
        .stdout(predicate::str::contains(r#"backend = "openai""#));
}

#[test]
fn test_retrieve_ranks_identical_query_first() {
    let temp = TempDir::new().unwrap();
    let config = write_fixture(temp.path(), "local");

    let output = pforge(&config)
        .args(["retrieve", "What is 2 + 2?", "-k", "2", "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let rows: Vec<serde_json::Value> = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0]["query"], "What is 2 + 2?");
    assert_eq!(rows[0]["answer"], "4");
    assert!((rows[0]["similarity"].as_f64().unwrap() - 1.0).abs() < 1e-4);
}

#[test]
fn test_prompt_prints_raw_payload_for_untemplated_engine() {
    let temp = TempDir::new().unwrap();
    let config = write_fixture(temp.path(), "local");

    pforge(&config)
        .args(["prompt", "Translate hello to French", "-k", "1"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with(
            "You are a helpful assistant\n\n#Query:\nTranslate hello to French\n\n#Answer:\nBonjour",
        ))
        .stdout(predicate::str::contains("# Answer:\n<START>"));
}

#[test]
fn test_prompt_without_icl_has_no_examples() {
    let temp = TempDir::new().unwrap();
    let config = write_fixture(temp.path(), "local");

    pforge(&config)
        .args(["prompt", "Translate hello to French", "--no-icl", "-k", "3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("#Query:").not());
}

#[test]
fn test_generate_zero_examples_rejected() {
    let temp = TempDir::new().unwrap();
    let config = write_fixture(temp.path(), "local");

    pforge(&config)
        .args(["generate", "q", "-k", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Number of ICL examples should be > 0"));
}

#[test]
fn test_generate_missing_api_key_fails() {
    let temp = TempDir::new().unwrap();
    let config = write_fixture(temp.path(), "openai");

    pforge(&config)
        .args(["generate", "q"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("PROMPTFORGE_CLI_TEST_MISSING_KEY"));
}

#[test]
fn test_unknown_backend_flag_rejected() {
    let temp = TempDir::new().unwrap();
    let config = write_fixture(temp.path(), "local");

    pforge(&config)
        .args(["config", "show", "--backend", "tpu"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown backend 'tpu'"));
}

#[test]
fn test_launched_engine_output_kept_off_stdout() {
    let temp = TempDir::new().unwrap();
    let config = write_fixture(temp.path(), "local");
    let mut toml = fs::read_to_string(&config).unwrap();
    toml.push_str("launch = true\nprogram = \"echo\"\nport = 9\nstartup_timeout_secs = 1\n");
    fs::write(&config, toml).unwrap();

    pforge(&config)
        .args(["generate", "q"])
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("serve test-model"));
}
