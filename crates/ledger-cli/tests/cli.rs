use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;

fn demo() -> Command {
    let mut cmd = Command::cargo_bin("ledger-cli").expect("binary builds");
    cmd.arg("demo");
    cmd
}

#[test]
fn demo_prints_valid_chain() {
    demo()
        .args(["--difficulty", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Block 0:"))
        .stdout(predicate::str::contains("Block 2:"))
        .stdout(predicate::str::contains("Arslan pays Sid 10 BTC"))
        .stdout(predicate::str::contains("Is blockchain valid? true"));
}

#[test]
fn demo_reports_tampered_block() {
    demo()
        .args(["--difficulty", "0", "--tamper", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Validation failed: block 1 failed hash check",
        ))
        .stdout(predicate::str::contains("Is blockchain valid? false"));
}

#[test]
fn demo_json_output() {
    let output = demo()
        .args(["--difficulty", "2", "--tx", "a", "--tx", "b", "--tx", "c", "--json"])
        .output()
        .expect("demo runs");
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).expect("valid JSON");
    assert_eq!(report["valid"], true);
    assert!(report["mismatch"].is_null());
    let blocks = report["blocks"].as_array().expect("blocks array");
    assert_eq!(blocks.len(), 4);
    assert_eq!(blocks[0]["previous_hash"], "0".repeat(64));
    for pair in blocks.windows(2) {
        assert_eq!(pair[1]["previous_hash"], pair[0]["hash"]);
    }
    assert_eq!(blocks[3]["transactions"], serde_json::json!(["c"]));
    assert!(blocks[1]["hash"].as_str().unwrap().starts_with("00"));
}

#[test]
fn demo_reads_config_file() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    write!(
        file,
        r#"{{"difficulty": 1, "hashing": {{"mode": "argon2", "key": "k", "memory_kib": 64, "iterations": 1}}}}"#
    )
    .expect("write config");

    demo()
        .arg("--config")
        .arg(file.path())
        .args(["--tx", "tx1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Is blockchain valid? true"));
}

#[test]
fn demo_rejects_bad_config() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    write!(file, r#"{{"difficulty": "high"}}"#).expect("write config");

    demo()
        .arg("--config")
        .arg(file.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("parsing config"));
}

#[test]
fn demo_rejects_unreachable_difficulty() {
    demo()
        .args(["--difficulty", "65"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("difficulty 65"));
}

#[test]
fn demo_reports_mining_cap() {
    demo()
        .args(["--difficulty", "40", "--max-attempts", "10"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("stopped after 10 attempts"));
}

#[test]
fn demo_rejects_genesis_tamper() {
    demo()
        .args(["--difficulty", "0", "--tamper", "0"])
        .assert()
        .failure();
}

#[test]
fn key_requires_argon2() {
    demo()
        .args(["--difficulty", "0", "--key", "secret"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--key only applies"));
}
