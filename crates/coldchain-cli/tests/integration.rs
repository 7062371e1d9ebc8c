//! Integration tests for CLI commands.

use coldchain_canonical::{message_hash, Identity};
use coldchain_core::signature::{identity_of, sign_prehash, SigningKey};
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

const ADMIN: &str = "0x00000000000000000000000000000000000000ad";
const MANUFACTURER: &str = "0x0101010101010101010101010101010101010101";

fn inspector() -> (SigningKey, Identity) {
    let key = SigningKey::from_slice(&[0x42; 32]).unwrap();
    let id = identity_of(key.verifying_key());
    (key, id)
}

fn setup(extra: &str) -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("coldchain.toml");
    std::fs::write(&config, format!("admin = \"{}\"\n{}", ADMIN, extra)).unwrap();
    (dir, config)
}

fn run_cli(config: &Path, args: &[&str]) -> (bool, String, String) {
    let output = Command::new(env!("CARGO_BIN_EXE_coldchain"))
        .arg("--config")
        .arg(config)
        .args(args)
        .output()
        .expect("Failed to execute CLI");

    let stdout = String::from_utf8(output.stdout).unwrap();
    let stderr = String::from_utf8(output.stderr).unwrap();
    (output.status.success(), stdout, stderr)
}

fn ok(config: &Path, args: &[&str]) -> String {
    let (success, stdout, stderr) = run_cli(config, args);
    assert!(success, "{:?} failed: {}", args, stderr);
    stdout
}

/// Registers the inspector and manufacturer, one batch, one certificate.
fn populate(config: &Path) -> String {
    let (key, inspector) = inspector();
    let inspector = inspector.to_string();
    ok(config, &["add-entity", &inspector, "issuer"]);
    ok(config, &["add-entity", MANUFACTURER, "PROVER"]);
    ok(config, &["add-batch", "Pfizer-BioNTech", MANUFACTURER]);

    let message = format!(
        "Inspector ({}) has certifies vaccine batch #0 is manufactured by {}",
        inspector, MANUFACTURER
    );
    let signature = sign_prehash(&key, &message_hash(&message)).unwrap().to_string();
    ok(
        config,
        &[
            "issue",
            "--issuer",
            &inspector,
            "--prover",
            MANUFACTURER,
            "--status",
            "manufactured",
            "--signature",
            &signature,
            "--batch",
            "0",
        ],
    );
    message
}

#[test]
fn submissions_print_their_events() {
    let (_dir, config) = setup("");
    let stdout = ok(&config, &["add-entity", MANUFACTURER, "prover"]);
    let value: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(value["height"], 0);
    assert_eq!(value["event"]["event"], "AddEntity");
    assert_eq!(value["event"]["entity_mode"], "PROVER");
}

#[test]
fn queries_read_back_state() {
    let (_dir, config) = setup("");
    populate(&config);

    let entity: serde_json::Value =
        serde_json::from_str(&ok(&config, &["entity", MANUFACTURER])).unwrap();
    assert_eq!(entity["mode"], "PROVER");

    let batch: serde_json::Value = serde_json::from_str(&ok(&config, &["batch", "0"])).unwrap();
    assert_eq!(batch["brand"], "Pfizer-BioNTech");
    assert_eq!(batch["certificates"], serde_json::json!([0]));
    assert_eq!(batch["current_status"], "MANUFACTURED");

    let certificate: serde_json::Value =
        serde_json::from_str(&ok(&config, &["certificate", "0"])).unwrap();
    assert_eq!(certificate["status"], "MANUFACTURED");
    assert_eq!(certificate["issuer"]["mode"], "ISSUER");
}

#[test]
fn match_signature_answers_true_only_for_the_signer() {
    let (_dir, config) = setup("");
    let message = populate(&config);
    let (_, inspector) = inspector();

    let stdout = ok(
        &config,
        &["match-signature", "0", &inspector.to_string(), "--message", &message],
    );
    assert_eq!(stdout.trim(), "true");

    let stdout = ok(
        &config,
        &["match-signature", "0", MANUFACTURER, "--message", &message],
    );
    assert_eq!(stdout.trim(), "false");

    let hash = message_hash(&message).to_string();
    let stdout = ok(
        &config,
        &["match-signature", "0", &inspector.to_string(), "--hash", &hash],
    );
    assert_eq!(stdout.trim(), "true");
}

#[test]
fn rejected_operations_fail_and_leave_no_record() {
    let (_dir, config) = setup("");
    populate(&config);

    // Wrong role for the manufacturer.
    let (success, _, stderr) = run_cli(&config, &["add-batch", "Moderna", ADMIN]);
    assert!(!success);
    assert!(stderr.contains("Error:"));

    let (success, _, _) = run_cli(
        &config,
        &[
            "add-entity",
            "0x0202020202020202020202020202020202020202",
            "verifier",
            "--caller",
            MANUFACTURER,
        ],
    );
    assert!(!success);

    let (success, _, stderr) = run_cli(&config, &["add-entity", MANUFACTURER, "issuer"]);
    assert!(!success);
    assert!(stderr.contains("already registered"), "{}", stderr);

    let (success, _, _) = run_cli(&config, &["certificate", "5"]);
    assert!(!success);

    let report: serde_json::Value =
        serde_json::from_str(&ok(&config, &["verify", "--json"])).unwrap();
    assert_eq!(report["records"], 4);
}

#[test]
fn list_filters_records() {
    let (_dir, config) = setup("");
    populate(&config);

    let stdout = ok(&config, &["list"]);
    assert!(stdout.contains("HEIGHT"));
    assert!(stdout.contains("add_vaccine_batch"));

    let stdout = ok(&config, &["list", "--json", "--op", "add_entity"]);
    let lines: Vec<&str> = stdout.lines().filter(|l| !l.is_empty()).collect();
    assert_eq!(lines.len(), 2);
    for line in lines {
        let record: serde_json::Value = serde_json::from_str(line).expect("Invalid JSON");
        assert_eq!(record["transaction"]["operation"]["op"], "add_entity");
    }

    let stdout = ok(&config, &["list", "--json", "--from", "3"]);
    assert_eq!(stdout.lines().count(), 1);
}

#[test]
fn verify_reports_tampering() {
    let (dir, config) = setup("");
    populate(&config);

    let report = ok(&config, &["verify"]);
    assert!(report.contains("verdict:      ok"));

    // Flip the brand inside the batch record payload.
    let journal = dir.path().join("ledger.ccj");
    let bytes = std::fs::read(&journal).unwrap();
    let needle = b"Pfizer-BioNTech";
    let at = bytes
        .windows(needle.len())
        .position(|w| w == needle)
        .unwrap();
    let mut forged = bytes.clone();
    forged[at..at + needle.len()].copy_from_slice(b"Pfizer-BioNTecX");
    std::fs::write(&journal, forged).unwrap();

    let (success, _, stderr) = run_cli(&config, &["verify"]);
    assert!(!success);
    assert!(stderr.contains("height 2"), "{}", stderr);
}

#[test]
fn torn_tail_is_reported_by_verify_and_dropped_by_the_next_submission() {
    let (dir, config) = setup("");
    populate(&config);
    let journal = dir.path().join("ledger.ccj");

    let mut bytes = std::fs::read(&journal).unwrap();
    bytes.extend_from_slice(&[1, 0, 0, 0, 100, 0, 0, 0, b'{', b'"', b'r']);
    std::fs::write(&journal, bytes).unwrap();

    let (success, _, stderr) = run_cli(&config, &["verify"]);
    assert!(!success);
    assert!(stderr.contains("truncated"), "{}", stderr);

    // Queries see the committed records only.
    let batch: serde_json::Value = serde_json::from_str(&ok(&config, &["batch", "0"])).unwrap();
    assert_eq!(batch["current_status"], "MANUFACTURED");

    let stdout = ok(
        &config,
        &["add-entity", "0x0303030303030303030303030303030303030303", "verifier"],
    );
    let value: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(value["height"], 4);

    let report: serde_json::Value =
        serde_json::from_str(&ok(&config, &["verify", "--json"])).unwrap();
    assert_eq!(report["records"], 5);
}

#[test]
fn hash_needs_no_config() {
    let output = Command::new(env!("CARGO_BIN_EXE_coldchain"))
        .args(["--config", "/nonexistent/coldchain.toml", "hash", ""])
        .output()
        .unwrap();
    assert!(output.status.success());
    assert_eq!(
        String::from_utf8(output.stdout).unwrap().trim(),
        "0xc5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470"
    );
}

#[test]
fn journal_flag_overrides_config() {
    let (dir, config) = setup("journal = \"first.ccj\"\n");
    let other = dir.path().join("second.ccj");
    ok(
        &config,
        &["--journal", other.to_str().unwrap(), "add-entity", MANUFACTURER, "prover"],
    );
    assert!(other.exists());
    assert!(!dir.path().join("first.ccj").exists());
}
