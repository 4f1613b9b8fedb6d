use assert_cmd::Command;
use predicates::prelude::*;

const RECEIPT: &str = "SPROUTS FARMERS MARKET\n\
GROCERY\n\
APPLE GALA 4.50 N\n\
SUBTOTAL 4.50\n\
TOTAL 4.50\n";

fn chit() -> Command {
    Command::cargo_bin("chit").unwrap()
}

#[test]
fn parse_from_stdin_emits_json() {
    chit()
        .args(["parse", "-"])
        .write_stdin(RECEIPT)
        .assert()
        .success()
        .stdout(predicate::str::contains("APPLE GALA"))
        .stdout(predicate::str::contains("SPROUTS"))
        .stdout(predicate::str::contains("4.50"));
}

#[test]
fn parse_csv_format() {
    chit()
        .args(["parse", "-", "--format", "csv"])
        .write_stdin(RECEIPT)
        .assert()
        .success()
        .stdout(predicate::str::contains("store,item,quantity,price"))
        .stdout(predicate::str::contains("APPLE GALA"));
}

#[test]
fn parse_text_format() {
    chit()
        .args(["parse", "-", "--format", "text"])
        .write_stdin(RECEIPT)
        .assert()
        .success()
        .stdout(predicate::str::contains("Store: SPROUTS"))
        .stdout(predicate::str::contains("Total: 4.50"));
}

#[test]
fn parse_empty_input_fails() {
    chit()
        .args(["parse", "-"])
        .write_stdin("")
        .assert()
        .failure()
        .stderr(predicate::str::contains("empty"));
}

#[test]
fn parse_missing_file_fails() {
    chit()
        .args(["parse", "no-such-receipt.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn parse_writes_output_file() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("receipt.json");

    chit()
        .args(["parse", "-", "--output"])
        .arg(&out)
        .write_stdin(RECEIPT)
        .assert()
        .success();

    let written = std::fs::read_to_string(&out).unwrap();
    assert!(written.contains("APPLE GALA"));
}

#[test]
fn scan_without_api_key_fails() {
    let dir = tempfile::tempdir().unwrap();
    let image = dir.path().join("receipt.png");
    std::fs::write(&image, b"not really a png").unwrap();

    chit()
        .arg("scan")
        .arg(&image)
        .env_remove("GEMINI_API_KEY")
        .assert()
        .failure()
        .stderr(predicate::str::contains("API key"));
}

#[test]
fn config_show_prints_defaults() {
    chit()
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("gemini-2.5-flash-lite"))
        .stdout(predicate::str::contains("tax_rate"));
}
