mod common;

use assert_cmd::cargo_bin;
use assert_cmd::prelude::*;
use common::*;
use predicates::prelude::*;
use std::process::Command;

fn cli() -> Command {
    let mut cmd = Command::new(cargo_bin!());
    cmd.env_remove("ECPAY_HASH_KEY")
        .env_remove("ECPAY_HASH_IV")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_sign_csv_end_to_end() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let input = write_fields_csv(dir.path(), "callback.csv", &CALLBACK)?;

    cli()
        .args(["--hash-key", HASH_KEY, "--hash-iv", HASH_IV, "sign"])
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::starts_with("field,value\n"))
        .stdout(predicate::str::contains(format!("CheckMacValue,{CALLBACK_SHA256}")))
        .stdout(predicate::str::contains("TradeAmt,100"));

    Ok(())
}

#[test]
fn test_sign_form_with_env_credentials() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let input = write_fields_csv(dir.path(), "callback.csv", &CALLBACK)?;

    cli()
        .env("ECPAY_HASH_KEY", HASH_KEY)
        .env("ECPAY_HASH_IV", HASH_IV)
        .args(["sign", "--format", "form"])
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains(format!("CheckMacValue={CALLBACK_SHA256}")))
        .stdout(predicate::str::contains("&MerchantID=2000132&"));

    Ok(())
}

#[test]
fn test_sign_json_md5() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let input = write_fields_csv(dir.path(), "callback.csv", &CALLBACK)?;

    let output = cli()
        .args(["--hash-key", HASH_KEY, "--hash-iv", HASH_IV, "--md5", "sign", "--format", "json"])
        .arg(&input)
        .output()?;
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(json["CheckMacValue"], CALLBACK_MD5);
    assert_eq!(json["RtnMsg"], "Succeeded");

    Ok(())
}

#[test]
fn test_verify_accepts_valid_callback() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let mut rows = CALLBACK.to_vec();
    rows.push(("CheckMacValue", CALLBACK_SHA256));
    let input = write_fields_csv(dir.path(), "callback.csv", &rows)?;

    cli()
        .args(["--hash-key", HASH_KEY, "--hash-iv", HASH_IV, "verify"])
        .arg(&input)
        .assert()
        .success()
        .stdout("1|OK\n");

    Ok(())
}

#[test]
fn test_verify_rejects_tampered_callback() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempfile::tempdir()?;
    let input = write_fields_csv(
        dir.path(),
        "callback.csv",
        &[
            ("MerchantID", "2000132"),
            ("RtnCode", "1"),
            ("RtnMsg", "Succeeded"),
            ("TradeAmt", "1"),
            ("CheckMacValue", CALLBACK_SHA256),
        ],
    )?;

    cli()
        .args(["--hash-key", HASH_KEY, "--hash-iv", HASH_IV, "verify"])
        .arg(&input)
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("CheckMacValue verification failed"));

    Ok(())
}

#[test]
fn test_missing_credentials_fail() {
    cli()
        .args(["verify", "callback.csv"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--hash-key"));
}

#[test]
fn test_missing_input_file_fails() {
    cli()
        .args(["--hash-key", HASH_KEY, "--hash-iv", HASH_IV, "sign", "does-not-exist.csv"])
        .assert()
        .failure();
}
