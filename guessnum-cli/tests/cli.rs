// Copyright (c) 2022, Mangekyou Network, Inc.
// SPDX-License-Identifier: Apache-2.0

use assert_cmd::Command;
use guessnum::config::read_keypair;
use predicates::prelude::*;
use regex::Regex;
use solana_sdk::signature::Signer;
use tempfile::tempdir;

fn guessnum() -> Command {
    let mut cmd = Command::cargo_bin("guessnum").unwrap();
    cmd.env_remove("GUESSNUM_URL")
        .env_remove("GUESSNUM_PROGRAM_ID")
        .env_remove("GUESSNUM_KEYPAIR")
        .env_remove("GUESSNUM_CONFIG");
    cmd
}

#[test]
fn integration_test_keygen() {
    let dir = tempdir().unwrap();
    let outfile = dir.path().join("id.json");
    let result = guessnum()
        .arg("keygen")
        .arg("--outfile")
        .arg(&outfile)
        .ok();
    assert!(result.is_ok());

    let expected = Regex::new(r"Public key: ([1-9A-HJ-NP-Za-km-z]{32,44})\n").unwrap();
    let output = String::from_utf8(result.unwrap().stdout).unwrap();
    assert!(expected.is_match(&output));

    let public_key = expected.captures(&output).unwrap().get(1).unwrap().as_str();
    assert_eq!(read_keypair(&outfile).unwrap().pubkey().to_string(), public_key);

    guessnum()
        .arg("keygen")
        .arg("--outfile")
        .arg(&outfile)
        .assert()
        .code(exitcode::DATAERR)
        .stdout(predicate::str::contains("Refusing to overwrite"));
}

#[test]
fn integration_test_target_out_of_range() {
    guessnum()
        .arg("create")
        .arg("300")
        .assert()
        .failure()
        .stderr(predicate::str::contains("300"));
}

#[test]
fn integration_test_missing_wallet() {
    let dir = tempdir().unwrap();
    guessnum()
        .arg("list")
        .arg("--keypair")
        .arg(dir.path().join("missing.json"))
        .assert()
        .code(exitcode::DATAERR)
        .stdout(predicate::str::starts_with("Error:").and(predicate::str::contains("missing.json")));
}

#[test]
fn integration_test_invalid_program_id() {
    let dir = tempdir().unwrap();
    let keypair = dir.path().join("id.json");
    guessnum().arg("keygen").arg("-o").arg(&keypair).assert().success();

    guessnum()
        .args(["end", "11111111111111111111111111111111"])
        .arg("--program-id")
        .arg("not-a-program")
        .arg("--keypair")
        .arg(&keypair)
        .assert()
        .code(exitcode::DATAERR)
        .stdout(predicate::str::contains("not-a-program"));
}

#[test]
fn integration_test_invalid_game_address() {
    guessnum()
        .args(["guess", "nope", "4"])
        .assert()
        .failure();
}

#[test]
fn integration_test_help() {
    guessnum()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("keygen").and(predicate::str::contains("play")));
}
