//! End-to-end tests of the `passcodec` binary.

use assert_cmd::Command;
use predicates::prelude::*;

fn passcodec() -> Command {
    Command::cargo_bin("passcodec").unwrap()
}

#[test]
fn list_shows_registered_schemes() {
    passcodec()
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("unix-md5"))
        .stdout(predicate::str::contains("drupal7"))
        .stdout(predicate::str::contains("plain"));
}

#[test]
fn encode_prints_known_digest() {
    passcodec()
        .args(["encode", "asecret", "--scheme", "md5-base64"])
        .assert()
        .success()
        .stdout("ygWSaZhptnPLKB5JZjcklA==\n");
}

#[test]
fn encode_defaults_to_plain() {
    passcodec()
        .args(["encode", "asecret"])
        .assert()
        .success()
        .stdout("asecret\n");
}

#[test]
fn decode_reverses_base64() {
    passcodec()
        .args(["decode", "YXNlY3JldA==", "--scheme", "base64"])
        .assert()
        .success()
        .stdout("asecret\n");
}

#[test]
fn verify_accepts_matching_plaintext() {
    passcodec()
        .args([
            "verify",
            "{SHA}rDszI4Mgv2OXvvUWJukxE9AJuGA=",
            "asecret",
            "--scheme",
            "sha-string",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("matches"));
}

#[test]
fn verify_rejects_wrong_plaintext() {
    passcodec()
        .args([
            "verify",
            "{SHA}rDszI4Mgv2OXvvUWJukxE9AJuGA=",
            "not-the-secret",
            "--scheme",
            "sha-string",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not match"));
}

#[test]
fn verify_detects_the_scheme_when_omitted() {
    passcodec()
        .args([
            "verify",
            "$S$DnO4ij9KOjnBioZhI6.t.JLitZVShF7bkN/fFbUaua8nf27yTsc2",
            "asecret",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("drupal7"));
}

#[test]
fn detect_names_the_scheme() {
    passcodec()
        .args(["detect", "{MD5}ygWSaZhptnPLKB5JZjcklA=="])
        .assert()
        .success()
        .stdout(predicate::str::contains("md5-string"));
}

#[test]
fn detect_falls_back_to_plain() {
    passcodec()
        .args(["detect", "just some text"])
        .assert()
        .success()
        .stdout(predicate::str::contains("plain"));
}

#[test]
fn unknown_scheme_is_reported() {
    passcodec()
        .args(["encode", "asecret", "--scheme", "rot13"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("rot13"));
}

#[test]
fn cipher_scheme_requires_a_passphrase() {
    passcodec()
        .args(["encode", "asecret", "--scheme", "aes-256"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("passphrase"));
}

#[test]
fn encode_with_passphrase_roundtrips_through_decode() {
    let out = passcodec()
        .args([
            "encode", "asecret", "--scheme", "aes-256-base64", "--passphrase", "pp",
        ])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let encoded = String::from_utf8(out).unwrap().trim().to_string();

    passcodec()
        .args(["decode", &encoded, "--scheme", "aes-256-base64", "--passphrase", "pp"])
        .assert()
        .success()
        .stdout("asecret\n");
}
