//! Known-answer vectors for the deterministic schemes, driven through the
//! manager so registration, charset handling and encoding are exercised
//! together.

use passcodec::{Charset, EncoderManager};

const SECRET1: &str = "asecret";
const SECRET2: &str = "a slightly longer secret";
const SECRET3: &str = "a secret with other characters like $\u{a3}\"!&*(";

fn check(manager: &EncoderManager, scheme: &str, plain: &str, expected: &str) {
    let out = manager
        .encode(plain, Some(scheme), None, None, Charset::Utf8)
        .unwrap();
    assert_eq!(
        out,
        expected.as_bytes(),
        "{scheme} encoding of {plain:?} diverged"
    );
    assert!(
        manager
            .matches(expected.as_bytes(), plain, scheme, None, Charset::Utf8)
            .unwrap(),
        "{scheme} failed to verify its own vector"
    );
}

#[test]
fn base64_vectors() {
    let manager = EncoderManager::with_default_encoders();
    check(&manager, "base64", SECRET1, "YXNlY3JldA==");
}

#[test]
fn md5_base64_vectors() {
    let manager = EncoderManager::with_default_encoders();
    check(&manager, "md5-base64", SECRET1, "ygWSaZhptnPLKB5JZjcklA==");
    check(&manager, "md5-base64", SECRET2, "NMcUwR8UQe0uAYMWNoncGA==");
    check(&manager, "md5-base64", SECRET3, "L4buR3cNpRjbR/zuCM1rCw==");
}

#[test]
fn sha1_base64_vectors() {
    let manager = EncoderManager::with_default_encoders();
    check(&manager, "sha1-base64", SECRET1, "rDszI4Mgv2OXvvUWJukxE9AJuGA=");
    check(&manager, "sha1-base64", SECRET2, "RLxtGXHPx8qFzPH6Az3QzUI5WKU=");
    check(&manager, "sha1-base64", SECRET3, "HvGpWakY1gTem9qtNdR1ij9H4Uw=");
}

#[test]
fn tagged_string_vectors() {
    let manager = EncoderManager::with_default_encoders();
    check(&manager, "md5-string", SECRET1, "{MD5}ygWSaZhptnPLKB5JZjcklA==");
    check(&manager, "md5-string", SECRET2, "{MD5}NMcUwR8UQe0uAYMWNoncGA==");
    check(&manager, "md5-string", SECRET3, "{MD5}L4buR3cNpRjbR/zuCM1rCw==");
    check(&manager, "sha-string", SECRET1, "{SHA}rDszI4Mgv2OXvvUWJukxE9AJuGA=");
    check(&manager, "sha-string", SECRET2, "{SHA}RLxtGXHPx8qFzPH6Az3QzUI5WKU=");
    check(&manager, "sha-string", SECRET3, "{SHA}HvGpWakY1gTem9qtNdR1ij9H4Uw=");
}

#[test]
fn drupal7_vectors() {
    let manager = EncoderManager::with_default_encoders();
    let cases = [
        (SECRET1, "$S$DnO4ij9KO", "$S$DnO4ij9KOjnBioZhI6.t.JLitZVShF7bkN/fFbUaua8nf27yTsc2"),
        (SECRET2, "$S$D3M39kOc.", "$S$D3M39kOc.7Z1EpCad8FZfeTBJqFWyDfuMdxZuZFptqDL8HZKuz7x"),
        (SECRET3, "$S$Dl7IOt27l", "$S$Dl7IOt27lwHIIEvpCFjJnnE2qkIKaiYx8MXJxH9NxH/kN.e1BAwC"),
    ];
    for (plain, salt, expected) in cases {
        let out = manager
            .encode(plain, Some("drupal7"), Some(salt.as_bytes()), None, Charset::Utf8)
            .unwrap();
        assert_eq!(out, expected.as_bytes());
        assert!(manager
            .matches(expected.as_bytes(), plain, "drupal7", None, Charset::Utf8)
            .unwrap());
    }
}

#[test]
fn aes_base64_vectors() {
    let manager = EncoderManager::with_default_encoders();
    let cases = [
        ("aes-128-base64", SECRET1, "password1", "AIAAAAAABAAAEAAAAAAAAAAAAAAAAAAAAADTw3mS4mYnfJNEQpSo+bNO"),
        ("aes-128-base64", SECRET2, "password2", "AIAAAAAABAAAEAAAAAAAAAAAAAAAAAAAAADW2yCjdIdMDQNZEfvD2v8FMOOwmI8X6GiB+sHZSajD3w=="),
        ("aes-128-base64", SECRET3, "password3", "AIAAAAAABAAAEAAAAAAAAAAAAAAAAAAAAAB+dZWrkH+zDrWHvbthbTzEKTOmo7D4RS58k1hlZ/1jmSG5z15VNqtR5F1ICjdw1yg="),
        ("aes-256-base64", SECRET1, "password1", "AQAAAAAABAAAEAAAAAAAAAAAAAAAAAAAAACkPb/70IlxmVFGTSVRf0ru"),
        ("aes-256-base64", SECRET2, "password2", "AQAAAAAABAAAEAAAAAAAAAAAAAAAAAAAAABGDuQekGpvwYuEDFpdFo5juU6O8Pd1OtVp8894THBdYw=="),
        ("aes-256-base64", SECRET3, "password3", "AQAAAAAABAAAEAAAAAAAAAAAAAAAAAAAAAANMzrz7qeHdM7YV2fowUV/tO8qm9hzdxhR1xPjf+qlerJDSlyU6PGc2Lg8gyVtnQo="),
    ];
    for (scheme, plain, passphrase, expected) in cases {
        let out = manager
            .encode(plain, Some(scheme), Some(b""), Some(passphrase.as_bytes()), Charset::Utf8)
            .unwrap();
        assert_eq!(out, expected.as_bytes(), "{scheme} vector for {plain:?}");
        let back = manager
            .decode(expected.as_bytes(), Some(scheme), Some(passphrase.as_bytes()), Charset::Utf8)
            .unwrap();
        assert_eq!(back, plain);
    }
}

#[test]
fn pbe_base64_vectors() {
    let manager = EncoderManager::with_default_encoders();
    let cases = [
        (SECRET1, "password1", "CBWMo0pmUSq8EJT3y+UXfq0="),
        (SECRET2, "password2", "CBWMo0pmUSq8LJFjdF91CJRgxiulYsq2GR0GdKs+SmuA6icnA5fGeL8="),
        (SECRET3, "password3", "CBWMo0pmUSq8zwRZTkZDprHJt8byrXTGOSl3e7iQB5Wx7D2haUQaHUdDe+y7q1hv5ffvdID2YkGW"),
    ];
    for (plain, passphrase, expected) in cases {
        let out = manager
            .encode(plain, Some("pbe-md5-des-base64"), None, Some(passphrase.as_bytes()), Charset::Utf8)
            .unwrap();
        assert_eq!(out, expected.as_bytes());
        let back = manager
            .decode(
                expected.as_bytes(),
                Some("pbe-md5-des-base64"),
                Some(passphrase.as_bytes()),
                Charset::Utf8,
            )
            .unwrap();
        assert_eq!(back, plain);
    }
}

#[test]
fn sha512_crypt_vector() {
    let manager = EncoderManager::with_default_encoders();
    let out = manager
        .encode(
            "Hello world!",
            Some("unix-sha512"),
            Some(b"$6$saltstring"),
            None,
            Charset::Utf8,
        )
        .unwrap();
    assert_eq!(
        out,
        b"$6$saltstring$svn8UoSVapNtMuq1ukKS4tPQd8iKwSMHWjl/O817G3uBnIFNjnQJuesI68u4OTLiBFdcbYEdFCoEOfaS35inz1"
    );
}

#[test]
fn every_salted_scheme_verifies_its_own_fresh_output() {
    let manager = EncoderManager::with_default_encoders();
    for scheme in ["unix-md5", "htpasswd-md5", "unix-des", "unix-blowfish", "drupal7"] {
        let out = manager
            .encode(SECRET1, Some(scheme), None, None, Charset::Utf8)
            .unwrap();
        assert!(
            manager
                .matches(&out, SECRET1, scheme, None, Charset::Utf8)
                .unwrap(),
            "{scheme} did not verify its own output"
        );
        assert!(
            !manager
                .matches(&out, "not the secret", scheme, None, Charset::Utf8)
                .unwrap(),
            "{scheme} verified a wrong plaintext"
        );
    }
}

#[test]
fn shadow_placeholders_never_match() {
    let manager = EncoderManager::with_default_encoders();
    for scheme in ["unix-md5", "unix-sha512", "unix-blowfish", "unix-des", "drupal7"] {
        assert!(!manager
            .matches(b"*", SECRET1, scheme, None, Charset::Utf8)
            .unwrap());
        assert!(!manager
            .matches(b"!locked-out", SECRET1, scheme, None, Charset::Utf8)
            .unwrap());
    }
}
