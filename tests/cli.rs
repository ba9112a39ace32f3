use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::{TempDir, tempdir};

fn bin(dir: &TempDir) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("cipherlab"));
    cmd.current_dir(dir.path())
        .env_remove("CIPHERLAB_PASSWORD")
        .env_remove("CIPHERLAB_BUNDLE")
        .env_remove("RUST_LOG");
    cmd
}

// --------------------------------------------------
// CLASSIC CIPHERS
// --------------------------------------------------

#[test]
fn encrypt_uses_default_params() {
    let dir = tempdir().unwrap();

    bin(&dir)
        .args(["encrypt", "caesar", "abc"])
        .assert()
        .success()
        .stdout("DEF\n");
}

#[test]
fn encrypt_and_decrypt_with_params() {
    let dir = tempdir().unwrap();

    bin(&dir)
        .args(["encrypt", "vigenere", "ATTACKATDAWN", "-p", "key=LEMON"])
        .assert()
        .success()
        .stdout("LXFOPVEFRNHR\n");

    bin(&dir)
        .args(["decrypt", "vigenere", "LXFOPVEFRNHR", "--param", "key=LEMON"])
        .assert()
        .success()
        .stdout("ATTACKATDAWN\n");
}

#[test]
fn numeric_param_is_parsed() {
    let dir = tempdir().unwrap();

    bin(&dir)
        .args(["encrypt", "caesar", "abc", "-p", "shift=7"])
        .assert()
        .success()
        .stdout("HIJ\n");
}

#[test]
fn dynamic_slug_works_from_cli() {
    let dir = tempdir().unwrap();

    bin(&dir)
        .args(["encrypt", "caesar-13", "Hello"])
        .assert()
        .success()
        .stdout("URYYB\n");
}

#[test]
fn extreme_shift_param_does_not_crash() {
    let dir = tempdir().unwrap();

    bin(&dir)
        .args(["decrypt", "caesar", "abc", "-p", "shift=-9223372036854775808"])
        .assert()
        .success();
}

#[test]
fn malformed_param_is_rejected_by_parser() {
    let dir = tempdir().unwrap();

    bin(&dir)
        .args(["encrypt", "caesar", "abc", "-p", "shift"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("NAME=VALUE"));
}

#[test]
fn unknown_slug_fails() {
    let dir = tempdir().unwrap();

    bin(&dir)
        .args(["encrypt", "not-a-real-slug", "abc"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unknown cipher: not-a-real-slug"));
}

#[test]
fn decrypt_of_one_way_cipher_is_unsupported() {
    let dir = tempdir().unwrap();

    bin(&dir)
        .args(["decrypt", "morse", ".-"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not supported"));
}

// --------------------------------------------------
// CATALOG
// --------------------------------------------------

#[test]
fn list_filters_by_query_and_category() {
    let dir = tempdir().unwrap();

    bin(&dir)
        .args(["list", "--query", "rail-fence-", "--category", "variant"])
        .assert()
        .success()
        .stdout(predicate::str::contains("rail-fence-12"))
        .stdout(predicate::str::contains("11 cipher(s)"));
}

#[test]
fn list_reversible_hides_one_way_ciphers() {
    let dir = tempdir().unwrap();

    bin(&dir)
        .args(["list", "--query", "morse", "--reversible"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No ciphers found."));
}

#[test]
fn best_effort_decrypt_is_not_listed_as_reversible() {
    let dir = tempdir().unwrap();

    bin(&dir)
        .args(["list", "--query", "leet", "--reversible"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No ciphers found."));

    bin(&dir)
        .args(["info", "leet-speak"])
        .assert()
        .success()
        .stdout(predicate::str::contains("best effort"));

    bin(&dir)
        .args(["decrypt", "leet-speak", "14ZY"])
        .assert()
        .success()
        .stdout("IAZY\n");
}

#[test]
fn list_rejects_unknown_category() {
    let dir = tempdir().unwrap();

    bin(&dir)
        .args(["list", "--category", "modern"])
        .assert()
        .failure();
}

#[test]
fn info_prints_params() {
    let dir = tempdir().unwrap();

    bin(&dir)
        .args(["info", "caesar"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Caesar Cipher"))
        .stdout(predicate::str::contains("shift (number)"));
}

#[test]
fn info_json_is_parseable() {
    let dir = tempdir().unwrap();

    let out = bin(&dir)
        .args(["info", "affine-a5-b8", "--json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(value["slug"], "affine-a5-b8");
}

#[test]
fn info_unknown_slug_fails() {
    let dir = tempdir().unwrap();

    bin(&dir).args(["info", "caesar-26"]).assert().failure();
}

// --------------------------------------------------
// AES
// --------------------------------------------------

#[test]
fn aes_roundtrip_through_stdout() {
    let dir = tempdir().unwrap();

    let out = bin(&dir)
        .env("CIPHERLAB_PASSWORD", "correct horse")
        .args(["aes-encrypt", "attack at dawn", "--scrypt-log-n", "10"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    let json = String::from_utf8(out).unwrap();
    assert!(json.contains("ciphertext_b64"));

    bin(&dir)
        .env("CIPHERLAB_PASSWORD", "correct horse")
        .args(["aes-decrypt", json.trim(), "--scrypt-log-n", "10"])
        .assert()
        .success()
        .stdout("attack at dawn\n");
}

#[test]
fn aes_roundtrip_through_file() {
    let dir = tempdir().unwrap();
    let bundle = dir.path().join("out").join("bundle.json");

    bin(&dir)
        .env("CIPHERLAB_PASSWORD", "correct horse")
        .args(["aes-encrypt", "hello", "--scrypt-log-n", "10", "--out"])
        .arg(&bundle)
        .assert()
        .success()
        .stdout(predicate::str::contains("bundle written to"));

    assert!(bundle.exists());

    bin(&dir)
        .env("CIPHERLAB_PASSWORD", "correct horse")
        .args(["aes-decrypt", "--scrypt-log-n", "10", "--file"])
        .arg(&bundle)
        .assert()
        .success()
        .stdout("hello\n");

    // the file can also come from the environment
    bin(&dir)
        .env("CIPHERLAB_PASSWORD", "correct horse")
        .env("CIPHERLAB_BUNDLE", &bundle)
        .args(["aes-decrypt", "--scrypt-log-n", "10"])
        .assert()
        .success()
        .stdout("hello\n");
}

#[test]
fn aes_password_can_be_piped() {
    let dir = tempdir().unwrap();
    let bundle = dir.path().join("bundle.json");

    bin(&dir)
        .write_stdin("piped secret\n")
        .args(["aes-encrypt", "piped", "--scrypt-log-n", "10", "--out"])
        .arg(&bundle)
        .assert()
        .success();

    bin(&dir)
        .write_stdin("piped secret\n")
        .args(["aes-decrypt", "--scrypt-log-n", "10", "--file"])
        .arg(&bundle)
        .assert()
        .success()
        .stdout("piped\n");
}

#[test]
fn aes_wrong_password_fails() {
    let dir = tempdir().unwrap();
    let bundle = dir.path().join("bundle.json");

    bin(&dir)
        .env("CIPHERLAB_PASSWORD", "correct horse")
        .args(["aes-encrypt", "secret", "--scrypt-log-n", "10", "--out"])
        .arg(&bundle)
        .assert()
        .success();

    bin(&dir)
        .env("CIPHERLAB_PASSWORD", "battery staple")
        .args(["aes-decrypt", "--scrypt-log-n", "10", "--file"])
        .arg(&bundle)
        .assert()
        .failure()
        .stderr(predicate::str::contains("decryption failed"));
}

#[test]
fn aes_short_password_is_rejected() {
    let dir = tempdir().unwrap();

    bin(&dir)
        .env("CIPHERLAB_PASSWORD", "12345")
        .args(["aes-encrypt", "x", "--scrypt-log-n", "10"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("at least 6 characters"));
}

#[test]
fn aes_decrypt_without_bundle_fails() {
    let dir = tempdir().unwrap();

    bin(&dir)
        .env("CIPHERLAB_PASSWORD", "correct horse")
        .arg("aes-decrypt")
        .assert()
        .failure()
        .stderr(predicate::str::contains("no bundle given"));
}

#[test]
fn invalid_scrypt_params_fail() {
    let dir = tempdir().unwrap();

    bin(&dir)
        .env("CIPHERLAB_PASSWORD", "correct horse")
        .args(["aes-encrypt", "x", "--scrypt-log-n", "40"])
        .assert()
        .failure();
}
