//! Tests for main.rs startup validation (JWT_SECRET, POLKA_KEY, platform).

use std::fs;
use std::process::{Child, Command, Stdio};
use std::time::Duration;

const SECRET: &str = "test-secret-that-is-long-enough!!";
const POLKA_KEY: &str = "f271c81ff7084ee5b99a5091b42d486e";

fn cargo_bin() -> std::path::PathBuf {
    // Get the path to the compiled binary
    let mut path = std::env::current_exe().unwrap();
    path.pop(); // Remove test binary name
    path.pop(); // Remove deps
    path.push("chirpy");
    path
}

fn temp_db() -> String {
    std::env::temp_dir()
        .join(format!("chirpy_startup_{}.db", uuid::Uuid::new_v4()))
        .to_string_lossy()
        .into_owned()
}

fn combined_output(output: &std::process::Output) -> String {
    // tracing logs to stdout by default
    format!(
        "{}{}",
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    )
}

/// Assert the child is still running after a short grace period, then kill it.
fn assert_still_running(mut child: Child) {
    std::thread::sleep(Duration::from_millis(500));

    match child.try_wait() {
        Ok(Some(status)) => {
            let output = child.wait_with_output().unwrap();
            panic!(
                "Server exited unexpectedly with status {:?}, output: {}",
                status,
                combined_output(&output)
            );
        }
        Ok(None) => {
            child.kill().ok();
        }
        Err(e) => {
            panic!("Error checking process status: {}", e);
        }
    }
}

#[test]
fn test_missing_jwt_secret_exits_with_error() {
    let output = Command::new(cargo_bin())
        .env_remove("JWT_SECRET")
        .env("POLKA_KEY", POLKA_KEY)
        .args(["--database", &temp_db()])
        .stderr(Stdio::piped())
        .stdout(Stdio::piped())
        .output()
        .expect("Failed to run binary");

    assert!(
        !output.status.success(),
        "Should exit with error when JWT_SECRET is missing"
    );

    let combined = combined_output(&output);
    assert!(
        combined.contains("JWT_SECRET") && combined.contains("required"),
        "Should mention JWT_SECRET is required, got: {}",
        combined
    );
}

#[test]
fn test_short_jwt_secret_exits_with_error() {
    let output = Command::new(cargo_bin())
        .env("JWT_SECRET", "short")
        .env("POLKA_KEY", POLKA_KEY)
        .args(["--database", &temp_db()])
        .stderr(Stdio::piped())
        .stdout(Stdio::piped())
        .output()
        .expect("Failed to run binary");

    assert!(!output.status.success());
    assert!(combined_output(&output).contains("shorter than"));
}

#[test]
fn test_missing_polka_key_exits_with_error() {
    let output = Command::new(cargo_bin())
        .env("JWT_SECRET", SECRET)
        .env_remove("POLKA_KEY")
        .args(["--database", &temp_db()])
        .stderr(Stdio::piped())
        .stdout(Stdio::piped())
        .output()
        .expect("Failed to run binary");

    assert!(!output.status.success());
    assert!(combined_output(&output).contains("POLKA_KEY"));
}

#[test]
fn test_invalid_platform_is_rejected() {
    let output = Command::new(cargo_bin())
        .env("JWT_SECRET", SECRET)
        .env("POLKA_KEY", POLKA_KEY)
        .args(["--platform", "staging", "--database", &temp_db()])
        .stderr(Stdio::piped())
        .stdout(Stdio::piped())
        .output()
        .expect("Failed to run binary");

    assert!(!output.status.success());
}

#[test]
fn test_starts_with_env_secrets() {
    let child = Command::new(cargo_bin())
        .env("JWT_SECRET", SECRET)
        .env("POLKA_KEY", POLKA_KEY)
        .args(["--port", "0", "--database", &temp_db()])
        .stderr(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .expect("Failed to run binary");

    assert_still_running(child);
}

#[test]
fn test_jwt_secret_file() {
    let secret_file = std::env::temp_dir().join(format!("chirpy_jwt_secret_{}", uuid::Uuid::new_v4()));
    fs::write(&secret_file, "this-is-a-long-secret-from-file-for-testing\n").unwrap();

    let child = Command::new(cargo_bin())
        .env_remove("JWT_SECRET")
        .env("POLKA_KEY", POLKA_KEY)
        .args([
            "--jwt-secret-file",
            secret_file.to_str().unwrap(),
            "--port",
            "0",
            "--database",
            &temp_db(),
        ])
        .stderr(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .expect("Failed to run binary");

    assert_still_running(child);
    fs::remove_file(&secret_file).ok();
}
