use std::process::{Command, Output};

fn run_wizard(args: &[&str]) -> Output {
    let binary_path = env!("CARGO_BIN_EXE_drawtest-wizard");
    Command::new(binary_path)
        .args(args)
        .env("RUST_LOG", "error")
        .output()
        .expect("Failed to start drawtest-wizard binary")
}

fn demo_config() -> String {
    format!("{}/demos/config.yaml", env!("CARGO_MANIFEST_DIR"))
}

#[test]
fn cli_mode_with_config_and_dry_run_works() {
    let output = run_wizard(&["--config", &demo_config(), "--dry-run"]);

    assert!(
        output.status.success(),
        "Process exited with non-zero status: {}\nStdout: {}\nStderr: {}",
        output.status,
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
}

#[test]
fn dry_run_without_config_uses_defaults() {
    let output = run_wizard(&["--dry-run", "--log-level", "error"]);

    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
}

#[test]
fn dry_run_rejects_non_http_base_url() {
    let output = run_wizard(&[
        "--config",
        &demo_config(),
        "--base-url",
        "ftp://files.example",
        "--dry-run",
    ]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("http or https"), "{stderr}");
}

#[test]
fn dry_run_reports_missing_config() {
    let output = run_wizard(&["--config", "/nonexistent/drawtest.yaml", "--dry-run"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("load config"), "{stderr}");
}
