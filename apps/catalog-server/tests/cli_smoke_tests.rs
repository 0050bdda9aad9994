//! CLI smoke tests for the catalog-server binary
//!
//! Help output, configuration validation and a short-lived server run.

use std::path::Path;
use std::process::{Command, Stdio};
use std::time::Duration;
use tempfile::TempDir;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::{sleep, timeout};

fn run_catalog_server(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_catalog-server"))
        .args(args)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .expect("Failed to execute catalog-server")
}

fn yaml_path(p: &Path) -> String {
    p.to_string_lossy().replace('\\', "/")
}

/// Config rooted in `dir` so logs and database files stay inside the temp dir.
fn write_config(dir: &TempDir, name: &str, database: &str) -> String {
    let config_path = dir.path().join(name);
    let content = format!(
        r#"
server:
  home_dir: "{home}"
  host: "127.0.0.1"
  port: 8087

{database}

logging:
  default:
    console_level: info
    file: "logs/catalog.log"
    file_level: info
    max_backups: 3
    max_size_mb: 10
"#,
        home = yaml_path(&dir.path().join("home")),
    );
    std::fs::write(&config_path, content).expect("Failed to write config file");
    config_path.to_string_lossy().to_string()
}

#[test]
fn test_cli_help_command() {
    let output = run_catalog_server(&["--help"]);
    assert!(output.status.success(), "Help command should succeed");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("catalog-server"), "Should contain binary name");
    assert!(stdout.contains("Usage:"), "Should contain usage information");
    assert!(stdout.contains("run"), "Should contain 'run' subcommand");
    assert!(stdout.contains("check"), "Should contain 'check' subcommand");
    assert!(stdout.contains("--config"), "Should mention config option");
    assert!(stdout.contains("--mock"), "Should mention mock option");
}

#[test]
fn test_cli_version_command() {
    let output = run_catalog_server(&["--version"]);
    assert!(output.status.success(), "Version command should succeed");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("catalog-server 0.1.0"));
}

#[test]
fn test_cli_invalid_command() {
    let output = run_catalog_server(&["invalid-command"]);
    assert!(!output.status.success(), "Invalid command should fail");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("error"), "Should report an error: {}", stderr);
}

#[test]
fn test_cli_config_validation_missing_file() {
    for flag in ["--config", "-c"] {
        let output = run_catalog_server(&[flag, "/nonexistent/config.yaml", "check"]);
        assert!(!output.status.success(), "Should fail with missing config");
        let stderr = String::from_utf8_lossy(&output.stderr);
        assert!(
            stderr.contains("config file not found"),
            "Should mention config file issue: {}",
            stderr
        );
    }
}

#[test]
fn test_cli_config_validation_invalid_yaml() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = temp_dir.path().join("invalid.yaml");
    std::fs::write(&config_path, "invalid: yaml: content: [unclosed").expect("Failed to write file");

    let output = run_catalog_server(&["--config", config_path.to_str().unwrap(), "check"]);
    assert!(!output.status.success(), "Should fail with invalid YAML");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("invalid configuration"),
        "Should mention configuration parsing issue: {}",
        stderr
    );
}

#[test]
fn test_cli_unknown_config_key_is_rejected() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = temp_dir.path().join("unknown.yaml");
    std::fs::write(&config_path, "server:\n  port: 8087\n  colour: blue\n")
        .expect("Failed to write file");

    let output = run_catalog_server(&["--config", config_path.to_str().unwrap(), "check"]);
    assert!(!output.status.success(), "Unknown keys should be rejected");
}

#[test]
fn test_cli_check_valid_config() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config = write_config(
        &temp_dir,
        "valid.yaml",
        "database:\n  url: \"sqlite://data/catalog.db?mode=rwc\"",
    );

    let output = run_catalog_server(&["--config", &config, "check"]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        output.status.success(),
        "Should succeed with valid config: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(stdout.contains("Configuration check passed"));
    assert!(stdout.contains("port: 8087"));
}

#[test]
fn test_cli_check_rejects_unsupported_database() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config = write_config(
        &temp_dir,
        "pg.yaml",
        "database:\n  url: \"postgresql://localhost/nonexistent\"",
    );

    let output = run_catalog_server(&["--config", &config, "check"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Unsupported database type"), "{}", stderr);

    // --mock replaces the configured database
    let output = run_catalog_server(&["--config", &config, "--mock", "check"]);
    assert!(
        output.status.success(),
        "Should succeed with mock database: {}",
        String::from_utf8_lossy(&output.stderr)
    );
}

#[test]
fn test_cli_print_config_applies_port_override() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config = write_config(&temp_dir, "print.yaml", "");

    let output = run_catalog_server(&["--config", &config, "--port", "9191", "--print-config"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("port: 9191"), "{}", stdout);
}

#[test]
fn test_cli_subcommand_help() {
    let output = run_catalog_server(&["run", "--help"]);
    assert!(output.status.success(), "Run subcommand help should succeed");
    assert!(String::from_utf8_lossy(&output.stdout).contains("Start the server"));

    let output = run_catalog_server(&["check", "--help"]);
    assert!(output.status.success(), "Check subcommand help should succeed");
    assert!(String::from_utf8_lossy(&output.stdout).contains("Check configuration"));
}

async fn http_request(
    port: u16,
    method: &str,
    path: &str,
    body: Option<&str>,
) -> std::io::Result<String> {
    let mut stream = TcpStream::connect(("127.0.0.1", port)).await?;
    let body = body.unwrap_or("");
    let request = format!(
        "{method} {path} HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\
         Content-Type: application/json\r\nContent-Length: {}\r\n\r\n{body}",
        body.len()
    );
    stream.write_all(request.as_bytes()).await?;
    let mut response = String::new();
    stream.read_to_string(&mut response).await?;
    Ok(response)
}

async fn http_get(port: u16, path: &str) -> std::io::Result<String> {
    http_request(port, "GET", path, None).await
}

fn free_port() -> u16 {
    std::net::TcpListener::bind("127.0.0.1:0")
        .and_then(|l| l.local_addr())
        .expect("free port")
        .port()
}

/// Starts `run` and waits until `/health` answers.
async fn start_server(config: &str, port: u16) -> (tokio::process::Child, String) {
    let child = tokio::process::Command::new(env!("CARGO_BIN_EXE_catalog-server"))
        .args(["--config", config, "--port", &port.to_string(), "run"])
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .kill_on_drop(true)
        .spawn()
        .expect("Failed to spawn catalog-server");

    let health = timeout(Duration::from_secs(20), async {
        loop {
            if let Ok(resp) = http_get(port, "/health").await {
                return resp;
            }
            sleep(Duration::from_millis(100)).await;
        }
    })
    .await
    .expect("server did not come up");
    (child, health)
}

#[tokio::test]
async fn test_cli_run_serves_requests_from_sqlite() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config = write_config(
        &temp_dir,
        "run.yaml",
        "database:\n  url: \"sqlite://data/catalog.db?mode=rwc\"",
    );
    let port = free_port();
    let (mut child, health) = start_server(&config, port).await;
    assert!(health.starts_with("HTTP/1.1 200"), "{}", health);
    assert!(health.contains("healthy"));

    let welcome = http_get(port, "/").await.expect("welcome");
    assert!(welcome.contains("/api/v2/products"), "{}", welcome);

    let products = http_get(port, "/api/v1/products").await.expect("products");
    assert!(products.starts_with("HTTP/1.1 200"), "{}", products);
    assert!(products.ends_with("[]"), "{}", products);

    let missing = http_get(port, "/api/v3/products").await.expect("fallback");
    assert!(missing.starts_with("HTTP/1.1 404"), "{}", missing);
    assert!(missing.contains("application/problem+json"), "{}", missing);

    child.kill().await.expect("kill server");
    assert!(temp_dir.path().join("home/data/catalog.db").is_file());
}

#[tokio::test]
async fn test_cli_run_keeps_records_across_restarts() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config = write_config(
        &temp_dir,
        "restart.yaml",
        "database:\n  url: \"sqlite://data/catalog.db?mode=rwc\"",
    );

    let port = free_port();
    let (mut child, _) = start_server(&config, port).await;
    let user = r#"{"username":"jdoe","email":"jdoe@example.com","firstName":"John","lastName":"Doe"}"#;
    let created = http_request(port, "POST", "/api/v1/users", Some(user))
        .await
        .expect("create user");
    assert!(created.starts_with("HTTP/1.1 201"), "{}", created);
    let order = r#"{"userId":1,"productId":7,"quantity":2,"totalPrice":59.98}"#;
    let created = http_request(port, "POST", "/api/v1/orders", Some(order))
        .await
        .expect("create order");
    assert!(created.starts_with("HTTP/1.1 201"), "{}", created);
    let object = r#"{"name":"iPhone 15 Pro","data":{"color":"blue"}}"#;
    let created = http_request(port, "POST", "/api/objects", Some(object))
        .await
        .expect("create object");
    assert!(created.starts_with("HTTP/1.1 201"), "{}", created);
    child.kill().await.expect("kill server");

    let port = free_port();
    let (mut child, _) = start_server(&config, port).await;
    let users = http_get(port, "/api/v1/users").await.expect("users");
    assert!(users.contains("\"username\":\"jdoe\""), "{}", users);
    let orders = http_get(port, "/api/v2/orders/user/1").await.expect("orders");
    assert!(orders.contains("\"productId\":7"), "{}", orders);
    let objects = http_get(port, "/api/objects/search?name=iPhone").await.expect("objects");
    assert!(objects.contains("\"color\":\"blue\""), "{}", objects);
    child.kill().await.expect("kill server");
}
