use std::fs;
use std::io::{BufRead, BufReader, Read, Write};
use std::net::TcpListener;
use std::path::Path;
use std::thread;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Command isolated from the user's config, data directory and API keys.
fn docent(home: &Path) -> Command {
    let mut cmd = Command::cargo_bin("docent").unwrap();
    cmd.current_dir(home)
        .env("HOME", home)
        .env("XDG_CONFIG_HOME", home.join("config"))
        .env("XDG_DATA_HOME", home.join("data"))
        .env_remove("OPENAI_API_KEY")
        .env_remove("GOOGLE_API_KEY");
    cmd
}

fn config_with_history(dir: &TempDir) -> String {
    let config_path = dir.path().join("config.json");
    let config = serde_json::json!({
        "history": { "database_path": dir.path().join("history.db") }
    });
    fs::write(&config_path, config.to_string()).unwrap();
    config_path.display().to_string()
}

#[test]
fn types_lists_fields() {
    let dir = TempDir::new().unwrap();
    docent(dir.path())
        .arg("types")
        .assert()
        .success()
        .stdout(predicate::str::contains("Invoice Number"))
        .stdout(predicate::str::contains("Payment Method"))
        .stdout(predicate::str::contains("Auto-detect"));
}

#[test]
fn prompt_for_invoice() {
    let dir = TempDir::new().unwrap();
    docent(dir.path())
        .args(["prompt", "-t", "Invoice"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Document Type: Invoice"))
        .stdout(predicate::str::contains("- Invoice Number"))
        .stdout(predicate::str::contains("Not found"));
}

#[test]
fn prompt_for_unknown_type_uses_general_document() {
    let dir = TempDir::new().unwrap();
    docent(dir.path())
        .args(["prompt", "-t", "Bank Statement"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Document Type: General Document"))
        .stdout(predicate::str::contains("- Document Title"));
}

#[test]
fn extract_missing_file_fails() {
    let dir = TempDir::new().unwrap();
    docent(dir.path())
        .args(["extract", "missing.png"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Input file not found"));
}

#[test]
fn extract_unsupported_file_fails() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("notes.docx"), b"not an image").unwrap();
    docent(dir.path())
        .args(["extract", "notes.docx"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unsupported file format"));
}

#[test]
fn extract_without_api_key_fails() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("scan.png"), b"placeholder").unwrap();
    docent(dir.path())
        .args(["extract", "scan.png", "-p", "gemini"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("GOOGLE_API_KEY"));
}

#[test]
fn extract_with_short_api_key_fails() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("scan.png"), b"placeholder").unwrap();
    docent(dir.path())
        .args(["extract", "scan.png", "-k", "short"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid OpenAI API key"));
}

#[test]
fn extract_with_unknown_provider_fails() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("scan.png"), b"placeholder").unwrap();
    docent(dir.path())
        .args(["extract", "scan.png", "-p", "watson", "-k", "sk-1234567890abcdef"])
        .assert()
        .failure();
}

#[test]
fn config_init_then_get() {
    let dir = TempDir::new().unwrap();
    let config_path = dir.path().join("docent.json");
    let config_arg = config_path.display().to_string();

    docent(dir.path())
        .args(["config", "init", "-c", &config_arg])
        .assert()
        .success();
    assert!(config_path.exists());

    docent(dir.path())
        .args(["config", "set", "provider.default_provider", "gemini", "-c", &config_arg])
        .assert()
        .success();

    docent(dir.path())
        .args(["config", "get", "provider.default_provider", "-c", &config_arg])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"gemini\""));
}

#[test]
fn config_set_rejects_invalid_value() {
    let dir = TempDir::new().unwrap();
    let config_arg = dir.path().join("docent.json").display().to_string();

    docent(dir.path())
        .args(["config", "set", "history.enabled", "sometimes", "-c", &config_arg])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid value"));
}

#[test]
fn history_list_starts_empty() {
    let dir = TempDir::new().unwrap();
    let config_arg = config_with_history(&dir);

    docent(dir.path())
        .args(["history", "list", "-c", &config_arg])
        .assert()
        .success()
        .stdout(predicate::str::contains("No extractions recorded yet"));
}

#[test]
fn history_show_unknown_id_fails() {
    let dir = TempDir::new().unwrap();
    let config_arg = config_with_history(&dir);

    docent(dir.path())
        .args(["history", "show", "42", "-c", &config_arg])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No extraction with id 42"));
}

#[test]
fn batch_without_matches_fails() {
    let dir = TempDir::new().unwrap();
    docent(dir.path())
        .args(["batch", "*.png"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No matching files"));
}

/// Serve one chat completion reply on a local port and return its base URL.
fn serve_chat_completion(content: &str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());
    let body = serde_json::json!({
        "choices": [{ "message": { "content": content } }]
    })
    .to_string();

    thread::spawn(move || {
        let (stream, _) = listener.accept().unwrap();
        let mut reader = BufReader::new(stream);
        let mut content_length = 0;
        loop {
            let mut line = String::new();
            reader.read_line(&mut line).unwrap();
            if line == "\r\n" || line.is_empty() {
                break;
            }
            let lower = line.to_ascii_lowercase();
            if let Some(value) = lower.strip_prefix("content-length:") {
                content_length = value.trim().parse().unwrap();
            }
        }
        let mut request_body = vec![0; content_length];
        reader.read_exact(&mut request_body).unwrap();

        let mut stream = reader.into_inner();
        write!(
            stream,
            "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            body.len(),
            body
        )
        .unwrap();
        stream.flush().unwrap();
    });

    base_url
}

#[test]
fn extract_output_survives_unwritable_history() {
    let dir = TempDir::new().unwrap();
    image::RgbImage::new(8, 8)
        .save(dir.path().join("inv.png"))
        .unwrap();
    let blocker = dir.path().join("blocker");
    fs::write(&blocker, "regular file").unwrap();

    let config_path = dir.path().join("config.json");
    let config = serde_json::json!({
        "provider": { "openai_base_url": serve_chat_completion("Invoice Number: INV-42") },
        "history": { "database_path": blocker.join("history.db") }
    });
    fs::write(&config_path, config.to_string()).unwrap();

    docent(dir.path())
        .args(["extract", "inv.png", "-t", "Invoice", "-f", "raw", "-k", "sk-1234567890abcdef"])
        .args(["-c", &config_path.display().to_string()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Invoice Number: INV-42"))
        .stderr(predicate::str::contains("History disabled"));
}
