use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

fn lingoflow_cmd() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("lingoflow"));
    cmd.env_remove("OPENAI_API_KEY")
        .env_remove("ALGEBRAS_API_KEY")
        .env_remove("RUST_LOG");
    cmd
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

fn write_config(dir: &Path, body: &str) -> String {
    let path = dir.join(".lingoflow.yml");
    fs::write(&path, body).unwrap();
    path.to_string_lossy().to_string()
}

#[test]
fn test_cli_missing_lists_keys() {
    let temp_dir = TempDir::new().unwrap();
    let source = temp_dir.path().join("en.json");
    let target = temp_dir.path().join("fr.json");
    fs::write(&source, r#"{"a": "A", "menu": {"open": "Open", "close": "Close"}}"#).unwrap();
    fs::write(&target, r#"{"a": "A fr", "menu": {"open": "Ouvrir"}}"#).unwrap();

    let output = lingoflow_cmd()
        .args([
            "missing",
            "--source",
            source.to_str().unwrap(),
            "--target",
            target.to_str().unwrap(),
        ])
        .output()
        .unwrap();

    assert!(output.status.success(), "CLI failed: {}", stderr(&output));
    assert_eq!(stdout(&output), "menu.close\n");
}

#[test]
fn test_cli_missing_with_absent_target() {
    let temp_dir = TempDir::new().unwrap();
    let source = temp_dir.path().join("messages.properties");
    fs::write(&source, "greeting=Hello\nfarewell=Bye\n").unwrap();

    let output = lingoflow_cmd()
        .args([
            "missing",
            "--source",
            source.to_str().unwrap(),
            "--target",
            temp_dir.path().join("messages_fr.properties").to_str().unwrap(),
        ])
        .output()
        .unwrap();

    assert!(output.status.success(), "CLI failed: {}", stderr(&output));
    assert_eq!(stdout(&output), "greeting\nfarewell\n");
}

#[test]
fn test_cli_translate_without_config_fails() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("en.json");
    fs::write(&input, r#"{"a": "Hello"}"#).unwrap();

    let output = lingoflow_cmd()
        .current_dir(temp_dir.path())
        .args(["translate", "-i", "en.json", "-o", "fr.json", "-t", "fr"])
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert!(stderr(&output).contains("no project configuration found"));
    assert!(!temp_dir.path().join("fr.json").exists());
}

#[test]
fn test_cli_translate_without_api_key_fails() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("en.json");
    fs::write(&input, r#"{"a": "Hello"}"#).unwrap();
    write_config(temp_dir.path(), "languages: [en, fr]\n");

    let output = lingoflow_cmd()
        .current_dir(temp_dir.path())
        .args(["translate", "-i", "en.json", "-o", "fr.json", "-t", "fr"])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("OPENAI_API_KEY"), "{}", stderr(&output));
}

#[test]
fn test_cli_translate_rejects_unknown_provider() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("en.json");
    fs::write(&input, r#"{"a": "Hello"}"#).unwrap();
    let config = write_config(temp_dir.path(), "api:\n  provider: deepl\n");

    let output = lingoflow_cmd()
        .args([
            "translate",
            "-i",
            input.to_str().unwrap(),
            "-o",
            temp_dir.path().join("fr.json").to_str().unwrap(),
            "-t",
            "fr",
            "--config",
            &config,
        ])
        .env("OPENAI_API_KEY", "sk-test")
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert!(stderr(&output).contains("unsupported provider `deepl`"));
}

#[test]
fn test_cli_translate_rejects_invalid_language() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("en.json");
    fs::write(&input, r#"{"a": "Hello"}"#).unwrap();

    let output = lingoflow_cmd()
        .args([
            "translate",
            "-i",
            input.to_str().unwrap(),
            "-o",
            temp_dir.path().join("out.json").to_str().unwrap(),
            "-t",
            "not a language",
        ])
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert!(stderr(&output).contains("Invalid language code format"));
}

#[test]
fn test_cli_translate_end_to_end_with_batch_backend() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/api/v1/translation/translate-batch")
        .match_header("X-Api-Key", "alg-test")
        .match_body(mockito::Matcher::PartialJson(serde_json::json!({
            "texts": ["Hello", "Goodbye"],
            "sourceLanguage": "en",
            "targetLanguage": "fr"
        })))
        .with_status(200)
        .with_body(
            r#"{"data": {"translations": [
                {"index": 1, "content": "Au revoir"},
                {"index": 0, "content": "Bonjour"}
            ]}}"#,
        )
        .expect(1)
        .create();

    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("en.json");
    let output_file = temp_dir.path().join("out/fr.json");
    fs::write(
        &input,
        r#"{"greeting": "Hello", "nested": {"bye": "Goodbye"}, "count": 2}"#,
    )
    .unwrap();
    let config = write_config(
        temp_dir.path(),
        &format!(
            "languages: [en, fr]\napi:\n  provider: algebras-ai\n  base_url: {}\n\
             cache:\n  path: cache.json\n",
            server.url()
        ),
    );

    let run = || {
        lingoflow_cmd()
            .args([
                "translate",
                "-i",
                input.to_str().unwrap(),
                "-o",
                output_file.to_str().unwrap(),
                "-t",
                "fr",
                "--config",
                &config,
            ])
            .env("ALGEBRAS_API_KEY", "alg-test")
            .output()
            .unwrap()
    };

    let output = run();
    assert!(output.status.success(), "CLI failed: {}", stderr(&output));
    let written: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&output_file).unwrap()).unwrap();
    assert_eq!(
        written,
        serde_json::json!({"greeting": "Bonjour", "nested": {"bye": "Au revoir"}, "count": 2})
    );

    // Second run is served from the cache.
    let output = run();
    assert!(output.status.success(), "CLI failed: {}", stderr(&output));
    mock.assert();

    let stats = lingoflow_cmd()
        .args(["cache", "stats", "--config", &config])
        .output()
        .unwrap();
    assert!(stats.status.success());
    assert!(stdout(&stats).contains("Entries: 2 / 10000"), "{}", stdout(&stats));
}

#[test]
fn test_cli_cache_clear() {
    let temp_dir = TempDir::new().unwrap();
    let config = write_config(temp_dir.path(), "cache:\n  path: cache.json\n");
    fs::write(
        temp_dir.path().join("cache.json"),
        r#"{"[\"a\",\"en\",\"fr\",false]": "b", "[\"c\",\"en\",\"fr\",false]": "d"}"#,
    )
    .unwrap();

    let output = lingoflow_cmd()
        .args(["cache", "clear", "--config", &config])
        .output()
        .unwrap();
    assert!(output.status.success(), "CLI failed: {}", stderr(&output));
    assert!(stdout(&output).contains("Removed 2 cached translations"));

    let stats = lingoflow_cmd()
        .args(["cache", "stats", "--config", &config])
        .output()
        .unwrap();
    assert!(stdout(&stats).contains("Entries: 0"));
}

#[test]
fn test_cli_retranslate_requires_key() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("en.json");
    fs::write(&input, r#"{"a": "Hello"}"#).unwrap();

    let output = lingoflow_cmd()
        .args([
            "retranslate",
            "-i",
            input.to_str().unwrap(),
            "-o",
            temp_dir.path().join("fr.json").to_str().unwrap(),
            "-t",
            "fr",
        ])
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert!(stderr(&output).contains("--key"));
}

#[test]
fn test_cli_translate_project_into_every_language() {
    let mut server = mockito::Server::new();
    let mocks: Vec<_> = [("fr", "Bonjour", "Au revoir"), ("de", "Hallo", "Tschüss")]
        .into_iter()
        .map(|(lang, hello, bye)| {
            server
                .mock("POST", "/api/v1/translation/translate-batch")
                .match_body(mockito::Matcher::PartialJson(serde_json::json!({
                    "texts": ["Hello", "Goodbye"],
                    "sourceLanguage": "en",
                    "targetLanguage": lang
                })))
                .with_status(200)
                .with_body(
                    serde_json::json!({"data": {"translations": [
                        {"index": 0, "content": hello},
                        {"index": 1, "content": bye}
                    ]}})
                    .to_string(),
                )
                .expect(1)
                .create()
        })
        .collect();

    let temp_dir = TempDir::new().unwrap();
    fs::create_dir(temp_dir.path().join("locales")).unwrap();
    fs::write(
        temp_dir.path().join("locales/en.json"),
        r#"{"hello": "Hello", "bye": "Goodbye"}"#,
    )
    .unwrap();
    write_config(
        temp_dir.path(),
        &format!(
            "languages: [en, fr, de]\napi:\n  provider: algebras-ai\n  base_url: {}\n\
             cache:\n  enabled: false\n",
            server.url()
        ),
    );

    let output = lingoflow_cmd()
        .current_dir(temp_dir.path())
        .args(["translate", "-i", "locales/{lang}.json"])
        .env("ALGEBRAS_API_KEY", "alg-test")
        .output()
        .unwrap();

    assert!(output.status.success(), "CLI failed: {}", stderr(&output));
    for mock in &mocks {
        mock.assert();
    }
    let read = |lang: &str| -> serde_json::Value {
        let path = temp_dir.path().join(format!("locales/{lang}.json"));
        serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
    };
    assert_eq!(read("fr"), serde_json::json!({"hello": "Bonjour", "bye": "Au revoir"}));
    assert_eq!(read("de"), serde_json::json!({"hello": "Hallo", "bye": "Tschüss"}));
    assert_eq!(read("en"), serde_json::json!({"hello": "Hello", "bye": "Goodbye"}));
}

#[test]
fn test_cli_translate_project_rejects_unconfigured_language() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(temp_dir.path().join("en.json"), r#"{"a": "Hello"}"#).unwrap();
    write_config(temp_dir.path(), "languages: [en, fr]\n");

    let output = lingoflow_cmd()
        .current_dir(temp_dir.path())
        .args(["translate", "-i", "{lang}.json", "-l", "de"])
        .env("OPENAI_API_KEY", "sk-test")
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("`de` is not configured"), "{}", stderr(&output));
    assert!(!temp_dir.path().join("de.json").exists());
}

#[test]
fn test_cli_translate_single_file_requires_output() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("en.json");
    fs::write(&input, r#"{"a": "Hello"}"#).unwrap();

    let output = lingoflow_cmd()
        .args(["translate", "-i", input.to_str().unwrap(), "-t", "fr"])
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert!(stderr(&output).contains("--output is required"), "{}", stderr(&output));
}

#[test]
fn test_cli_translate_no_batch_sends_single_requests() {
    let mut server = mockito::Server::new();
    let single = server
        .mock("POST", "/api/v1/translation/translate")
        .with_status(200)
        .with_body(r#"{"data": "Bonjour"}"#)
        .expect(2)
        .create();
    let batch = server
        .mock("POST", "/api/v1/translation/translate-batch")
        .expect(0)
        .create();

    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("en.json");
    let output_file = temp_dir.path().join("fr.json");
    fs::write(&input, r#"{"a": "Hello", "b": {"c": "Hi"}}"#).unwrap();
    let config = write_config(
        temp_dir.path(),
        &format!(
            "languages: [en, fr]\napi:\n  provider: algebras-ai\n  base_url: {}\n\
             cache:\n  enabled: false\n",
            server.url()
        ),
    );

    let output = lingoflow_cmd()
        .args([
            "translate",
            "-i",
            input.to_str().unwrap(),
            "-o",
            output_file.to_str().unwrap(),
            "--language",
            "fr",
            "--no-batch",
            "--config",
            &config,
        ])
        .env("ALGEBRAS_API_KEY", "alg-test")
        .output()
        .unwrap();

    assert!(output.status.success(), "CLI failed: {}", stderr(&output));
    single.assert();
    batch.assert();
    let written: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&output_file).unwrap()).unwrap();
    assert_eq!(written, serde_json::json!({"a": "Bonjour", "b": {"c": "Bonjour"}}));
}
