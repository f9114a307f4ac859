//! Integration tests for `logconf render`, `validate` and `technologies`.
//!
//! Runs the built binary against real config files in a temp directory.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;

const VALID_CONFIG: &str = r#"
[general]
log_level = "warn"
log_format = "json"

[module]
name = "patient-api"

[[module.log_sources]]
name = "php"
container = "app"

[[module.log_sources]]
name = "nginx"
container = "web"
"#;

fn logconf(config: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_logconf"))
        .arg("--config")
        .arg(config)
        .args(args)
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG")
        .env_remove("LOGCONF_GENERAL_LOG_LEVEL")
        .env_remove("LOGCONF_GENERAL_LOG_FORMAT")
        .env_remove("LOGCONF_MODULE_NAME")
        .env_remove("LOGCONF_MODULE_LOG_SOURCES")
        .output()
        .expect("should run logconf binary")
}

fn write_config(dir: &TempDir, file_name: &str, content: &str) -> std::path::PathBuf {
    let path = dir.path().join(file_name);
    fs::write(&path, content).expect("should write config");
    path
}

fn stdout(output: &Output) -> String {
    String::from_utf8(output.stdout.clone()).expect("valid UTF-8")
}

#[test]
fn test_render_prints_fluent_bit_stanzas() {
    // Given: A config with php and nginx sources
    let temp_dir = TempDir::new().expect("should create temp dir");
    let config_path = write_config(&temp_dir, "logconf.toml", VALID_CONFIG);

    // When: Rendering all sections
    let output = logconf(&config_path, &["render"]);

    // Then: Parsers and container-scoped filters are printed
    assert!(output.status.success(), "render should succeed");
    let text = stdout(&output);
    assert!(text.contains("# module: patient-api"));
    assert_eq!(text.matches("[PARSER]").count(), 3 + 5 + 4);
    assert!(text.contains("Match          *app*"));
    assert!(text.contains("Match          *web*"));
}

#[test]
fn test_render_filters_section_only() {
    // Given: A valid config
    let temp_dir = TempDir::new().expect("should create temp dir");
    let config_path = write_config(&temp_dir, "logconf.toml", VALID_CONFIG);

    // When: Rendering only filters
    let output = logconf(&config_path, &["render", "--section", "filters"]);

    // Then: No parser stanzas appear
    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.starts_with("[FILTER]\n"));
    assert!(!text.contains("[PARSER]"));
}

#[test]
fn test_render_json_output() {
    // Given: A YAML config
    let temp_dir = TempDir::new().expect("should create temp dir");
    let config_path = write_config(
        &temp_dir,
        "logconf.yaml",
        "module:\n  name: api\n  log_sources:\n    - name: dotnet\n      container: worker\n",
    );

    // When: Rendering as JSON
    let output = logconf(&config_path, &["--output", "json", "render"]);

    // Then: The record lists are machine-readable
    assert!(output.status.success());
    let json: serde_json::Value =
        serde_json::from_str(&stdout(&output)).expect("stdout should be JSON");
    assert_eq!(json["module"], "api");
    assert_eq!(json["log_config_parsers"].as_array().map(Vec::len), Some(4));
    assert_eq!(json["log_config_filters"][0]["match"], "*worker*");
    assert_eq!(json["log_config_filters"][0]["parser"][0], "dotnet_json");
    assert_eq!(
        json["log_config_filters"][1]["rename_fields"]["@l"],
        "level"
    );
}

#[test]
fn test_render_unknown_technology_exits_with_composition_code() {
    // Given: A config naming an unregistered technology
    let temp_dir = TempDir::new().expect("should create temp dir");
    let config_path = write_config(
        &temp_dir,
        "logconf.toml",
        "[module]\nname = \"api\"\nlog_sources = [{ name = \"tomcat\" }]\n",
    );

    // When: Rendering
    let output = logconf(&config_path, &["render"]);

    // Then: Nothing is printed and the exit code is 3
    assert_eq!(output.status.code(), Some(3));
    assert!(stdout(&output).is_empty(), "no partial output");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("tomcat"));
}

#[test]
fn test_render_missing_file_exits_with_config_code() {
    // Given: A nonexistent config path
    let temp_dir = TempDir::new().expect("should create temp dir");
    let config_path = temp_dir.path().join("missing.toml");

    // When: Rendering
    let output = logconf(&config_path, &["render"]);

    // Then: Exit code 2
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_validate_reports_counts() {
    // Given: A valid config
    let temp_dir = TempDir::new().expect("should create temp dir");
    let config_path = write_config(&temp_dir, "logconf.toml", VALID_CONFIG);

    // When: Validating as JSON
    let output = logconf(&config_path, &["validate", "--output", "json"]);

    // Then: The report carries the composed counts
    assert!(output.status.success());
    let json: serde_json::Value =
        serde_json::from_str(&stdout(&output)).expect("stdout should be JSON");
    assert_eq!(json["valid"], true);
    assert_eq!(json["log_sources"], 2);
    assert_eq!(json["parsers"], 12);
    assert_eq!(json["filters"], 6);
}

#[test]
fn test_validate_invalid_custom_parser() {
    // Given: A regex parser without a regex
    let temp_dir = TempDir::new().expect("should create temp dir");
    let config_path = write_config(
        &temp_dir,
        "logconf.toml",
        r#"
[module]
name = "api"

[[module.custom_parsers]]
name = "broken"
format = "regex"
"#,
    );

    // When: Validating
    let output = logconf(&config_path, &["validate"]);

    // Then: The report is printed and the exit code is 3
    assert_eq!(output.status.code(), Some(3));
    let text = stdout(&output);
    assert!(text.contains("INVALID"));
    assert!(text.contains("broken"));
}

#[test]
fn test_validate_bad_log_level_is_config_error() {
    // Given: An invalid log level in [general]
    let temp_dir = TempDir::new().expect("should create temp dir");
    let config_path = write_config(
        &temp_dir,
        "logconf.toml",
        "[general]\nlog_level = \"verbose\"\n\n[module]\nname = \"api\"\n",
    );

    // When: Validating
    let output = logconf(&config_path, &["validate"]);

    // Then: Exit code 2
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn test_unknown_log_level_flag_is_usage_error() {
    // Given: A valid config
    let temp_dir = TempDir::new().expect("should create temp dir");
    let config_path = write_config(&temp_dir, "logconf.toml", VALID_CONFIG);

    // When: Passing a log level outside trace/debug/info/warn/error
    let output = logconf(&config_path, &["--log-level", "verbose", "render"]);

    // Then: clap rejects it before anything is rendered
    assert_eq!(output.status.code(), Some(2));
    assert!(stdout(&output).is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("verbose"));
}

#[test]
fn test_technologies_does_not_need_config() {
    // Given: No config file at all
    let temp_dir = TempDir::new().expect("should create temp dir");
    let config_path = temp_dir.path().join("absent.toml");

    // When: Listing technologies
    let output = logconf(&config_path, &["technologies", "--output", "json"]);

    // Then: The built-in list is printed
    assert!(output.status.success());
    let json: serde_json::Value =
        serde_json::from_str(&stdout(&output)).expect("stdout should be JSON");
    assert_eq!(json["total"], 4);
    assert_eq!(json["technologies"][2]["key"], "datadog");
    assert_eq!(
        json["technologies"][2]["parsers"].as_array().map(Vec::len),
        Some(0)
    );
}
