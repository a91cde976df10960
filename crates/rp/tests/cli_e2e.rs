//! End-to-end tests driving the `rp` binary.
//!
//! Every test runs in its own sandbox: a temporary config file pointing the
//! cache at a temporary directory, so nothing touches the real XDG dirs.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

use serde_json::Value;
use tempfile::TempDir;

const ACCOUNT_SPEC: &str = r#"{
    "selectedSObject": "Account",
    "selectedFilters": [
        {"id": "a1", "field": "Name", "type": "text", "selectedCondition": "equals", "value": "Acme"},
        {"id": "a2", "field": "Industry", "type": "picklist", "selectedCondition": "equals", "value": "Banking"}
    ],
    "selectedFilterLogic": "0 AND 1"
}"#;

const DATATABLE: &str = r#"{
    "columns": [{"label": "Account Name", "fieldName": "Name", "type": "text"}],
    "records": [{"Id": "001A", "Name": "Acme"}, {"Id": "001B", "Name": "Acme"}],
    "totalCount": 2
}"#;

struct Sandbox {
    dir: TempDir,
    config_path: PathBuf,
}

impl Sandbox {
    fn new() -> Self {
        let dir = TempDir::new().expect("failed to create sandbox");
        let cache_dir = dir.path().join("cache");
        let config_path = dir.path().join("config.toml");
        fs::write(
            &config_path,
            format!(
                "version = 1\n\n[cache]\ndir = {:?}\n",
                cache_dir.display().to_string()
            ),
        )
        .expect("failed to write config");

        Self { dir, config_path }
    }

    fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        fs::write(&path, contents).expect("failed to write fixture");
        path
    }

    fn command(&self, args: &[&str]) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_rp"));
        cmd.args(args);
        cmd.env("RP_CONFIG", &self.config_path);
        cmd.env("XDG_CONFIG_HOME", self.dir.path().join("xdg-config"));
        cmd.env("XDG_CACHE_HOME", self.dir.path().join("xdg-cache"));
        cmd.env("NO_COLOR", "1");
        cmd.env_remove("RP_LOG");
        cmd
    }

    fn run(&self, args: &[&str]) -> Output {
        self.command(args).output().expect("failed to run rp")
    }

    fn run_ok(&self, args: &[&str]) -> String {
        let output = self.run(args);
        assert!(
            output.status.success(),
            "rp failed\nargs: {:?}\nstatus: {}\nstdout:\n{}\nstderr:\n{}",
            args,
            output.status,
            String::from_utf8_lossy(&output.stdout),
            String::from_utf8_lossy(&output.stderr),
        );
        String::from_utf8_lossy(&output.stdout).into_owned()
    }

    fn run_json(&self, args: &[&str]) -> Value {
        let mut full = vec!["--json"];
        full.extend_from_slice(args);
        let stdout = self.run_ok(&full);
        serde_json::from_str(&stdout)
            .unwrap_or_else(|err| panic!("invalid JSON from {args:?}: {err}\n{stdout}"))
    }
}

fn path_str(path: &Path) -> &str {
    path.to_str().expect("non-UTF-8 temp path")
}

#[test]
fn test_logic_validate_accepts_well_formed_expression() {
    let sandbox = Sandbox::new();
    let stdout = sandbox.run_ok(&["logic", "validate", "0 AND (1 OR 2)", "--count", "3"]);
    assert_eq!(stdout.trim(), "✓ valid");
}

#[test]
fn test_logic_validate_reports_missing_index() {
    let sandbox = Sandbox::new();
    let output = sandbox.run(&["--json", "logic", "validate", "0 AND 5", "-n", "2"]);
    assert_eq!(output.status.code(), Some(1));

    let result: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(result["isValid"], false);
    assert_eq!(result["error"], "Index \"5\" does not exist");

    let envelope: Value = serde_json::from_slice(&output.stderr).unwrap();
    assert_eq!(envelope["error"]["code"], "INVALID_LOGIC");
}

#[test]
fn test_logic_validate_strict_rejects_trailing_operator() {
    let sandbox = Sandbox::new();
    sandbox.run_ok(&["logic", "validate", "1 AND", "-n", "2"]);

    let output = sandbox.run(&["logic", "validate", "1 AND", "-n", "2", "--strict"]);
    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Filter logic cannot end with a logical operator"));
}

#[test]
fn test_logic_rewrites() {
    let sandbox = Sandbox::new();
    assert_eq!(
        sandbox.run_ok(&["logic", "remove", "(0 OR 1) AND 2", "0"]).trim(),
        "( 0 ) AND 1"
    );
    assert_eq!(sandbox.run_ok(&["logic", "append", "", "0"]).trim(), "0");
    assert_eq!(
        sandbox.run_json(&["logic", "append", "0 OR 1", "2"])["logic"],
        "0 OR 1 AND 2"
    );
}

#[test]
fn test_logic_tokens_json() {
    let sandbox = Sandbox::new();
    let json = sandbox.run_json(&["logic", "tokens", "0 AND x"]);
    assert_eq!(json["tokens"].as_array().unwrap().len(), 2);
    assert_eq!(json["skipped"][0]["character"], "x");
}

#[test]
fn test_signature_from_file_and_stdin() {
    let sandbox = Sandbox::new();
    let spec = sandbox.write("spec.json", ACCOUNT_SPEC);

    assert_eq!(sandbox.run_ok(&["signature", path_str(&spec)]).trim(), "1mckejz");

    let mut child = sandbox
        .command(&["--json", "signature", "-"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .expect("failed to spawn rp");
    child
        .stdin
        .take()
        .unwrap()
        .write_all(ACCOUNT_SPEC.as_bytes())
        .unwrap();
    let output = child.wait_with_output().unwrap();
    assert!(output.status.success());

    let json: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["signature"], "1mckejz");
    assert_eq!(json["key"], "ftg:datatable:v1:Account:1mckejz");
}

#[test]
fn test_cache_round_trip() {
    let sandbox = Sandbox::new();
    let spec = sandbox.write("spec.json", ACCOUNT_SPEC);
    let table = sandbox.write("table.json", DATATABLE);

    let miss = sandbox.run_json(&["cache", "get", path_str(&spec)]);
    assert_eq!(miss["hit"], false);

    let stored = sandbox.run_json(&["cache", "put", path_str(&spec), path_str(&table)]);
    assert_eq!(stored["key"], "ftg:datatable:v1:Account:1mckejz");
    assert_eq!(stored["recordCount"], 2);

    let hit = sandbox.run_json(&["cache", "get", path_str(&spec)]);
    assert_eq!(hit["hit"], true);
    assert_eq!(hit["snapshot"]["records"][1]["Id"], "001B");
    assert_eq!(hit["snapshot"]["totalCount"], 2);

    let edited = sandbox.write("edited.json", &ACCOUNT_SPEC.replace("Banking", "Retail"));
    assert_eq!(
        sandbox.run_json(&["cache", "get", path_str(&edited)])["hit"],
        false
    );

    let entries = sandbox.run_json(&["cache", "list", "Account"]);
    assert_eq!(entries.as_array().unwrap().len(), 1);

    let paths = sandbox.run_json(&["cache", "path"]);
    let records = PathBuf::from(paths["records"].as_str().unwrap());
    assert!(records.exists());
}

#[test]
fn test_cache_disabled_exits_with_config_error() {
    let sandbox = Sandbox::new();
    fs::write(&sandbox.config_path, "[cache]\nenabled = false\n").unwrap();
    let spec = sandbox.write("spec.json", ACCOUNT_SPEC);

    let output = sandbox.run(&["cache", "get", path_str(&spec)]);
    assert_eq!(output.status.code(), Some(5));
}

#[test]
fn test_input_errors() {
    let sandbox = Sandbox::new();

    let missing = sandbox.dir.path().join("absent.json");
    let output = sandbox.run(&["signature", path_str(&missing)]);
    assert_eq!(output.status.code(), Some(3));

    let broken = sandbox.write("broken.json", "{ not json");
    let output = sandbox.run(&["--json", "signature", path_str(&broken)]);
    assert_eq!(output.status.code(), Some(1));
    let envelope: Value = serde_json::from_slice(&output.stderr).unwrap();
    assert_eq!(envelope["error"]["code"], "INVALID_INPUT");
}

#[test]
fn test_config_path_follows_override() {
    let sandbox = Sandbox::new();
    let other = sandbox.dir.path().join("other.toml");
    let stdout = sandbox.run_ok(&["--config", path_str(&other), "config", "path"]);
    assert_eq!(stdout.trim(), other.display().to_string());

    let shown = sandbox.run_json(&["config", "show"]);
    assert_eq!(shown["exists"], true);
    assert_eq!(shown["config"]["version"], 1);
}
