use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

const SCHEME: &str = "[General]\nName=Cli Test\n\n[WM]\nactiveBackground=1,2,3\nactiveForeground=250,250,250\n";

fn write_fixture(dir: &TempDir, settings: &str) -> (PathBuf, PathBuf) {
    let scheme = dir.path().join("CliTest.colors");
    fs::write(&scheme, SCHEME).unwrap();
    let config = dir.path().join("scheme-colors.toml");
    fs::write(&config, settings).unwrap();
    (scheme, config)
}

fn run_show_json(config: &Path, scheme: &Path) -> Output {
    Command::new(env!("CARGO_BIN_EXE_scheme-colors"))
        .arg("--config")
        .arg(config)
        .arg("show")
        .arg(scheme)
        .arg("--json")
        .output()
        .unwrap()
}

fn assert_json_report(output: &Output) {
    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let report: serde_json::Value = serde_json::from_slice(&output.stdout)
        .unwrap_or_else(|e| panic!("stdout is not JSON ({}): {}", e, String::from_utf8_lossy(&output.stdout)));
    assert_eq!(report["scheme_name"], "Cli Test");
    assert_eq!(report["source"], "window-manager");
    assert_eq!(report["colors"]["background"], "#010203");
    assert_eq!(report["colors"]["highlight"], serde_json::Value::Null);
}

#[test]
fn test_show_json_with_log_file_keeps_stdout_clean() {
    let dir = TempDir::new().unwrap();
    let log_file = dir.path().join("logs").join("scheme-colors.log");
    let settings = format!(
        "[logging]\nlevel = \"info\"\nfile_path = {:?}\n",
        log_file.to_string_lossy()
    );
    let (scheme, config) = write_fixture(&dir, &settings);

    let output = run_show_json(&config, &scheme);
    assert_json_report(&output);
    assert!(String::from_utf8_lossy(&output.stderr).contains("Loaded 2 of 13 colors"));
}

#[test]
fn test_show_json_with_json_logs_keeps_stdout_clean() {
    let dir = TempDir::new().unwrap();
    let (scheme, config) = write_fixture(&dir, "[logging]\nlevel = \"debug\"\nformat = \"json\"\n");

    let output = run_show_json(&config, &scheme);
    assert_json_report(&output);
}
