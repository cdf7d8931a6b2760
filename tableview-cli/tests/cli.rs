//! Runs the `tableview` binary against files in a temporary directory.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

const ROWS: &str = r#"[
    {"id": 1, "name": "John Doe", "status": "Active"},
    {"id": 2, "name": "Jane Smith", "status": "Inactive"},
    {"id": 3, "name": "Jim Doe", "status": "Active"}
]"#;

fn write(dir: &Path, name: &str, contents: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).unwrap();
    path
}

fn tableview(dir: &Path, args: &[&str]) -> Output {
    let settings = write(dir, "settings.json", "{}");
    Command::new(env!("CARGO_BIN_EXE_tableview"))
        .arg("--config")
        .arg(settings)
        .args(args)
        .output()
        .unwrap()
}

#[test]
fn test_show_prints_page_and_summary() {
    let dir = tempfile::tempdir().unwrap();
    let data = write(dir.path(), "rows.json", ROWS);

    let output = tableview(
        dir.path(),
        &["show", "--data", data.to_str().unwrap(), "--search", "doe", "--sort", "id:desc"],
    );
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines[0], "id  name      status");
    assert_eq!(lines[2], "3   Jim Doe   Active");
    assert_eq!(lines[3], "1   John Doe  Active");
    assert!(stdout.ends_with("Page 1 of 1 | 2 of 3 row(s)\n"));
}

#[test]
fn test_export_writes_csv() {
    let dir = tempfile::tempdir().unwrap();
    let data = write(dir.path(), "rows.json", ROWS);
    let out = dir.path().join("out");
    std::fs::create_dir(&out).unwrap();

    let output = tableview(
        dir.path(),
        &[
            "export",
            "--data",
            data.to_str().unwrap(),
            "--hide",
            "status",
            "--filter",
            "name=jane",
            "--out",
            out.to_str().unwrap(),
        ],
    );
    assert!(output.status.success());

    let path = PathBuf::from(String::from_utf8(output.stdout).unwrap().trim());
    assert!(path.starts_with(&out));
    assert_eq!(
        std::fs::read_to_string(path).unwrap(),
        "\"id\",\"name\"\n\"2\",\"Jane Smith\""
    );
}

#[test]
fn test_unknown_column_fails() {
    let dir = tempfile::tempdir().unwrap();
    let data = write(dir.path(), "rows.json", ROWS);

    let output = tableview(dir.path(), &["show", "--data", data.to_str().unwrap(), "--sort", "age"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("Error:"));
}
