use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;

fn dirscan(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_dirscan"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run dirscan")
}

fn source_tree() -> TempDir {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("a.txt"), "abcd").unwrap();
    fs::create_dir(temp.path().join("sub")).unwrap();
    fs::write(temp.path().join("sub/b.txt"), "b").unwrap();
    temp
}

fn path_str(path: &Path) -> &str {
    path.to_str().unwrap()
}

#[test]
fn test_version_flag() {
    let output = dirscan(&["--version"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("dirscan "));
    assert!(stdout.contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_scan_writes_json() {
    let source = source_tree();
    let out = TempDir::new().unwrap();
    let dest = out.path().join("scan.json");

    let output = dirscan(&[
        "--dir",
        path_str(source.path()),
        "--out",
        path_str(&dest),
        "--depth",
        "2",
        "--no-progress",
    ]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let text = fs::read_to_string(&dest).unwrap();
    let json: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(json["a.txt"]["size"], 4);
    assert_eq!(json["sub"]["children"]["b.txt"]["type"], "file");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Scan complete"));
}

#[test]
fn test_default_depth_is_three() {
    let source = TempDir::new().unwrap();
    fs::create_dir_all(source.path().join("one/two/three")).unwrap();
    let out = TempDir::new().unwrap();
    let dest = out.path().join("scan.json");

    let output = dirscan(&["-d", path_str(source.path()), "-o", path_str(&dest), "--no-progress"]);
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(&dest).unwrap()).unwrap();
    let two = &json["one"]["children"]["two"];
    assert_eq!(two["type"], "directory");
    assert!(two["children"].as_object().unwrap().is_empty());
}

#[test]
fn test_not_a_directory_writes_nothing() {
    let source = source_tree();
    let out = TempDir::new().unwrap();
    let dest = out.path().join("scan.json");

    let output = dirscan(&[
        "--dir",
        path_str(&source.path().join("a.txt")),
        "--out",
        path_str(&dest),
        "--no-progress",
    ]);

    assert_eq!(output.status.code(), Some(1));
    assert!(!dest.exists());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Not a directory"));
}

#[test]
fn test_cancelled_output_selection_exits_cleanly() {
    let source = source_tree();

    let output = dirscan(&["--dir", path_str(source.path()), "--no-interactive"]);

    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("No output file selected"));
}

#[test]
fn test_cancelled_directory_selection_exits_cleanly() {
    let output = dirscan(&["--no-interactive"]);

    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("No directory selected"));
}

#[test]
fn test_unwritable_destination_fails() {
    let source = source_tree();
    let out = TempDir::new().unwrap();
    let dest = out.path().join("missing/dir/scan.json");

    let output = dirscan(&[
        "--dir",
        path_str(source.path()),
        "--out",
        path_str(&dest),
        "--no-progress",
    ]);

    assert!(!output.status.success());
    assert!(!dest.exists());
}

#[test]
fn test_zero_depth_is_a_usage_error() {
    let source = source_tree();
    let output = dirscan(&["--dir", path_str(source.path()), "--depth", "0"]);
    assert_eq!(output.status.code(), Some(2));
}
