//! Tests for the `boic` binary
//!
//! Each test builds a small jewel in a temporary directory and runs one
//! subcommand against it.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write(root: &Path, name: &str, content: &str) {
    let path = root.join(name);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

fn jewel() -> TempDir {
    let temp = TempDir::new().unwrap();
    let root = temp.path();
    write(root, "AIOT/Depot.md", "---\ntype: AIOT\nnom: Depot\n---\n");
    write(root, "AIOT/Nord.md", "---\ntype: AIOT\nnom: Usine Nord\n---\n");
    write(root, "AIOT/Sud.md", "---\ntype: AIOT\nnom: Usine Sud\n---\n");
    write(
        root,
        "Inspections/2024-01.md",
        "---\ntype: INSPECTION\na: jewel://AIOT/Nord.md\n---\n",
    );
    temp
}

fn boic(jewel: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("boic").unwrap();
    cmd.env_remove("RUST_LOG").arg("--jewel").arg(jewel.path());
    cmd
}

// ============================================================================
// execute
// ============================================================================

#[test]
fn test_execute_prints_table() {
    let jewel = jewel();

    boic(&jewel)
        .args(["execute", "SELECT nom FROM AIOT WHERE nom LIKE '%Usine%'"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Usine Nord"))
        .stdout(predicate::str::contains("Usine Sud"))
        .stdout(predicate::str::contains("Depot").not());
}

#[test]
fn test_execute_json() {
    let jewel = jewel();

    let output = boic(&jewel)
        .args(["execute", "--format", "json", "SELECT a.nom AS site FROM INSPECTION"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let rows: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(rows, serde_json::json!([{ "site": "Usine Nord" }]));
}

#[test]
fn test_execute_reads_stdin() {
    let jewel = jewel();

    boic(&jewel)
        .arg("execute")
        .write_stdin("SELECT nom\nFROM AIOT\nWHERE nom = 'Depot';\nignored\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Depot"))
        .stdout(predicate::str::contains("Usine").not());
}

#[test]
fn test_execute_explain() {
    let jewel = jewel();

    boic(&jewel)
        .args(["execute", "--explain", "SELECT nom FROM AIOT"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Scan #1 ("))
        .stdout(predicate::str::contains("source=OpenCorpus #0 ("))
        .stdout(predicate::str::contains("type=AIOT"));
}

#[test]
fn test_execute_reports_errors() {
    let jewel = jewel();

    boic(&jewel)
        .args(["execute", "SELECT FROM AIOT"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("ShQL syntax error"));

    boic(&jewel)
        .args(["execute", "INSERT INTO AIOT (nom) VALUES ('Usine Est')"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Insert"));
}

#[test]
fn test_malformed_shard_is_skipped_with_warning() {
    let jewel = jewel();
    write(jewel.path(), "AIOT/Casse.md", "---\ntype: AIOT\nnom: [\n---\n");

    boic(&jewel)
        .args(["execute", "SELECT nom FROM AIOT"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Usine Sud"))
        .stderr(predicate::str::contains("Skipping malformed shard"));

    write(jewel.path(), "jewel.yml", "scan:\n  on_error: fail\n");
    boic(&jewel)
        .args(["execute", "SELECT nom FROM AIOT"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Casse.md"));
}

// ============================================================================
// list, resolve, walk
// ============================================================================

#[test]
fn test_list_by_type() {
    let jewel = jewel();

    boic(&jewel)
        .args(["list", "--type", "AIOT"])
        .assert()
        .success()
        .stdout(predicate::str::contains("AIOT(type=AIOT, nom=Depot"))
        .stdout(predicate::str::contains("INSPECTION").not());

    let output = boic(&jewel).arg("list").output().unwrap();
    assert_eq!(String::from_utf8_lossy(&output.stdout).lines().count(), 4);
}

#[test]
fn test_resolve_follows_links() {
    let jewel = jewel();
    write(jewel.path(), "Sites.jlnk", "AIOT\n");

    boic(&jewel)
        .args(["resolve", "jewel://Sites/Nord.md"])
        .assert()
        .success()
        .stdout(predicate::str::ends_with("AIOT/Nord.md\n"));
}

#[test]
fn test_walk_depth() {
    let jewel = jewel();

    boic(&jewel)
        .arg("walk")
        .assert()
        .success()
        .stdout(predicate::str::contains("  AIOT/"))
        .stdout(predicate::str::contains("jewel:///AIOT\n"))
        .stdout(predicate::str::contains("  Nord.md"));

    boic(&jewel)
        .args(["walk", "-d", "0"])
        .assert()
        .success()
        .stdout(predicate::str::contains("  AIOT/"))
        .stdout(predicate::str::contains("Nord.md").not());
}

#[test]
fn test_jewel_from_environment() {
    let jewel = jewel();

    Command::cargo_bin("boic")
        .unwrap()
        .env("JEWEL_PATH", jewel.path())
        .args(["list", "-t", "INSPECTION"])
        .assert()
        .success()
        .stdout(predicate::str::contains("INSPECTION("));
}

#[test]
fn test_missing_jewel_root() {
    let jewel = jewel();

    Command::cargo_bin("boic")
        .unwrap()
        .arg("--jewel")
        .arg(jewel.path().join("absent"))
        .arg("list")
        .assert()
        .failure()
        .stderr(predicate::str::contains("is not a directory"));
}
