// End-to-end tests driving the canon binary against a temporary library
// directory. Each test gets its own --dir so runs never share state.

use std::fs;
use std::path::Path;
use std::process::{Command, Output};

use tempfile::tempdir;

fn canon(dir: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_canon"));
    cmd.arg("--dir").arg(dir);
    cmd
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

/// A two-cluster payload with one standard each.
fn write_payload(dir: &Path) -> std::path::PathBuf {
    let file = dir.join("payload.json");
    fs::write(
        &file,
        serde_json::json!({
            "clusters": [
                {"id": "ENH", "name": "Empathy & Non-Harm", "description": "", "order": 1},
                {"id": "JE", "name": "Justice & Equity", "description": "", "order": 2},
            ],
            "standards": [
                {
                    "id": "ENH-1", "name": "Do No Harm", "cluster": "ENH",
                    "mac_vector": {"family": 0.2, "group": 0.3, "reciprocity": 0.5},
                    "impacted_emotions": ["Valence", "Social Impact"]
                },
                {
                    "id": "JE-1", "name": "Fair Division", "cluster": "JE",
                    "mac_vector": {"fairness": 1.0}
                },
            ]
        })
        .to_string(),
    )
    .unwrap();
    file
}

fn import_payload(dir: &Path) {
    let file = write_payload(dir);
    let output = canon(dir).arg("import").arg(&file).output().unwrap();
    assert!(output.status.success(), "import failed: {}", stderr(&output));
}

// ===========================================================================
// Import
// ===========================================================================

#[test]
fn import_prints_the_merge_report_and_persists() {
    let tmp = tempdir().unwrap();
    let file = write_payload(tmp.path());

    let output = canon(tmp.path()).arg("import").arg(&file).output().unwrap();
    assert!(output.status.success(), "stderr: {}", stderr(&output));

    let report: serde_json::Value = serde_json::from_str(stdout(&output).trim()).unwrap();
    assert_eq!(report["clusters_added"], 2);
    assert_eq!(report["standards_added"], 2);
    assert_eq!(report["standards_skipped"], 0);

    assert!(tmp.path().join("library.json").is_file());
}

#[test]
fn reimport_reports_updates_not_adds() {
    let tmp = tempdir().unwrap();
    import_payload(tmp.path());

    let file = tmp.path().join("payload.json");
    let output = canon(tmp.path()).arg("import").arg(&file).output().unwrap();
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_str(stdout(&output).trim()).unwrap();
    assert_eq!(report["standards_added"], 0);
    assert_eq!(report["standards_updated"], 2);
}

#[test]
fn import_rejects_a_malformed_document() {
    let tmp = tempdir().unwrap();
    let file = tmp.path().join("broken.json");
    fs::write(&file, "not json").unwrap();

    let output = canon(tmp.path()).arg("import").arg(&file).output().unwrap();
    assert!(!output.status.success());
    assert!(stderr(&output).contains("invalid import document"));
}

// ===========================================================================
// List / show
// ===========================================================================

#[test]
fn list_filters_by_cluster() {
    let tmp = tempdir().unwrap();
    import_payload(tmp.path());

    let output = canon(tmp.path())
        .args(["list", "--clusters", "JE"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("JE-1"));
    assert!(!text.contains("ENH-1"));
    assert!(text.contains("1 standard(s)"));
}

#[test]
fn list_rejects_combined_categorical_flags() {
    let tmp = tempdir().unwrap();
    let output = canon(tmp.path())
        .args(["list", "--clusters", "JE", "--focus", "Action"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(stderr(&output).contains("at most one"));
}

#[test]
fn show_prints_one_standard_as_json() {
    let tmp = tempdir().unwrap();
    import_payload(tmp.path());

    let output = canon(tmp.path()).args(["show", "ENH-1"]).output().unwrap();
    assert!(output.status.success());
    let standard: serde_json::Value = serde_json::from_str(stdout(&output).trim()).unwrap();
    assert_eq!(standard["name"], "Do No Harm");
    assert_eq!(standard["mac_vector"]["reciprocity"], 0.5);

    let output = canon(tmp.path()).args(["show", "ghost"]).output().unwrap();
    assert!(!output.status.success());
    assert!(stderr(&output).contains("not found"));
}

// ===========================================================================
// Export / audit / delete
// ===========================================================================

#[test]
fn export_round_trips_through_a_fresh_library() {
    let source = tempdir().unwrap();
    import_payload(source.path());

    let document = source.path().join("enh.json");
    let output = canon(source.path())
        .arg("export")
        .arg(&document)
        .args(["--clusters", "ENH"])
        .output()
        .unwrap();
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("exported 1 standard(s) in 1 cluster(s)"));

    let target = tempdir().unwrap();
    let output = canon(target.path()).arg("import").arg(&document).output().unwrap();
    assert!(output.status.success());
    let report: serde_json::Value = serde_json::from_str(stdout(&output).trim()).unwrap();
    assert_eq!(report["clusters_added"], 1);
    assert_eq!(report["standards_added"], 1);
}

#[test]
fn audit_fails_on_an_unbalanced_vector() {
    let tmp = tempdir().unwrap();
    let file = tmp.path().join("lopsided.json");
    fs::write(
        &file,
        serde_json::json!({
            "clusters": [{"id": "ENH", "name": "Empathy & Non-Harm", "order": 1}],
            "standards": [{
                "id": "ENH-1", "name": "Lopsided", "cluster": "ENH",
                "mac_vector": {"family": 0.9, "group": 0.9}
            }]
        })
        .to_string(),
    )
    .unwrap();
    let output = canon(tmp.path()).arg("import").arg(&file).output().unwrap();
    assert!(output.status.success());

    let output = canon(tmp.path()).arg("audit").output().unwrap();
    assert!(!output.status.success());
    assert!(stdout(&output).contains("MAC vector sums to 1.8000"));
}

#[test]
fn delete_cluster_is_blocked_while_referenced() {
    let tmp = tempdir().unwrap();
    import_payload(tmp.path());

    let output = canon(tmp.path())
        .args(["delete", "ENH", "--cluster"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(stderr(&output).contains("conflict"));

    let output = canon(tmp.path()).args(["delete", "ENH-1"]).output().unwrap();
    assert!(output.status.success());

    let output = canon(tmp.path())
        .args(["delete", "ENH", "--cluster"])
        .output()
        .unwrap();
    assert!(output.status.success(), "stderr: {}", stderr(&output));
}

// ===========================================================================
// Backup / restore
// ===========================================================================

#[test]
fn backup_create_list_restore() {
    let tmp = tempdir().unwrap();
    import_payload(tmp.path());

    let output = canon(tmp.path()).args(["backup", "create"]).output().unwrap();
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let filename = stdout(&output).trim().to_string();
    assert!(filename.starts_with("library_backup_"));

    let output = canon(tmp.path()).args(["backup", "list"]).output().unwrap();
    assert!(stdout(&output).contains(&filename));

    // Wipe a record, then roll back to the snapshot.
    canon(tmp.path()).args(["delete", "JE-1"]).output().unwrap();
    let output = canon(tmp.path())
        .args(["backup", "restore", &filename])
        .output()
        .unwrap();
    assert!(output.status.success());

    let output = canon(tmp.path()).args(["show", "JE-1"]).output().unwrap();
    assert!(output.status.success());
}

#[test]
fn restore_replaces_the_library_wholesale() {
    let tmp = tempdir().unwrap();
    import_payload(tmp.path());

    // A trusted snapshot, including a record no create path would accept.
    let snapshot = tmp.path().join("snapshot.json");
    fs::write(
        &snapshot,
        serde_json::json!({
            "version": "2.7",
            "clusters": [],
            "standards": [{
                "id": "S-1", "name": "Orphan", "cluster": "missing",
                "date_created": "2025-01-01", "date_modified": "2025-01-01"
            }]
        })
        .to_string(),
    )
    .unwrap();

    let output = canon(tmp.path()).arg("restore").arg(&snapshot).output().unwrap();
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("restored 1 standard(s) in 0 cluster(s)"));

    // The audit sees the dangling reference the restore let through.
    let output = canon(tmp.path()).arg("audit").output().unwrap();
    assert!(!output.status.success());
    assert!(stdout(&output).contains("nonexistent cluster 'missing'"));
}
