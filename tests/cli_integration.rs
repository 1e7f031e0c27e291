//! Integration tests for the `ct` CLI.
//!
//! Each test creates a temp project directory, runs `ct` as a subprocess,
//! and verifies stdout and/or the persisted files.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use pretty_assertions::assert_eq;

/// Get the path to the built `ct` binary.
fn ct_bin() -> PathBuf {
    // cargo test builds to target/debug/
    let mut path = std::env::current_exe().unwrap();
    path.pop(); // remove test binary name
    path.pop(); // remove deps/
    path.push("ct");
    path
}

const OUTLINE: &str = "\
Koromon (I) #002
  Agumon (R) #005
    Greymon (C) #010
    Tyrannomon (C) #011
  Gabumon (R) #006

Tsunomon (I) #003
  Gabumon (R) #006
    Garurumon (C) #012

The following Digimon have no evolution line
Mystery Egg
Kuwagamon (C) #040
Kunemon (R) #050
";

/// Create a test project in the given directory.
fn create_test_project(root: &Path) {
    fs::write(
        root.join("checklist.toml"),
        r#"[checklist]
name = "Digimon Story DS"
id = "dsx"
source = "evolutions.txt"
"#,
    )
    .unwrap();
    fs::write(root.join("evolutions.txt"), OUTLINE).unwrap();
}

/// Run `ct` with the given args in the given directory, returning (stdout, stderr, success).
fn run_ct(dir: &Path, args: &[&str]) -> (String, String, bool) {
    let output = Command::new(ct_bin())
        .args(args)
        .current_dir(dir)
        .env_remove("CT_LOG")
        .output()
        .expect("failed to run ct");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    (stdout, stderr, output.status.success())
}

/// Run `ct` expecting success, return stdout.
fn run_ct_ok(dir: &Path, args: &[&str]) -> String {
    let (stdout, stderr, success) = run_ct(dir, args);
    if !success {
        panic!(
            "ct {:?} failed:\nstdout: {}\nstderr: {}",
            args, stdout, stderr
        );
    }
    stdout
}

fn saved_state(root: &Path) -> serde_json::Value {
    let raw = fs::read_to_string(root.join(".checktree/dsx_evo_checklist")).unwrap();
    serde_json::from_str(&raw).unwrap()
}

fn project() -> tempfile::TempDir {
    let tmp = tempfile::TempDir::new().unwrap();
    create_test_project(tmp.path());
    tmp
}

// ---------------------------------------------------------------------------
// Read commands
// ---------------------------------------------------------------------------

#[test]
fn test_list_by_lines() {
    let tmp = project();
    let out = run_ct_ok(tmp.path(), &["list"]);
    assert!(out.contains("== Koromon #002 [Line]"));
    assert!(out.contains("  [ ] #005 Agumon (R)"));
    assert!(out.contains("    [ ] #010 Greymon (C)"));
    assert!(out.contains("== Mystery Egg [No evolution]"));
    assert!(out.contains("0/10 checked"));
}

#[test]
fn test_list_by_id_is_sorted_and_deduplicated() {
    let tmp = project();
    let out = run_ct_ok(tmp.path(), &["list", "--view", "id"]);
    let rows: Vec<&str> = out.lines().filter(|l| l.starts_with('[')).collect();
    assert_eq!(rows.len(), 10);
    assert_eq!(rows[0], "[ ] #002 Koromon (I)");
    assert_eq!(rows[7], "[ ] #040 Kuwagamon (C)");
    assert_eq!(rows[9], "[ ] Mystery Egg");
    assert_eq!(out.matches("Gabumon").count(), 1);
}

#[test]
fn test_list_search_reveals_ancestors() {
    let tmp = project();
    let out = run_ct_ok(tmp.path(), &["list", "-q", "garuru"]);
    assert!(out.contains("== Tsunomon #003 [Line]"));
    assert!(out.contains("[ ] #003 Tsunomon (I)"));
    assert!(out.contains("[ ] #006 Gabumon (R)"));
    assert!(out.contains("[ ] #012 Garurumon (C)"));
    assert!(!out.contains("Koromon"));
}

#[test]
fn test_list_level_filter() {
    let tmp = project();
    let out = run_ct_ok(tmp.path(), &["list", "--view", "id", "--level", "C"]);
    assert!(out.contains("Greymon"));
    assert!(out.contains("Kuwagamon"));
    assert!(!out.contains("Agumon"));
}

#[test]
fn test_list_unknown_level_fails() {
    let tmp = project();
    let (_, stderr, success) = run_ct(tmp.path(), &["list", "--level", "Q"]);
    assert!(!success);
    assert!(stderr.contains("unknown level: Q"));
}

#[test]
fn test_list_json() {
    let tmp = project();
    run_ct_ok(tmp.path(), &["check", "#005"]);
    let out = run_ct_ok(tmp.path(), &["list", "--json"]);
    let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(parsed["view"], "lines");
    assert_eq!(parsed["count"]["checked"], 1);
    assert_eq!(parsed["count"]["total"], 10);
    let first = &parsed["sections"][0];
    assert_eq!(first["id"], "root-1");
    assert_eq!(first["kind"], "line");
    assert_eq!(first["nodes"][1]["key"], "#005");
    assert_eq!(first["nodes"][1]["checked"], true);
}

#[test]
fn test_levels() {
    let tmp = project();
    let out = run_ct_ok(tmp.path(), &["levels"]);
    let tags: Vec<&str> = out
        .lines()
        .filter_map(|l| l.split_whitespace().next())
        .collect();
    assert_eq!(tags, vec!["I", "R", "C"]);
}

#[test]
fn test_not_a_project() {
    let tmp = tempfile::TempDir::new().unwrap();
    let (_, stderr, success) = run_ct(tmp.path(), &["count"]);
    assert!(!success);
    assert!(stderr.contains("error: not a checklist project"));
}

// ---------------------------------------------------------------------------
// Checkbox commands
// ---------------------------------------------------------------------------

#[test]
fn test_check_persists_and_counts_once() {
    let tmp = project();
    let out = run_ct_ok(tmp.path(), &["check", "#006"]);
    assert!(out.contains("checked #006"));
    assert!(out.contains("1/10 checked"));

    let state = saved_state(tmp.path());
    assert_eq!(state["#006"], true);

    // Both Gabumon widgets in the line view reflect the key
    let out = run_ct_ok(tmp.path(), &["list"]);
    assert_eq!(out.matches("[x] #006 Gabumon").count(), 2);
}

#[test]
fn test_uncheck_keeps_false_entry() {
    let tmp = project();
    run_ct_ok(tmp.path(), &["check", "#005", "mystery-egg"]);
    run_ct_ok(tmp.path(), &["uncheck", "#005"]);
    let state = saved_state(tmp.path());
    assert_eq!(state["#005"], false);
    assert_eq!(state["mystery-egg"], true);
    assert_eq!(run_ct_ok(tmp.path(), &["count"]).trim(), "1/10 checked");
}

#[test]
fn test_check_unknown_key_changes_nothing() {
    let tmp = project();
    let (_, stderr, success) = run_ct(tmp.path(), &["check", "#005", "#999"]);
    assert!(!success);
    assert!(stderr.contains("unknown key: #999"));
    assert!(!tmp.path().join(".checktree/dsx_evo_checklist").exists());
}

#[test]
fn test_check_all_and_uncheck_all() {
    let tmp = project();
    assert_eq!(
        run_ct_ok(tmp.path(), &["check-all"]).trim(),
        "10/10 checked"
    );
    assert_eq!(
        run_ct_ok(tmp.path(), &["uncheck-all"]).trim(),
        "0/10 checked"
    );
    let state = saved_state(tmp.path());
    assert_eq!(state.as_object().unwrap().len(), 10);
    assert!(state.as_object().unwrap().values().all(|v| v == false));
}

#[test]
fn test_clear_removes_saved_state() {
    let tmp = project();
    run_ct_ok(tmp.path(), &["check-all"]);
    let out = run_ct_ok(tmp.path(), &["clear"]);
    assert!(out.contains("Cleared saved checks."));
    assert!(out.contains("0/10 checked"));
    assert!(!tmp.path().join(".checktree/dsx_evo_checklist").exists());
}

#[test]
fn test_corrupt_state_loads_empty() {
    let tmp = project();
    fs::create_dir_all(tmp.path().join(".checktree")).unwrap();
    fs::write(tmp.path().join(".checktree/dsx_evo_checklist"), "{not json").unwrap();
    assert_eq!(run_ct_ok(tmp.path(), &["count"]).trim(), "0/10 checked");
}

#[test]
fn test_count_json() {
    let tmp = project();
    run_ct_ok(tmp.path(), &["check", "#002", "#003"]);
    let out = run_ct_ok(tmp.path(), &["count", "--json"]);
    let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
    assert_eq!(parsed["checked"], 2);
    assert_eq!(parsed["total"], 10);
}

// ---------------------------------------------------------------------------
// View mode
// ---------------------------------------------------------------------------

#[test]
fn test_view_defaults_and_toggles() {
    let tmp = project();
    assert_eq!(run_ct_ok(tmp.path(), &["view"]).trim(), "View: by Lines");
    assert_eq!(
        run_ct_ok(tmp.path(), &["view", "toggle"]).trim(),
        "View: by ID"
    );
    let saved = fs::read_to_string(tmp.path().join(".checktree/dsx_viewmode")).unwrap();
    assert_eq!(saved, "byId");

    // list follows the saved mode
    let out = run_ct_ok(tmp.path(), &["list"]);
    assert!(!out.contains("=="));
    assert!(out.contains("[ ] #002 Koromon (I)"));

    assert_eq!(
        run_ct_ok(tmp.path(), &["view", "lines"]).trim(),
        "View: by Lines"
    );
}

#[test]
fn test_view_unknown_saved_token_falls_back() {
    let tmp = project();
    fs::create_dir_all(tmp.path().join(".checktree")).unwrap();
    fs::write(tmp.path().join(".checktree/dsx_viewmode"), "sideways").unwrap();
    assert_eq!(run_ct_ok(tmp.path(), &["view"]).trim(), "View: by Lines");
}

#[test]
fn test_view_rejects_bad_argument() {
    let tmp = project();
    let (_, stderr, success) = run_ct(tmp.path(), &["view", "sideways"]);
    assert!(!success);
    assert!(stderr.contains("unknown view mode"));
}

// ---------------------------------------------------------------------------
// Snapshots
// ---------------------------------------------------------------------------

#[test]
fn test_export_writes_snapshot() {
    let tmp = project();
    run_ct_ok(tmp.path(), &["check", "#010", "#005"]);
    run_ct_ok(tmp.path(), &["uncheck", "#010"]);
    let out_dir = tmp.path().join("exports");
    let out = run_ct_ok(
        tmp.path(),
        &["export", "--out", out_dir.to_str().unwrap()],
    );
    assert!(out.contains("Exported 1 checked items"));

    let files: Vec<PathBuf> = fs::read_dir(&out_dir)
        .unwrap()
        .map(|e| e.unwrap().path())
        .collect();
    assert_eq!(files.len(), 1);
    let name = files[0].file_name().unwrap().to_str().unwrap().to_string();
    assert!(name.starts_with("dsx_"));
    assert!(name.ends_with("Z.json"));
    assert!(!name.contains(':'));

    let doc: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&files[0]).unwrap()).unwrap();
    assert_eq!(doc["version"], 1);
    assert!(doc["savedAt"].as_str().unwrap().ends_with('Z'));
    assert_eq!(doc["checked"], serde_json::json!(["#005"]));
}

#[test]
fn test_import_replaces_state() {
    let tmp = project();
    run_ct_ok(tmp.path(), &["check", "#002", "#003"]);
    fs::write(
        tmp.path().join("snap.json"),
        r##"{"version":1,"savedAt":"2024-01-01T00:00:00.000Z","checked":["#005","#005","#012","#777"]}"##,
    )
    .unwrap();

    let out = run_ct_ok(tmp.path(), &["import", "snap.json"]);
    assert_eq!(
        out.trim(),
        "Imported 3 checked items (1 not in this checklist)."
    );

    let state = saved_state(tmp.path());
    assert_eq!(
        state,
        serde_json::json!({"#005": true, "#012": true, "#777": true})
    );
    assert_eq!(run_ct_ok(tmp.path(), &["count"]).trim(), "2/10 checked");
}

#[test]
fn test_import_round_trips_export() {
    let tmp = project();
    run_ct_ok(tmp.path(), &["check", "#006", "mystery-egg"]);
    let out_dir = tmp.path().join("exports");
    run_ct_ok(tmp.path(), &["export", "--out", out_dir.to_str().unwrap()]);
    let file = fs::read_dir(&out_dir).unwrap().next().unwrap().unwrap().path();

    run_ct_ok(tmp.path(), &["clear"]);
    let out = run_ct_ok(tmp.path(), &["import", file.to_str().unwrap()]);
    assert_eq!(out.trim(), "Imported 2 checked items.");
    assert_eq!(run_ct_ok(tmp.path(), &["count"]).trim(), "2/10 checked");
}

#[test]
fn test_import_malformed_leaves_state_untouched() {
    let tmp = project();
    run_ct_ok(tmp.path(), &["check", "#002"]);
    let before = saved_state(tmp.path());

    for (name, body) in [
        ("garbage.json", "this is not json"),
        ("no_checked.json", r#"{"version":1}"#),
        ("wrong_type.json", r##"{"checked":"#002"}"##),
    ] {
        fs::write(tmp.path().join(name), body).unwrap();
        let (_, stderr, success) = run_ct(tmp.path(), &["import", name]);
        assert!(!success, "{} should be rejected", name);
        assert!(
            stderr.contains("Invalid file. Please choose a JSON export from this checklist."),
            "{}: {}",
            name,
            stderr
        );
        assert_eq!(saved_state(tmp.path()), before);
    }
}

// ---------------------------------------------------------------------------
// Init and -C
// ---------------------------------------------------------------------------

#[test]
fn test_init_writes_config() {
    let tmp = tempfile::TempDir::new().unwrap();
    let dir = tmp.path().join("digimon-story");
    fs::create_dir_all(&dir).unwrap();

    let out = run_ct_ok(&dir, &["init"]);
    assert!(out.contains("Initialized checklist: Digimon Story (digimon_story)"));
    let toml = fs::read_to_string(dir.join("checklist.toml")).unwrap();
    assert!(toml.contains("id = \"digimon_story\""));
    assert!(dir.join("checklist.txt").exists());

    // Empty outline is still a valid project
    assert_eq!(run_ct_ok(&dir, &["count"]).trim(), "0/0 checked");

    let (_, stderr, success) = run_ct(&dir, &["init"]);
    assert!(!success);
    assert!(stderr.contains("already exists"));
    run_ct_ok(&dir, &["init", "--force", "--id", "other"]);
}

#[test]
fn test_project_dir_flag() {
    let tmp = project();
    let elsewhere = tempfile::TempDir::new().unwrap();
    let out = run_ct_ok(
        elsewhere.path(),
        &["-C", tmp.path().to_str().unwrap(), "count"],
    );
    assert_eq!(out.trim(), "0/10 checked");
}

#[test]
fn test_discovers_project_from_subdirectory() {
    let tmp = project();
    let sub = tmp.path().join("notes/deep");
    fs::create_dir_all(&sub).unwrap();
    assert_eq!(run_ct_ok(&sub, &["count"]).trim(), "0/10 checked");
}
