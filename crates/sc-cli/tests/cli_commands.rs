//! Integration tests for the `sc-cli` command-line interface.

#![allow(deprecated)] // Command::cargo_bin – macro replacement not yet stable

use std::fs;
use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const CHAPTER: &str = "Chapter 1 - Surface\n\
    intro text. → A. go north [effect: courage+1] you feel brave. \
    → B. go south [effect: wisdom+1] you feel calm. closing text.";

const ARCHITECTURE: &str = "\
# The Drowned City

## Core Setting
A city sank a century ago. Divers still go down.

## Stage Plan

### Stage 1: Arrival
**Chapter range**: 1-2
**Core goal**: reach the city
**Emotional tone**: wonder

### Stage 2: The Archive
**Chapter range**: 3-5
**Core goal**: recover the ledger
**Emotional tone**: dread
**Key tasks**:
- Task 1: bribe the keeper
- Task 2: decode the index

## Chapter Clusters
### Cluster 1: Below
**Chapter range**: 3-4
**Emotional theme**: claustrophobia
**Choice weight**: high
";

const DIRECTORY: &str = "Chapter 1 - Surface\nOutline: hire a boat\n\nChapter 2 - Descent\nOutline: dive\n";

const ENDINGS: &str = "\
### Ending 1: The Hero's Return
**Trigger condition**: courage high
**Summary**: The city is saved.

### Ending 2: Adrift
**Trigger condition**: wisdom low
**Summary**: Nobody comes back.
";

const ATTRIBUTES: &str = "| Attribute | Initial |\n|---|---|\n| courage | 10 |\n";

const PLAN: &str = "Scene 1:\nRange: 30\nA fork in the road.\n\n\
    Scene 2:\nRange: 80\nAn empty square.\n\n\
    Scene 3:\nRange: 100\nThe harbour at dusk.";

fn sc() -> Command {
    let mut cmd = Command::cargo_bin("sc").unwrap();
    cmd.env("NO_COLOR", "1").env_remove("RUST_LOG");
    cmd
}

/// Write `contents` to `name` inside `dir` and return the path.
fn write(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).unwrap();
    path
}

// -----------------------------------------------------------------------
// parse
// -----------------------------------------------------------------------

#[test]
fn parse_prints_chapter_json() {
    let dir = TempDir::new().unwrap();
    let chapter = write(&dir, "ch1.txt", CHAPTER);

    sc().arg("parse")
        .arg(&chapter)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"chapterIndex\": 1"))
        .stdout(predicate::str::contains("\"title\": \"Surface\""))
        .stdout(predicate::str::contains("\"courage\": 1"));
}

#[test]
fn parse_summary_counts_scenes_and_choices() {
    let dir = TempDir::new().unwrap();
    let chapter = write(&dir, "ch1.txt", CHAPTER);

    sc().args(["parse", "--summary"])
        .arg(&chapter)
        .assert()
        .success()
        .stdout(predicate::str::contains("Chapter 1"))
        .stdout(predicate::str::contains("1 scene, 2 choices"));
}

#[test]
fn parse_writes_output_file() {
    let dir = TempDir::new().unwrap();
    let chapter = write(&dir, "ch1.txt", CHAPTER);
    let output = dir.path().join("ch1.json");

    sc().arg("parse")
        .arg(&chapter)
        .arg("-o")
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote chapter 1"));

    let json = fs::read_to_string(&output).unwrap();
    assert!(json.contains("\"scenes\""));
}

#[test]
fn parse_rejects_descending_percentages() {
    let dir = TempDir::new().unwrap();
    let chapter = write(&dir, "ch1.txt", CHAPTER);

    sc().args(["parse", "-p", "60,30,100"])
        .arg(&chapter)
        .assert()
        .failure()
        .stderr(predicate::str::contains("ascending"));
}

#[test]
fn parse_takes_percentages_from_plan() {
    let dir = TempDir::new().unwrap();
    let chapter = write(&dir, "ch1.txt", CHAPTER);
    let plan = write(&dir, "plan.txt", PLAN);

    sc().arg("parse")
        .arg(&chapter)
        .arg("--plan")
        .arg(&plan)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"chapterIndex\": 1"));
}

#[test]
fn parse_missing_file_fails() {
    sc().args(["parse", "/nonexistent/ch1.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot read"));
}

#[test]
fn invalid_config_is_rejected() {
    let dir = TempDir::new().unwrap();
    let chapter = write(&dir, "ch1.txt", CHAPTER);
    let config = write(&dir, "config.json", r#"{"parser": {}}"#);

    sc().arg("--config")
        .arg(&config)
        .arg("parse")
        .arg(&chapter)
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid config"));
}

// -----------------------------------------------------------------------
// check
// -----------------------------------------------------------------------

#[test]
fn check_passes_on_clean_chapter() {
    let dir = TempDir::new().unwrap();
    let chapter = write(&dir, "ch1.txt", CHAPTER);

    sc().arg("check")
        .arg(&chapter)
        .assert()
        .success()
        .stdout(predicate::str::contains("All checks passed for chapter 1."));
}

#[test]
fn check_warns_on_missing_header() {
    let dir = TempDir::new().unwrap();
    let chapter = write(&dir, "ch.txt", "Just narration. Nothing else.");

    sc().arg("check")
        .arg(&chapter)
        .assert()
        .success()
        .stderr(predicate::str::contains("missing chapter header"))
        .stderr(predicate::str::contains("1 warning"));
}

#[test]
fn check_fails_on_empty_body() {
    let dir = TempDir::new().unwrap();
    let chapter = write(&dir, "ch.txt", "Chapter 4 - Blank\n");

    sc().arg("check")
        .arg(&chapter)
        .assert()
        .failure()
        .stderr(predicate::str::contains("chapter has no body text"))
        .stderr(predicate::str::contains("1 error"));
}

// -----------------------------------------------------------------------
// ranges
// -----------------------------------------------------------------------

#[test]
fn ranges_table_includes_initial_values() {
    let dir = TempDir::new().unwrap();
    let chapter = write(&dir, "ch1.txt", CHAPTER);
    let attributes = write(&dir, "attributes.md", ATTRIBUTES);

    sc().arg("ranges")
        .arg(&chapter)
        .arg("--attributes")
        .arg(&attributes)
        .assert()
        .success()
        .stdout(predicate::str::contains("courage"))
        .stdout(predicate::str::contains("wisdom"))
        .stdout(predicate::str::contains("2 attributes over 1 chapter, 1 decision point"));
}

#[test]
fn ranges_json_uses_pairs() {
    let dir = TempDir::new().unwrap();
    let chapter = write(&dir, "ch1.txt", CHAPTER);
    let attributes = write(&dir, "attributes.md", ATTRIBUTES);

    let output = sc()
        .arg("ranges")
        .arg(&chapter)
        .arg("-a")
        .arg(&attributes)
        .arg("--json")
        .output()
        .unwrap();
    assert!(output.status.success());
    let ranges: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(ranges["courage"], serde_json::json!([10, 11]));
    assert_eq!(ranges["wisdom"], serde_json::json!([0, 1]));
}

#[test]
fn ranges_require_a_chapter() {
    sc().arg("ranges").assert().failure();
}

// -----------------------------------------------------------------------
// conditions
// -----------------------------------------------------------------------

#[test]
fn conditions_resolve_single_text() {
    let dir = TempDir::new().unwrap();
    let chapter = write(&dir, "ch1.txt", CHAPTER);
    let attributes = write(&dir, "attributes.md", ATTRIBUTES);

    sc().args(["conditions", "courage high, wisdom low", "-c"])
        .arg(&chapter)
        .arg("-a")
        .arg(&attributes)
        .assert()
        .success()
        .stdout(predicate::str::contains("courage >=10"))
        .stdout(predicate::str::contains("wisdom <=0"));
}

#[test]
fn conditions_pick_the_reached_ending() {
    let dir = TempDir::new().unwrap();
    let chapter = write(&dir, "ch1.txt", CHAPTER);
    let attributes = write(&dir, "attributes.md", ATTRIBUTES);
    let endings = write(&dir, "endings.md", ENDINGS);

    sc().arg("conditions")
        .arg("--endings")
        .arg(&endings)
        .arg("-c")
        .arg(&chapter)
        .arg("-a")
        .arg(&attributes)
        .args(["--final", "courage=11,wisdom=1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("The Hero's Return"))
        .stdout(predicate::str::contains("Adrift"))
        .stdout(predicate::str::contains("Reached: The Hero's Return (ending 1)"))
        .stdout(predicate::str::contains("courage: 100/100"));
}

#[test]
fn conditions_json_reports_outcome() {
    let dir = TempDir::new().unwrap();
    let chapter = write(&dir, "ch1.txt", CHAPTER);
    let endings = write(&dir, "endings.md", ENDINGS);

    let output = sc()
        .arg("conditions")
        .arg("-e")
        .arg(&endings)
        .arg("-c")
        .arg(&chapter)
        .args(["-f", "courage=0,wisdom=0", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["conditions"][0]["condition"]["courage"], ">=0");
    assert_eq!(report["conditions"][1]["condition"]["wisdom"], "<=0");
    // courage 0 meets ">=0", so the first ending is reached
    assert_eq!(report["outcome"]["endingIndex"], 0);
}

#[test]
fn conditions_need_text_or_endings() {
    sc().arg("conditions").assert().failure();
}

#[test]
fn conditions_reject_malformed_finals() {
    let dir = TempDir::new().unwrap();
    let endings = write(&dir, "endings.md", ENDINGS);

    sc().arg("conditions")
        .arg("-e")
        .arg(&endings)
        .args(["--final", "courage"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("expected name=value"));
}

// -----------------------------------------------------------------------
// section / stage
// -----------------------------------------------------------------------

#[test]
fn section_prints_body() {
    let dir = TempDir::new().unwrap();
    let doc = write(&dir, "architecture.md", ARCHITECTURE);

    sc().arg("section")
        .arg(&doc)
        .arg("core setting")
        .assert()
        .success()
        .stdout(predicate::str::contains("Core Setting"))
        .stdout(predicate::str::contains("A city sank a century ago."));
}

#[test]
fn section_missing_fails() {
    let dir = TempDir::new().unwrap();
    let doc = write(&dir, "architecture.md", ARCHITECTURE);

    sc().arg("section")
        .arg(&doc)
        .arg("Epilogue")
        .assert()
        .failure()
        .stderr(predicate::str::contains("no section matching"));
}

#[test]
fn stage_shows_covering_stage_and_cluster() {
    let dir = TempDir::new().unwrap();
    let doc = write(&dir, "architecture.md", ARCHITECTURE);

    sc().arg("stage")
        .arg(&doc)
        .arg("4")
        .assert()
        .success()
        .stdout(predicate::str::contains("Stage 2: The Archive (chapters 3-5)"))
        .stdout(predicate::str::contains("recover the ledger"))
        .stdout(predicate::str::contains("- bribe the keeper"))
        .stdout(predicate::str::contains("choice weight: high"));
}

#[test]
fn stage_outside_plan_shows_fallbacks() {
    let dir = TempDir::new().unwrap();
    let doc = write(&dir, "architecture.md", ARCHITECTURE);

    sc().arg("stage")
        .arg(&doc)
        .arg("9")
        .assert()
        .success()
        .stdout(predicate::str::contains("No stage covers chapter 9"))
        .stdout(predicate::str::contains("infer from outline"));
}

#[test]
fn stage_json_has_fields() {
    let dir = TempDir::new().unwrap();
    let doc = write(&dir, "architecture.md", ARCHITECTURE);

    sc().arg("stage")
        .arg(&doc)
        .args(["1", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"stageName\": \"Stage 1: Arrival\""));
}

// -----------------------------------------------------------------------
// outline
// -----------------------------------------------------------------------

#[test]
fn outline_lists_chapters() {
    let dir = TempDir::new().unwrap();
    let doc = write(&dir, "directory.md", DIRECTORY);

    sc().arg("outline")
        .arg(&doc)
        .assert()
        .success()
        .stdout(predicate::str::contains("Surface"))
        .stdout(predicate::str::contains("Descent"))
        .stdout(predicate::str::contains("2 chapters"));
}

#[test]
fn outline_shows_one_chapter() {
    let dir = TempDir::new().unwrap();
    let doc = write(&dir, "directory.md", DIRECTORY);

    sc().arg("outline")
        .arg(&doc)
        .arg("2")
        .assert()
        .success()
        .stdout(predicate::str::contains("2. Descent"))
        .stdout(predicate::str::contains("dive"));
}

#[test]
fn outline_set_rewrites_file() {
    let dir = TempDir::new().unwrap();
    let doc = write(&dir, "directory.md", DIRECTORY);

    sc().arg("outline")
        .arg(&doc)
        .args(["2", "--set", "sink to the archive"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Updated outline of chapter 2."));

    let updated = fs::read_to_string(&doc).unwrap();
    assert!(updated.contains("Outline: sink to the archive"));
    assert!(updated.contains("Outline: hire a boat"));
}

#[test]
fn outline_unknown_chapter_fails() {
    let dir = TempDir::new().unwrap();
    let doc = write(&dir, "directory.md", DIRECTORY);

    sc().arg("outline")
        .arg(&doc)
        .arg("7")
        .assert()
        .failure()
        .stderr(predicate::str::contains("chapter 7 not found"));
}

// -----------------------------------------------------------------------
// plan
// -----------------------------------------------------------------------

#[test]
fn plan_prints_percentages() {
    let dir = TempDir::new().unwrap();
    let plan = write(&dir, "plan.txt", PLAN);

    sc().arg("plan")
        .arg(&plan)
        .assert()
        .success()
        .stdout(predicate::str::contains("harbour at dusk"))
        .stdout(predicate::str::contains("Percentages: 30,80,100"));
}

#[test]
fn plan_with_no_scenes() {
    let dir = TempDir::new().unwrap();
    let plan = write(&dir, "plan.txt", "nothing planned here");

    sc().arg("plan")
        .arg(&plan)
        .assert()
        .success()
        .stdout(predicate::str::contains("No scenes planned."));
}

// -----------------------------------------------------------------------
// structure
// -----------------------------------------------------------------------

#[test]
fn structure_table_follows_tags() {
    sc().args(["structure", "9", "--tag", "fantasy"])
        .assert()
        .success()
        .stdout(predicate::str::contains("9 chapters: medium story"))
        .stdout(predicate::str::contains("Departure"))
        .stdout(predicate::str::contains("Final battle"))
        .stdout(predicate::str::contains("Emotional peaks: 3, 4, 8"))
        .stdout(predicate::str::contains("Clusters: 1-3, 4-6, 7-9"));
}

#[test]
fn structure_markdown_reads_back_as_stage_plan() {
    let output = sc()
        .args(["structure", "9", "--markdown"])
        .assert()
        .success()
        .stdout(predicate::str::contains("### Stage 2: Development\n**Chapter range**: 3-4"))
        .get_output()
        .stdout
        .clone();

    let dir = TempDir::new().unwrap();
    let doc = write(&dir, "architecture.md", &String::from_utf8(output).unwrap());
    sc().arg("stage")
        .arg(&doc)
        .arg("4")
        .assert()
        .success()
        .stdout(predicate::str::contains("Stage 2: Development"))
        .stdout(predicate::str::contains("advance the main plot while the characters grow"));
}

#[test]
fn structure_json_has_scale_and_stages() {
    sc().args(["structure", "2", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"scale\": \"short\""))
        .stdout(predicate::str::contains("\"name\": \"Climax and endings\""));
}

#[test]
fn structure_rejects_zero_chapters() {
    sc().args(["structure", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("at least one chapter"));
}
