// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use serial_test::serial;
use tempfile::tempdir;

struct ConfigRoot {
    _dir: tempfile::TempDir,
}

fn set_config_root() -> ConfigRoot {
    let dir = tempdir().unwrap();
    std::env::set_var("SJEF_CONFIG", dir.path());
    std::env::remove_var("SJEF_SITE_CONFIG");
    ConfigRoot { _dir: dir }
}

impl Drop for ConfigRoot {
    fn drop(&mut self) {
        std::env::remove_var("SJEF_CONFIG");
    }
}

async fn open_project(dir: &std::path::Path, name: &str) -> Project {
    let path = dir.join(format!("{name}.sjef"));
    Project::open(&path.to_string_lossy(), "sjef", Suffixes::default(), false).await.unwrap()
}

#[tokio::test]
#[serial]
async fn open_creates_a_fresh_project_as_unevaluated() {
    let _config = set_config_root();
    let root = tempdir().unwrap();
    let project = open_project(root.path(), "He").await;
    assert_eq!(project.status().unwrap(), Status::Unevaluated);
    assert_eq!(project.name(), "He");
    assert!(project.directory().join("Info.plist").exists());
}

#[tokio::test]
#[serial]
async fn project_hash_is_stable_across_reopen() {
    let _config = set_config_root();
    let root = tempdir().unwrap();
    let project = open_project(root.path(), "He").await;
    let hash1 = project.project_hash().unwrap();

    let reopened = open_project(root.path(), "He").await;
    let hash2 = reopened.project_hash().unwrap();
    assert_eq!(hash1, hash2);
}

#[tokio::test]
#[serial]
async fn property_round_trips_through_reopen() {
    let _config = set_config_root();
    let root = tempdir().unwrap();
    let project = open_project(root.path(), "He").await;
    project.set_property("title", "helium atom").unwrap();
    assert_eq!(project.property("title").unwrap(), "helium atom");

    let reopened = open_project(root.path(), "He").await;
    assert_eq!(reopened.property("title").unwrap(), "helium atom");
}

#[tokio::test]
#[serial]
async fn run_needed_is_false_with_no_input_file() {
    let _config = set_config_root();
    let root = tempdir().unwrap();
    let project = open_project(root.path(), "He").await;
    assert!(!project.run_needed().unwrap());
}

#[tokio::test]
#[serial]
async fn run_needed_is_true_once_input_exists_without_output() {
    let _config = set_config_root();
    let root = tempdir().unwrap();
    let project = open_project(root.path(), "He").await;
    std::fs::write(project.filename(FileKind::Input, None).unwrap(), "geometry").unwrap();
    assert!(project.run_needed().unwrap());
}

#[tokio::test]
#[serial]
async fn run_directory_new_allocates_sequential_stems_and_resets_jobnumber() {
    let _config = set_config_root();
    let root = tempdir().unwrap();
    let project = open_project(root.path(), "He").await;
    std::fs::write(project.filename(FileKind::Input, None).unwrap(), "geometry").unwrap();
    project.set_property(JOBNUMBER_KEY, "7").unwrap();

    let stem1 = project.run_directory_new().unwrap();
    assert_eq!(stem1, "He_1");
    assert_eq!(project.property(JOBNUMBER_KEY).unwrap(), "0");
    assert!(project.filename(FileKind::Input, Some(0)).unwrap().exists());

    let stem2 = project.run_directory_new().unwrap();
    assert_eq!(stem2, "He_2");
    assert_eq!(project.run_directories().unwrap(), vec!["He_1".to_string(), "He_2".to_string()]);
}

#[tokio::test]
#[serial]
async fn clean_keeps_only_the_most_recent_run_directories() {
    let _config = set_config_root();
    let root = tempdir().unwrap();
    let project = open_project(root.path(), "He").await;
    std::fs::write(project.filename(FileKind::Input, None).unwrap(), "geometry").unwrap();
    project.run_directory_new().unwrap();
    project.run_directory_new().unwrap();
    project.run_directory_new().unwrap();

    project.clean(1).unwrap();
    assert_eq!(project.run_directories().unwrap(), vec!["He_3".to_string()]);
}

#[tokio::test]
#[serial]
async fn xml_repairs_truncated_content_instead_of_failing() {
    let _config = set_config_root();
    let root = tempdir().unwrap();
    let project = open_project(root.path(), "He").await;
    std::fs::write(project.filename(FileKind::Xml, None).unwrap(), "<root><job>").unwrap();
    let xml = project.xml(None).unwrap();
    assert!(xml.contains("</job>"));
    assert!(xml.contains("</root>"));
}

#[tokio::test]
#[serial]
async fn dummy_run_completes_and_advances_status() {
    let _config = set_config_root();
    let root = tempdir().unwrap();
    let project = open_project(root.path(), "He").await;
    std::fs::write(project.filename(FileKind::Input, None).unwrap(), "geometry").unwrap();
    project.change_backend("__dummy", false).unwrap();

    project.run(None, true).await.unwrap();
    assert_eq!(project.status().unwrap(), Status::Completed);

    let out_path = project.filename(FileKind::Output, Some(0)).unwrap();
    assert_eq!(std::fs::read_to_string(out_path).unwrap(), "dummy");
}

#[tokio::test]
#[serial]
async fn copy_preserves_content_and_can_issue_a_fresh_hash() {
    let _config = set_config_root();
    let root = tempdir().unwrap();
    let src = open_project(root.path(), "He").await;
    std::fs::write(src.filename(FileKind::Input, None).unwrap(), "geometry").unwrap();
    let original_hash = src.project_hash().unwrap();

    let dest_path = root.path().join("Ne.sjef");
    let copied = src.copy(&dest_path.to_string_lossy(), false).await.unwrap();
    assert_eq!(copied.name(), "Ne");
    assert_eq!(std::fs::read_to_string(copied.filename(FileKind::Input, None).unwrap()).unwrap(), "geometry");
    assert_ne!(copied.project_hash().unwrap(), original_hash);
}

#[tokio::test]
#[serial]
async fn move_to_preserves_project_hash_and_renames_stem_files() {
    let _config = set_config_root();
    let root = tempdir().unwrap();
    let src = open_project(root.path(), "He").await;
    std::fs::write(src.filename(FileKind::Input, None).unwrap(), "geometry").unwrap();
    let original_hash = src.project_hash().unwrap();

    let dest_path = root.path().join("Ne.sjef");
    let moved = src.move_to(&dest_path.to_string_lossy(), false).await.unwrap();
    assert_eq!(moved.name(), "Ne");
    assert_eq!(moved.project_hash().unwrap(), original_hash);
    assert!(moved.filename(FileKind::Input, None).unwrap().ends_with("Ne.inp"));
    assert!(moved.filename(FileKind::Input, None).unwrap().exists());
}

#[tokio::test]
#[serial]
async fn erase_removes_the_project_directory() {
    let _config = set_config_root();
    let root = tempdir().unwrap();
    let project = open_project(root.path(), "He").await;
    let directory = project.directory().to_path_buf();
    assert!(directory.exists());
    project.erase().unwrap();
    assert!(!directory.exists());
}
