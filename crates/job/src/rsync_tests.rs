use super::*;
use std::fs;

#[test]
fn local_manifest_ignores_property_files() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("Info.plist"), "x").unwrap();
    fs::write(dir.path().join(".Info.plist.writing_object"), "1").unwrap();
    fs::write(dir.path().join("foo.out"), "hello").unwrap();
    fs::create_dir(dir.path().join("sub")).unwrap();
    fs::write(dir.path().join("sub").join("bar.xml"), "<a/>").unwrap();

    let manifest = local_manifest(dir.path());
    assert_eq!(manifest, vec!["foo.out".to_string(), "sub/bar.xml".to_string()]);
}

#[test]
fn local_manifest_of_missing_directory_is_empty() {
    let manifest = local_manifest(std::path::Path::new("/nonexistent/does/not/exist"));
    assert!(manifest.is_empty());
}

#[tokio::test]
async fn remove_remote_directory_rejects_empty_path() {
    let err = remove_remote_directory("localhost", "").await.unwrap_err();
    assert!(matches!(err, SjefError::TransferError(_)));
}

#[tokio::test]
async fn remove_remote_directory_rejects_root() {
    let err = remove_remote_directory("localhost", "/").await.unwrap_err();
    assert!(matches!(err, SjefError::TransferError(_)));
}
