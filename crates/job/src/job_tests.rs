use super::*;
use sjef_backend::Backend;
use std::sync::Arc;

fn open_properties(dir: &std::path::Path) -> Arc<PropertyStore> {
    let locker = sjef_locker::locker_for_path(dir.join(".lock"));
    let (store, _created) = PropertyStore::open(dir, locker).unwrap();
    Arc::new(store)
}

#[tokio::test]
async fn dummy_backend_completes_synchronously() {
    let dir = tempfile::tempdir().unwrap();
    let properties = open_properties(dir.path());
    let params = JobParams {
        run_directory: dir.path().to_path_buf(),
        stem: "project".to_string(),
        suffix: "sjef".to_string(),
        backend: Backend::dummy(),
        properties: Arc::clone(&properties),
    };
    let job = Arc::new(Job::new(params).unwrap());
    job.run(true).await.unwrap();

    assert_eq!(job.status(), Status::Completed);
    assert_eq!(std::fs::read_to_string(dir.path().join("project.out")).unwrap(), "dummy");
    assert_eq!(properties.get(JOBNUMBER_KEY).unwrap(), "1");
}

#[tokio::test]
async fn get_status_with_no_jobnumber_is_unknown() {
    let dir = tempfile::tempdir().unwrap();
    let properties = open_properties(dir.path());
    let params = JobParams {
        run_directory: dir.path().to_path_buf(),
        stem: "project".to_string(),
        suffix: "sjef".to_string(),
        backend: Backend::local(),
        properties,
    };
    let job = Job::new(params).unwrap();
    assert_eq!(job.get_status().await.unwrap(), Status::Unknown);
}

#[tokio::test]
async fn kill_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let properties = open_properties(dir.path());
    let params = JobParams {
        run_directory: dir.path().to_path_buf(),
        stem: "project".to_string(),
        suffix: "sjef".to_string(),
        backend: Backend::dummy(),
        properties: Arc::clone(&properties),
    };
    let job = Job::new(params).unwrap();
    job.kill().await.unwrap();
    assert_eq!(job.status(), Status::Killed);
    job.kill().await.unwrap();
    assert_eq!(job.status(), Status::Killed);
}
