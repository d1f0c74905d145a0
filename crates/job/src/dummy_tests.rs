use super::*;

#[test]
fn writes_canonical_fixture_content() {
    let dir = tempfile::tempdir().unwrap();
    run(dir.path(), "project").unwrap();
    assert_eq!(std::fs::read_to_string(dir.path().join("project.out")).unwrap(), DUMMY_OUT_CONTENTS);
    assert_eq!(std::fs::read_to_string(dir.path().join("project.xml")).unwrap(), DUMMY_XML_CONTENTS);
}
