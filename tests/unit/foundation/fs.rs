use super::*;

#[test]
fn write_atomic_creates_parents_and_leaves_no_staging_file() {
    let tmp = tempfile::tempdir().unwrap();
    let out = tmp.path().join("nested").join("asset.css");

    write_atomic(&out, b"body {}").unwrap();

    assert_eq!(std::fs::read(&out).unwrap(), b"body {}");
    assert!(!staging_path(&out).exists());
}

#[test]
fn write_atomic_replaces_existing_content() {
    let tmp = tempfile::tempdir().unwrap();
    let out = tmp.path().join("shot.svg");
    std::fs::write(&out, "old").unwrap();

    write_atomic(&out, b"new").unwrap();

    assert_eq!(std::fs::read_to_string(&out).unwrap(), "new");
}

#[test]
fn staging_path_is_a_hidden_sibling() {
    let p = staging_path(Path::new("out/dir/first.svg"));
    assert_eq!(p, PathBuf::from("out/dir/.first.svg.docshot-tmp"));
}

#[test]
fn missing_files_and_directories_are_not_executable() {
    let tmp = tempfile::tempdir().unwrap();
    assert!(!is_executable(&tmp.path().join("nope")));
    assert!(!is_executable(tmp.path()));
}

#[cfg(unix)]
#[test]
fn executable_bit_is_honoured() {
    use std::os::unix::fs::PermissionsExt as _;

    let tmp = tempfile::tempdir().unwrap();
    let script = tmp.path().join("input");
    std::fs::write(&script, "#!/bin/sh\n").unwrap();
    assert!(!is_executable(&script));

    std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();
    assert!(is_executable(&script));
}

#[test]
fn unknown_tool_is_not_on_path() {
    assert!(!is_tool_on_path("docshot-definitely-not-a-real-tool", "--version"));
}
