use super::*;

#[derive(Default)]
struct CopyDecompressor {
    calls: Vec<PathBuf>,
    unavailable: Vec<Compression>,
}

impl Decompressor for CopyDecompressor {
    fn ensure_available(&mut self, compression: Compression) -> DocshotResult<()> {
        if self.unavailable.contains(&compression) {
            return Err(DocshotError::tool(format!("{} missing", compression.tool())));
        }
        Ok(())
    }

    fn decompress(&mut self, _c: Compression, src: &Path, dst: &Path) -> DocshotResult<()> {
        self.calls.push(src.to_path_buf());
        std::fs::copy(src, dst).map_err(|e| DocshotError::extract(e.to_string()))?;
        Ok(())
    }
}

fn touch(path: &Path, body: &str) {
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, body).unwrap();
}

#[test]
fn output_path_strips_only_the_compression_suffix() {
    let archive = FixtureArchive {
        source: PathBuf::from("/src/intro/demo.cast.xz"),
        relative: PathBuf::from("intro/demo.cast.xz"),
        compression: Compression::Xz,
    };
    assert_eq!(
        archive.output_path(Path::new("/out")),
        PathBuf::from("/out/intro/demo.cast")
    );
}

#[test]
fn discovery_is_depth_bounded_and_sorted() {
    let tmp = tempfile::tempdir().unwrap();
    let root = tmp.path();
    touch(&root.join("b.cast.xz"), "b");
    touch(&root.join("a.cast.gz"), "a");
    touch(&root.join("sub/c.cast.xz"), "c");
    touch(&root.join("sub/deeper/too-deep.cast.xz"), "x");
    touch(&root.join("notes.txt.xz"), "n");
    touch(&root.join("plain.cast"), "p");

    let found = discover_archives(root, ".cast").unwrap();
    let rel: Vec<_> = found
        .iter()
        .map(|a| a.relative.to_string_lossy().replace('\\', "/"))
        .collect();
    assert_eq!(rel, vec!["a.cast.gz", "b.cast.xz", "sub/c.cast.xz"]);
    assert_eq!(found[0].compression, Compression::Gzip);
}

#[test]
fn missing_source_root_yields_nothing() {
    let tmp = tempfile::tempdir().unwrap();
    assert!(
        discover_archives(&tmp.path().join("absent"), ".cast")
            .unwrap()
            .is_empty()
    );
}

#[test]
fn extract_mirrors_tree_and_overwrites() {
    let tmp = tempfile::tempdir().unwrap();
    let src = tmp.path().join("src");
    let out = tmp.path().join("out");
    touch(&src.join("sub/c.cast.xz"), "fresh");
    touch(&out.join("sub/c.cast"), "stale");

    let mut dec = CopyDecompressor::default();
    let written = extract(&src, &out, ".cast", &mut dec).unwrap();

    assert_eq!(written, vec![out.join("sub/c.cast")]);
    assert_eq!(
        std::fs::read_to_string(out.join("sub/c.cast")).unwrap(),
        "fresh"
    );
}

#[test]
fn extract_creates_output_root_even_without_archives() {
    let tmp = tempfile::tempdir().unwrap();
    let out = tmp.path().join("out");
    let mut dec = CopyDecompressor::default();
    extract(&tmp.path().join("src"), &out, ".cast", &mut dec).unwrap();
    assert!(out.is_dir());
}

#[test]
fn missing_tool_fails_before_any_archive_is_touched() {
    let tmp = tempfile::tempdir().unwrap();
    let src = tmp.path().join("src");
    touch(&src.join("a.cast.xz"), "a");
    touch(&src.join("b.cast.gz"), "b");

    let mut dec = CopyDecompressor {
        unavailable: vec![Compression::Gzip],
        ..Default::default()
    };
    let err = extract(&src, &tmp.path().join("out"), ".cast", &mut dec).unwrap_err();
    assert!(matches!(err, DocshotError::Tool(_)));
    assert!(dec.calls.is_empty());
}

#[cfg(unix)]
fn gzip_available() -> bool {
    crate::foundation::fs::is_tool_on_path("gzip", "--version")
}

#[cfg(unix)]
#[test]
fn system_gzip_round_trips_a_recording() {
    if !gzip_available() {
        eprintln!("skipping: gzip not on PATH");
        return;
    }
    let tmp = tempfile::tempdir().unwrap();
    let src = tmp.path().join("src");
    let out = tmp.path().join("out");
    let body = "{\"version\": 2, \"width\": 80, \"height\": 24}\n[0.5, \"o\", \"hi\"]\n";
    touch(&src.join("intro/demo.cast"), body);

    let status = std::process::Command::new("gzip")
        .arg(src.join("intro/demo.cast"))
        .status()
        .unwrap();
    assert!(status.success());
    assert!(src.join("intro/demo.cast.gz").is_file());

    let written = extract(&src, &out, ".cast", &mut SystemDecompressor).unwrap();
    assert_eq!(written, vec![out.join("intro/demo.cast")]);
    assert_eq!(
        std::fs::read_to_string(out.join("intro/demo.cast")).unwrap(),
        body
    );
}

#[cfg(unix)]
#[test]
fn system_gzip_failure_leaves_no_partial_output() {
    if !gzip_available() {
        eprintln!("skipping: gzip not on PATH");
        return;
    }
    let tmp = tempfile::tempdir().unwrap();
    let src = tmp.path().join("src");
    let out = tmp.path().join("out");
    touch(&src.join("broken.cast.gz"), "definitely not gzip data");

    let err = extract(&src, &out, ".cast", &mut SystemDecompressor).unwrap_err();
    assert!(matches!(err, DocshotError::Extract(_)), "{err}");
    assert!(!out.join("broken.cast").exists());
}
