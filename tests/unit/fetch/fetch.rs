use super::*;

#[derive(Default)]
struct CountingTransport {
    requests: Vec<String>,
    fail: bool,
}

impl Transport for CountingTransport {
    fn get(&mut self, url: &str) -> DocshotResult<Vec<u8>> {
        self.requests.push(url.to_string());
        if self.fail {
            return Err(DocshotError::fetch("offline"));
        }
        Ok(format!("body of {url}").into_bytes())
    }
}

#[test]
fn pinned_urls_carry_the_release_tag() {
    let assets = pinned_assets(&BTreeMap::new());
    assert_eq!(assets.len(), 2);
    for a in &assets {
        assert!(a.url.contains(PLAYER_RELEASE));
        assert!(a.url.ends_with(&a.name));
        assert!(a.expected_sha256.is_none());
    }
}

#[test]
fn second_fetch_performs_no_network_operation() {
    let assets = pinned_assets(&BTreeMap::new());
    let mut cache = MemoryAssetCache::new();
    let mut transport = CountingTransport::default();

    let first = fetch_all(&assets, &mut cache, &mut transport).unwrap();
    assert!(first.iter().all(|(_, o)| *o == FetchOutcome::Downloaded));
    assert_eq!(transport.requests.len(), 2);

    let second = fetch_all(&assets, &mut cache, &mut transport).unwrap();
    assert!(second.iter().all(|(_, o)| *o == FetchOutcome::Cached));
    assert_eq!(transport.requests.len(), 2);
}

#[test]
fn transport_failure_aborts_and_stores_nothing() {
    let assets = pinned_assets(&BTreeMap::new());
    let mut cache = MemoryAssetCache::new();
    let mut transport = CountingTransport {
        fail: true,
        ..Default::default()
    };

    let err = fetch_all(&assets, &mut cache, &mut transport).unwrap_err();
    assert!(matches!(err, DocshotError::Fetch(_)));
    assert_eq!(transport.requests.len(), 1);
    assert!(cache.is_empty());
}

#[test]
fn digest_is_checked_on_download() {
    let url = "https://example.invalid/p.css";
    let good = sha256_hex(format!("body of {url}").as_bytes());

    let mut asset = RemoteAsset {
        name: "p.css".to_string(),
        url: url.to_string(),
        expected_sha256: Some(good),
    };
    let mut cache = MemoryAssetCache::new();
    let mut transport = CountingTransport::default();
    assert_eq!(
        fetch(&asset, &mut cache, &mut transport).unwrap(),
        FetchOutcome::Downloaded
    );

    asset.name = "q.css".to_string();
    asset.expected_sha256 = Some("00".repeat(32));
    let err = fetch(&asset, &mut cache, &mut transport).unwrap_err();
    assert!(err.to_string().contains("digest mismatch"));
    assert!(!cache.exists("q.css"));
}

#[test]
fn sha256_hex_known_vector() {
    assert_eq!(
        sha256_hex(b"abc"),
        "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
    );
}
