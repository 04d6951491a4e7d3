//! Idempotent mirroring of the pinned web player release into a local cache.

/// Local asset storage.
pub mod cache;
/// Network retrieval.
pub mod transport;

use std::collections::BTreeMap;

use sha2::Digest as _;

use crate::foundation::error::{DocshotError, DocshotResult};

pub use cache::{AssetCache, FsAssetCache, MemoryAssetCache};
pub use transport::{HttpTransport, Transport};

/// Release tag every player asset is pinned to.
pub const PLAYER_RELEASE: &str = "v3.8.0";

/// Download root of the player releases.
pub const PLAYER_RELEASES_URL: &str =
    "https://github.com/asciinema/asciinema-player/releases/download";

/// Files mirrored from the pinned release.
pub const PLAYER_FILES: [&str; 2] = ["asciinema-player.css", "asciinema-player.min.js"];

/// A static file from the pinned release.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RemoteAsset {
    /// File name; also the cache key.
    pub name: String,
    /// Pinned source URL.
    pub url: String,
    /// Optional lowercase-hex SHA-256 checked on download (never on cache hits).
    pub expected_sha256: Option<String>,
}

/// Outcome of [`fetch`] for one asset.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FetchOutcome {
    /// Already present; nothing was requested.
    Cached,
    /// Retrieved and stored.
    Downloaded,
}

/// The fixed asset list of [`PLAYER_RELEASE`], with optional digests keyed by file name.
pub fn pinned_assets(expected_sha256: &BTreeMap<String, String>) -> Vec<RemoteAsset> {
    PLAYER_FILES
        .iter()
        .map(|name| RemoteAsset {
            name: (*name).to_string(),
            url: format!("{PLAYER_RELEASES_URL}/{PLAYER_RELEASE}/{name}"),
            expected_sha256: expected_sha256.get(*name).map(|d| d.to_ascii_lowercase()),
        })
        .collect()
}

/// Lowercase hex SHA-256 of `bytes`.
pub fn sha256_hex(bytes: &[u8]) -> String {
    let digest = sha2::Sha256::digest(bytes);
    let mut out = String::with_capacity(digest.len() * 2);
    for b in digest {
        out.push_str(&format!("{b:02x}"));
    }
    out
}

/// Make `asset` present in `cache`, downloading it only when absent.
pub fn fetch(
    asset: &RemoteAsset,
    cache: &mut dyn AssetCache,
    transport: &mut dyn Transport,
) -> DocshotResult<FetchOutcome> {
    if cache.exists(&asset.name) {
        tracing::debug!(asset = %asset.name, "asset cached");
        return Ok(FetchOutcome::Cached);
    }

    let body = transport.get(&asset.url)?;

    if let Some(expected) = asset.expected_sha256.as_deref() {
        let actual = sha256_hex(&body);
        if actual != expected {
            return Err(DocshotError::fetch(format!(
                "digest mismatch for '{}': expected {expected}, got {actual}",
                asset.name
            )));
        }
    }

    cache.store(&asset.name, &body)?;
    tracing::info!(asset = %asset.name, bytes = body.len(), "downloaded asset");
    Ok(FetchOutcome::Downloaded)
}

/// [`fetch`] every asset in order; the first failure aborts the remaining ones.
#[tracing::instrument(skip_all, fields(count = assets.len()))]
pub fn fetch_all(
    assets: &[RemoteAsset],
    cache: &mut dyn AssetCache,
    transport: &mut dyn Transport,
) -> DocshotResult<Vec<(String, FetchOutcome)>> {
    let mut out = Vec::with_capacity(assets.len());
    for asset in assets {
        let outcome = fetch(asset, cache, transport)?;
        out.push((asset.name.clone(), outcome));
    }
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/fetch/fetch.rs"]
mod tests;
