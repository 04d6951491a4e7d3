//! Full documentation run: extraction, asset fetch, screenshots.

use std::collections::BTreeSet;
use std::path::PathBuf;

use crate::config::PipelineConfig;
use crate::extract::{Decompressor, extract};
use crate::fetch::{AssetCache, FetchOutcome, Transport, fetch_all, pinned_assets};
use crate::foundation::error::DocshotResult;
use crate::screenshot::{Renderer, ScreenshotReport, drive};

/// External effects a run may perform.
pub struct Capabilities<'a> {
    /// Archive decompression.
    pub decompressor: &'a mut dyn Decompressor,
    /// Local asset cache.
    pub cache: &'a mut dyn AssetCache,
    /// Network access.
    pub transport: &'a mut dyn Transport,
    /// Screenshot renderer.
    pub renderer: &'a mut dyn Renderer,
}

/// One asset and how it was satisfied.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct AssetOutcome {
    /// Asset file name.
    pub name: String,
    /// Cache hit or download.
    pub outcome: FetchOutcome,
}

/// Result of [`run`].
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct PipelineReport {
    /// Recordings written by the extraction stage.
    pub extracted: Vec<PathBuf>,
    /// Pinned assets, in fetch order.
    pub assets: Vec<AssetOutcome>,
    /// Screenshot stage outcome.
    pub screenshots: ScreenshotReport,
}

/// Fetch the pinned player assets into `cache`.
pub fn fetch_assets(
    cfg: &PipelineConfig,
    cache: &mut dyn AssetCache,
    transport: &mut dyn Transport,
) -> DocshotResult<Vec<AssetOutcome>> {
    let assets = pinned_assets(&cfg.assets.expected_sha256);
    Ok(fetch_all(&assets, cache, transport)?
        .into_iter()
        .map(|(name, outcome)| AssetOutcome { name, outcome })
        .collect())
}

/// Run every stage in order. The first fatal error stops the run; later stages do not start.
#[tracing::instrument(skip_all)]
pub fn run(
    cfg: &PipelineConfig,
    caps: Capabilities<'_>,
    only: &BTreeSet<String>,
) -> DocshotResult<PipelineReport> {
    let extracted = extract(
        &cfg.recordings.source_root,
        &cfg.recordings.output_root,
        &cfg.recordings.recording_suffix,
        caps.decompressor,
    )?;
    tracing::info!(count = extracted.len(), "recordings extracted");

    let assets = fetch_assets(cfg, caps.cache, caps.transport)?;
    tracing::info!(
        downloaded = assets
            .iter()
            .filter(|a| a.outcome == FetchOutcome::Downloaded)
            .count(),
        "assets ready"
    );

    let screenshots = drive(&cfg.screenshots, caps.renderer, only)?;

    Ok(PipelineReport {
        extracted,
        assets,
        screenshots,
    })
}
