//! Docshot builds the generated assets of a terminal application's documentation site.
//!
//! A run has three stages, executed in order by [`pipeline::run`]:
//!
//! - Decompress recorded terminal sessions into the documentation tree ([`extract`])
//! - Mirror the pinned web player release into a local cache ([`fetch`])
//! - Render, post-process and hook one SVG screenshot per spec directory ([`screenshot`], [`svg`])
//!
//! Each stage is idempotent on its own terms and every external effect goes through a small
//! capability trait, so stages can be driven against in-memory doubles.
#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod foundation;

pub mod config;
pub mod extract;
pub mod fetch;
pub mod pipeline;
pub mod screenshot;
pub mod svg;

pub use crate::config::{
    AssetsConfig, PipelineConfig, RecordingsConfig, RendererConfig, ScreenshotsConfig,
};
pub use crate::extract::{Compression, Decompressor, SystemDecompressor};
pub use crate::fetch::{
    AssetCache, FetchOutcome, FsAssetCache, HttpTransport, MemoryAssetCache, RemoteAsset,
    Transport,
};
pub use crate::foundation::error::{DocshotError, DocshotResult};
pub use crate::pipeline::{AssetOutcome, Capabilities, PipelineReport};
pub use crate::screenshot::{CommandRenderer, RenderJob, Renderer, ScreenshotReport, UnitStatus};
