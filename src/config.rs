//! Pipeline configuration.
//!
//! Every field has a default so an empty JSON object (or no file at all) yields a working layout.
//! Relative paths are resolved against a root directory with [`PipelineConfig::resolve`].

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::foundation::error::{DocshotError, DocshotResult};

/// Top-level configuration for all pipeline stages.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PipelineConfig {
    /// Archive extraction settings.
    pub recordings: RecordingsConfig,
    /// Pinned web asset settings.
    pub assets: AssetsConfig,
    /// Screenshot driver settings.
    pub screenshots: ScreenshotsConfig,
}

/// Where compressed recordings live and where they are extracted to.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RecordingsConfig {
    /// Tree scanned (depth <= 2) for compressed recordings.
    pub source_root: PathBuf,
    /// Tree receiving the decompressed recordings.
    pub output_root: PathBuf,
    /// File name suffix of a recording once decompressed, e.g. `.cast`.
    pub recording_suffix: String,
}

impl Default for RecordingsConfig {
    fn default() -> Self {
        Self {
            source_root: PathBuf::from("docs/fixtures/recordings"),
            output_root: PathBuf::from("docs/recordings"),
            recording_suffix: ".cast".to_string(),
        }
    }
}

/// Cache of pinned web player assets.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AssetsConfig {
    /// Directory the assets are mirrored into.
    pub cache_dir: PathBuf,
    /// Global HTTP timeout, in seconds.
    pub timeout_secs: u64,
    /// Optional expected SHA-256 (lowercase hex) per asset name.
    pub expected_sha256: BTreeMap<String, String>,
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            cache_dir: PathBuf::from("docs/assets"),
            timeout_secs: 30,
            expected_sha256: BTreeMap::new(),
        }
    }
}

/// Screenshot discovery, rendering and post-processing settings.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScreenshotsConfig {
    /// Tree whose first and second level directories are screenshot specs.
    pub fixtures_root: PathBuf,
    /// Directory receiving `<title>.svg` files.
    pub output_root: PathBuf,
    /// Stylesheet override file name looked up in each spec directory.
    pub stylesheet_file: String,
    /// Executable input producer file name looked up in each spec directory.
    pub input_file: String,
    /// Executable post-render hook file name looked up in each spec directory.
    pub hook_file: String,
    /// Line-wrap threshold used when reindenting the rendered SVG.
    pub wrap_width: usize,
    /// External renderer invocation.
    pub renderer: RendererConfig,
}

impl Default for ScreenshotsConfig {
    fn default() -> Self {
        Self {
            fixtures_root: PathBuf::from("docs/fixtures/screenshots"),
            output_root: PathBuf::from("docs/screenshots"),
            stylesheet_file: "custom.tcss".to_string(),
            input_file: "input".to_string(),
            hook_file: "post-process".to_string(),
            wrap_width: crate::svg::reindent::DEFAULT_WRAP_WIDTH,
            renderer: RendererConfig::default(),
        }
    }
}

/// How the external renderer is spawned.
///
/// `args` may contain the placeholders `{spec_dir}`, `{title}` and `{output}`.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RendererConfig {
    /// Program to run.
    pub program: String,
    /// Arguments, with placeholders substituted per unit.
    pub args: Vec<String>,
    /// Environment variable receiving the column count.
    pub columns_env: String,
    /// Environment variable receiving the line count.
    pub lines_env: String,
    /// Environment variable receiving the output directory.
    pub output_dir_env: String,
    /// Environment variable receiving the output file name.
    pub output_filename_env: String,
    /// Environment variable receiving the stylesheet override path, when one exists.
    pub stylesheet_env: String,
    /// Additional fixed environment variables.
    pub extra_env: BTreeMap<String, String>,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            program: "moulti".to_string(),
            args: ["run", "--", "moulti", "load", "{spec_dir}"]
                .into_iter()
                .map(str::to_string)
                .collect(),
            columns_env: "COLUMNS".to_string(),
            lines_env: "LINES".to_string(),
            output_dir_env: "TEXTUAL_SCREENSHOT_LOCATION".to_string(),
            output_filename_env: "TEXTUAL_SCREENSHOT_FILENAME".to_string(),
            stylesheet_env: "MOULTI_CUSTOM_CSS".to_string(),
            extra_env: BTreeMap::new(),
        }
    }
}

impl PipelineConfig {
    /// Load a configuration from a JSON file.
    pub fn from_path(path: &Path) -> DocshotResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read config '{}'", path.display()))?;
        Self::from_json_str(&text)
    }

    /// Parse a configuration from JSON text.
    pub fn from_json_str(text: &str) -> DocshotResult<Self> {
        let cfg: Self = serde_json::from_str(text)
            .map_err(|e| DocshotError::validation(format!("invalid config JSON: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reject values no stage can work with.
    pub fn validate(&self) -> DocshotResult<()> {
        if self.recordings.recording_suffix.is_empty() {
            return Err(DocshotError::validation(
                "recordings.recording_suffix must be non-empty",
            ));
        }
        if self.assets.timeout_secs == 0 {
            return Err(DocshotError::validation(
                "assets.timeout_secs must be non-zero",
            ));
        }
        if self.screenshots.renderer.program.trim().is_empty() {
            return Err(DocshotError::validation(
                "screenshots.renderer.program must be non-empty",
            ));
        }
        for (field, name) in [
            ("stylesheet_file", &self.screenshots.stylesheet_file),
            ("input_file", &self.screenshots.input_file),
            ("hook_file", &self.screenshots.hook_file),
        ] {
            if name.is_empty() || name.contains(['/', '\\']) {
                return Err(DocshotError::validation(format!(
                    "screenshots.{field} must be a plain file name, got '{name}'"
                )));
            }
        }
        if self.screenshots.wrap_width == 0 {
            return Err(DocshotError::validation(
                "screenshots.wrap_width must be non-zero",
            ));
        }
        Ok(())
    }

    /// Return a copy with every relative directory joined onto `root`.
    pub fn resolve(mut self, root: &Path) -> Self {
        fn join(root: &Path, p: &mut PathBuf) {
            if p.is_relative() {
                *p = root.join(&*p);
            }
        }

        join(root, &mut self.recordings.source_root);
        join(root, &mut self.recordings.output_root);
        join(root, &mut self.assets.cache_dir);
        join(root, &mut self.screenshots.fixtures_root);
        join(root, &mut self.screenshots.output_root);
        self
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
