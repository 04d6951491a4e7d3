use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::Context as _;
use walkdir::WalkDir;

use crate::config::ScreenshotsConfig;
use crate::foundation::error::DocshotResult;
use crate::foundation::fs::is_executable;
use crate::screenshot::spec::{ScreenshotSpec, resembles_spec_name};

/// One screenshot spec directory and the optional files found beside it.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct Unit {
    /// Parsed directory name.
    pub spec: ScreenshotSpec,
    /// Spec directory.
    pub dir: PathBuf,
    /// Absolute path of the stylesheet override, if present.
    pub stylesheet: Option<PathBuf>,
    /// Executable input producer, if present.
    pub input: Option<PathBuf>,
    /// Executable post-render hook, if present.
    pub hook: Option<PathBuf>,
}

impl Unit {
    /// Build a unit for `dir`, looking up the optional files named in `cfg`.
    pub fn resolve(spec: ScreenshotSpec, dir: &Path, cfg: &ScreenshotsConfig) -> Self {
        let stylesheet = Some(dir.join(&cfg.stylesheet_file))
            .filter(|p| p.is_file())
            .map(|p| std::path::absolute(&p).unwrap_or(p));
        let input = Some(dir.join(&cfg.input_file)).filter(|p| is_executable(p));
        let hook = Some(dir.join(&cfg.hook_file)).filter(|p| is_executable(p));

        Self {
            spec,
            dir: dir.to_path_buf(),
            stylesheet,
            input,
            hook,
        }
    }

    /// Rendered image path under `output_root`.
    pub fn output_path(&self, output_root: &Path) -> PathBuf {
        output_root.join(self.spec.output_file_name())
    }
}

/// Result of scanning a fixtures root.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct Discovery {
    /// Units in traversal order.
    pub units: Vec<Unit>,
    /// Directories whose names resemble the convention but do not parse.
    pub rejected: Vec<PathBuf>,
    /// Titles claimed by more than one directory.
    pub collisions: Vec<String>,
}

/// Scan the first two directory levels of `cfg.fixtures_root` for screenshot specs.
///
/// Traversal is sorted by file name. A missing root yields an empty discovery.
pub fn discover(cfg: &ScreenshotsConfig) -> DocshotResult<Discovery> {
    let root = &cfg.fixtures_root;
    let mut out = Discovery::default();
    if !root.is_dir() {
        tracing::debug!(root = %root.display(), "screenshot fixtures root absent");
        return Ok(out);
    }

    let mut seen: BTreeMap<String, PathBuf> = BTreeMap::new();
    for entry in WalkDir::new(root)
        .min_depth(1)
        .max_depth(2)
        .sort_by_file_name()
    {
        let entry = entry.with_context(|| format!("walk '{}'", root.display()))?;
        if !entry.file_type().is_dir() {
            continue;
        }

        let name = entry.file_name().to_string_lossy();
        let Some(spec) = ScreenshotSpec::parse(&name) else {
            if resembles_spec_name(&name) {
                tracing::warn!(
                    dir = %entry.path().display(),
                    "directory name does not match <columns>x<lines>-<title>; skipped"
                );
                out.rejected.push(entry.path().to_path_buf());
            } else {
                tracing::debug!(dir = %entry.path().display(), "not a screenshot spec");
            }
            continue;
        };

        if let Some(first) = seen.get(&spec.title) {
            tracing::warn!(
                title = %spec.title,
                first = %first.display(),
                dir = %entry.path().display(),
                "title already claimed; the first rendered image wins"
            );
            if !out.collisions.contains(&spec.title) {
                out.collisions.push(spec.title.clone());
            }
        } else {
            seen.insert(spec.title.clone(), entry.path().to_path_buf());
        }

        out.units.push(Unit::resolve(spec, entry.path(), cfg));
    }
    Ok(out)
}
