//! Archive extraction: compressed session recordings to a mirrored output tree.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use anyhow::Context as _;
use walkdir::WalkDir;

use crate::foundation::error::{DocshotError, DocshotResult};
use crate::foundation::fs::{ensure_parent_dir, is_tool_on_path};

/// Compression formats recognised by file name suffix.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Compression {
    /// `.xz`, handled by the system `xz` binary.
    Xz,
    /// `.gz`, handled by the system `gzip` binary.
    Gzip,
}

impl Compression {
    /// All supported formats, in lookup order.
    pub const ALL: [Compression; 2] = [Compression::Xz, Compression::Gzip];

    /// File name suffix including the leading dot.
    pub fn suffix(self) -> &'static str {
        match self {
            Self::Xz => ".xz",
            Self::Gzip => ".gz",
        }
    }

    /// System tool able to decompress this format with `-d -c`.
    pub fn tool(self) -> &'static str {
        match self {
            Self::Xz => "xz",
            Self::Gzip => "gzip",
        }
    }
}

/// One compressed recording found under the source root.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FixtureArchive {
    /// Absolute (or root-joined) path of the archive.
    pub source: PathBuf,
    /// Path relative to the source root, compression suffix included.
    pub relative: PathBuf,
    /// Detected compression.
    pub compression: Compression,
}

impl FixtureArchive {
    /// Mirrored destination under `output_root`, compression suffix stripped.
    pub fn output_path(&self, output_root: &Path) -> PathBuf {
        let rel = self.relative.to_string_lossy();
        let stripped = rel
            .strip_suffix(self.compression.suffix())
            .unwrap_or(&*rel);
        output_root.join(stripped)
    }
}

/// Capability that turns one archive into one plain file.
pub trait Decompressor {
    /// Fail with [`DocshotError::Tool`] when `compression` cannot be handled at all.
    fn ensure_available(&mut self, compression: Compression) -> DocshotResult<()>;

    /// Decompress `src` into `dst`, overwriting it.
    fn decompress(&mut self, compression: Compression, src: &Path, dst: &Path)
    -> DocshotResult<()>;
}

/// [`Decompressor`] backed by the system `xz` / `gzip` binaries.
#[derive(Clone, Debug, Default)]
pub struct SystemDecompressor;

impl Decompressor for SystemDecompressor {
    fn ensure_available(&mut self, compression: Compression) -> DocshotResult<()> {
        if !is_tool_on_path(compression.tool(), "--version") {
            return Err(DocshotError::tool(format!(
                "'{}' is required to extract '*{}' recordings, but was not found on PATH",
                compression.tool(),
                compression.suffix()
            )));
        }
        Ok(())
    }

    fn decompress(
        &mut self,
        compression: Compression,
        src: &Path,
        dst: &Path,
    ) -> DocshotResult<()> {
        let out = File::create(dst).with_context(|| format!("create '{}'", dst.display()))?;

        let child = Command::new(compression.tool())
            .args(["-d", "-c"])
            .arg(src)
            .stdin(Stdio::null())
            .stdout(Stdio::from(out))
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                let _ = std::fs::remove_file(dst);
                DocshotError::tool(format!("failed to spawn {}: {e}", compression.tool()))
            })?;

        let output = child.wait_with_output().map_err(|e| {
            let _ = std::fs::remove_file(dst);
            DocshotError::extract(format!("failed to wait for {}: {e}", compression.tool()))
        })?;

        if !output.status.success() {
            let _ = std::fs::remove_file(dst);
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(DocshotError::extract(format!(
                "{} exited with status {} for '{}': {}",
                compression.tool(),
                output.status,
                src.display(),
                stderr.trim()
            )));
        }
        Ok(())
    }
}

/// List compressed recordings under `source_root`, at most two levels deep, in file name order.
///
/// A file qualifies when its name ends with `recording_suffix` followed by a supported
/// compression suffix (e.g. `demo.cast.xz`). A missing `source_root` yields no archives.
pub fn discover_archives(
    source_root: &Path,
    recording_suffix: &str,
) -> DocshotResult<Vec<FixtureArchive>> {
    if !source_root.is_dir() {
        tracing::debug!(root = %source_root.display(), "recording source root absent");
        return Ok(Vec::new());
    }

    let mut out = Vec::new();
    for entry in WalkDir::new(source_root)
        .min_depth(1)
        .max_depth(2)
        .sort_by_file_name()
    {
        let entry = entry.with_context(|| format!("walk '{}'", source_root.display()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy();
        let Some(compression) = Compression::ALL.into_iter().find(|c| {
            name.strip_suffix(c.suffix())
                .is_some_and(|stem| stem.ends_with(recording_suffix))
        }) else {
            continue;
        };

        let relative = entry
            .path()
            .strip_prefix(source_root)
            .with_context(|| format!("relativize '{}'", entry.path().display()))?
            .to_path_buf();
        out.push(FixtureArchive {
            source: entry.path().to_path_buf(),
            relative,
            compression,
        });
    }
    Ok(out)
}

/// Decompress every recording under `source_root` into `output_root`.
///
/// Always overwrites. Required tools are checked before the first archive is touched; the first
/// decompression failure aborts the stage. Returns the written paths in processing order.
#[tracing::instrument(skip(decompressor))]
pub fn extract(
    source_root: &Path,
    output_root: &Path,
    recording_suffix: &str,
    decompressor: &mut dyn Decompressor,
) -> DocshotResult<Vec<PathBuf>> {
    std::fs::create_dir_all(output_root)
        .with_context(|| format!("create recordings output '{}'", output_root.display()))?;

    let archives = discover_archives(source_root, recording_suffix)?;

    let mut needed: Vec<Compression> = archives.iter().map(|a| a.compression).collect();
    needed.sort();
    needed.dedup();
    for compression in needed {
        decompressor.ensure_available(compression)?;
    }

    let mut written = Vec::with_capacity(archives.len());
    for archive in &archives {
        let dst = archive.output_path(output_root);
        ensure_parent_dir(&dst)?;
        decompressor.decompress(archive.compression, &archive.source, &dst)?;
        tracing::info!(archive = %archive.relative.display(), "extracted recording");
        written.push(dst);
    }
    Ok(written)
}

#[cfg(test)]
#[path = "../tests/unit/extract.rs"]
mod tests;
