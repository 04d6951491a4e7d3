use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use anyhow::Context as _;

use crate::foundation::error::DocshotResult;

/// Create the parent directory of `path` if it has one.
pub fn ensure_parent_dir(path: &Path) -> DocshotResult<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

/// Return `true` when `program` can be spawned with `probe_arg` and exits successfully.
///
/// Used to report a missing tool up front instead of failing halfway through a stage.
pub fn is_tool_on_path(program: impl AsRef<OsStr>, probe_arg: &str) -> bool {
    Command::new(program)
        .arg(probe_arg)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

/// Return `true` when `path` is a regular file the current user may execute.
///
/// On non-unix targets any regular file counts.
pub fn is_executable(path: &Path) -> bool {
    let Ok(meta) = std::fs::metadata(path) else {
        return false;
    };
    if !meta.is_file() {
        return false;
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt as _;
        meta.permissions().mode() & 0o111 != 0
    }
    #[cfg(not(unix))]
    {
        true
    }
}

/// Sibling path used while writing `path`; removed by [`write_atomic`] on every exit path.
pub(crate) fn staging_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(".{name}.docshot-tmp"))
}

/// Write `bytes` to `path` through a sibling staging file and a rename.
///
/// Readers observe either the previous content (or absence) or the complete new content.
pub fn write_atomic(path: &Path, bytes: &[u8]) -> DocshotResult<()> {
    ensure_parent_dir(path)?;
    let staging = staging_path(path);

    let res = std::fs::write(&staging, bytes)
        .with_context(|| format!("failed to write '{}'", staging.display()))
        .and_then(|()| {
            std::fs::rename(&staging, path).with_context(|| {
                format!(
                    "failed to move '{}' to '{}'",
                    staging.display(),
                    path.display()
                )
            })
        });

    if res.is_err() {
        let _ = std::fs::remove_file(&staging);
    }
    Ok(res?)
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/fs.rs"]
mod tests;
