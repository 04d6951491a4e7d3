use std::path::Path;
use std::process::{Command, Stdio};

use crate::foundation::error::{DocshotError, DocshotResult};

/// Run a per-unit post-render hook with the finished image path as its only argument.
///
/// The hook may rewrite the file freely; its result is not inspected. A non-zero exit is fatal.
pub fn run_hook(hook: &Path, image: &Path) -> DocshotResult<()> {
    let status = Command::new(hook)
        .arg(image)
        .stdin(Stdio::null())
        .status()
        .map_err(|e| {
            DocshotError::tool(format!("failed to spawn hook '{}': {e}", hook.display()))
        })?;

    if !status.success() {
        return Err(DocshotError::render(format!(
            "hook '{}' exited with status {status} for '{}'",
            hook.display(),
            image.display()
        )));
    }
    Ok(())
}
