use std::path::Path;

use anyhow::Context as _;

use crate::foundation::error::DocshotResult;
use crate::foundation::fs::write_atomic;
use crate::svg::passes::{shrink_viewbox, strip_decoration, untranslate_first};
use crate::svg::reindent::reindent;

/// What the passes changed in one document.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct PostprocessReport {
    /// Lines removed by the decoration strip.
    pub decoration_lines_removed: usize,
    /// Whether a translate attribute was removed.
    pub untranslated: bool,
    /// Lines whose viewBox was shrunk.
    pub viewboxes_rewritten: usize,
}

/// Run passes A to D over `input` in order.
pub fn postprocess_text(input: &str, wrap: usize) -> (String, PostprocessReport) {
    let formatted = reindent(input, wrap);
    let lines: Vec<String> = formatted.lines().map(str::to_string).collect();

    let (lines, decoration_lines_removed) = strip_decoration(lines);
    let (lines, untranslated) = untranslate_first(lines);
    let (lines, viewboxes_rewritten) = shrink_viewbox(lines);

    let mut out = lines.join("\n");
    out.push('\n');
    (
        out,
        PostprocessReport {
            decoration_lines_removed,
            untranslated,
            viewboxes_rewritten,
        },
    )
}

/// Post-process the rendered file at `path` in place.
///
/// The file is read once, transformed in memory and replaced atomically.
#[tracing::instrument]
pub fn postprocess_file(path: &Path, wrap: usize) -> DocshotResult<PostprocessReport> {
    let input =
        std::fs::read_to_string(path).with_context(|| format!("read '{}'", path.display()))?;
    let (output, report) = postprocess_text(&input, wrap);

    if report.viewboxes_rewritten == 0 {
        tracing::debug!("no viewBox found; dimensions left untouched");
    }
    if !report.untranslated {
        tracing::debug!("no translate attribute found");
    }

    write_atomic(path, output.as_bytes())?;
    Ok(report)
}

#[cfg(test)]
#[path = "../../tests/unit/svg/postprocess.rs"]
mod tests;
