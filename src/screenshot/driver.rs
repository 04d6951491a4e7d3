use std::collections::BTreeSet;
use std::path::PathBuf;

use anyhow::Context as _;

use crate::config::ScreenshotsConfig;
use crate::foundation::error::DocshotResult;
use crate::screenshot::discover::{Discovery, Unit, discover};
use crate::screenshot::renderer::{RenderInput, RenderJob, Renderer};
use crate::svg::{PostprocessReport, postprocess_file, run_hook};

/// What happened to one unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UnitStatus {
    /// The image already existed; nothing ran.
    Present,
    /// The renderer ran and the image was post-processed.
    Rendered,
    /// The renderer ran successfully but left no image behind.
    NoOutput,
}

/// Per-unit result of a drive.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct UnitOutcome {
    /// Output key.
    pub title: String,
    /// Spec directory.
    pub dir: PathBuf,
    /// Outcome.
    pub status: UnitStatus,
    /// Pass statistics when the image was post-processed.
    pub postprocess: Option<PostprocessReport>,
    /// Whether a post-render hook ran.
    pub hook_ran: bool,
}

/// Result of [`drive`].
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct ScreenshotReport {
    /// Outcomes in processing order.
    pub units: Vec<UnitOutcome>,
    /// Directories resembling the naming convention that failed to parse.
    pub rejected: Vec<PathBuf>,
    /// Titles claimed by several directories.
    pub collisions: Vec<String>,
}

impl ScreenshotReport {
    /// Number of units with `status`.
    pub fn count(&self, status: UnitStatus) -> usize {
        self.units.iter().filter(|u| u.status == status).count()
    }
}

/// Render, post-process and hook a single unit unless its image already exists.
pub fn drive_unit(
    unit: &Unit,
    cfg: &ScreenshotsConfig,
    renderer: &mut dyn Renderer,
) -> DocshotResult<UnitOutcome> {
    let mut outcome = UnitOutcome {
        title: unit.spec.title.clone(),
        dir: unit.dir.clone(),
        status: UnitStatus::Present,
        postprocess: None,
        hook_ran: false,
    };

    let output = unit.output_path(&cfg.output_root);
    if output.exists() {
        tracing::debug!(title = %unit.spec.title, "image present; skipped");
        return Ok(outcome);
    }

    std::fs::create_dir_all(&cfg.output_root)
        .with_context(|| format!("create screenshot output '{}'", cfg.output_root.display()))?;

    let job = RenderJob::for_unit(unit, &cfg.output_root);
    tracing::info!(
        title = %job.title,
        columns = job.columns,
        lines = job.lines,
        stylesheet = job.stylesheet.is_some(),
        piped = matches!(job.input, RenderInput::Producer(_)),
        "rendering"
    );
    renderer.render(&job)?;

    if !output.exists() {
        tracing::warn!(
            title = %unit.spec.title,
            output = %output.display(),
            "renderer produced no image"
        );
        outcome.status = UnitStatus::NoOutput;
        return Ok(outcome);
    }

    outcome.status = UnitStatus::Rendered;
    outcome.postprocess = Some(postprocess_file(&output, cfg.wrap_width)?);

    if let Some(hook) = &unit.hook {
        run_hook(hook, &output)?;
        outcome.hook_ran = true;
    }
    Ok(outcome)
}

/// Discover every unit under the fixtures root and [`drive_unit`] them one after another.
///
/// When `only` is non-empty, units whose title is not listed are left out entirely. The first
/// fatal error aborts the remaining units.
#[tracing::instrument(skip_all, fields(root = %cfg.fixtures_root.display()))]
pub fn drive(
    cfg: &ScreenshotsConfig,
    renderer: &mut dyn Renderer,
    only: &BTreeSet<String>,
) -> DocshotResult<ScreenshotReport> {
    let Discovery {
        units,
        rejected,
        collisions,
    } = discover(cfg)?;

    let mut report = ScreenshotReport {
        units: Vec::with_capacity(units.len()),
        rejected,
        collisions,
    };
    for unit in units
        .iter()
        .filter(|u| only.is_empty() || only.contains(&u.spec.title))
    {
        report.units.push(drive_unit(unit, cfg, renderer)?);
    }

    tracing::info!(
        rendered = report.count(UnitStatus::Rendered),
        present = report.count(UnitStatus::Present),
        no_output = report.count(UnitStatus::NoOutput),
        "screenshots done"
    );
    Ok(report)
}

/// Read-only view of one unit for [`plan`].
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize)]
pub struct PlannedUnit {
    /// The unit as discovered.
    #[serde(flatten)]
    pub unit: Unit,
    /// Target image.
    pub output: PathBuf,
    /// `true` when the image already exists and the unit would be skipped.
    pub present: bool,
}

/// What [`drive`] would do, without running anything.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize)]
pub struct Plan {
    /// Units in processing order.
    pub units: Vec<PlannedUnit>,
    /// Directories resembling the naming convention that failed to parse.
    pub rejected: Vec<PathBuf>,
    /// Titles claimed by several directories.
    pub collisions: Vec<String>,
}

/// List discovered units and whether each would be rendered.
pub fn plan(cfg: &ScreenshotsConfig) -> DocshotResult<Plan> {
    let discovery = discover(cfg)?;
    let units = discovery
        .units
        .into_iter()
        .map(|unit| {
            let output = unit.output_path(&cfg.output_root);
            let present = output.exists();
            PlannedUnit {
                unit,
                output,
                present,
            }
        })
        .collect();
    Ok(Plan {
        units,
        rejected: discovery.rejected,
        collisions: discovery.collisions,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/screenshot/driver.rs"]
mod tests;
