//! Screenshot driver: spec discovery, renderer invocation, post-processing and hooks.

/// Spec directory discovery.
pub mod discover;
/// Per-unit render loop.
pub mod driver;
/// Renderer capability and its command-line implementation.
pub mod renderer;
/// Directory name convention.
pub mod spec;

pub use discover::{Discovery, Unit, discover};
pub use driver::{
    Plan, PlannedUnit, ScreenshotReport, UnitOutcome, UnitStatus, drive, drive_unit, plan,
};
pub use renderer::{CommandRenderer, RenderInput, RenderJob, Renderer};
pub use spec::ScreenshotSpec;
