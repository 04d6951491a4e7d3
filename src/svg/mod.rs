//! Post-processing of rendered terminal screenshots.
//!
//! Four passes run in a fixed order, each relying on the shape left by the previous one:
//!
//! - A: [`reindent`](reindent::reindent) puts every element on its own tab-indented line
//! - B: [`strip_decoration`](passes::strip_decoration) drops the window chrome after the style block
//! - C: [`untranslate_first`](passes::untranslate_first) removes the terminal body offset
//! - D: [`shrink_viewbox`](passes::shrink_viewbox) shrinks the canvas by the removed chrome

/// Per-unit post-render hook.
pub mod hook;
pub mod passes;
/// Pass sequencing over text and files.
pub mod postprocess;
pub mod reindent;

pub use hook::run_hook;
pub use postprocess::{PostprocessReport, postprocess_file, postprocess_text};
