use std::sync::OnceLock;

use regex::Regex;

fn spec_name_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(\d+)x(\d+)-(.+)$").expect("spec name regex"))
}

/// Screenshot parameters encoded in a directory name `<columns>x<lines>-<title>`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, serde::Serialize)]
pub struct ScreenshotSpec {
    /// Terminal width in columns.
    pub columns: u32,
    /// Terminal height in lines.
    pub lines: u32,
    /// Output key; the rendered file is `<title>.svg`.
    pub title: String,
}

impl ScreenshotSpec {
    /// Parse a directory name. Returns `None` when the name does not follow the convention,
    /// a dimension is zero or overflows, or the title could not be used as a file name.
    pub fn parse(name: &str) -> Option<Self> {
        let caps = spec_name_re().captures(name)?;
        let columns: u32 = caps[1].parse().ok()?;
        let lines: u32 = caps[2].parse().ok()?;
        let title = &caps[3];

        if columns == 0 || lines == 0 {
            return None;
        }
        if title.starts_with('.') || title.contains(['/', '\\']) {
            return None;
        }
        Some(Self {
            columns,
            lines,
            title: title.to_string(),
        })
    }

    /// File name of the rendered image.
    pub fn output_file_name(&self) -> String {
        format!("{}.svg", self.title)
    }
}

/// Whether `name` looks like an attempt at the naming convention (leading digit).
///
/// Such names failing [`ScreenshotSpec::parse`] are worth a warning; other directories are
/// simply not screenshot specs.
pub fn resembles_spec_name(name: &str) -> bool {
    name.starts_with(|c: char| c.is_ascii_digit())
}

#[cfg(test)]
#[path = "../../tests/unit/screenshot/spec.rs"]
mod tests;
