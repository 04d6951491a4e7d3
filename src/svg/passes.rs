//! Line passes B, C and D.
//!
//! Each pass is a total function over an ordered sequence of lines. The only state carried
//! across lines is the small value owned by the pass itself; a pass that matches nothing returns
//! its input unchanged.

use std::sync::OnceLock;

use regex::{Captures, Regex};

/// Closing marker of the renderer's style block.
pub const STYLE_CLOSE: &str = "</style>";
/// Closing marker of a group element.
pub const GROUP_CLOSE: &str = "</g>";

/// Horizontal chrome removed by pass B: left inset, right inset.
pub const CHROME_X: (i64, i64) = (9, 10);
/// Vertical chrome removed by pass B: title bar, bottom inset.
pub const CHROME_Y: (i64, i64) = (41, 6);

fn translate_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"transform="translate\(\s*-?\d+(?:\.\d+)?\s*,\s*-?\d+(?:\.\d+)?\s*\)""#)
            .expect("translate regex")
    })
}

fn viewbox_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"viewBox="0 0 (-?\d+(?:\.\d+)?) (-?\d+(?:\.\d+)?)""#).expect("viewBox regex")
    })
}

/// Scan state of pass B.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DecorationStrip {
    inside: bool,
}

impl DecorationStrip {
    /// Feed one line; return whether it is kept.
    ///
    /// The style-close line is kept and opens the decoration block; every following line up to
    /// and including the next group close is dropped.
    pub fn keep(&mut self, line: &str) -> bool {
        let keep = if line.contains(STYLE_CLOSE) {
            self.inside = true;
            true
        } else {
            !self.inside
        };
        if self.inside && line.contains(GROUP_CLOSE) {
            self.inside = false;
        }
        keep
    }
}

/// Pass B: delete the window decoration emitted after the style block.
///
/// Returns the kept lines and how many were removed.
pub fn strip_decoration(lines: Vec<String>) -> (Vec<String>, usize) {
    let before = lines.len();
    let mut state = DecorationStrip::default();
    let kept: Vec<String> = lines.into_iter().filter(|l| state.keep(l)).collect();
    let removed = before - kept.len();
    (kept, removed)
}

/// Scan state of pass C.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Untranslate {
    done: bool,
}

impl Untranslate {
    /// Rewrite one line, removing the translate attribute only the first time one is seen.
    pub fn rewrite(&mut self, line: String) -> String {
        if self.done {
            return line;
        }
        match translate_re().find(&line) {
            Some(m) => {
                self.done = true;
                let mut out = String::with_capacity(line.len() - m.len());
                out.push_str(&line[..m.start()]);
                out.push_str(&line[m.end()..]);
                out
            }
            None => line,
        }
    }

    /// Whether a translate attribute has been removed.
    pub fn done(&self) -> bool {
        self.done
    }
}

/// Pass C: remove the first `transform="translate(x, y)"` attribute in the document.
///
/// Returns the lines and whether an attribute was removed.
pub fn untranslate_first(lines: Vec<String>) -> (Vec<String>, bool) {
    let mut state = Untranslate::default();
    let lines = lines.into_iter().map(|l| state.rewrite(l)).collect();
    (lines, state.done())
}

/// Fixed-point decimal used for viewBox arithmetic so results stay exact.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Decimal {
    units: i128,
    scale: u32,
}

impl Decimal {
    fn parse(s: &str) -> Option<Self> {
        let (int, frac) = s.split_once('.').unwrap_or((s, ""));
        let digits = format!("{int}{frac}");
        let scale = u32::try_from(frac.len()).ok()?;
        10i128.checked_pow(scale)?;
        Some(Self {
            units: digits.parse().ok()?,
            scale,
        })
    }

    /// `self - whole`, or `None` when the result does not fit.
    fn minus(self, whole: i64) -> Option<Self> {
        let whole = i128::from(whole).checked_mul(10i128.checked_pow(self.scale)?)?;
        Some(Self {
            units: self.units.checked_sub(whole)?,
            scale: self.scale,
        })
    }
}

impl std::fmt::Display for Decimal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // `parse` guarantees the power fits.
        let pow = 10i128.checked_pow(self.scale).unwrap_or(i128::MAX);
        let sign = if self.units < 0 { "-" } else { "" };
        let abs = self.units.unsigned_abs();
        let pow = pow.unsigned_abs();
        let int = abs / pow;
        let frac = abs % pow;
        if frac == 0 {
            return write!(f, "{sign}{int}");
        }
        let frac = format!("{frac:0width$}", width = self.scale as usize);
        write!(f, "{sign}{int}.{}", frac.trim_end_matches('0'))
    }
}

/// Shrink one `viewBox="0 0 W H"` match by the removed chrome.
fn shrink(caps: &Captures<'_>) -> String {
    let (Some(w), Some(h)) = (Decimal::parse(&caps[1]), Decimal::parse(&caps[2])) else {
        return caps[0].to_string();
    };
    let (Some(w), Some(h)) = (
        w.minus(CHROME_X.0 + CHROME_X.1),
        h.minus(CHROME_Y.0 + CHROME_Y.1),
    ) else {
        return caps[0].to_string();
    };
    format!(r#"viewBox="0 0 {w} {h}""#)
}

/// Pass D: shrink every `viewBox="0 0 W H"` by the chrome removed in pass B.
///
/// Returns the rewritten lines and how many lines matched.
pub fn shrink_viewbox(lines: Vec<String>) -> (Vec<String>, usize) {
    let mut matched = 0usize;
    let lines = lines
        .into_iter()
        .map(|line| {
            if viewbox_re().is_match(&line) {
                matched += 1;
                viewbox_re().replace_all(&line, shrink).into_owned()
            } else {
                line
            }
        })
        .collect();
    (lines, matched)
}

#[cfg(test)]
#[path = "../../tests/unit/svg/passes.rs"]
mod tests;
