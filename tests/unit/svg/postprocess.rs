use super::*;

const TERMINAL_SVG: &str = include_str!("../../data/terminal.svg");

#[test]
fn terminal_chrome_is_removed_and_canvas_shrunk() {
    let (out, report) = postprocess_text(TERMINAL_SVG, 500);

    assert_eq!(
        report,
        PostprocessReport {
            decoration_lines_removed: 12,
            untranslated: true,
            viewboxes_rewritten: 1,
        }
    );

    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(
        lines[0],
        r#"<svg class="rich-terminal" viewBox="0 0 1463 881.4" xmlns="http://www.w3.org/2000/svg">"#
    );
    assert_eq!(lines[5], "    </style>");
    assert_eq!(lines[6], "\t<g  clip-path=\"url(#terminal-clip-terminal)\">");
    assert_eq!(lines.last(), Some(&"</svg>"));

    assert!(!out.contains("<circle"));
    assert!(!out.contains("<defs>"));
    assert!(!out.contains("terminal-title"));
    assert!(!out.contains("translate("));
    assert!(out.contains(">hi&#160;</text>"));
}

#[test]
fn postprocess_is_deterministic() {
    let (a, _) = postprocess_text(TERMINAL_SVG, 500);
    let (b, _) = postprocess_text(TERMINAL_SVG, 500);
    assert_eq!(a, b);
}

#[test]
fn unexpected_markup_degenerates_to_reindent() {
    let (out, report) = postprocess_text("<svg><g><rect/></g></svg>", 500);
    assert_eq!(out, "<svg>\n\t<g>\n\t\t<rect/>\n\t</g>\n</svg>\n");
    assert_eq!(report, PostprocessReport::default());
}

#[test]
fn file_is_rewritten_in_place() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("first-steps-1.svg");
    std::fs::write(&path, TERMINAL_SVG).unwrap();

    let report = postprocess_file(&path, 500).unwrap();
    assert_eq!(report.viewboxes_rewritten, 1);

    let (expected, _) = postprocess_text(TERMINAL_SVG, 500);
    assert_eq!(std::fs::read_to_string(&path).unwrap(), expected);
    assert_eq!(std::fs::read_dir(tmp.path()).unwrap().count(), 1);
}

#[test]
fn missing_file_is_an_error() {
    let tmp = tempfile::tempdir().unwrap();
    assert!(postprocess_file(&tmp.path().join("nope.svg"), 500).is_err());
}

#[test]
fn text_pipeline_is_the_composition_of_the_passes() {
    use crate::svg::passes::{shrink_viewbox, strip_decoration, untranslate_first};
    use crate::svg::reindent::reindent;

    let lines: Vec<String> = reindent(TERMINAL_SVG, 500)
        .lines()
        .map(str::to_string)
        .collect();
    let (lines, removed) = strip_decoration(lines);
    let (lines, untranslated) = untranslate_first(lines);
    let (lines, rewritten) = shrink_viewbox(lines);

    let (out, report) = postprocess_text(TERMINAL_SVG, 500);
    assert_eq!(out, format!("{}\n", lines.join("\n")));
    assert_eq!(report.decoration_lines_removed, removed);
    assert_eq!(report.untranslated, untranslated);
    assert_eq!(report.viewboxes_rewritten, rewritten);
}
