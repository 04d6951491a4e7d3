use super::*;

fn lines(v: &[&str]) -> Vec<String> {
    v.iter().map(|s| s.to_string()).collect()
}

#[test]
fn decoration_strip_drops_through_first_group_close() {
    let (out, removed) = strip_decoration(lines(&["</style>", "drop1", "drop2", "</g>", "keep"]));
    assert_eq!(out, lines(&["</style>", "keep"]));
    assert_eq!(removed, 3);
}

#[test]
fn decoration_strip_only_consumes_one_group() {
    let (out, _) = strip_decoration(lines(&[
        "<svg>",
        "\t<style>a</style>",
        "\t<defs>",
        "\t<g transform=\"translate(26,22)\">",
        "\t</g>",
        "\t<g transform=\"translate(9, 41)\">",
        "\t</g>",
        "</svg>",
    ]));
    assert_eq!(
        out,
        lines(&[
            "<svg>",
            "\t<style>a</style>",
            "\t<g transform=\"translate(9, 41)\">",
            "\t</g>",
            "</svg>",
        ])
    );
}

#[test]
fn decoration_strip_without_style_is_identity() {
    let input = lines(&["<svg>", "<g>", "</g>", "</svg>"]);
    assert_eq!(strip_decoration(input.clone()), (input, 0));
}

#[test]
fn style_and_group_close_on_one_line_opens_and_closes_the_block() {
    let mut s = DecorationStrip::default();
    assert!(s.keep("</style></g>"));
    assert!(s.keep("next"));
}

#[test]
fn untranslate_only_touches_the_first_match() {
    let (out, done) = untranslate_first(lines(&[
        "<g transform=\"translate(5, 10)\">",
        "<g transform=\"translate(5, 10)\">",
    ]));
    assert_eq!(out, lines(&["<g >", "<g transform=\"translate(5, 10)\">"]));
    assert!(done);
}

#[test]
fn untranslate_accepts_compact_and_decimal_forms() {
    let mut state = Untranslate::default();
    assert_eq!(
        state.rewrite("<g transform=\"translate(9.5,-41)\" id=\"t\">".to_string()),
        "<g  id=\"t\">"
    );
    assert!(state.done());
}

#[test]
fn untranslate_ignores_other_transforms() {
    let input = lines(&["<g transform=\"scale(2)\">"]);
    assert_eq!(untranslate_first(input.clone()), (input, false));
}

#[test]
fn viewbox_arithmetic() {
    let (out, n) = shrink_viewbox(lines(&["<svg viewBox=\"0 0 100 80\">"]));
    assert_eq!(out, lines(&["<svg viewBox=\"0 0 81 33\">"]));
    assert_eq!(n, 1);
}

#[test]
fn viewbox_decimals_stay_exact() {
    let (out, _) = shrink_viewbox(lines(&[
        "<svg class=\"rich-terminal\" viewBox=\"0 0 1482 928.4\" xmlns=\"http://www.w3.org/2000/svg\">",
    ]));
    assert_eq!(
        out[0],
        "<svg class=\"rich-terminal\" viewBox=\"0 0 1463 881.4\" xmlns=\"http://www.w3.org/2000/svg\">"
    );
}

#[test]
fn viewbox_missing_is_a_no_op() {
    let input = lines(&["<svg>", "</svg>"]);
    let (out, n) = shrink_viewbox(input.clone());
    assert_eq!(out, input);
    assert_eq!(n, 0);
}

#[test]
fn decimal_display_trims_trailing_zeros() {
    let d = Decimal::parse("10.50").unwrap();
    assert_eq!(d.to_string(), "10.5");
    assert_eq!(d.minus(19).unwrap().to_string(), "-8.5");
    assert_eq!(
        Decimal::parse("47.0").unwrap().minus(47).unwrap().to_string(),
        "0"
    );
}

#[test]
fn viewbox_too_precise_to_shrink_is_left_alone() {
    let tiny = format!("0.{}1", "0".repeat(38));
    let line = format!("<svg viewBox=\"0 0 {tiny} 80\">");
    let (out, n) = shrink_viewbox(lines(&[&line]));
    assert_eq!(out, vec![line]);
    assert_eq!(n, 1);

    let huge = "9".repeat(40);
    let line = format!("<svg viewBox=\"0 0 {huge} 80\">");
    let (out, _) = shrink_viewbox(lines(&[&line]));
    assert_eq!(out, vec![line]);
}

#[test]
fn decimal_overflow_is_reported_not_wrapped() {
    let d = Decimal::parse(&format!("1.{}", "0".repeat(37))).unwrap();
    assert!(d.minus(i64::MAX).is_none());
    assert!(Decimal::parse(&format!("1.{}", "0".repeat(39))).is_none());
}
