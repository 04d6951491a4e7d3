//! Markup reindentation (pass A).
//!
//! The document structure comes from `roxmltree`; start tags, text and comments are copied from
//! the source by byte range, so attribute values and character references stay exactly as the
//! renderer wrote them. Only inter-tag whitespace and line structure change.

use roxmltree::{Document, Node, NodeType, ParsingOptions};

/// Default line-wrap threshold, in characters.
pub const DEFAULT_WRAP_WIDTH: usize = 500;

const INDENT: char = '\t';

fn find_tag_end(s: &str) -> Option<usize> {
    let mut quote: Option<u8> = None;
    for (i, b) in s.bytes().enumerate() {
        match quote {
            Some(q) if b == q => quote = None,
            Some(_) => {}
            None if b == b'"' || b == b'\'' => quote = Some(b),
            None if b == b'>' => return Some(i),
            None => {}
        }
    }
    None
}

/// Split a start tag into `<name`, each attribute, and the closing `>` or `/>`.
fn split_start_tag(raw: &str) -> (&str, Vec<&str>, &str) {
    let close = if raw.ends_with("/>") { "/>" } else { ">" };
    let inner = &raw[..raw.len() - close.len()];
    let name_end = inner
        .char_indices()
        .skip(1)
        .find(|(_, c)| c.is_whitespace())
        .map(|(i, _)| i)
        .unwrap_or(inner.len());
    let head = &inner[..name_end];

    let mut attrs = Vec::new();
    let bytes = inner.as_bytes();
    let mut i = name_end;
    while i < bytes.len() {
        while i < bytes.len() && bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        if i >= bytes.len() {
            break;
        }
        let start = i;
        let mut quote: Option<u8> = None;
        while i < bytes.len() {
            let b = bytes[i];
            match quote {
                Some(q) if b == q => {
                    quote = None;
                    i += 1;
                    break;
                }
                Some(_) => {}
                None if b == b'"' || b == b'\'' => quote = Some(b),
                None if b.is_ascii_whitespace() => break,
                None => {}
            }
            i += 1;
        }
        attrs.push(&inner[start..i]);
    }
    (head, attrs, close)
}

/// Render a start tag at `depth`, wrapping attributes once the line exceeds `wrap`.
fn start_tag_lines(raw: &str, depth: usize, wrap: usize) -> Vec<String> {
    let indent: String = std::iter::repeat_n(INDENT, depth).collect();
    let single = format!("{indent}{}", collapse_tag(raw));
    if single.chars().count() <= wrap {
        return vec![single];
    }

    let (head, attrs, close) = split_start_tag(raw);
    let mut lines = Vec::new();
    let mut current = format!("{indent}{head}");
    let mut has_attr = false;
    for attr in attrs {
        let candidate = current.chars().count() + 1 + attr.chars().count();
        if has_attr && candidate > wrap {
            lines.push(std::mem::take(&mut current));
            current = format!("{indent}{INDENT}{attr}");
        } else {
            current.push(' ');
            current.push_str(attr);
        }
        has_attr = true;
    }
    current.push_str(close);
    lines.push(current);
    lines
}

/// Normalize whitespace between attributes of a start tag, leaving values untouched.
fn collapse_tag(raw: &str) -> String {
    if !raw.contains(['\n', '\r', '\t']) && !raw.contains("  ") {
        return raw.to_string();
    }
    let (head, attrs, close) = split_start_tag(raw);
    let mut out = head.to_string();
    for attr in attrs {
        out.push(' ');
        out.push_str(attr);
    }
    out.push_str(close);
    out
}

fn indent(depth: usize) -> String {
    std::iter::repeat_n(INDENT, depth).collect()
}

/// Source text of `node`'s start tag.
fn start_tag<'a>(input: &'a str, node: Node<'_, '_>) -> &'a str {
    let from = node.range().start;
    let len = find_tag_end(&input[from..]).map_or(input.len() - from, |i| i + 1);
    &input[from..from + len]
}

fn emit(input: &str, node: Node<'_, '_>, depth: usize, wrap: usize, lines: &mut Vec<String>) {
    match node.node_type() {
        NodeType::Root => {}
        NodeType::Text => {
            let text = input[node.range()].trim();
            if !text.is_empty() {
                lines.push(format!("{}{text}", indent(depth)));
            }
        }
        NodeType::Comment | NodeType::PI => {
            lines.push(format!("{}{}", indent(depth), &input[node.range()]));
        }
        NodeType::Element => {
            let open = start_tag(input, node);
            let mut tag = start_tag_lines(open, depth, wrap);
            if open.ends_with("/>") {
                lines.extend(tag);
                return;
            }

            let range = node.range();
            let inner_start = range.start + open.len();
            let close_start = input[inner_start..range.end]
                .rfind("</")
                .map_or(range.end, |i| inner_start + i);
            let close = &input[close_start..range.end];

            if node.children().all(|c| c.is_text()) {
                let inner = &input[inner_start..close_start];
                if let Some(last) = tag.last_mut() {
                    if !inner.trim().is_empty() {
                        last.push_str(inner);
                    }
                    last.push_str(close);
                }
                lines.extend(tag);
                return;
            }

            lines.extend(tag);
            for child in node.children() {
                emit(input, child, depth + 1, wrap, lines);
            }
            lines.push(format!("{}{close}", indent(depth)));
        }
    }
}

/// Reformat `input` with one element per line, tab indentation, and attribute wrapping past
/// `wrap` characters.
///
/// Elements whose children are only text (or that are empty) stay on a single line.
/// Whitespace-only text between tags is dropped; other text is kept verbatim. Markup outside any
/// node, such as the XML declaration or a doctype, is kept on its own line. Input that is not
/// well-formed is returned unchanged.
pub fn reindent(input: &str, wrap: usize) -> String {
    let mut opts = ParsingOptions::default();
    opts.allow_dtd = true;
    let doc = match Document::parse_with_options(input, opts) {
        Ok(doc) => doc,
        Err(e) => {
            tracing::warn!("markup is not well-formed, left unformatted: {e}");
            let mut out = input.to_string();
            if !out.ends_with('\n') {
                out.push('\n');
            }
            return out;
        }
    };

    let mut lines: Vec<String> = Vec::new();
    let mut cursor = 0usize;
    for child in doc.root().children() {
        let range = child.range();
        let gap = input[cursor..range.start].trim();
        if !gap.is_empty() {
            lines.push(gap.to_string());
        }
        emit(input, child, 0, wrap, &mut lines);
        cursor = range.end;
    }
    let tail = input[cursor..].trim();
    if !tail.is_empty() {
        lines.push(tail.to_string());
    }

    let mut out = lines.join("\n");
    out.push('\n');
    out
}

#[cfg(test)]
#[path = "../../tests/unit/svg/reindent.rs"]
mod tests;
