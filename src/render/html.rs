//! HTML rendering of blocks.
//!
//! Produces markup the pipeline reads back into equivalent blocks: kinds,
//! text, style flags and links survive the round trip. Spacing does not
//! always: runs are rendered with their trailing spaces, and the spacer run
//! after a link is regenerated on the way back in rather than preserved.

use crate::model::{Block, BlockKind, ContentRun};

/// Render blocks as HTML, grouping consecutive list items into one list.
pub fn to_html(blocks: &[Block]) -> String {
    let mut out = String::new();
    let mut open_list: Option<BlockKind> = None;

    for block in blocks {
        let list_tag = list_tag(block.kind);
        if open_list != Some(block.kind) {
            if let Some(kind) = open_list.take() {
                close_list(&mut out, kind);
            }
            if let Some(tag) = list_tag {
                out.push('<');
                out.push_str(tag);
                out.push('>');
                open_list = Some(block.kind);
            }
        }

        let item_tag = if list_tag.is_some() { "li" } else { "p" };
        out.push('<');
        out.push_str(item_tag);
        out.push('>');
        for run in &block.runs {
            render_run(&mut out, run);
        }
        out.push_str("</");
        out.push_str(item_tag);
        out.push('>');
    }

    if let Some(kind) = open_list {
        close_list(&mut out, kind);
    }
    out
}

fn list_tag(kind: BlockKind) -> Option<&'static str> {
    match kind {
        BlockKind::Paragraph => None,
        BlockKind::BulletedListItem => Some("ul"),
        BlockKind::NumberedListItem => Some("ol"),
    }
}

fn close_list(out: &mut String, kind: BlockKind) {
    if let Some(tag) = list_tag(kind) {
        out.push_str("</");
        out.push_str(tag);
        out.push('>');
    }
}

fn render_run(out: &mut String, run: &ContentRun) {
    let style = &run.style;
    let tags: Vec<&str> = [
        (style.bold, "b"),
        (style.italic, "i"),
        (style.strikethrough, "s"),
        (style.underline, "u"),
        (style.code, "code"),
    ]
    .into_iter()
    .filter_map(|(on, tag)| on.then_some(tag))
    .collect();

    if let Some(url) = run.href() {
        out.push_str("<a href=\"");
        out.push_str(&html_escape::encode_double_quoted_attribute(url));
        out.push_str("\">");
    }
    for tag in &tags {
        out.push('<');
        out.push_str(tag);
        out.push('>');
    }
    out.push_str(&html_escape::encode_text(&run.text));
    for tag in tags.iter().rev() {
        out.push_str("</");
        out.push_str(tag);
        out.push('>');
    }
    if run.link.is_some() {
        out.push_str("</a>");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{HtmlParser, ParseOptions};

    #[test]
    fn test_paragraph_and_list_markup() {
        let blocks = vec![
            Block::paragraph(vec![ContentRun::bold("A "), ContentRun::new("B ")]),
            Block::bulleted(vec![ContentRun::new("one ")]),
            Block::bulleted(vec![ContentRun::new("two ")]),
        ];
        assert_eq!(
            to_html(&blocks),
            "<p><b>A </b>B </p><ul><li>one </li><li>two </li></ul>"
        );
    }

    #[test]
    fn test_escaping() {
        let blocks = vec![Block::paragraph(vec![ContentRun::linked(
            "a < b & c",
            "https://x/?q=\"1\"",
        )])];
        let html = to_html(&blocks);
        assert!(html.contains("a &lt; b &amp; c"));
        assert!(html.contains("href=\"https://x/?q=&quot;1&quot;\""));
    }

    #[test]
    fn test_round_trip_preserves_structure() {
        let source = r#"<p>Intro <b><i>both</i></b> <a href="https://x">link</a> end</p>
            <ul><li>one <code>c</code></li><li><s>two</s></li></ul>
            <ol><li>first</li></ol>"#;
        let parser = HtmlParser::with_options(ParseOptions::new().with_ordered_lists(true));
        let first = parser.parse(source);
        let second = parser.parse(&to_html(&first));

        assert_eq!(first.len(), second.len());
        for (a, b) in first.iter().zip(&second) {
            assert_eq!(a.kind, b.kind);
            let flags = |block: &Block| -> Vec<(String, Option<String>, bool, bool, bool, bool)> {
                block
                    .runs
                    .iter()
                    .filter(|r| !r.is_blank())
                    .map(|r| {
                        (
                            r.text.trim().to_string(),
                            r.href().map(str::to_string),
                            r.style.bold,
                            r.style.italic,
                            r.style.strikethrough,
                            r.style.code,
                        )
                    })
                    .collect()
            };
            assert_eq!(flags(a), flags(b));
        }
    }
}
