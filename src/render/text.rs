//! Plain text rendering of blocks.

use crate::model::{Block, BlockKind};

use super::RenderOptions;

/// Convert blocks to plain text.
///
/// Paragraphs are separated by a blank line; consecutive list items sit on
/// adjacent lines with a marker.
pub fn to_text(blocks: &[Block], options: &RenderOptions) -> String {
    let mut output = String::new();
    let mut previous: Option<BlockKind> = None;
    let mut number = 0u32;

    for block in blocks {
        if previous != Some(BlockKind::NumberedListItem) {
            number = 0;
        }

        if let Some(prev) = previous {
            let same_list = block.is_list_item() && prev == block.kind;
            output.push_str(if same_list { "\n" } else { "\n\n" });
        }

        match block.kind {
            BlockKind::Paragraph => {}
            BlockKind::BulletedListItem => {
                output.push(options.list_marker);
                output.push(' ');
            }
            BlockKind::NumberedListItem => {
                number += 1;
                output.push_str(&format!("{}. ", number));
            }
        }

        output.push_str(&block_text(block, options));
        previous = Some(block.kind);
    }

    output
}

fn block_text(block: &Block, options: &RenderOptions) -> String {
    let mut text = String::new();
    for run in &block.runs {
        text.push_str(&run.text);
        if options.include_link_urls {
            if let Some(url) = run.href().filter(|u| !u.is_empty()) {
                text.push_str(&format!(" <{}>", url));
            }
        }
    }
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ContentRun;

    #[test]
    fn test_to_text() {
        let blocks = vec![
            Block::paragraph(vec![ContentRun::new("Hello, "), ContentRun::bold("world! ")]),
            Block::bulleted(vec![ContentRun::new("one ")]),
            Block::bulleted(vec![ContentRun::new("two ")]),
            Block::paragraph(vec![ContentRun::new("Bye ")]),
        ];

        let result = to_text(&blocks, &RenderOptions::default());
        assert_eq!(result, "Hello, world!\n\n• one\n• two\n\nBye");
    }

    #[test]
    fn test_numbered_items_restart_per_list() {
        let blocks = vec![
            Block::numbered(vec![ContentRun::new("a ")]),
            Block::numbered(vec![ContentRun::new("b ")]),
            Block::paragraph(vec![ContentRun::new("break ")]),
            Block::numbered(vec![ContentRun::new("c ")]),
        ];
        let result = to_text(&blocks, &RenderOptions::default());
        assert_eq!(result, "1. a\n2. b\n\nbreak\n\n1. c");
    }

    #[test]
    fn test_link_urls() {
        let blocks = vec![Block::paragraph(vec![
            ContentRun::linked("site", "https://example.com"),
            ContentRun::space(),
        ])];
        let options = RenderOptions::new().with_link_urls(true);
        assert_eq!(to_text(&blocks, &options), "site <https://example.com>");
    }
}
