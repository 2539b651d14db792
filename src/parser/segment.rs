//! Block segmentation: selecting paragraphs and list items in document order.

use markup5ever_rcdom::Handle;

use crate::model::{Block, BlockKind};

use super::inline::classify_children;
use super::options::NestedBlocks;
use super::{dom, Context};

/// What a selected element turns into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Selected {
    Paragraph,
    List(BlockKind),
}

/// Walk a parsed document and produce one candidate block per selected
/// element, in document order.
///
/// Candidates may have no runs; dropping those is the tree builder's job.
pub fn segment(root: &Handle, ctx: &Context<'_>) -> Vec<Block> {
    let mut candidates = Vec::new();
    collect(root, ctx, &mut candidates);
    candidates
}

fn collect(node: &Handle, ctx: &Context<'_>, out: &mut Vec<Block>) {
    let repeat = ctx.options.nested_blocks == NestedBlocks::Repeat;

    for child in node.children.borrow().iter() {
        match select(child, ctx) {
            Some(Selected::Paragraph) => {
                out.push(Block::paragraph(classify_children(child, ctx)));
                if repeat {
                    collect(child, ctx, out);
                }
            }
            Some(Selected::List(kind)) => {
                let children = child.children.borrow();
                let items: Vec<&Handle> = children
                    .iter()
                    .filter(|item| dom::is_element(item, "li"))
                    .collect();
                for item in &items {
                    out.push(Block::new(kind, classify_children(item, ctx)));
                }
                // every item of a list comes before anything nested in it
                if repeat {
                    for item in &items {
                        collect(item, ctx, out);
                    }
                }
            }
            None => collect(child, ctx, out),
        }
    }
}

fn select(node: &Handle, ctx: &Context<'_>) -> Option<Selected> {
    match dom::tag_name(node)? {
        "p" => Some(Selected::Paragraph),
        "ul" => Some(Selected::List(BlockKind::BulletedListItem)),
        "ol" if ctx.options.ordered_lists => Some(Selected::List(BlockKind::NumberedListItem)),
        _ => None,
    }
}
