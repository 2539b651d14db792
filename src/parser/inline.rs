//! Inline run classification: text nodes and hyperlinks.

use markup5ever_rcdom::{Handle, NodeData};

use crate::model::{ContentRun, Link};

use super::annotate::propagate;
use super::{dom, Context};

/// Classify one child node of a block or inline element.
///
/// An empty vector means the node contributes nothing (whitespace-only
/// text, comments, void elements).
pub fn classify(node: &Handle, ctx: &Context<'_>) -> Vec<ContentRun> {
    match &node.data {
        NodeData::Text { contents } => text_run(&contents.borrow(), ctx).into_iter().collect(),
        NodeData::Element { .. } if dom::is_element(node, "a") => classify_link(node, ctx),
        NodeData::Element { .. } => propagate(node, ctx),
        _ => Vec::new(),
    }
}

/// Classify every child of a node, concatenating results in document order.
pub fn classify_children(node: &Handle, ctx: &Context<'_>) -> Vec<ContentRun> {
    node.children
        .borrow()
        .iter()
        .flat_map(|child| classify(child, ctx))
        .collect()
}

/// Build the run for a text node: trimmed content plus one trailing space.
pub fn text_run(raw: &str, ctx: &Context<'_>) -> Option<ContentRun> {
    let cleaned = match ctx.cleanup {
        Some(pipeline) => pipeline.process(raw),
        None => raw.to_string(),
    };
    let trimmed = cleaned.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(ContentRun::new(format!("{} ", trimmed)))
}

/// Classify an `<a>` element.
///
/// Every run of the link's content gets the anchor's `href` (empty when the
/// attribute is missing). The final content run loses its trailing space and
/// a single space-only run is appended instead, so adjacent runs stay apart
/// without doubling the gap.
pub fn classify_link(anchor: &Handle, ctx: &Context<'_>) -> Vec<ContentRun> {
    let url = dom::attr(anchor, "href").unwrap_or_default();
    let mut runs = classify_children(anchor, ctx);

    for run in &mut runs {
        run.link = Some(Link::new(url.as_str()));
    }
    trim_trailing_space(&mut runs);

    if runs.is_empty() {
        log::debug!("link to {:?} has no text content", url);
    }
    runs.push(ContentRun::space());
    runs
}

fn trim_trailing_space(runs: &mut Vec<ContentRun>) {
    while let Some(last) = runs.last_mut() {
        if last.text.ends_with(' ') {
            last.text.pop();
        }
        if !last.text.is_empty() {
            break;
        }
        runs.pop();
    }
}
