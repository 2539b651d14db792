//! Style propagation from formatting elements onto the runs they contain.

use markup5ever_rcdom::Handle;

use crate::model::{ContentRun, StyleSet};

use super::inline::classify_children;
use super::{dom, Context};

/// Flatten a formatting (or unrecognized wrapping) element into runs.
///
/// The element's own flags are OR-merged into every run its children
/// produce, including link spacer runs. Unrecognized tags contribute no
/// flags but still recurse, so arbitrary nesting keeps working.
pub fn propagate(element: &Handle, ctx: &Context<'_>) -> Vec<ContentRun> {
    let flags = dom::tag_name(element)
        .map(StyleSet::for_tag)
        .unwrap_or_default();

    let mut runs = classify_children(element, ctx);
    if flags.has_styling() {
        apply_flags(&mut runs, &flags);
    }
    runs
}

/// OR a set of flags into every run.
pub fn apply_flags(runs: &mut [ContentRun], flags: &StyleSet) {
    for run in runs {
        run.style.merge(flags);
    }
}
