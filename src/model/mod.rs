//! Content model produced by the conversion pipeline.
//!
//! These types are the intermediate representation between the HTML
//! parser and the renderers. They are plain values: built fresh for each
//! conversion and compared structurally.

mod block;
mod run;

pub use block::{Block, BlockKind};
pub use run::{Color, ContentRun, Link, StyleSet};
