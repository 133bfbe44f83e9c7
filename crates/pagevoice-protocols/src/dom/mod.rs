//! Page boundary: element snapshots and the [`PageDom`] trait.

mod page;
mod types;

pub use page::PageDom;
pub use types::{BoundingBox, DomEvent, ElementHandle, ElementSnapshot, NodeAttributes};

#[cfg(test)]
#[path = "dom_tests.rs"]
mod tests;
