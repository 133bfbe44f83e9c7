//! Snapshot page backend.
//!
//! Loads a page description from JSON into an in-memory document and
//! serves [`PageDom`](pagevoice_protocols::PageDom) queries against it with
//! a built-in CSS selector subset. Every write is recorded as a
//! [`Mutation`] so callers can inspect what an action did.

pub mod error;
pub mod page;
pub mod selector;
pub mod spec;

pub use error::SnapshotError;
pub use page::{Mutation, SnapshotPage};
pub use selector::{SelectorList, SelectorParseError};
pub use spec::{NodeSpec, PageSpec};
