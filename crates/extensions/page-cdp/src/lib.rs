//! Live page backend for PageVoice.
//!
//! Attaches to a tab of a Chrome instance started with
//! `--remote-debugging-port` and implements
//! [`PageDom`](pagevoice_protocols::PageDom) on top of the `Runtime`
//! domain. Element handles are CDP remote object ids.

pub mod cdp;
pub mod page;
mod scripts;

pub use cdp::{CdpClient, CdpError, PageSession};
pub use page::CdpPage;
