//! Chrome DevTools Protocol (CDP) client.
//!
//! Start Chrome with remote debugging, then attach:
//! ```rust,ignore
//! let client = CdpClient::connect("http://localhost:9222").await?;
//! let session = client.attach_active_page().await?;
//! let title = session.evaluate("document.title").await?;
//! ```

mod client;
mod error;
mod protocol;
mod session;

pub use client::CdpClient;
pub use error::CdpError;
pub use protocol::*;
pub use session::{PageSession, OBJECT_GROUP};
