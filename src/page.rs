//! Page backend selection.

use std::sync::Arc;

use tracing::info;

use pagevoice_config::{PageBackend, PageConfig};
use pagevoice_page_cdp::CdpPage;
use pagevoice_page_snapshot::SnapshotPage;
use pagevoice_protocols::PageDom;

/// Open the configured page.
pub(crate) async fn open(config: &PageConfig) -> Result<Arc<dyn PageDom>, Box<dyn std::error::Error>> {
    match config.backend {
        PageBackend::Cdp => {
            info!("Attaching to Chrome at {}", config.cdp_endpoint);
            let page = CdpPage::connect(&config.cdp_endpoint).await?;
            Ok(Arc::new(page))
        }
        PageBackend::Snapshot => {
            let path = config
                .snapshot_path
                .as_deref()
                .ok_or("page.snapshot_path is required for the snapshot backend")?;
            let page = SnapshotPage::load(path)?;
            info!("Loaded snapshot '{}' from {}", page.title(), path.display());
            Ok(Arc::new(page))
        }
    }
}
