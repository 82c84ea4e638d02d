pub mod analyze;
pub mod config;
pub mod dashboard;
pub mod projects;

use std::sync::Arc;

use nape_pms::{FallbackPms, LivePms, MockPms, PmsClient, SnapshotSource};
use tracing::info;

use crate::config::AppConfig;

/// Composition root for the snapshot source.
///
/// No PMS key means the canned data set; with a key the live client is used,
/// wrapped in the mock fallback unless strict mode was requested. Returns the
/// source and whether it serves mock data outright.
pub(crate) fn build_source(config: &AppConfig, no_fallback: bool) -> (Arc<dyn SnapshotSource>, bool) {
    match &config.pms_api_key {
        None => {
            info!("no PMS API key configured, serving mock data");
            (Arc::new(MockPms), true)
        }
        Some(key) => {
            let live = LivePms::new(PmsClient::new(&config.pms_url, key));
            if no_fallback {
                (Arc::new(live), false)
            } else {
                (Arc::new(FallbackPms::new(live)), false)
            }
        }
    }
}
