//! CLI command handlers. Each command is in its own file.

mod aggregate;
mod checksum;

pub use aggregate::run_aggregate;
pub use checksum::run_checksum;

use nta_core::config::NtaConfig;
use nta_core::fetch;
use std::time::Duration;

/// Fetch a document with the config's timeouts (or the fetch defaults).
fn fetch_document(cfg: &NtaConfig, url: &str) -> Result<String, fetch::FetchError> {
    let connect = cfg
        .connect_timeout_secs
        .map(Duration::from_secs)
        .unwrap_or(fetch::DEFAULT_CONNECT_TIMEOUT);
    let total = cfg
        .timeout_secs
        .map(Duration::from_secs)
        .unwrap_or(fetch::DEFAULT_TIMEOUT);
    fetch::fetch_with_timeouts(url, connect, total)
}
