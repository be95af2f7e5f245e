//! `nta checksum` – fetch the items document and hash each item on the pool.

use anyhow::{Context, Result};
use nta_core::config::NtaConfig;
use nta_core::pool::{self, ChecksumPool};

use super::fetch_document;

/// Fetch, extract `items[].uid`, and dispatch one hashing task per item.
/// Waits for the pool to drain before returning so every task's result
/// lands in the log before the process exits.
pub fn run_checksum(cfg: &NtaConfig, url: Option<&str>, workers: Option<usize>) -> Result<()> {
    let url = url.unwrap_or(&cfg.items_url);
    let body = fetch_document(cfg, url).with_context(|| format!("GET {url}"))?;
    let doc: serde_json::Value = serde_json::from_str(&body).context("parse items document")?;

    let items = pool::extract_items(&doc);
    let pool = ChecksumPool::get_or_create(workers.unwrap_or(cfg.workers));
    let submitted = pool.dispatch(items);
    tracing::info!(submitted, workers = pool.workers(), "items dispatched");

    pool.wait_idle();
    println!("{} items hashed on {} workers", submitted, pool.workers());
    Ok(())
}
