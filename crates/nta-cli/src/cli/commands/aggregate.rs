//! `nta aggregate` – fetch the telemetry document and print per-field totals.

use anyhow::{Context, Result};
use nta_core::config::NtaConfig;
use nta_core::stats;

use super::fetch_document;

/// Fetch, aggregate, and print one line of totals per field name. The
/// synthetic whole-tree entry is shown as "Overall".
pub fn run_aggregate(cfg: &NtaConfig, url: Option<&str>) -> Result<()> {
    let url = url.unwrap_or(&cfg.aggregate_url);
    let body = fetch_document(cfg, url).with_context(|| format!("GET {url}"))?;
    let doc: serde_json::Value =
        serde_json::from_str(&body).context("parse telemetry document")?;

    let table = stats::aggregate(&doc);
    tracing::info!(fields = table.field_count(), "aggregation complete");

    println!("{:<24} {:>12} {:>12}", "FIELD", "SENT", "RECV");
    for (key, counters) in table.iter() {
        let label = if key == table.root_key() { "Overall" } else { key };
        println!("{:<24} {:>12} {:>12}", label, counters.sent, counters.recv);
    }
    Ok(())
}
