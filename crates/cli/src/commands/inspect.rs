//! `canvas inspect` — print a persisted snapshot's summary.

use std::time::Duration;

use canvas_core::Snapshot;

use crate::args::InspectArgs;
use crate::config::load_config;

pub fn run(args: InspectArgs) -> Result<(), Box<dyn std::error::Error>> {
    let raw = std::fs::read_to_string(&args.snapshot)?;
    let snapshot: Snapshot = serde_json::from_str(&raw)?;
    let config = load_config(args.config.as_deref());

    let now = canvas_core::now_unix_secs();
    let fresh = snapshot.is_fresh(now, Duration::from_secs(config.snapshot_ttl_hours * 3600));

    println!("Scope: {}", snapshot.scope_id);
    println!("Nodes: {}", snapshot.domain.node_ids().count());
    println!("Edges: {}", snapshot.domain.edges().count());
    println!("Timestamp: {} ({})", snapshot.timestamp_unix_secs, if fresh { "fresh" } else { "stale" });

    Ok(())
}
