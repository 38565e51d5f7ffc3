//! `canvas run` — replay a scenario file of edit intents.

use canvas_core::layout::DefaultLayoutEngine;
use canvas_core::router::DefaultRouterEngine;
use canvas_core::{render, now_unix_secs, FsStore, NodeId, NullRenderSink, Orchestrator, Snapshot, SnapshotStore};

use crate::args::RunArgs;
use crate::config::load_config;
use crate::scenario::Scenario;

pub fn run(args: RunArgs, quiet: bool) -> Result<(), Box<dyn std::error::Error>> {
    let scenario = Scenario::load(&args.scenario)?;
    let config = load_config(args.config.as_deref());
    let ttl = std::time::Duration::from_secs(config.snapshot_ttl_hours * 3600);

    let mut orch = Orchestrator::new(
        config,
        Box::new(DefaultLayoutEngine::default()),
        Box::new(DefaultRouterEngine::new()),
        Box::new(NullRenderSink),
    );

    let mut store = args.snapshot_dir.as_ref().map(FsStore::new);
    if let Some(store) = &store {
        if let Some(snapshot) = store.load()? {
            if snapshot.is_fresh(now_unix_secs(), ttl) {
                orch.restore(snapshot);
                if !quiet {
                    eprintln!("Resumed from snapshot at {}", args.snapshot_dir.as_ref().unwrap().display());
                }
            }
        }
    }

    let mut applied = 0usize;
    let mut skipped = 0usize;
    for intent in scenario.intents {
        match orch.apply(intent) {
            Ok(()) => applied += 1,
            Err(e) if canvas_core::Harmless::is_harmless(&e) => {
                skipped += 1;
                if !quiet {
                    eprintln!("Skipped (harmless): {}", e);
                }
            }
            Err(e) => return Err(e.into()),
        }
    }

    if let Some(store) = &mut store {
        let snapshot = Snapshot::new(
            orch.domain().clone(),
            orch.view_state().clone(),
            NodeId::root(),
            now_unix_secs(),
        );
        store.save(&snapshot)?;
    }

    let (nodes, edges) = render::project(orch.domain(), orch.view_state());
    if args.json {
        let summary = serde_json::json!({
            "applied": applied,
            "skipped": skipped,
            "nodes": nodes.len(),
            "edges": edges.len(),
        });
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else if !quiet {
        println!("Applied {applied} intents ({skipped} skipped as harmless)");
        println!("Final canvas: {} nodes, {} edges", nodes.len(), edges.len());
    }

    Ok(())
}
