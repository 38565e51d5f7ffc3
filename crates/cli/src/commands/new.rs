//! `canvas new` — write an empty snapshot to a file.

use canvas_core::{Domain, NodeId, Snapshot, ViewState};

use crate::args::NewArgs;

pub fn run(args: NewArgs) -> Result<(), Box<dyn std::error::Error>> {
    let snapshot = Snapshot::new(
        Domain::new(),
        ViewState::new(),
        NodeId::root(),
        canvas_core::now_unix_secs(),
    );
    let json = serde_json::to_string_pretty(&snapshot)?;
    if let Some(parent) = args.output.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&args.output, json)?;
    eprintln!("Wrote empty snapshot to {}", args.output.display());
    Ok(())
}
