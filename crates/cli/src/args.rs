//! CLI argument definitions for all canvas subcommands.
//!
//! All `clap` structs and enums live here so `main.rs` stays minimal
//! and each command handler only imports the types it needs.

use clap::{Args, Subcommand};
use std::path::PathBuf;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Replay a scenario file of edit intents against a fresh canvas.
    ///
    /// Reads a JSON scenario (`{"name": ..., "intents": [...]}`), applies
    /// each intent in order through an [`canvas_core::Orchestrator`], and
    /// prints the resulting render model. If `--snapshot-dir` names an
    /// existing fresh snapshot, replay starts from it instead of an empty
    /// canvas; either way the final state is saved back.
    Run(RunArgs),

    /// Print a persisted snapshot's summary.
    Inspect(InspectArgs),

    /// Write an empty snapshot to a file.
    New(NewArgs),
}

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Scenario file to replay.
    pub scenario: PathBuf,

    /// Directory holding (or to receive) the run's snapshot.
    ///
    /// If it contains a fresh `canvas-snapshot-v1.json`, replay resumes
    /// from it; the post-replay state is always saved back here.
    #[arg(long)]
    pub snapshot_dir: Option<PathBuf>,

    /// Print the final render model as JSON instead of a text summary.
    #[arg(long)]
    pub json: bool,

    /// TOML file of `CanvasConfig` overrides; falls back to defaults if
    /// omitted, missing, or unparseable.
    #[arg(long)]
    pub config: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Snapshot file to inspect (as written by `canvas new` or `canvas run --snapshot-dir`).
    pub snapshot: PathBuf,

    /// TOML file of `CanvasConfig` overrides, used only to read
    /// `snapshot_ttl_hours` for freshness reporting.
    #[arg(long)]
    pub config: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct NewArgs {
    /// Output path for the empty snapshot.
    #[arg(short, long)]
    pub output: PathBuf,
}
