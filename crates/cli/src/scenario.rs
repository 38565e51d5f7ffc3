//! The `canvas run` input format: a JSON file replaying a sequence of
//! edit intents against a fresh (or restored) canvas.

use std::path::Path;

use canvas_core::EditIntent;
#[cfg(test)]
use canvas_core::Point;
use serde::{Deserialize, Serialize};

/// A scenario file: an ordered list of intents applied one at a time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    /// Free-text label, printed in summaries; has no effect on replay.
    #[serde(default)]
    pub name: String,
    pub intents: Vec<EditIntent>,
}

impl Scenario {
    pub fn load(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }
}
