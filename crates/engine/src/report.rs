use crate::{EngineError, EngineEvent};
use deckforge_core::{Cube, Deck, DeckAnalysis};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationSummary {
    pub seed: u64,
    pub generations_run: u32,
    pub converged_at: Option<u32>,
    pub best_fitness: f64,
    pub wall_time_ms: u64,
}

/// Full result of a deck run: the deck itself plus everything needed to audit
/// how it came out the way it did.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeckGeneration {
    pub deck: Deck,
    pub analysis: DeckAnalysis,
    pub fitness: f64,
    pub warnings: Vec<String>,
    pub events: Vec<EngineEvent>,
    pub summary: GenerationSummary,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CubeGeneration {
    pub cube: Cube,
    pub fitness: f64,
    pub warnings: Vec<String>,
    pub events: Vec<EngineEvent>,
    pub summary: GenerationSummary,
}

/// Write a generation report as pretty JSON, creating parent directories.
pub fn write_json<T: Serialize>(path: &Path, report: &T) -> Result<(), EngineError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let body = serde_json::to_string_pretty(report)?;
    fs::write(path, body)?;
    Ok(())
}
