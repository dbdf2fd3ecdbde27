//! Genetic deck and cube construction over the collection model.
//!
//! The search is best-effort: the genetic algorithm optimizes toward an
//! archetype or style template, and a deterministic post-processing pipeline
//! then repairs its winner so every returned deck passes format validation.
//! A draft simulator deals a finished cube into packs and plays out
//! simplified winston, grid, and rotisserie drafts.

mod config;
mod cubegen;
mod deckgen;
mod draft;
mod error;
mod events;
mod fitness;
mod ga;
mod pool;
mod postprocess;
mod report;

pub use config::*;
pub use cubegen::*;
pub use deckgen::*;
pub use draft::*;
pub use error::*;
pub use events::*;
pub use fitness::*;
pub use pool::*;
pub use postprocess::finalize;
pub use report::*;
