//! Collection model, format rules, and deck analysis. Keep this crate free of IO
//! and platform concerns.

pub mod analyzer;
pub mod cards;
pub mod cube;
pub mod deck;
pub mod formats;
pub mod ledger;
pub mod rng;
pub mod templates;

pub use analyzer::*;
pub use cards::*;
pub use cube::*;
pub use deck::*;
pub use formats::*;
pub use ledger::*;
pub use rng::*;
pub use templates::*;
