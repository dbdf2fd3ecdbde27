use serde::{Deserialize, Serialize};

/// Genetic-algorithm knobs. All randomness flows from `seed`, so two runs with
/// identical inputs and params take the same path.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct GaParams {
    pub population: usize,
    pub generations: u32,
    pub mutation_rate: f64,
    pub elite: usize,
    pub tournament_k: usize,
    /// Stop early after this many generations without improvement.
    pub stagnation_window: Option<u32>,
    pub seed: u64,
}

impl GaParams {
    pub fn deck_defaults() -> Self {
        Self {
            population: 50,
            generations: 100,
            mutation_rate: 0.15,
            elite: 5,
            tournament_k: 5,
            stagnation_window: Some(20),
            seed: 0xDECC,
        }
    }

    pub fn cube_defaults() -> Self {
        Self {
            population: 30,
            generations: 50,
            mutation_rate: 0.20,
            elite: 3,
            tournament_k: 5,
            stagnation_window: None,
            seed: 0xC0BE,
        }
    }
}

/// Land-count envelope for commander-family decks, expressed against the
/// standard 99-card body. Defaults are conventional, not format rules.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LandProfile {
    pub target: u32,
    pub min: u32,
    pub max: u32,
}

impl Default for LandProfile {
    fn default() -> Self {
        Self {
            target: 37,
            min: 35,
            max: 40,
        }
    }
}

impl LandProfile {
    /// Scale the profile to a smaller commander body (Brawl's 59).
    pub fn scaled(self, body: u32) -> LandProfile {
        if body == 99 {
            return self;
        }
        let scale = body as f64 / 99.0;
        let round = |v: u32| ((v as f64 * scale).round() as u32).max(1);
        LandProfile {
            target: round(self.target),
            min: round(self.min),
            max: round(self.max),
        }
    }
}
