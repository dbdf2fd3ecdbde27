use crate::{CardType, Color, Rarity};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Named strategic deck profile driving the deck fitness function.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Archetype {
    Aggro,
    Midrange,
    Control,
    Combo,
}

#[derive(Debug, Error)]
#[error("unknown archetype: {0}")]
pub struct UnknownArchetype(pub String);

impl FromStr for Archetype {
    type Err = UnknownArchetype;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "aggro" => Ok(Archetype::Aggro),
            "midrange" => Ok(Archetype::Midrange),
            "control" => Ok(Archetype::Control),
            "combo" => Ok(Archetype::Combo),
            other => Err(UnknownArchetype(other.to_string())),
        }
    }
}

impl fmt::Display for Archetype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Archetype::Aggro => "aggro",
            Archetype::Midrange => "midrange",
            Archetype::Control => "control",
            Archetype::Combo => "combo",
        };
        write!(f, "{name}")
    }
}

/// Declarative target profile for a 60-card deck; the engine scales the land
/// count linearly when the requested size differs from `nominal_size`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ArchetypeTemplate {
    pub nominal_size: u32,
    /// Ideal nonland counts per CMC bucket 0..=7; buckets 1..=6 carry the curve.
    pub curve: [u32; 8],
    pub lands: u32,
    /// Target creature fraction of the nonland body.
    pub creatures: f64,
}

impl ArchetypeTemplate {
    /// Land target scaled to the requested mainboard body size.
    pub fn lands_for_size(&self, size: u32) -> u32 {
        if size == self.nominal_size {
            self.lands
        } else {
            (self.lands as f64 * size as f64 / self.nominal_size as f64).round() as u32
        }
    }
}

impl Archetype {
    pub fn template(self) -> ArchetypeTemplate {
        match self {
            Archetype::Aggro => ArchetypeTemplate {
                nominal_size: 60,
                curve: [0, 12, 14, 10, 4, 2, 0, 0],
                lands: 20,
                creatures: 0.60,
            },
            Archetype::Midrange => ArchetypeTemplate {
                nominal_size: 60,
                curve: [0, 4, 10, 12, 10, 6, 2, 0],
                lands: 24,
                creatures: 0.45,
            },
            Archetype::Control => ArchetypeTemplate {
                nominal_size: 60,
                curve: [0, 2, 8, 8, 10, 8, 4, 0],
                lands: 26,
                creatures: 0.15,
            },
            Archetype::Combo => ArchetypeTemplate {
                nominal_size: 60,
                curve: [0, 8, 12, 8, 6, 4, 2, 0],
                lands: 24,
                creatures: 0.25,
            },
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum PowerLevel {
    Low,
    Medium,
    High,
}

impl PowerLevel {
    /// Rarity-weighted power target used by the cube fitness function.
    pub fn target(self) -> f64 {
        match self {
            PowerLevel::Low => 0.3,
            PowerLevel::Medium => 0.6,
            PowerLevel::High => 0.9,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Complexity {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum CubeStyle {
    PowerCube,
    VintageCube,
    LegacyCube,
    ModernCube,
    PauperCube,
    ThemedCube,
}

#[derive(Debug, Error)]
#[error("unknown cube style: {0}")]
pub struct UnknownCubeStyle(pub String);

impl FromStr for CubeStyle {
    type Err = UnknownCubeStyle;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "power_cube" | "power" => Ok(CubeStyle::PowerCube),
            "vintage_cube" | "vintage" => Ok(CubeStyle::VintageCube),
            "legacy_cube" | "legacy" => Ok(CubeStyle::LegacyCube),
            "modern_cube" | "modern" => Ok(CubeStyle::ModernCube),
            "pauper_cube" | "pauper" => Ok(CubeStyle::PauperCube),
            "themed_cube" | "themed" => Ok(CubeStyle::ThemedCube),
            other => Err(UnknownCubeStyle(other.to_string())),
        }
    }
}

/// Declarative target distributions for a cube. Ratios are fractions of the
/// cube's total size.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CubeTemplate {
    pub size: u32,
    pub power_level: PowerLevel,
    pub complexity: Complexity,
    /// Per-color target ratio; `None` is the colorless bucket.
    pub color_ratios: Vec<(Option<Color>, f64)>,
    pub type_ratios: Vec<(CardType, f64)>,
    /// Nonland curve target ratios over CMC 0..=6.
    pub curve_ratios: [f64; 7],
    pub rarity_ratios: Vec<(Rarity, f64)>,
    pub themes: Vec<String>,
}

/// Caller-supplied template adjustments.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CubeOverrides {
    pub size: Option<u32>,
    pub themes: Option<Vec<String>>,
    pub power_level: Option<PowerLevel>,
    pub complexity: Option<Complexity>,
}

impl CubeTemplate {
    pub fn apply(mut self, overrides: &CubeOverrides) -> CubeTemplate {
        if let Some(size) = overrides.size {
            self.size = size;
        }
        if let Some(themes) = &overrides.themes {
            self.themes = themes.clone();
        }
        if let Some(power) = overrides.power_level {
            self.power_level = power;
        }
        if let Some(complexity) = overrides.complexity {
            self.complexity = complexity;
        }
        self
    }
}

fn even_color_ratios(colorless: f64) -> Vec<(Option<Color>, f64)> {
    let per_color = (1.0 - colorless) / 5.0;
    let mut ratios: Vec<(Option<Color>, f64)> =
        Color::ALL.iter().map(|c| (Some(*c), per_color)).collect();
    ratios.push((None, colorless));
    ratios
}

fn themes(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| s.to_string()).collect()
}

impl CubeStyle {
    pub fn template(self) -> CubeTemplate {
        match self {
            CubeStyle::PowerCube => CubeTemplate {
                size: 360,
                power_level: PowerLevel::High,
                complexity: Complexity::High,
                color_ratios: even_color_ratios(0.10),
                type_ratios: vec![
                    (CardType::Creature, 0.40),
                    (CardType::Instant, 0.15),
                    (CardType::Sorcery, 0.10),
                    (CardType::Enchantment, 0.10),
                    (CardType::Artifact, 0.15),
                    (CardType::Planeswalker, 0.05),
                    (CardType::Land, 0.05),
                ],
                curve_ratios: [0.05, 0.10, 0.20, 0.25, 0.20, 0.15, 0.05],
                rarity_ratios: vec![
                    (Rarity::Mythic, 0.05),
                    (Rarity::Rare, 0.20),
                    (Rarity::Uncommon, 0.35),
                    (Rarity::Common, 0.40),
                ],
                themes: themes(&[
                    "combo",
                    "control",
                    "aggro",
                    "midrange",
                    "ramp",
                    "graveyard",
                    "artifacts",
                ]),
            },
            CubeStyle::VintageCube => CubeTemplate {
                size: 450,
                power_level: PowerLevel::High,
                complexity: Complexity::High,
                color_ratios: even_color_ratios(0.10),
                type_ratios: vec![
                    (CardType::Creature, 0.35),
                    (CardType::Instant, 0.15),
                    (CardType::Sorcery, 0.10),
                    (CardType::Enchantment, 0.10),
                    (CardType::Artifact, 0.20),
                    (CardType::Planeswalker, 0.05),
                    (CardType::Land, 0.05),
                ],
                curve_ratios: [0.05, 0.10, 0.20, 0.25, 0.20, 0.15, 0.05],
                rarity_ratios: vec![
                    (Rarity::Mythic, 0.08),
                    (Rarity::Rare, 0.25),
                    (Rarity::Uncommon, 0.35),
                    (Rarity::Common, 0.32),
                ],
                themes: themes(&[
                    "combo",
                    "control",
                    "aggro",
                    "midrange",
                    "ramp",
                    "graveyard",
                    "artifacts",
                    "storm",
                ]),
            },
            CubeStyle::LegacyCube => CubeTemplate {
                size: 360,
                power_level: PowerLevel::Medium,
                complexity: Complexity::Medium,
                color_ratios: even_color_ratios(0.0),
                type_ratios: vec![
                    (CardType::Creature, 0.45),
                    (CardType::Instant, 0.15),
                    (CardType::Sorcery, 0.10),
                    (CardType::Enchantment, 0.10),
                    (CardType::Artifact, 0.15),
                    (CardType::Planeswalker, 0.05),
                ],
                curve_ratios: [0.05, 0.15, 0.25, 0.25, 0.20, 0.10, 0.0],
                rarity_ratios: vec![
                    (Rarity::Mythic, 0.05),
                    (Rarity::Rare, 0.20),
                    (Rarity::Uncommon, 0.40),
                    (Rarity::Common, 0.35),
                ],
                themes: themes(&["aggro", "midrange", "control", "combo", "tribal"]),
            },
            CubeStyle::ModernCube => CubeTemplate {
                size: 360,
                power_level: PowerLevel::Medium,
                complexity: Complexity::Medium,
                color_ratios: even_color_ratios(0.0),
                type_ratios: vec![
                    (CardType::Creature, 0.50),
                    (CardType::Instant, 0.15),
                    (CardType::Sorcery, 0.10),
                    (CardType::Enchantment, 0.10),
                    (CardType::Artifact, 0.10),
                    (CardType::Planeswalker, 0.05),
                ],
                curve_ratios: [0.05, 0.15, 0.25, 0.25, 0.20, 0.10, 0.0],
                rarity_ratios: vec![
                    (Rarity::Mythic, 0.05),
                    (Rarity::Rare, 0.20),
                    (Rarity::Uncommon, 0.40),
                    (Rarity::Common, 0.35),
                ],
                themes: themes(&["aggro", "midrange", "control", "tribal", "artifacts"]),
            },
            CubeStyle::PauperCube => CubeTemplate {
                size: 360,
                power_level: PowerLevel::Low,
                complexity: Complexity::Low,
                color_ratios: even_color_ratios(0.0),
                type_ratios: vec![
                    (CardType::Creature, 0.50),
                    (CardType::Instant, 0.15),
                    (CardType::Sorcery, 0.15),
                    (CardType::Enchantment, 0.10),
                    (CardType::Artifact, 0.05),
                    (CardType::Land, 0.05),
                ],
                curve_ratios: [0.05, 0.20, 0.30, 0.25, 0.15, 0.05, 0.0],
                rarity_ratios: vec![
                    (Rarity::Uncommon, 0.30),
                    (Rarity::Common, 0.70),
                ],
                themes: themes(&["aggro", "midrange", "control", "tribal"]),
            },
            CubeStyle::ThemedCube => CubeTemplate {
                size: 360,
                power_level: PowerLevel::Medium,
                complexity: Complexity::High,
                color_ratios: even_color_ratios(0.0),
                type_ratios: vec![
                    (CardType::Creature, 0.45),
                    (CardType::Instant, 0.15),
                    (CardType::Sorcery, 0.10),
                    (CardType::Enchantment, 0.10),
                    (CardType::Artifact, 0.15),
                    (CardType::Planeswalker, 0.05),
                ],
                curve_ratios: [0.05, 0.15, 0.25, 0.25, 0.20, 0.10, 0.0],
                rarity_ratios: vec![
                    (Rarity::Mythic, 0.05),
                    (Rarity::Rare, 0.20),
                    (Rarity::Uncommon, 0.40),
                    (Rarity::Common, 0.35),
                ],
                themes: themes(&["graveyard", "artifacts", "tribal", "spells"]),
            },
        }
    }
}
