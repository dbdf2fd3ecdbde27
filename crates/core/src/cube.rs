use crate::{Card, CardId, Color, ColorSet, Complexity, PowerLevel};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::SystemTime;

/// A card slotted into a cube, with cube-local metadata.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CubeEntry {
    pub card: Card,
    pub quantity: u32,
    #[serde(default)]
    pub is_basic_land: bool,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Singleton-oriented draft pool. Unlike a deck it has no zones; the singleton
/// and peasant rules are properties of the cube itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cube {
    pub name: String,
    pub size: u32,
    pub entries: Vec<CubeEntry>,
    pub themes: Vec<String>,
    pub power_level: PowerLevel,
    pub complexity: Complexity,
    pub is_singleton: bool,
    pub is_peasant: bool,
    pub created_at: SystemTime,
    pub modified_at: SystemTime,
}

/// Structured result of cube validation; errors block, warnings inform.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CubeIssues {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

const CUBE_MIN_CARDS: u32 = 180;

impl Cube {
    pub fn new(name: impl Into<String>, size: u32) -> Self {
        let now = SystemTime::now();
        Self {
            name: name.into(),
            size,
            entries: Vec::new(),
            themes: Vec::new(),
            power_level: PowerLevel::Medium,
            complexity: Complexity::Medium,
            is_singleton: true,
            is_peasant: false,
            created_at: now,
            modified_at: now,
        }
    }

    /// Add copies of a card. Rejected silently when it would break the cube's
    /// singleton or peasant rule, mirroring interactive add behavior; merges
    /// into an existing entry otherwise. Bumps `modified_at` on change.
    pub fn add_card(&mut self, card: Card, quantity: u32, notes: Option<String>) -> bool {
        if quantity == 0 {
            return false;
        }
        let is_basic = card.is_basic_land();
        if self.is_peasant && card.rarity.map_or(false, |r| !r.is_peasant()) {
            return false;
        }
        if let Some(entry) = self.entries.iter_mut().find(|e| e.card.id == card.id) {
            if self.is_singleton && !is_basic {
                return false;
            }
            entry.quantity += quantity;
            if notes.is_some() {
                entry.notes = notes;
            }
        } else {
            self.entries.push(CubeEntry {
                card,
                quantity,
                is_basic_land: is_basic,
                notes,
            });
        }
        self.touch();
        true
    }

    /// Remove up to `quantity` copies; drops the entry at zero. Bumps
    /// `modified_at` on success.
    pub fn remove_card(&mut self, id: CardId, quantity: u32) -> bool {
        let Some(pos) = self.entries.iter().position(|e| e.card.id == id) else {
            return false;
        };
        if self.entries[pos].quantity <= quantity {
            self.entries.remove(pos);
        } else {
            self.entries[pos].quantity -= quantity;
        }
        self.touch();
        true
    }

    pub fn total_cards(&self) -> u32 {
        self.entries.iter().map(|e| e.quantity).sum()
    }

    pub fn colors(&self) -> ColorSet {
        self.entries
            .iter()
            .fold(ColorSet::COLORLESS, |acc, e| acc.union(e.card.color_identity))
    }

    /// Per-color quantity counts, with a colorless bucket keyed by `None`.
    pub fn color_distribution(&self) -> BTreeMap<Option<Color>, u32> {
        let mut counts = BTreeMap::new();
        for entry in &self.entries {
            let identity = entry.card.color_identity;
            if identity.is_colorless() {
                *counts.entry(None).or_default() += entry.quantity;
            } else {
                for color in identity.iter() {
                    *counts.entry(Some(color)).or_default() += entry.quantity;
                }
            }
        }
        counts
    }

    /// Quantity counts keyed by the primary type line segment.
    pub fn type_distribution(&self) -> BTreeMap<String, u32> {
        let mut counts = BTreeMap::new();
        for entry in &self.entries {
            let primary = entry.card.primary_type();
            if !primary.is_empty() {
                *counts.entry(primary.to_string()).or_default() += entry.quantity;
            }
        }
        counts
    }

    /// Nonland mana curve, bucketed over CMC 0..=7.
    pub fn mana_curve(&self) -> [u32; 8] {
        let mut curve = [0u32; 8];
        for entry in &self.entries {
            if !entry.card.is_land() {
                curve[entry.card.curve_bucket()] += entry.quantity;
            }
        }
        curve
    }

    pub fn validate(&self) -> CubeIssues {
        let mut issues = CubeIssues::default();

        let total = self.total_cards();
        if total < CUBE_MIN_CARDS {
            issues
                .errors
                .push(format!("cube has {total} cards, minimum is {CUBE_MIN_CARDS}"));
        }

        if !self.entries.iter().any(|e| e.is_basic_land) {
            issues
                .warnings
                .push("no basic lands found - consider adding some".to_string());
        }

        let distribution = self.color_distribution();
        let total_colored: u32 = distribution
            .iter()
            .filter_map(|(color, count)| color.map(|_| *count))
            .sum();
        if total_colored > 0 {
            for (color, count) in &distribution {
                let Some(color) = color else { continue };
                let percentage = *count as f64 / total_colored as f64 * 100.0;
                if percentage < 10.0 {
                    issues.warnings.push(format!(
                        "low {} representation: {percentage:.1}%",
                        color.code()
                    ));
                } else if percentage > 30.0 {
                    issues.warnings.push(format!(
                        "high {} representation: {percentage:.1}%",
                        color.code()
                    ));
                }
            }
        }

        if self.is_singleton {
            let mut seen = std::collections::HashSet::new();
            for entry in &self.entries {
                if !entry.is_basic_land && !seen.insert(entry.card.id) {
                    issues.errors.push(format!(
                        "duplicate non-basic card (singleton rule): {}",
                        entry.card.name
                    ));
                }
                if !entry.is_basic_land && entry.quantity > 1 {
                    issues.errors.push(format!(
                        "non-basic card above one copy (singleton rule): {}",
                        entry.card.name
                    ));
                }
            }
        } else {
            for entry in &self.entries {
                if !entry.is_basic_land && entry.quantity > 3 {
                    issues.warnings.push(format!(
                        "high duplicate count: {} ({} copies)",
                        entry.card.name, entry.quantity
                    ));
                }
            }
        }

        if self.is_peasant {
            for entry in &self.entries {
                if entry.card.rarity.map_or(false, |r| !r.is_peasant()) {
                    issues
                        .errors
                        .push(format!("non-peasant card: {}", entry.card.name));
                }
            }
        }

        issues
    }

    /// Text list grouped by primary type.
    pub fn export_list(&self) -> String {
        let mut groups: BTreeMap<String, Vec<&CubeEntry>> = BTreeMap::new();
        for entry in &self.entries {
            groups
                .entry(entry.card.primary_type().to_string())
                .or_default()
                .push(entry);
        }
        let mut lines = vec![
            format!("Cube: {}", self.name),
            format!("Size: {}", self.total_cards()),
            String::new(),
        ];
        for (type_name, mut members) in groups {
            members.sort_by(|a, b| a.card.name.cmp(&b.card.name));
            lines.push(format!("{type_name}:"));
            for entry in members {
                if entry.quantity > 1 {
                    lines.push(format!("  {}x {}", entry.quantity, entry.card.name));
                } else {
                    lines.push(format!("  {}", entry.card.name));
                }
            }
            lines.push(String::new());
        }
        lines.join("\n")
    }

    fn touch(&mut self) {
        self.modified_at = SystemTime::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BasicLand, CardType, Rarity};

    fn card(id: i64, rarity: Rarity) -> Card {
        let mut card = BasicLand::Plains.card();
        card.id = CardId(id);
        card.name = format!("Card {id}");
        card.type_line = "Creature — Elf".to_string();
        card.card_types = vec![CardType::Creature];
        card.rarity = Some(rarity);
        card
    }

    #[test]
    fn singleton_rejects_duplicates_but_not_basics() {
        let mut cube = Cube::new("test", 360);
        assert!(cube.add_card(card(1, Rarity::Common), 1, None));
        assert!(!cube.add_card(card(1, Rarity::Common), 1, None));
        assert!(cube.add_card(BasicLand::Forest.card(), 5, None));
        assert!(cube.add_card(BasicLand::Forest.card(), 5, None));
        assert_eq!(cube.total_cards(), 11);
    }

    #[test]
    fn peasant_rejects_rares() {
        let mut cube = Cube::new("test", 360);
        cube.is_peasant = true;
        assert!(!cube.add_card(card(1, Rarity::Rare), 1, None));
        assert!(cube.add_card(card(2, Rarity::Uncommon), 1, None));
    }

    #[test]
    fn validate_flags_undersized_cube() {
        let mut cube = Cube::new("test", 360);
        cube.add_card(card(1, Rarity::Common), 1, None);
        let issues = cube.validate();
        assert_eq!(issues.errors.len(), 1);
        assert!(issues.errors[0].contains("minimum"));
    }
}
