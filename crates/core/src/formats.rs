use crate::{normalize_name, Deck};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Format {
    Standard,
    Commander,
    Modern,
    Pauper,
    Legacy,
    Vintage,
    Brawl,
}

#[derive(Debug, Error)]
#[error("unknown format: {0}")]
pub struct UnknownFormat(pub String);

impl FromStr for Format {
    type Err = UnknownFormat;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "standard" => Ok(Format::Standard),
            "commander" | "edh" => Ok(Format::Commander),
            "modern" => Ok(Format::Modern),
            "pauper" => Ok(Format::Pauper),
            "legacy" => Ok(Format::Legacy),
            "vintage" => Ok(Format::Vintage),
            "brawl" => Ok(Format::Brawl),
            other => Err(UnknownFormat(other.to_string())),
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Format::Standard => "standard",
            Format::Commander => "commander",
            Format::Modern => "modern",
            Format::Pauper => "pauper",
            Format::Legacy => "legacy",
            Format::Vintage => "vintage",
            Format::Brawl => "brawl",
        };
        write!(f, "{name}")
    }
}

/// Declarative per-format deck constraints. Consulted read-only by validation
/// and by the engine's sizing decisions.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FormatRules {
    pub min_cards: u32,
    pub max_cards: Option<u32>,
    pub max_copies: u32,
    pub sideboard_size: u32,
    pub requires_commander: bool,
}

impl Format {
    pub fn rules(self) -> FormatRules {
        match self {
            Format::Commander => FormatRules {
                min_cards: 100,
                max_cards: Some(100),
                max_copies: 1,
                sideboard_size: 0,
                requires_commander: true,
            },
            Format::Brawl => FormatRules {
                min_cards: 60,
                max_cards: Some(60),
                max_copies: 1,
                sideboard_size: 0,
                requires_commander: true,
            },
            Format::Standard
            | Format::Modern
            | Format::Pauper
            | Format::Legacy
            | Format::Vintage => FormatRules {
                min_cards: 60,
                max_cards: None,
                max_copies: 4,
                sideboard_size: 15,
                requires_commander: false,
            },
        }
    }

    /// Singleton formats built around a commander: the mainboard body excludes
    /// the commander itself.
    pub fn is_commander_family(self) -> bool {
        self.rules().requires_commander
    }

    /// Mainboard size excluding the commander slot, for commander-family formats.
    pub fn commander_body_size(self) -> u32 {
        self.rules().min_cards.saturating_sub(1)
    }
}

/// Validate a deck against its format's rules. Returns one human-readable
/// violation per failed check; an empty list means the deck is legal. Pure read,
/// never fails: callers decide whether violations block a save or merely warn.
pub fn validate(deck: &Deck) -> Vec<String> {
    let rules = deck.format.rules();
    let mut violations = Vec::new();

    let mainboard_count = deck.mainboard_count();
    if mainboard_count < rules.min_cards {
        violations.push(format!(
            "deck has {mainboard_count} cards, minimum is {}",
            rules.min_cards
        ));
    }
    if let Some(max) = rules.max_cards {
        if mainboard_count > max {
            violations.push(format!("deck has {mainboard_count} cards, maximum is {max}"));
        }
    }

    let sideboard_count = deck.sideboard_count();
    if sideboard_count > rules.sideboard_size {
        violations.push(format!(
            "sideboard has {sideboard_count} cards, maximum is {}",
            rules.sideboard_size
        ));
    }

    // Copy limits, keyed by normalized name; basic lands are exempt.
    let mut copies: HashMap<String, u32> = HashMap::new();
    for entry in deck.mainboard() {
        if entry.card.is_basic_land() {
            continue;
        }
        *copies.entry(normalize_name(&entry.card.name)).or_default() += entry.quantity;
    }
    let mut over: Vec<(String, u32)> = copies
        .into_iter()
        .filter(|(_, count)| *count > rules.max_copies)
        .collect();
    over.sort();
    for (name, count) in over {
        violations.push(format!(
            "{name}: {count} copies (max {})",
            rules.max_copies
        ));
    }

    if rules.requires_commander {
        match deck.commander() {
            None => violations.push(format!("{} format requires a commander", deck.format)),
            Some(entry) if entry.quantity != 1 => {
                violations.push("commander must have quantity of 1".to_string())
            }
            Some(_) => {}
        }
    }

    violations
}
