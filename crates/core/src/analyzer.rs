//! Heuristic deck/cube analysis over oracle text and type lines.
//!
//! Detection is substring matching against fixed keyword tables, not a rules
//! engine; edge-case card wordings will misclassify and that is accepted. The
//! output feeds both human-facing insights and the engine's fitness function.

use crate::{Card, ColorSet, Deck, DeckEntry};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

const SYNERGY_KEYWORDS: &[(&str, &[&str])] = &[
    (
        "graveyard",
        &[
            "graveyard",
            "from your graveyard",
            "return",
            "mill",
            "flashback",
            "delve",
            "disturb",
        ],
    ),
    (
        "artifacts",
        &["artifact", "equipment", "thopter", "construct", "affinity"],
    ),
    ("tokens", &["create", "token", "populate", "convoke"]),
    ("sacrifice", &["sacrifice", "dies", "aristocrat"]),
    (
        "lifegain",
        &["gain", "life", "lifelink", "when you gain life"],
    ),
    ("counters", &["+1/+1 counter", "proliferate", "counter on"]),
    (
        "spells",
        &["instant", "sorcery", "prowess", "whenever you cast"],
    ),
];

const KEYWORD_ABILITIES: &[&str] = &[
    "flying",
    "trample",
    "haste",
    "vigilance",
    "lifelink",
    "deathtouch",
    "first strike",
    "double strike",
    "menace",
    "hexproof",
    "indestructible",
    "flash",
    "defender",
    "reach",
    "prowess",
    "convoke",
    "affinity",
];

const TRIBES: &[&str] = &[
    "zombie", "goblin", "elf", "vampire", "human", "dragon", "wizard", "knight", "soldier",
    "merfolk", "angel", "demon",
];

const DRAW_KEYWORDS: &[&str] = &[
    "draw",
    "draws",
    "scry",
    "surveil",
    "investigate",
    "conjure",
    "discover",
    "explore",
];

const CUBE_THEME_KEYWORDS: &[(&str, &[&str])] = &[
    (
        "graveyard",
        &["graveyard", "flashback", "delve", "disturb", "unearth"],
    ),
    ("artifacts", &["artifact", "equipment", "thopter", "construct"]),
    (
        "tribal",
        &["elf", "goblin", "zombie", "vampire", "human", "dragon"],
    ),
    (
        "spells",
        &["instant", "sorcery", "prowess", "whenever you cast"],
    ),
    ("combo", &["sacrifice", "when", "enters", "leaves", "counter"]),
    ("control", &["counter", "destroy", "exile", "return to hand"]),
    (
        "aggro",
        &["haste", "trample", "first strike", "double strike"],
    ),
    ("midrange", &["draw", "gain", "life", "creature", "permanent"]),
    ("ramp", &["add", "mana", "land", "untap"]),
    ("storm", &["storm", "copy", "cast", "spell"]),
];

/// A detected card category: the matching card names plus total copies.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Category {
    pub cards: Vec<String>,
    pub count: u32,
}

impl Category {
    fn push(&mut self, entry: &DeckEntry) {
        self.cards.push(entry.card.name.clone());
        self.count += entry.quantity;
    }
}

/// Removal split into its interaction buckets.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct RemovalSuite {
    pub creature_removal: Category,
    pub board_wipes: Category,
    pub counterspells: Category,
    pub discard: Category,
    pub other: Category,
}

impl RemovalSuite {
    pub fn total(&self) -> u32 {
        self.creature_removal.count
            + self.board_wipes.count
            + self.counterspells.count
            + self.discard.count
            + self.other.count
    }
}

/// Feature bundle derived from a deck; pure function of its input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeckAnalysis {
    pub mana_curve: [u32; 8],
    pub card_types: BTreeMap<String, u32>,
    pub themes: BTreeMap<String, u32>,
    pub keywords: BTreeSet<String>,
    pub card_draw: Category,
    pub removal: RemovalSuite,
    pub ramp: Category,
    pub threats: Category,
    pub answers: Category,
    pub colors: ColorSet,
}

pub fn analyze_deck(deck: &Deck) -> DeckAnalysis {
    let mainboard: Vec<&DeckEntry> = deck.mainboard().collect();
    DeckAnalysis {
        mana_curve: deck.mana_curve(),
        card_types: card_type_counts(&mainboard),
        themes: detect_themes(&mainboard),
        keywords: keyword_abilities(&mainboard),
        card_draw: find_card_draw(&mainboard),
        removal: find_removal(&mainboard),
        ramp: find_ramp(&mainboard),
        threats: find_threats(&mainboard),
        answers: find_answers(&mainboard),
        colors: deck.colors(),
    }
}

fn text_of(entry: &DeckEntry) -> String {
    entry.card.oracle_text.to_lowercase()
}

fn type_line_of(entry: &DeckEntry) -> String {
    entry.card.type_line.to_lowercase()
}

pub fn find_card_draw(cards: &[&DeckEntry]) -> Category {
    let mut found = Category::default();
    for entry in cards {
        let text = text_of(entry);
        if DRAW_KEYWORDS.iter().any(|kw| text.contains(kw)) {
            // Skip symmetric effects that mostly feed the opponent.
            if !text.contains("opponent") || text.matches("draw").count() > text.matches("opponent").count()
            {
                found.push(entry);
                continue;
            }
        }
        if entry.card.type_line.contains("Planeswalker") {
            found.push(entry);
        }
    }
    found
}

pub fn find_removal(cards: &[&DeckEntry]) -> RemovalSuite {
    let mut suite = RemovalSuite::default();
    for entry in cards {
        let text = text_of(entry);
        if text.contains("counter target") || text.contains("counter that") {
            suite.counterspells.push(entry);
        } else if ["destroy all", "exile all", "-x/-x", "damage to each"]
            .iter()
            .any(|p| text.contains(p))
        {
            suite.board_wipes.push(entry);
        } else if text.contains("discard") && text.contains("opponent") {
            suite.discard.push(entry);
        } else if [
            "destroy target creature",
            "exile target creature",
            "target creature gets",
            "damage to target creature",
            "damage to any target",
            "return target creature",
        ]
        .iter()
        .any(|p| text.contains(p))
        {
            suite.creature_removal.push(entry);
        } else if ["destroy target", "exile target", "return target"]
            .iter()
            .any(|p| text.contains(p))
        {
            suite.other.push(entry);
        }
    }
    suite
}

pub fn find_ramp(cards: &[&DeckEntry]) -> Category {
    let mut found = Category::default();
    for entry in cards {
        let text = text_of(entry);
        let type_line = type_line_of(entry);
        let is_basic = type_line.contains("basic") && type_line.contains("land");
        if text.contains("add") && (text.contains('{') || text.contains("mana")) && !is_basic {
            found.push(entry);
        } else if text.contains("search your library") && text.contains("land") {
            found.push(entry);
        } else if text.contains("put") && text.contains("land") && text.contains("onto the battlefield")
        {
            found.push(entry);
        }
    }
    found
}

pub fn find_threats(cards: &[&DeckEntry]) -> Category {
    let mut found = Category::default();
    for entry in cards {
        let text = text_of(entry);
        if entry.card.is_creature() {
            found.push(entry);
        } else if entry.card.type_line.contains("Planeswalker") {
            found.push(entry);
        } else if text.contains("create") && text.contains("token") {
            found.push(entry);
        } else if ["combat", "attack", "damage to opponent"]
            .iter()
            .any(|kw| text.contains(kw))
        {
            found.push(entry);
        }
    }
    found
}

pub fn find_answers(cards: &[&DeckEntry]) -> Category {
    let mut found = Category::default();
    for entry in cards {
        let text = text_of(entry);
        if ["destroy", "exile", "counter", "return", "damage", "gets -"]
            .iter()
            .any(|p| text.contains(p))
        {
            found.push(entry);
        } else if ["prevent", "protection", "indestructible", "hexproof"]
            .iter()
            .any(|kw| text.contains(kw))
        {
            found.push(entry);
        }
    }
    found
}

/// Theme counts over the synergy tables, plus `tribal_<subtype>` keys for each
/// recognized creature tribe present in type lines.
pub fn detect_themes(cards: &[&DeckEntry]) -> BTreeMap<String, u32> {
    let mut themes: BTreeMap<String, u32> = BTreeMap::new();
    for entry in cards {
        let text = text_of(entry);
        let type_line = type_line_of(entry);
        for (theme, keywords) in SYNERGY_KEYWORDS {
            if keywords.iter().any(|kw| text.contains(kw)) {
                *themes.entry(theme.to_string()).or_default() += entry.quantity;
            }
        }
        for tribe in TRIBES {
            if type_line.contains(tribe) {
                *themes.entry(format!("tribal_{tribe}")).or_default() += entry.quantity;
            }
        }
    }
    themes
}

/// Card type and em-dash subtype counts over lowercased type lines.
pub fn card_type_counts(cards: &[&DeckEntry]) -> BTreeMap<String, u32> {
    let mut counts: BTreeMap<String, u32> = BTreeMap::new();
    for entry in cards {
        let type_line = type_line_of(entry);
        for main in [
            "creature",
            "instant",
            "sorcery",
            "enchantment",
            "artifact",
            "planeswalker",
            "land",
        ] {
            if type_line.contains(main) {
                *counts.entry(main.to_string()).or_default() += entry.quantity;
            }
        }
        if let Some((_, subtypes)) = type_line.split_once('—') {
            for subtype in subtypes.split_whitespace() {
                *counts.entry(subtype.to_string()).or_default() += entry.quantity;
            }
        }
    }
    counts
}

pub fn keyword_abilities(cards: &[&DeckEntry]) -> BTreeSet<String> {
    let mut keywords = BTreeSet::new();
    for entry in cards {
        let text = text_of(entry);
        let type_line = type_line_of(entry);
        for keyword in KEYWORD_ABILITIES {
            if text.contains(keyword) || type_line.contains(keyword) {
                keywords.insert(keyword.to_string());
            }
        }
    }
    keywords
}

/// Whether a single card supports a named cube theme.
pub fn card_supports_theme(card: &Card, theme: &str) -> bool {
    let text = card.oracle_text.to_lowercase();
    let type_line = card.type_line.to_lowercase();
    CUBE_THEME_KEYWORDS
        .iter()
        .find(|(name, _)| *name == theme)
        .map_or(false, |(_, keywords)| {
            keywords
                .iter()
                .any(|kw| text.contains(kw) || type_line.contains(kw))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BasicLand, CardId, CardType, Format};

    fn entry(name: &str, type_line: &str, oracle: &str, quantity: u32) -> DeckEntry {
        let mut card = BasicLand::Plains.card();
        card.id = CardId(name.len() as i64 * 131 + quantity as i64);
        card.name = name.to_string();
        card.type_line = type_line.to_string();
        card.card_types = if type_line.contains("Creature") {
            vec![CardType::Creature]
        } else if type_line.contains("Instant") {
            vec![CardType::Instant]
        } else if type_line.contains("Land") {
            vec![CardType::Land]
        } else {
            vec![CardType::Sorcery]
        };
        card.oracle_text = oracle.to_string();
        card.cmc = 2.0;
        DeckEntry {
            card,
            quantity,
            is_commander: false,
            in_sideboard: false,
        }
    }

    #[test]
    fn removal_buckets_are_disjoint_by_priority() {
        let counter = entry("Cancel", "Instant", "Counter target spell.", 2);
        let wipe = entry("Day of Judgment", "Sorcery", "Destroy all creatures.", 1);
        let spot = entry("Doom Blade", "Instant", "Destroy target creature.", 3);
        let entries: Vec<&DeckEntry> = vec![&counter, &wipe, &spot];
        let suite = find_removal(&entries);
        assert_eq!(suite.counterspells.count, 2);
        assert_eq!(suite.board_wipes.count, 1);
        assert_eq!(suite.creature_removal.count, 3);
        assert_eq!(suite.total(), 6);
    }

    #[test]
    fn draw_detection_skips_opponent_only_effects() {
        let ours = entry("Divination", "Sorcery", "Draw two cards.", 4);
        let theirs = entry(
            "Gift",
            "Sorcery",
            "Target opponent draws a card.",
            2,
        );
        let entries: Vec<&DeckEntry> = vec![&ours, &theirs];
        let draw = find_card_draw(&entries);
        assert_eq!(draw.count, 4);
        assert_eq!(draw.cards, vec!["Divination".to_string()]);
    }

    #[test]
    fn tribal_themes_use_type_line() {
        let lord = entry(
            "Elvish Archdruid",
            "Creature — Elf Druid",
            "Other Elves you control get +1/+1.",
            3,
        );
        let entries: Vec<&DeckEntry> = vec![&lord];
        let themes = detect_themes(&entries);
        assert_eq!(themes.get("tribal_elf"), Some(&3));
    }

    #[test]
    fn subtypes_counted_from_em_dash_segment() {
        let bear = entry("Grizzly Bears", "Creature — Bear", "", 2);
        let entries: Vec<&DeckEntry> = vec![&bear];
        let counts = card_type_counts(&entries);
        assert_eq!(counts.get("creature"), Some(&2));
        assert_eq!(counts.get("bear"), Some(&2));
    }

    #[test]
    fn analyze_deck_is_pure_and_complete() {
        let mut deck = Deck::new("sample", Format::Standard);
        deck.add_card(
            entry("Doom Blade", "Instant", "Destroy target creature.", 1).card,
            4,
            false,
            false,
        );
        deck.add_card(BasicLand::Swamp.card(), 20, false, false);
        let analysis = analyze_deck(&deck);
        assert_eq!(analysis.removal.total(), 4);
        assert_eq!(analysis.mana_curve[2], 4);
        assert_eq!(analysis.card_types.get("land"), Some(&20));
    }

    #[test]
    fn cube_theme_support_matches_tables() {
        let mut card = BasicLand::Plains.card();
        card.oracle_text = "Flashback {2}{R}".to_string();
        card.type_line = "Sorcery".to_string();
        assert!(card_supports_theme(&card, "graveyard"));
        assert!(!card_supports_theme(&card, "artifacts"));
        assert!(!card_supports_theme(&card, "no_such_theme"));
    }
}
