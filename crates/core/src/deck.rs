use crate::{Card, CardId, ColorSet, Format};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::SystemTime;

/// A card committed to one deck zone.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DeckEntry {
    pub card: Card,
    pub quantity: u32,
    #[serde(default)]
    pub is_commander: bool,
    #[serde(default)]
    pub in_sideboard: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Deck {
    /// Identity assigned by the external persistence layer; `None` until saved.
    pub id: Option<i64>,
    pub name: String,
    pub format: Format,
    pub entries: Vec<DeckEntry>,
    pub created_at: SystemTime,
    pub modified_at: SystemTime,
}

impl Deck {
    pub fn new(name: impl Into<String>, format: Format) -> Self {
        let now = SystemTime::now();
        Self {
            id: None,
            name: name.into(),
            format,
            entries: Vec::new(),
            created_at: now,
            modified_at: now,
        }
    }

    pub fn mainboard(&self) -> impl Iterator<Item = &DeckEntry> {
        self.entries.iter().filter(|e| !e.in_sideboard)
    }

    pub fn sideboard(&self) -> impl Iterator<Item = &DeckEntry> {
        self.entries.iter().filter(|e| e.in_sideboard)
    }

    pub fn commander(&self) -> Option<&DeckEntry> {
        self.entries.iter().find(|e| e.is_commander)
    }

    pub fn mainboard_count(&self) -> u32 {
        self.mainboard().map(|e| e.quantity).sum()
    }

    pub fn sideboard_count(&self) -> u32 {
        self.sideboard().map(|e| e.quantity).sum()
    }

    pub fn total_cards(&self) -> u32 {
        self.entries.iter().map(|e| e.quantity).sum()
    }

    /// Add copies of a card, merging into an existing entry with the same card,
    /// zone, and commander flag. Bumps `modified_at`.
    pub fn add_card(&mut self, card: Card, quantity: u32, is_commander: bool, in_sideboard: bool) {
        if quantity == 0 {
            return;
        }
        if let Some(entry) = self.entries.iter_mut().find(|e| {
            e.card.id == card.id && e.is_commander == is_commander && e.in_sideboard == in_sideboard
        }) {
            entry.quantity += quantity;
        } else {
            self.entries.push(DeckEntry {
                card,
                quantity,
                is_commander,
                in_sideboard,
            });
        }
        self.touch();
    }

    /// Remove up to `quantity` copies from the given zone; drops the entry when
    /// it reaches zero. Returns false if the card was not present. Bumps
    /// `modified_at` on success.
    pub fn remove_card(&mut self, id: CardId, quantity: u32, from_sideboard: bool) -> bool {
        let Some(pos) = self
            .entries
            .iter()
            .position(|e| e.card.id == id && e.in_sideboard == from_sideboard)
        else {
            return false;
        };
        if quantity >= self.entries[pos].quantity {
            self.entries.remove(pos);
        } else {
            self.entries[pos].quantity -= quantity;
        }
        self.touch();
        true
    }

    /// Union of mainboard color identities.
    pub fn colors(&self) -> ColorSet {
        self.mainboard()
            .fold(ColorSet::COLORLESS, |acc, e| acc.union(e.card.color_identity))
    }

    /// Nonland mana curve, bucketed over CMC 0..=7.
    pub fn mana_curve(&self) -> [u32; 8] {
        let mut curve = [0u32; 8];
        for entry in self.mainboard() {
            if !entry.card.is_land() {
                curve[entry.card.curve_bucket()] += entry.quantity;
            }
        }
        curve
    }

    pub fn type_distribution(&self) -> BTreeMap<String, u32> {
        let mut distribution = BTreeMap::new();
        for entry in self.mainboard() {
            for kind in &entry.card.card_types {
                *distribution.entry(kind.label().to_string()).or_default() += entry.quantity;
            }
        }
        distribution
    }

    /// Mainboard quantity excluding the commander slot.
    pub fn body_count(&self) -> u32 {
        self.mainboard()
            .filter(|e| !e.is_commander)
            .map(|e| e.quantity)
            .sum()
    }

    /// Text list grouped by primary type, in the conventional type order.
    pub fn export_list(&self) -> String {
        let mut groups: BTreeMap<&str, Vec<&DeckEntry>> = BTreeMap::new();
        for entry in self.mainboard() {
            groups.entry(entry.card.primary_type()).or_default().push(entry);
        }
        let mut lines = vec![format!("Deck: {}", self.name), format!("Format: {}", self.format)];
        lines.push(String::new());
        let known_order = [
            "Creature",
            "Instant",
            "Sorcery",
            "Enchantment",
            "Artifact",
            "Planeswalker",
            "Land",
        ];
        let mut ordered: Vec<&str> = known_order
            .iter()
            .copied()
            .filter(|t| groups.keys().any(|k| k.contains(t)))
            .collect();
        for key in groups.keys() {
            if !ordered.iter().any(|t| key.contains(t)) {
                ordered.push(key);
            }
        }
        for type_name in ordered {
            let mut members: Vec<&&DeckEntry> = groups
                .iter()
                .filter(|(k, _)| k.contains(type_name))
                .flat_map(|(_, v)| v)
                .collect();
            if members.is_empty() {
                continue;
            }
            members.sort_by(|a, b| a.card.name.cmp(&b.card.name));
            members.dedup_by(|a, b| a.card.id == b.card.id);
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
    use crate::BasicLand;

    fn creature(id: i64, name: &str) -> Card {
        let mut card = BasicLand::Plains.card();
        card.id = CardId(id);
        card.name = name.to_string();
        card.type_line = "Creature — Bear".to_string();
        card.card_types = vec![crate::CardType::Creature];
        card.cmc = 2.0;
        card.quantity = 4;
        card
    }

    #[test]
    fn add_card_merges_matching_zone() {
        let mut deck = Deck::new("test", Format::Standard);
        deck.add_card(creature(1, "Grizzly Bears"), 2, false, false);
        deck.add_card(creature(1, "Grizzly Bears"), 1, false, false);
        deck.add_card(creature(1, "Grizzly Bears"), 1, false, true);
        assert_eq!(deck.entries.len(), 2);
        assert_eq!(deck.mainboard_count(), 3);
        assert_eq!(deck.sideboard_count(), 1);
    }

    #[test]
    fn remove_card_drops_exhausted_entries() {
        let mut deck = Deck::new("test", Format::Standard);
        deck.add_card(creature(1, "Grizzly Bears"), 2, false, false);
        assert!(deck.remove_card(CardId(1), 1, false));
        assert_eq!(deck.mainboard_count(), 1);
        assert!(deck.remove_card(CardId(1), 5, false));
        assert!(deck.entries.is_empty());
        assert!(!deck.remove_card(CardId(1), 1, false));
    }

    #[test]
    fn curve_excludes_lands() {
        let mut deck = Deck::new("test", Format::Standard);
        deck.add_card(creature(1, "Grizzly Bears"), 4, false, false);
        deck.add_card(BasicLand::Forest.card(), 10, false, false);
        let curve = deck.mana_curve();
        assert_eq!(curve[2], 4);
        assert_eq!(curve.iter().sum::<u32>(), 4);
    }
}
