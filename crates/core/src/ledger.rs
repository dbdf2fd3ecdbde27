use crate::{Card, CardId, Deck};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Effectively-unlimited remaining count reported for basic lands.
pub const UNLIMITED_AVAILABILITY: i64 = 1_000_000_000;

#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("availability exhausted for '{name}': need {need}, have {have}")]
    Exhausted { name: String, need: i64, have: i64 },
}

/// Per-card-identity count of copies not already committed to other decks.
///
/// Derived and recomputed on read, never persisted: callers must rebuild it
/// before a generation run if the collection or other decks may have changed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AvailabilityLedger {
    remaining: HashMap<CardId, i64>,
}

impl AvailabilityLedger {
    /// Compute remaining copies as `owned − committed to other decks'
    /// mainboards`, floored at zero. `exclude_deck` skips the deck currently
    /// being edited so its own commitments do not count against it.
    pub fn compute(collection: &[Card], decks: &[Deck], exclude_deck: Option<i64>) -> Self {
        let mut committed: HashMap<CardId, i64> = HashMap::new();
        for deck in decks {
            if exclude_deck.is_some() && deck.id == exclude_deck {
                continue;
            }
            for entry in deck.mainboard() {
                if !entry.card.id.is_virtual() {
                    *committed.entry(entry.card.id).or_default() += entry.quantity as i64;
                }
            }
        }

        let mut remaining = HashMap::new();
        for card in collection {
            let used = committed.get(&card.id).copied().unwrap_or(0);
            let free = (card.quantity as i64 - used).max(0);
            *remaining.entry(card.id).or_insert(0) += free;
        }
        Self { remaining }
    }

    pub fn from_counts(counts: impl IntoIterator<Item = (CardId, i64)>) -> Self {
        Self {
            remaining: counts.into_iter().collect(),
        }
    }

    /// Remaining copies available for the given card. Basic lands are always
    /// reported as effectively unlimited, whatever the raw ledger math says.
    pub fn remaining(&self, card: &Card) -> i64 {
        if card.is_basic_land() {
            return UNLIMITED_AVAILABILITY;
        }
        self.remaining.get(&card.id).copied().unwrap_or(0).max(0)
    }

    pub fn can_take(&self, card: &Card, n: i64) -> bool {
        self.remaining(card) >= n
    }

    /// Consume copies, for draft-style incremental allocation. Basic lands are
    /// never decremented.
    pub fn take(&mut self, card: &Card, n: i64) -> Result<(), LedgerError> {
        if n <= 0 || card.is_basic_land() {
            return Ok(());
        }
        let have = self.remaining(card);
        if have < n {
            return Err(LedgerError::Exhausted {
                name: card.name.clone(),
                need: n,
                have,
            });
        }
        *self.remaining.entry(card.id).or_insert(0) = have - n;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BasicLand, CardType, Format};

    fn owned(id: i64, quantity: u32) -> Card {
        let mut card = BasicLand::Plains.card();
        card.id = CardId(id);
        card.name = format!("Card {id}");
        card.type_line = "Creature — Bear".to_string();
        card.card_types = vec![CardType::Creature];
        card.quantity = quantity;
        card
    }

    #[test]
    fn committed_copies_reduce_availability() {
        let collection = vec![owned(1, 4), owned(2, 2)];
        let mut deck = Deck::new("other", Format::Standard);
        deck.id = Some(10);
        deck.add_card(owned(1, 4), 3, false, false);
        let ledger = AvailabilityLedger::compute(&collection, &[deck], None);
        assert_eq!(ledger.remaining(&owned(1, 4)), 1);
        assert_eq!(ledger.remaining(&owned(2, 2)), 2);
    }

    #[test]
    fn excluded_deck_does_not_count() {
        let collection = vec![owned(1, 4)];
        let mut deck = Deck::new("edited", Format::Standard);
        deck.id = Some(10);
        deck.add_card(owned(1, 4), 4, false, false);
        let ledger = AvailabilityLedger::compute(&collection, &[deck], Some(10));
        assert_eq!(ledger.remaining(&owned(1, 4)), 4);
    }

    #[test]
    fn availability_never_negative() {
        let collection = vec![owned(1, 2)];
        let mut deck = Deck::new("other", Format::Standard);
        deck.add_card(owned(1, 2), 4, false, false);
        let ledger = AvailabilityLedger::compute(&collection, &[deck], None);
        assert_eq!(ledger.remaining(&owned(1, 2)), 0);
    }

    #[test]
    fn basics_are_unlimited_and_never_decremented() {
        let mut ledger = AvailabilityLedger::from_counts([]);
        let basic = BasicLand::Mountain.card();
        assert_eq!(ledger.remaining(&basic), UNLIMITED_AVAILABILITY);
        ledger.take(&basic, 50).unwrap();
        assert_eq!(ledger.remaining(&basic), UNLIMITED_AVAILABILITY);
    }

    #[test]
    fn take_rejects_overdraw() {
        let card = owned(1, 2);
        let mut ledger = AvailabilityLedger::from_counts([(CardId(1), 2)]);
        ledger.take(&card, 2).unwrap();
        assert!(ledger.take(&card, 1).is_err());
    }
}
