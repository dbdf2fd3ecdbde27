use deckforge_core::{AvailabilityLedger, Card, ColorSet};

/// Cards castable within the requested colors. Colorless cards always qualify;
/// an empty requested set means no color restriction at all.
pub fn filter_by_colors(pool: &[Card], colors: ColorSet) -> Vec<Card> {
    if colors.is_empty() {
        return pool.to_vec();
    }
    pool.iter()
        .filter(|c| c.color_identity.is_colorless() || c.color_identity.is_subset_of(colors))
        .cloned()
        .collect()
}

/// Legendary creatures whose color identity is compatible with the requested
/// colors in either direction, so a narrower request can still surface a wider
/// commander to anchor the deck.
pub fn commander_candidates(pool: &[Card], colors: ColorSet) -> Vec<Card> {
    pool.iter()
        .filter(|c| c.is_legendary() && c.is_creature())
        .filter(|c| {
            colors.is_empty()
                || c.color_identity.is_subset_of(colors)
                || colors.is_subset_of(c.color_identity)
        })
        .cloned()
        .collect()
}

/// Cards with at least one uncommitted copy.
pub fn filter_available(pool: &[Card], ledger: &AvailabilityLedger) -> Vec<Card> {
    pool.iter()
        .filter(|c| ledger.remaining(c) > 0)
        .cloned()
        .collect()
}

/// Commons and uncommons only; cards with no recorded rarity are excluded.
pub fn filter_peasant(pool: &[Card]) -> Vec<Card> {
    pool.iter()
        .filter(|c| c.rarity.map_or(false, |r| r.is_peasant()))
        .cloned()
        .collect()
}
