//! Deterministic repair passes applied to the genetic algorithm's winner.
//!
//! The pipeline owns the legality guarantee: whatever shape the search leaves
//! the deck in, the passes below must hand back a deck whose format validation
//! reports no violations. Passes interact (trimming lands can shrink the body,
//! padding the body can add lands), so the exact-size settle runs last.

use crate::{EngineEvent, EventBus, LandProfile};
use deckforge_core::{
    normalize_name, validate, AvailabilityLedger, BasicLand, Card, CardId, Color, ColorSet, Deck,
    DeckEntry,
};
use std::collections::{HashMap, HashSet};

pub fn finalize(
    deck: &mut Deck,
    pool: &[Card],
    ledger: &AvailabilityLedger,
    lands: &LandProfile,
    bus: &mut EventBus,
) -> Vec<String> {
    let mut warnings = Vec::new();
    let commander_family = deck.format.is_commander_family();

    if commander_family {
        let profile = lands.scaled(deck.format.commander_body_size());
        enforce_singleton(deck, &mut warnings);
        clamp_lands(deck, pool, ledger, &profile, &mut warnings, bus);
    }
    enforce_availability(deck, ledger, &mut warnings, bus);
    ensure_min_size(deck, pool, ledger, &mut warnings);
    clamp_copy_limits(deck, pool, ledger, &mut warnings);
    remove_commander_duplicates(deck, &mut warnings);
    if commander_family {
        settle_exact_size(deck, deck.format.commander_body_size(), &mut warnings);
    }

    for violation in validate(deck) {
        warnings.push(format!("unresolved after post-processing: {violation}"));
    }
    warnings
}

/// Collapse every non-basic mainboard entry to a single copy, commander first,
/// then restore the exact body size through basic lands.
fn enforce_singleton(deck: &mut Deck, warnings: &mut Vec<String>) {
    let body = deck.format.commander_body_size();
    let mut removed = 0u32;
    let mut seen: HashSet<CardId> = HashSet::new();
    let mut rebuilt: Vec<DeckEntry> = Vec::new();
    let mut basics: Vec<DeckEntry> = Vec::new();

    if let Some(commander) = deck.commander().cloned() {
        seen.insert(commander.card.id);
        removed += commander.quantity.saturating_sub(1);
        rebuilt.push(DeckEntry {
            quantity: 1,
            ..commander
        });
    }
    for entry in deck.entries.iter().filter(|e| !e.in_sideboard && !e.is_commander) {
        if entry.card.is_basic_land() {
            match basics.iter_mut().find(|b| b.card.id == entry.card.id) {
                Some(existing) => existing.quantity += entry.quantity,
                None => basics.push(entry.clone()),
            }
        } else if seen.insert(entry.card.id) {
            removed += entry.quantity.saturating_sub(1);
            rebuilt.push(DeckEntry {
                quantity: 1,
                ..entry.clone()
            });
        } else {
            removed += entry.quantity;
        }
    }
    let sideboard: Vec<DeckEntry> = deck
        .entries
        .iter()
        .filter(|e| e.in_sideboard)
        .cloned()
        .collect();
    rebuilt.extend(basics);
    rebuilt.extend(sideboard);
    deck.entries = rebuilt;

    if removed > 0 {
        warnings.push(format!("singleton rule removed {removed} duplicate copies"));
    }
    settle_exact_size(deck, body, warnings);
}

fn land_count(deck: &Deck) -> u32 {
    deck.mainboard()
        .filter(|e| e.card.is_land() && !e.is_commander)
        .map(|e| e.quantity)
        .sum()
}

/// Hold the land count inside the profile envelope, keeping the body size
/// constant by swapping against spells.
fn clamp_lands(
    deck: &mut Deck,
    pool: &[Card],
    ledger: &AvailabilityLedger,
    profile: &LandProfile,
    warnings: &mut Vec<String>,
    bus: &mut EventBus,
) {
    let count = land_count(deck);
    if count > profile.max {
        let mut excess = count - profile.max;
        excess -= trim_basics(deck, excess, 1);
        while excess > 0 {
            let Some((id, qty)) = deck
                .mainboard()
                .find(|e| e.card.is_land() && !e.card.is_basic_land() && !e.is_commander)
                .map(|e| (e.card.id, e.quantity))
            else {
                break;
            };
            let take = qty.min(excess);
            deck.remove_card(id, take, false);
            excess -= take;
        }
        let removed = count - land_count(deck);
        let refilled = refill_nonlands(deck, pool, ledger, removed);
        warnings.push(format!("reduced land count from {count} to {}", land_count(deck)));
        bus.push(EngineEvent::PassAdjusted {
            pass: "land_clamp".to_string(),
            detail: format!("removed {removed} lands, refilled {refilled} spells"),
        });
    } else if count < profile.min {
        let added = profile.target - count;
        let colors = deck.colors();
        add_basics(deck, added, colors);
        // swap out trailing spells so the body size holds
        let body = deck.format.commander_body_size();
        let mut excess = deck.body_count().saturating_sub(body);
        while excess > 0 {
            let Some((id, qty)) = deck
                .entries
                .iter()
                .rev()
                .find(|e| !e.in_sideboard && !e.is_commander && !e.card.is_land())
                .map(|e| (e.card.id, e.quantity))
            else {
                break;
            };
            let take = qty.min(excess);
            deck.remove_card(id, take, false);
            excess -= take;
        }
        warnings.push(format!("raised land count from {count} to {}", land_count(deck)));
        bus.push(EngineEvent::PassAdjusted {
            pass: "land_clamp".to_string(),
            detail: format!("added {added} basic lands"),
        });
    }
}

/// Cap every non-basic entry at its uncommitted copy count, replacing the
/// shortfall with basic lands in the deck's colors.
fn enforce_availability(
    deck: &mut Deck,
    ledger: &AvailabilityLedger,
    warnings: &mut Vec<String>,
    bus: &mut EventBus,
) {
    let colors = deck.colors();
    let over: Vec<(CardId, String, u32, u32)> = deck
        .mainboard()
        .filter(|e| !e.is_commander && !e.card.is_basic_land())
        .filter_map(|e| {
            let have = ledger.remaining(&e.card).max(0).min(u32::MAX as i64) as u32;
            (e.quantity > have).then(|| (e.card.id, e.card.name.clone(), e.quantity, have))
        })
        .collect();
    if over.is_empty() {
        return;
    }
    let mut shortfall = 0u32;
    for (id, name, qty, have) in over {
        deck.remove_card(id, qty - have, false);
        shortfall += qty - have;
        warnings.push(format!("{name}: only {have} of {qty} copies available"));
    }
    add_basics(deck, shortfall, colors);
    bus.push(EngineEvent::PassAdjusted {
        pass: "availability".to_string(),
        detail: format!("replaced {shortfall} unavailable copies with basic lands"),
    });
}

fn ensure_min_size(
    deck: &mut Deck,
    pool: &[Card],
    ledger: &AvailabilityLedger,
    warnings: &mut Vec<String>,
) {
    let min = deck.format.rules().min_cards;
    let count = deck.mainboard_count();
    if count >= min {
        return;
    }
    let mut deficit = min - count;
    deficit -= refill_nonlands(deck, pool, ledger, deficit);
    if deficit > 0 {
        let colors = deck.colors();
        add_basics(deck, deficit, colors);
    }
    warnings.push(format!("padded deck from {count} to {min} cards"));
}

/// Cap cumulative copies per normalized name at the format limit, counting the
/// commander, then refill the freed slots.
fn clamp_copy_limits(
    deck: &mut Deck,
    pool: &[Card],
    ledger: &AvailabilityLedger,
    warnings: &mut Vec<String>,
) {
    let max = deck.format.rules().max_copies;
    let mut counts: HashMap<String, u32> = HashMap::new();
    if let Some(commander) = deck.commander() {
        counts.insert(normalize_name(&commander.card.name), commander.quantity);
    }
    let snapshot: Vec<(CardId, String, u32)> = deck
        .mainboard()
        .filter(|e| !e.is_commander && !e.card.is_basic_land())
        .map(|e| (e.card.id, normalize_name(&e.card.name), e.quantity))
        .collect();
    let mut freed = 0u32;
    for (id, name, qty) in snapshot {
        let used = counts.entry(name.clone()).or_insert(0);
        let allowed = max.saturating_sub(*used);
        if qty > allowed {
            deck.remove_card(id, qty - allowed, false);
            freed += qty - allowed;
            warnings.push(format!("{name}: trimmed to the {max}-copy limit"));
        }
        *used += qty.min(allowed);
    }
    if freed > 0 {
        let refilled = refill_nonlands(deck, pool, ledger, freed);
        if refilled < freed {
            let colors = deck.colors();
            add_basics(deck, freed - refilled, colors);
        }
    }
}

fn remove_commander_duplicates(deck: &mut Deck, warnings: &mut Vec<String>) {
    let Some(commander) = deck.commander().cloned() else {
        return;
    };
    let id = commander.card.id;
    let name = normalize_name(&commander.card.name);
    let mut removed = 0u32;
    deck.entries.retain(|e| {
        let duplicate = !e.is_commander
            && !e.in_sideboard
            && (e.card.id == id || normalize_name(&e.card.name) == name);
        if duplicate {
            removed += e.quantity;
        }
        !duplicate
    });
    if removed > 0 {
        let colors = deck.colors();
        add_basics(deck, removed, colors);
        warnings.push(format!("removed {removed} duplicate copies of the commander"));
    }
}

/// Bring the non-commander body to exactly `body` cards, padding with basics
/// or trimming basics first and trailing entries after.
fn settle_exact_size(deck: &mut Deck, body: u32, warnings: &mut Vec<String>) {
    let count = deck.body_count();
    if count < body {
        let colors = deck.colors();
        add_basics(deck, body - count, colors);
        warnings.push(format!("padded with {} basic lands to reach the required size", body - count));
    } else if count > body {
        let mut excess = count - body;
        excess -= trim_basics(deck, excess, 0);
        while excess > 0 {
            let Some((id, qty)) = deck
                .entries
                .iter()
                .rev()
                .find(|e| !e.in_sideboard && !e.is_commander)
                .map(|e| (e.card.id, e.quantity))
            else {
                break;
            };
            let take = qty.min(excess);
            deck.remove_card(id, take, false);
            excess -= take;
        }
        warnings.push(format!("trimmed {} cards above the required size", count - body));
    }
}

/// Trim basics largest-entry-first, never below `floor` copies per entry.
fn trim_basics(deck: &mut Deck, want: u32, floor: u32) -> u32 {
    let mut trimmed = 0u32;
    while trimmed < want {
        let Some((id, qty)) = deck
            .mainboard()
            .filter(|e| e.card.is_basic_land() && !e.is_commander && e.quantity > floor)
            .max_by_key(|e| e.quantity)
            .map(|e| (e.card.id, e.quantity))
        else {
            break;
        };
        let take = (qty - floor).min(want - trimmed);
        deck.remove_card(id, take, false);
        trimmed += take;
    }
    trimmed
}

/// Add unused nonland pool cards one copy each, in pool order. Skips cards
/// already in the deck by id or by normalized name, so a refill cannot
/// reintroduce another printing of a name that was just trimmed.
pub(crate) fn refill_nonlands(
    deck: &mut Deck,
    pool: &[Card],
    ledger: &AvailabilityLedger,
    want: u32,
) -> u32 {
    if want == 0 {
        return 0;
    }
    let present: HashSet<CardId> = deck.entries.iter().map(|e| e.card.id).collect();
    let mut names: HashSet<String> = deck
        .entries
        .iter()
        .filter(|e| !e.card.is_basic_land())
        .map(|e| normalize_name(&e.card.name))
        .collect();
    let mut added = 0u32;
    for card in pool {
        if added >= want {
            break;
        }
        if card.is_land() || present.contains(&card.id) || ledger.remaining(card) < 1 {
            continue;
        }
        if !names.insert(normalize_name(&card.name)) {
            continue;
        }
        deck.add_card(card.clone(), 1, false, false);
        added += 1;
    }
    added
}

/// Add `count` basic lands split across the deck's pip colors by largest
/// remainder; `fallback` colors cover an empty deck, Wastes a colorless one.
pub(crate) fn add_basics(deck: &mut Deck, count: u32, fallback: ColorSet) {
    if count == 0 {
        return;
    }
    let mut weights: Vec<(Color, u32)> = Vec::new();
    for entry in deck.mainboard() {
        if entry.card.is_land() {
            continue;
        }
        for color in entry.card.color_identity.iter() {
            match weights.iter_mut().find(|(c, _)| *c == color) {
                Some((_, w)) => *w += entry.quantity,
                None => weights.push((color, entry.quantity)),
            }
        }
    }
    if weights.is_empty() {
        for color in fallback.iter() {
            weights.push((color, 1));
        }
    }
    let total: u32 = weights.iter().map(|(_, w)| *w).sum();
    if total == 0 {
        deck.add_card(BasicLand::Wastes.card(), count, false, false);
        return;
    }
    let mut shares: Vec<(BasicLand, u32, f64)> = weights
        .iter()
        .map(|(color, w)| {
            let exact = count as f64 * *w as f64 / total as f64;
            (BasicLand::for_color(*color), exact.floor() as u32, exact.fract())
        })
        .collect();
    let mut rest = count - shares.iter().map(|s| s.1).sum::<u32>();
    shares.sort_by(|a, b| {
        b.2.partial_cmp(&a.2)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.0.name().cmp(b.0.name()))
    });
    for share in shares.iter_mut() {
        if rest == 0 {
            break;
        }
        share.1 += 1;
        rest -= 1;
    }
    for (land, n, _) in shares {
        if n > 0 {
            deck.add_card(land.card(), n, false, false);
        }
    }
}
