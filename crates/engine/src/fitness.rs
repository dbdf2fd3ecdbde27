//! Fitness scoring for candidate decks and cubes. Every term is floored at
//! zero so no single deviation can sink an otherwise reasonable candidate.

use deckforge_core::{analyze_deck, card_supports_theme, Archetype, Cube, CubeTemplate, Deck, Rarity};

pub fn deck_fitness(deck: &Deck, archetype: Archetype) -> f64 {
    let analysis = analyze_deck(deck);
    let template = archetype.template();
    let mut score = 0.0;

    for (bucket, ideal) in template.curve.iter().enumerate() {
        let actual = analysis.mana_curve[bucket] as f64;
        score += (10.0 - (actual - *ideal as f64).abs()).max(0.0) * 2.0;
    }

    let nonlands: u32 = analysis.mana_curve.iter().sum();
    let creatures = analysis.card_types.get("creature").copied().unwrap_or(0);
    score += creature_ratio_score(creatures, nonlands, template.creatures);

    if let Some(strongest) = analysis.themes.values().max() {
        score += (*strongest as f64 * 2.0).min(30.0);
    }

    let removal = analysis.removal.total() as f64;
    score += match archetype {
        Archetype::Control => (removal * 2.0).min(30.0),
        Archetype::Aggro => removal.min(15.0),
        _ => (removal * 1.5).min(20.0),
    };

    score += (analysis.card_draw.count as f64 * 2.0).min(15.0);

    // Tight mana bases are rewarded; four and five colors get nothing.
    score += match analysis.colors.len() {
        0..=2 => 10.0,
        3 => 5.0,
        _ => 0.0,
    };

    score
}

/// Creature density is measured against the nonland body; the archetype
/// targets are fractions of nonland cards, not of the whole mainboard.
fn creature_ratio_score(creatures: u32, nonlands: u32, target: f64) -> f64 {
    if nonlands == 0 {
        return 0.0;
    }
    let ratio = creatures as f64 / nonlands as f64;
    (20.0 - (ratio - target).abs() * 100.0).max(0.0)
}

fn rarity_weight(rarity: Rarity) -> f64 {
    match rarity {
        Rarity::Common => 0.2,
        Rarity::Uncommon => 0.4,
        Rarity::Rare => 0.7,
        Rarity::Mythic => 0.9,
    }
}

pub fn cube_fitness(cube: &Cube, template: &CubeTemplate) -> f64 {
    let total = cube.total_cards();
    if total == 0 {
        return 0.0;
    }
    let total = total as f64;
    let mut score = 0.0;

    let size_dev = (total - template.size as f64).abs() / template.size as f64;
    score += (50.0 - size_dev * 100.0).max(0.0);

    let distribution = cube.color_distribution();
    for (color, ratio) in &template.color_ratios {
        let actual = distribution.get(color).copied().unwrap_or(0) as f64 / total;
        score += (20.0 - (actual - ratio).abs() * 200.0).max(0.0);
    }

    for (kind, ratio) in &template.type_ratios {
        let count: u32 = cube
            .entries
            .iter()
            .filter(|e| e.card.has_type(*kind))
            .map(|e| e.quantity)
            .sum();
        score += (15.0 - (count as f64 / total - ratio).abs() * 150.0).max(0.0);
    }

    // Curve targets are counts derived from the ratio histogram, so the term
    // stays meaningful at any cube size.
    let curve = cube.mana_curve();
    let nonland: u32 = curve.iter().sum();
    if nonland > 0 {
        for (bucket, ratio) in template.curve_ratios.iter().enumerate() {
            let target = ratio * nonland as f64;
            score += (10.0 - (curve[bucket] as f64 - target).abs() * 0.1).max(0.0);
        }
    }

    for theme in &template.themes {
        let support: u32 = cube
            .entries
            .iter()
            .filter(|e| card_supports_theme(&e.card, theme))
            .map(|e| e.quantity)
            .sum();
        let ratio = support as f64 / total;
        if ratio > 0.10 {
            score += (ratio * 100.0).min(20.0);
        }
    }

    let mut weighted = 0.0;
    let mut counted = 0.0;
    for entry in &cube.entries {
        if let Some(rarity) = entry.card.rarity {
            weighted += rarity_weight(rarity) * entry.quantity as f64;
            counted += entry.quantity as f64;
        }
    }
    if counted > 0.0 {
        let power = weighted / counted;
        score += (20.0 - (power - template.power_level.target()).abs() * 50.0).max(0.0);
    }

    score
}
