//! Genetic search over cube candidates against a style template.

use crate::ga::{sort_scored, tournament};
use crate::{
    cube_fitness, filter_available, filter_peasant, CubeGeneration, EngineError, EngineEvent,
    EventBus, GaParams, GenerationSummary,
};
use deckforge_core::{
    AvailabilityLedger, BasicLand, Card, CardId, Color, Cube, CubeEntry, CubeOverrides, CubeStyle,
    CubeTemplate, RngState,
};
use std::collections::HashSet;
use std::time::Instant;

#[derive(Debug, Clone)]
pub struct CubeRequest {
    pub name: String,
    pub style: CubeStyle,
    pub overrides: CubeOverrides,
    pub is_singleton: bool,
    pub is_peasant: bool,
    pub params: GaParams,
}

impl CubeRequest {
    pub fn new(name: impl Into<String>, style: CubeStyle) -> Self {
        Self {
            name: name.into(),
            style,
            overrides: CubeOverrides::default(),
            is_singleton: true,
            is_peasant: matches!(style, CubeStyle::PauperCube),
            params: GaParams::cube_defaults(),
        }
    }
}

pub fn generate_cube(
    collection: &[Card],
    ledger: &AvailabilityLedger,
    request: &CubeRequest,
) -> Result<CubeGeneration, EngineError> {
    let start = Instant::now();
    if collection.is_empty() {
        return Err(EngineError::EmptyCollection);
    }
    let params = request.params;
    if params.population == 0 {
        return Err(EngineError::EmptyPopulation);
    }
    let mut bus = EventBus::default();
    let mut rng = RngState::from_seed(params.seed);
    let template = request.style.template().apply(&request.overrides);

    // Cubes draw from physical copies only, so availability filters up front.
    let mut pool = filter_available(collection, ledger);
    let mut filter = "availability".to_string();
    if request.is_peasant {
        pool = filter_peasant(&pool);
        filter = "availability and peasant".to_string();
    }
    bus.push(EngineEvent::PoolFiltered {
        filter: filter.clone(),
        kept: pool.len(),
        dropped: collection.len() - pool.len(),
    });
    if pool.is_empty() {
        return Err(EngineError::EmptyPool { filter });
    }

    let mut scored: Vec<(Cube, f64)> = (0..params.population)
        .map(|_| {
            let cube = seed_cube(&pool, &template, request, &mut rng);
            let fitness = cube_fitness(&cube, &template);
            (cube, fitness)
        })
        .collect();
    sort_scored(&mut scored);

    let mut best_fitness = scored[0].1;
    let mut generations_run = 0u32;
    for generation in 1..=params.generations {
        generations_run = generation;
        let mut next: Vec<(Cube, f64)> = scored.iter().take(params.elite).cloned().collect();
        while next.len() < params.population {
            let a = tournament(&scored, params.tournament_k, &mut rng);
            let b = tournament(&scored, params.tournament_k, &mut rng);
            let mut child = crossover(a, b, &template, request, &mut rng);
            if rng.chance(params.mutation_rate) {
                mutate(&mut child, &pool, &mut rng);
            }
            let fitness = cube_fitness(&child, &template);
            next.push((child, fitness));
        }
        scored = next;
        sort_scored(&mut scored);
        if scored[0].1 > best_fitness {
            best_fitness = scored[0].1;
            bus.push(EngineEvent::GenerationImproved {
                generation,
                fitness: best_fitness,
            });
        }
    }

    let mut cube = scored.swap_remove(0).0;
    let warnings = finalize_cube(&mut cube, &pool, ledger, &template, &mut bus);
    let fitness = cube_fitness(&cube, &template);
    Ok(CubeGeneration {
        cube,
        fitness,
        warnings,
        events: bus.drain(),
        summary: GenerationSummary {
            seed: params.seed,
            generations_run,
            converged_at: None,
            best_fitness: fitness,
            wall_time_ms: start.elapsed().as_millis() as u64,
        },
    })
}

fn shell(request: &CubeRequest, template: &CubeTemplate) -> Cube {
    let mut cube = Cube::new(request.name.clone(), template.size);
    cube.themes = template.themes.clone();
    cube.power_level = template.power_level;
    cube.complexity = template.complexity;
    cube.is_singleton = request.is_singleton;
    cube.is_peasant = request.is_peasant;
    cube
}

/// Random individual: fill each primary-type bucket toward its ratio target,
/// then top up from the whole pool.
fn seed_cube(
    pool: &[Card],
    template: &CubeTemplate,
    request: &CubeRequest,
    rng: &mut RngState,
) -> Cube {
    let mut cube = shell(request, template);
    let size = template.size;
    for (kind, ratio) in &template.type_ratios {
        let target = (ratio * size as f64).round() as u32;
        let mut bucket: Vec<&Card> = pool.iter().filter(|c| c.has_type(*kind)).collect();
        rng.shuffle(&mut bucket);
        let mut added = 0u32;
        for card in bucket {
            if added >= target || cube.total_cards() >= size {
                break;
            }
            if cube.add_card(card.clone(), 1, None) {
                added += 1;
            }
        }
    }
    let mut rest: Vec<&Card> = pool.iter().collect();
    rng.shuffle(&mut rest);
    for card in rest {
        if cube.total_cards() >= size {
            break;
        }
        cube.add_card(card.clone(), 1, None);
    }
    cube
}

fn crossover(
    a: &Cube,
    b: &Cube,
    template: &CubeTemplate,
    request: &CubeRequest,
    rng: &mut RngState,
) -> Cube {
    let mut child = shell(request, template);
    let mut entries: Vec<&CubeEntry> = a.entries.iter().chain(b.entries.iter()).collect();
    rng.shuffle(&mut entries);
    for entry in entries {
        let total = child.total_cards();
        if total >= template.size {
            break;
        }
        let qty = entry.quantity.min(template.size - total);
        child.add_card(entry.card.clone(), qty, entry.notes.clone());
    }
    child
}

/// Swap five to ten random slots against unused pool cards.
fn mutate(cube: &mut Cube, pool: &[Card], rng: &mut RngState) {
    let swaps = rng.range(5, 10);
    for _ in 0..swaps {
        if cube.entries.is_empty() {
            break;
        }
        let idx = rng.index(cube.entries.len());
        let id = cube.entries[idx].card.id;
        cube.remove_card(id, 1);

        let present: HashSet<CardId> = cube.entries.iter().map(|e| e.card.id).collect();
        let replacements: Vec<&Card> = pool.iter().filter(|c| !present.contains(&c.id)).collect();
        if let Some(card) = replacements.get(rng.index(replacements.len())).copied() {
            cube.add_card(card.clone(), 1, None);
        }
    }
}

/// Post passes: availability clamp, then adjust to the exact requested size
/// from the unused pool, padding with basics once the pool runs dry.
fn finalize_cube(
    cube: &mut Cube,
    pool: &[Card],
    ledger: &AvailabilityLedger,
    template: &CubeTemplate,
    bus: &mut EventBus,
) -> Vec<String> {
    let mut warnings = Vec::new();

    let over: Vec<(CardId, String, u32, u32)> = cube
        .entries
        .iter()
        .filter(|e| !e.card.is_basic_land())
        .filter_map(|e| {
            let have = ledger.remaining(&e.card).max(0).min(u32::MAX as i64) as u32;
            (e.quantity > have).then(|| (e.card.id, e.card.name.clone(), e.quantity, have))
        })
        .collect();
    for (id, name, qty, have) in over {
        cube.remove_card(id, qty - have);
        warnings.push(format!("{name}: only {have} of {qty} copies available"));
    }

    let size = template.size;
    let before = cube.total_cards();
    if before < size {
        let present: HashSet<CardId> = cube.entries.iter().map(|e| e.card.id).collect();
        for card in pool {
            if cube.total_cards() >= size {
                break;
            }
            if present.contains(&card.id) {
                continue;
            }
            cube.add_card(card.clone(), 1, None);
        }
        // collection exhausted; spread basics evenly
        let mut color_index = 0usize;
        while cube.total_cards() < size {
            let land = BasicLand::for_color(Color::ALL[color_index % Color::ALL.len()]);
            cube.add_card(land.card(), 1, None);
            color_index += 1;
        }
        if cube.total_cards() > before {
            warnings.push(format!("padded cube from {before} to {} cards", cube.total_cards()));
        }
    } else if before > size {
        let mut excess = before - size;
        while excess > 0 {
            let Some((id, qty)) = cube.entries.last().map(|e| (e.card.id, e.quantity)) else {
                break;
            };
            let take = qty.min(excess);
            cube.remove_card(id, take);
            excess -= take;
        }
        warnings.push(format!("trimmed cube from {before} to {} cards", cube.total_cards()));
    }

    if cube.total_cards() != before {
        bus.push(EngineEvent::PassAdjusted {
            pass: "cube_size".to_string(),
            detail: format!("adjusted from {before} to {} cards", cube.total_cards()),
        });
    }
    warnings.extend(cube.validate().warnings);
    warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use deckforge_core::{CardType, ColorSet, Rarity};

    fn pool_card(id: i64, kind: CardType, rarity: Rarity, color: &str, cmc: f64) -> Card {
        let mut card = BasicLand::Plains.card();
        card.id = CardId(id);
        card.name = format!("Pool Card {id}");
        card.type_line = format!("{} — Test", kind.label());
        card.card_types = vec![kind];
        card.color_identity = ColorSet::from_codes(color);
        card.rarity = Some(rarity);
        card.cmc = cmc;
        card.quantity = 1;
        card
    }

    fn wide_collection(n: i64) -> Vec<Card> {
        let kinds = [
            CardType::Creature,
            CardType::Instant,
            CardType::Sorcery,
            CardType::Enchantment,
            CardType::Artifact,
        ];
        let rarities = [Rarity::Common, Rarity::Uncommon, Rarity::Rare, Rarity::Mythic];
        let colors = ["W", "U", "B", "R", "G"];
        (0..n)
            .map(|i| {
                pool_card(
                    i,
                    kinds[(i % kinds.len() as i64) as usize],
                    rarities[(i % rarities.len() as i64) as usize],
                    colors[(i % colors.len() as i64) as usize],
                    (i % 7) as f64,
                )
            })
            .collect()
    }

    fn full_ledger(collection: &[Card]) -> AvailabilityLedger {
        AvailabilityLedger::from_counts(collection.iter().map(|c| (c.id, c.quantity as i64)))
    }

    #[test]
    fn small_run_hits_the_requested_size() {
        let collection = wide_collection(240);
        let ledger = full_ledger(&collection);
        let mut request = CubeRequest::new("test cube", CubeStyle::LegacyCube);
        request.overrides.size = Some(180);
        request.params = GaParams {
            population: 6,
            generations: 3,
            ..GaParams::cube_defaults()
        };
        let result = generate_cube(&collection, &ledger, &request).unwrap();
        assert_eq!(result.cube.total_cards(), 180);
        assert!(result.cube.validate().errors.is_empty());
    }

    #[test]
    fn undersized_pool_pads_with_basics() {
        let collection = wide_collection(60);
        let ledger = full_ledger(&collection);
        let mut request = CubeRequest::new("small pool", CubeStyle::LegacyCube);
        request.overrides.size = Some(180);
        request.params = GaParams {
            population: 4,
            generations: 2,
            ..GaParams::cube_defaults()
        };
        let result = generate_cube(&collection, &ledger, &request).unwrap();
        assert_eq!(result.cube.total_cards(), 180);
        assert!(result.cube.entries.iter().any(|e| e.is_basic_land));
    }

    #[test]
    fn peasant_cube_carries_no_rares() {
        let collection = wide_collection(240);
        let ledger = full_ledger(&collection);
        let mut request = CubeRequest::new("pauper", CubeStyle::PauperCube);
        request.overrides.size = Some(180);
        request.params = GaParams {
            population: 4,
            generations: 2,
            ..GaParams::cube_defaults()
        };
        let result = generate_cube(&collection, &ledger, &request).unwrap();
        for entry in &result.cube.entries {
            if !entry.is_basic_land {
                assert!(entry.card.rarity.map_or(false, |r| r.is_peasant()));
            }
        }
    }
}
