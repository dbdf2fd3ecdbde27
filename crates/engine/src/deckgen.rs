//! Genetic search over deck candidates, anchored by an optional commander.

use crate::ga::{sort_scored, tournament};
use crate::postprocess::{add_basics, finalize};
use crate::{
    commander_candidates, deck_fitness, filter_by_colors, DeckGeneration, EngineError, EngineEvent,
    EventBus, GaParams, GenerationSummary, LandProfile,
};
use deckforge_core::{
    analyze_deck, Archetype, ArchetypeTemplate, AvailabilityLedger, Card, CardId, ColorSet, Deck,
    DeckEntry, Format, RngState,
};
use std::collections::HashSet;
use std::time::Instant;

/// Everything the engine needs to build one deck.
#[derive(Debug, Clone)]
pub struct DeckRequest {
    pub name: String,
    pub archetype: Archetype,
    pub format: Format,
    /// Requested color identity; an empty set means no restriction.
    pub colors: ColorSet,
    /// Mainboard size for non-commander formats; defaults to the format minimum.
    pub deck_size: Option<u32>,
    pub commander: Option<Card>,
    pub auto_select_commander: bool,
    pub params: GaParams,
    pub lands: LandProfile,
}

impl DeckRequest {
    pub fn new(name: impl Into<String>, archetype: Archetype, format: Format) -> Self {
        Self {
            name: name.into(),
            archetype,
            format,
            colors: ColorSet::COLORLESS,
            deck_size: None,
            commander: None,
            auto_select_commander: true,
            params: GaParams::deck_defaults(),
            lands: LandProfile::default(),
        }
    }
}

pub fn generate_deck(
    collection: &[Card],
    ledger: &AvailabilityLedger,
    request: &DeckRequest,
) -> Result<DeckGeneration, EngineError> {
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

    let commander = resolve_commander(collection, request, &mut rng, &mut bus)?;
    let colors = match &commander {
        Some(card) => card.color_identity,
        None => request.colors,
    };

    let pool = filter_by_colors(collection, colors);
    bus.push(EngineEvent::PoolFiltered {
        filter: format!("{colors} color"),
        kept: pool.len(),
        dropped: collection.len() - pool.len(),
    });
    if pool.is_empty() {
        return Err(EngineError::EmptyPool {
            filter: format!("{colors} color"),
        });
    }

    let body = body_target(request);
    let template = request.archetype.template();

    let mut scored: Vec<(Deck, f64)> = (0..params.population)
        .map(|_| {
            let deck = seed_deck(&pool, commander.as_ref(), request, &template, body, &mut rng);
            let fitness = deck_fitness(&deck, request.archetype);
            (deck, fitness)
        })
        .collect();
    sort_scored(&mut scored);

    let mut best_fitness = scored[0].1;
    let mut stagnant = 0u32;
    let mut generations_run = 0u32;
    let mut converged_at = None;

    for generation in 1..=params.generations {
        generations_run = generation;
        let mut next: Vec<(Deck, f64)> = scored.iter().take(params.elite).cloned().collect();
        while next.len() < params.population {
            let a = tournament(&scored, params.tournament_k, &mut rng);
            let b = tournament(&scored, params.tournament_k, &mut rng);
            let mut child = crossover(a, b, request, body, &mut rng);
            if rng.chance(params.mutation_rate) {
                mutate(&mut child, &pool, request, &mut rng);
            }
            let fitness = deck_fitness(&child, request.archetype);
            next.push((child, fitness));
        }
        scored = next;
        sort_scored(&mut scored);

        if scored[0].1 > best_fitness {
            best_fitness = scored[0].1;
            stagnant = 0;
            bus.push(EngineEvent::GenerationImproved {
                generation,
                fitness: best_fitness,
            });
        } else {
            stagnant += 1;
            if let Some(window) = params.stagnation_window {
                if stagnant >= window {
                    converged_at = Some(generation);
                    bus.push(EngineEvent::Converged { generation });
                    break;
                }
            }
        }
    }

    let mut deck = scored.swap_remove(0).0;
    let warnings = finalize(&mut deck, &pool, ledger, &request.lands, &mut bus);
    let fitness = deck_fitness(&deck, request.archetype);
    let analysis = analyze_deck(&deck);
    Ok(DeckGeneration {
        deck,
        analysis,
        fitness,
        warnings,
        events: bus.drain(),
        summary: GenerationSummary {
            seed: params.seed,
            generations_run,
            converged_at,
            best_fitness: fitness,
            wall_time_ms: start.elapsed().as_millis() as u64,
        },
    })
}

fn resolve_commander(
    collection: &[Card],
    request: &DeckRequest,
    rng: &mut RngState,
    bus: &mut EventBus,
) -> Result<Option<Card>, EngineError> {
    if !request.format.is_commander_family() {
        return Ok(None);
    }
    if let Some(card) = &request.commander {
        return Ok(Some(card.clone()));
    }
    if !request.auto_select_commander {
        return Err(EngineError::NoSuitableCommander);
    }
    let candidates = commander_candidates(collection, request.colors);
    let Some(card) = rng.pick(&candidates) else {
        return Err(EngineError::NoSuitableCommander);
    };
    bus.push(EngineEvent::CommanderSelected {
        name: card.name.clone(),
    });
    Ok(Some(card.clone()))
}

fn body_target(request: &DeckRequest) -> u32 {
    if request.format.is_commander_family() {
        request.format.commander_body_size()
    } else {
        request.deck_size.unwrap_or(request.format.rules().min_cards)
    }
}

/// Random individual: commander anchor, greedy shuffled fill toward the
/// template's land and spell targets, basics padding the gap.
fn seed_deck(
    pool: &[Card],
    commander: Option<&Card>,
    request: &DeckRequest,
    template: &ArchetypeTemplate,
    body: u32,
    rng: &mut RngState,
) -> Deck {
    let singleton = request.format.is_commander_family();
    let max_copies = request.format.rules().max_copies;
    let mut deck = Deck::new(request.name.clone(), request.format);
    let colors = match commander {
        Some(card) => card.color_identity,
        None => request.colors,
    };
    if let Some(card) = commander {
        deck.add_card(card.clone(), 1, true, false);
    }

    let land_target = if singleton {
        request.lands.scaled(body).target
    } else {
        template.lands_for_size(body)
    };
    let spell_target = body.saturating_sub(land_target);

    let mut spells: Vec<&Card> = pool.iter().filter(|c| !c.is_land()).collect();
    if let Some(card) = commander {
        spells.retain(|c| c.id != card.id);
    }
    rng.shuffle(&mut spells);
    let mut added = 0u32;
    for card in &spells {
        if added >= spell_target {
            break;
        }
        let qty = if singleton {
            1
        } else {
            rng.range(1, max_copies.min(spell_target - added))
        };
        deck.add_card((*card).clone(), qty, false, false);
        added += qty;
    }

    let mut lands: Vec<&Card> = pool
        .iter()
        .filter(|c| c.is_land() && !c.is_basic_land())
        .collect();
    rng.shuffle(&mut lands);
    let mut land_added = 0u32;
    for card in &lands {
        if land_added >= land_target {
            break;
        }
        let qty = if singleton {
            1
        } else {
            rng.range(1, max_copies.min(land_target - land_added))
        };
        deck.add_card((*card).clone(), qty, false, false);
        land_added += qty;
    }
    add_basics(&mut deck, land_target - land_added, colors);

    let deficit = body.saturating_sub(deck.body_count());
    add_basics(&mut deck, deficit, colors);
    deck
}

/// Child inherits parent A's commander and a shuffled blend of both bodies.
fn crossover(a: &Deck, b: &Deck, request: &DeckRequest, body: u32, rng: &mut RngState) -> Deck {
    let singleton = request.format.is_commander_family();
    let mut child = Deck::new(request.name.clone(), request.format);
    let mut seen: HashSet<CardId> = HashSet::new();
    if let Some(commander) = a.commander() {
        seen.insert(commander.card.id);
        child.add_card(commander.card.clone(), 1, true, false);
    }

    let mut entries: Vec<&DeckEntry> = a
        .mainboard()
        .chain(b.mainboard())
        .filter(|e| !e.is_commander)
        .collect();
    rng.shuffle(&mut entries);
    for entry in entries {
        let filled = child.body_count();
        if filled >= body {
            break;
        }
        if !entry.card.is_basic_land() && singleton && !seen.insert(entry.card.id) {
            continue;
        }
        let qty = entry.quantity.min(body - filled);
        child.add_card(entry.card.clone(), qty, false, false);
    }

    let deficit = body.saturating_sub(child.body_count());
    let colors = child.colors();
    add_basics(&mut child, deficit, colors);
    child
}

/// Replace one to three non-commander entries with unused pool cards.
fn mutate(deck: &mut Deck, pool: &[Card], request: &DeckRequest, rng: &mut RngState) {
    let singleton = request.format.is_commander_family();
    let max_copies = request.format.rules().max_copies;
    let swaps = rng.range(1, 3);
    for _ in 0..swaps {
        let victims: Vec<(CardId, u32)> = deck
            .mainboard()
            .filter(|e| !e.is_commander)
            .map(|e| (e.card.id, e.quantity))
            .collect();
        if victims.is_empty() {
            break;
        }
        let (victim, qty) = victims[rng.index(victims.len())];
        deck.remove_card(victim, qty, false);

        let present: HashSet<CardId> = deck.entries.iter().map(|e| e.card.id).collect();
        let replacements: Vec<&Card> = pool.iter().filter(|c| !present.contains(&c.id)).collect();
        let Some(card) = replacements.get(rng.index(replacements.len())).copied() else {
            let colors = deck.colors();
            add_basics(deck, qty, colors);
            continue;
        };
        let replaced = if singleton { 1 } else { qty.min(max_copies) };
        deck.add_card(card.clone(), replaced, false, false);
        if replaced < qty {
            // keep the body size stable when the victim was a tall stack
            let colors = deck.colors();
            add_basics(deck, qty - replaced, colors);
        }
    }
}
