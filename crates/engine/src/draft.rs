//! Draft simulation over a finished cube: seeded pack creation, strategy
//! driven picks, and a quick forty-card build for every seat.
//!
//! Pure in-memory simulation; the caller brings a cube and gets decks and a
//! pick log back. Rotisserie picks run through an [`AvailabilityLedger`] so
//! two seats can never claim more copies of a card than the cube holds.

use crate::{EngineError, EngineEvent, EventBus};
use deckforge_core::{
    AvailabilityLedger, BasicLand, Card, CardId, Color, ColorSet, Cube, Deck, Format, Rarity,
    RngState,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Spell count of a drafted forty-card deck; the rest is basic lands.
const DRAFT_DECK_SPELLS: usize = 23;
const DRAFT_DECK_LANDS: u32 = 17;
/// Rotisserie seats stop picking once their pool is this deep.
const ROTISSERIE_PICK_LIMIT: usize = 45;
const GRID_CELLS: usize = 9;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum DraftMode {
    Winston,
    Grid,
    Rotisserie,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum DraftStrategy {
    Aggro,
    Control,
    Combo,
    Balanced,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DraftSeatRequest {
    pub name: String,
    pub strategy: DraftStrategy,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DraftRequest {
    pub mode: DraftMode,
    pub seats: Vec<DraftSeatRequest>,
    pub cards_per_pack: usize,
    pub packs_per_seat: usize,
    pub seed: u64,
}

impl DraftRequest {
    pub fn new(mode: DraftMode) -> Self {
        Self {
            mode,
            seats: Vec::new(),
            cards_per_pack: 15,
            packs_per_seat: 3,
            seed: 0xD12AF7,
        }
    }

    pub fn seat(mut self, name: impl Into<String>, strategy: DraftStrategy) -> Self {
        self.seats.push(DraftSeatRequest {
            name: name.into(),
            strategy,
        });
        self
    }
}

/// One seat's outcome: the raw pick pool plus a built forty-card deck.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DraftSeat {
    pub name: String,
    pub strategy: DraftStrategy,
    pub colors: ColorSet,
    pub picks: Vec<Card>,
    pub deck: Deck,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DraftSimulation {
    pub mode: DraftMode,
    pub seats: Vec<DraftSeat>,
    pub events: Vec<EngineEvent>,
    pub log: Vec<String>,
}

struct SeatState {
    name: String,
    strategy: DraftStrategy,
    picks: Vec<Card>,
}

pub fn simulate_draft(cube: &Cube, request: &DraftRequest) -> Result<DraftSimulation, EngineError> {
    if request.seats.is_empty() {
        return Err(EngineError::NoDraftSeats);
    }
    if request.mode == DraftMode::Grid && request.seats.len() != 2 {
        return Err(EngineError::GridSeats {
            seats: request.seats.len(),
        });
    }

    let mut rng = RngState::from_seed(request.seed);
    let mut bus = EventBus::default();
    let mut log = Vec::new();

    // one element per physical copy; basics stay on the shelf
    let mut copies: Vec<Card> = cube
        .entries
        .iter()
        .filter(|e| !e.is_basic_land)
        .flat_map(|e| std::iter::repeat(e.card.clone()).take(e.quantity as usize))
        .collect();
    bus.push(EngineEvent::PoolFiltered {
        filter: "draftable".to_string(),
        kept: copies.len(),
        dropped: cube.total_cards() as usize - copies.len(),
    });

    let need = request.cards_per_pack * request.packs_per_seat * request.seats.len();
    if need == 0 || copies.len() < need {
        return Err(EngineError::DraftPoolTooSmall {
            need,
            have: copies.len(),
        });
    }
    rng.shuffle(&mut copies);
    copies.truncate(need);
    let packs: Vec<Vec<Card>> = copies
        .chunks(request.cards_per_pack)
        .map(|chunk| chunk.to_vec())
        .collect();
    log.push(format!(
        "opened {} packs of {} cards",
        packs.len(),
        request.cards_per_pack
    ));

    let mut seats: Vec<SeatState> = request
        .seats
        .iter()
        .map(|seat| SeatState {
            name: seat.name.clone(),
            strategy: seat.strategy,
            picks: Vec::new(),
        })
        .collect();

    match request.mode {
        DraftMode::Winston => winston(&mut seats, packs, &mut rng),
        DraftMode::Grid => grid(&mut seats, packs, &mut rng, &mut log),
        DraftMode::Rotisserie => rotisserie(&mut seats, packs, &mut log),
    }

    let seats: Vec<DraftSeat> = seats
        .into_iter()
        .map(|seat| seat.into_seat(&mut log))
        .collect();
    Ok(DraftSimulation {
        mode: request.mode,
        seats,
        events: bus.drain(),
        log,
    })
}

/// Simplified winston: packs split evenly across the seats, and each seat
/// keeps the cards from its share that fit its strategy.
fn winston(seats: &mut [SeatState], packs: Vec<Vec<Card>>, rng: &mut RngState) {
    let per_seat = packs.len() / seats.len();
    let mut packs = packs.into_iter();
    for seat in seats.iter_mut() {
        for mut pack in packs.by_ref().take(per_seat) {
            rng.shuffle(&mut pack);
            for card in pack {
                if fits_strategy(&card, seat.strategy) {
                    seat.picks.push(card);
                }
            }
        }
    }
}

/// Grid draft for two seats: nine-card grids dealt from the pooled packs, one
/// pick per seat per grid.
fn grid(seats: &mut [SeatState], packs: Vec<Vec<Card>>, rng: &mut RngState, log: &mut Vec<String>) {
    let mut board: Vec<Card> = packs.into_iter().flatten().collect();
    rng.shuffle(&mut board);
    let mut grids = 0usize;
    for grid in board.chunks(GRID_CELLS) {
        let mut remaining: Vec<&Card> = grid.iter().collect();
        for seat in seats.iter_mut() {
            let Some(position) = best_index(&remaining, seat.strategy) else {
                continue;
            };
            seat.picks.push((*remaining.remove(position)).clone());
        }
        grids += 1;
    }
    log.push(format!("dealt {grids} grids"));
}

/// Rotisserie: the whole pool is face up and seats pick in snake order. The
/// ledger arbitrates copies so a card picked by one seat cannot be picked
/// again once the cube's copies run out.
fn rotisserie(seats: &mut [SeatState], packs: Vec<Vec<Card>>, log: &mut Vec<String>) {
    let mut counts: HashMap<CardId, i64> = HashMap::new();
    let mut board: Vec<Card> = Vec::new();
    for card in packs.into_iter().flatten() {
        let count = counts.entry(card.id).or_insert(0);
        if *count == 0 {
            board.push(card);
        }
        *count += 1;
    }
    let mut ledger = AvailabilityLedger::from_counts(counts);
    board.sort_by(|a, b| power_weight(b).total_cmp(&power_weight(a)));

    let order: Vec<usize> = (0..seats.len()).chain((0..seats.len()).rev()).collect();
    let mut turn = 0usize;
    let mut stalled = 0usize;
    while stalled < order.len() {
        let seat = &mut seats[order[turn % order.len()]];
        turn += 1;
        if seat.picks.len() >= ROTISSERIE_PICK_LIMIT {
            stalled += 1;
            continue;
        }
        let choice = board
            .iter()
            .filter(|card| ledger.can_take(card, 1))
            .max_by(|a, b| {
                pick_score(a, seat.strategy).total_cmp(&pick_score(b, seat.strategy))
            })
            .cloned();
        match choice {
            Some(card) => {
                if ledger.take(&card, 1).is_ok() {
                    seat.picks.push(card);
                    stalled = 0;
                }
            }
            None => stalled += 1,
        }
    }
    log.push("rotisserie board exhausted".to_string());
}

fn best_index(cards: &[&Card], strategy: DraftStrategy) -> Option<usize> {
    cards
        .iter()
        .enumerate()
        .max_by(|(_, a), (_, b)| pick_score(a, strategy).total_cmp(&pick_score(b, strategy)))
        .map(|(index, _)| index)
}

impl SeatState {
    /// Build the seat's deck: best in-color spells up to the spell count, then
    /// seventeen basics split across the seat's two colors.
    fn into_seat(self, log: &mut Vec<String>) -> DraftSeat {
        let colors = top_two_colors(&self.picks);
        let mut spells: Vec<&Card> = self
            .picks
            .iter()
            .filter(|c| c.color_identity.is_colorless() || c.color_identity.is_subset_of(colors))
            .collect();
        spells.sort_by(|a, b| power_weight(b).total_cmp(&power_weight(a)));
        let mut chosen: Vec<&Card> = spells.into_iter().take(DRAFT_DECK_SPELLS).collect();
        if chosen.len() < DRAFT_DECK_SPELLS {
            // splash the strongest off-color picks when the two colors run thin
            let mut rest: Vec<&Card> = self
                .picks
                .iter()
                .filter(|c| {
                    !(c.color_identity.is_colorless() || c.color_identity.is_subset_of(colors))
                })
                .collect();
            rest.sort_by(|a, b| power_weight(b).total_cmp(&power_weight(a)));
            let short = DRAFT_DECK_SPELLS - chosen.len();
            chosen.extend(rest.into_iter().take(short));
        }

        let mut deck = Deck::new(format!("{}'s draft deck", self.name), Format::Vintage);
        for card in chosen {
            deck.add_card((*card).clone(), 1, false, false);
        }
        add_draft_lands(&mut deck, colors);
        log.push(format!(
            "{}: {} picks, {} playable",
            self.name,
            self.picks.len(),
            deck.mainboard_count()
        ));
        DraftSeat {
            name: self.name,
            strategy: self.strategy,
            colors,
            picks: self.picks,
            deck,
        }
    }
}

/// The seat's two densest colors across its picks, in WUBRG order on ties.
fn top_two_colors(picks: &[Card]) -> ColorSet {
    let mut counts: Vec<(Color, usize)> = Color::ALL
        .iter()
        .map(|color| {
            let count = picks
                .iter()
                .filter(|c| c.color_identity.contains(*color))
                .count();
            (*color, count)
        })
        .filter(|(_, count)| *count > 0)
        .collect();
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    let top: Vec<Color> = counts.iter().take(2).map(|(color, _)| *color).collect();
    ColorSet::from_colors(&top)
}

fn add_draft_lands(deck: &mut Deck, colors: ColorSet) {
    let picked: Vec<Color> = colors.iter().collect();
    if picked.is_empty() {
        deck.add_card(BasicLand::Wastes.card(), DRAFT_DECK_LANDS, false, false);
        return;
    }
    let share = DRAFT_DECK_LANDS / picked.len() as u32;
    let mut extra = DRAFT_DECK_LANDS - share * picked.len() as u32;
    for color in picked {
        let mut quantity = share;
        if extra > 0 {
            quantity += 1;
            extra -= 1;
        }
        deck.add_card(BasicLand::for_color(color).card(), quantity, false, false);
    }
}

/// Rarity-weighted card power with a bonus for cheap cards.
fn power_weight(card: &Card) -> f64 {
    let base = match card.rarity {
        Some(Rarity::Common) => 2.0,
        Some(Rarity::Uncommon) => 4.0,
        Some(Rarity::Rare) => 6.0,
        Some(Rarity::Mythic) => 8.0,
        None => 1.0,
    };
    if card.cmc <= 2.0 {
        base + 1.0
    } else {
        base
    }
}

fn fits_strategy(card: &Card, strategy: DraftStrategy) -> bool {
    let text = card.oracle_text.to_ascii_lowercase();
    match strategy {
        DraftStrategy::Aggro => {
            card.cmc <= 3.0 && (card.is_creature() || text.contains("damage"))
        }
        DraftStrategy::Control => {
            (text.contains("counter") && text.contains("spell"))
                || text.contains("draw")
                || ["destroy", "exile", "return to hand"]
                    .iter()
                    .any(|word| text.contains(word))
        }
        DraftStrategy::Combo => {
            ["when", "whenever", "activate", "sacrifice"]
                .iter()
                .any(|word| text.contains(word))
                || (text.contains("add") && text.contains("mana"))
        }
        DraftStrategy::Balanced => true,
    }
}

fn pick_score(card: &Card, strategy: DraftStrategy) -> f64 {
    let mut score = power_weight(card);
    if fits_strategy(card, strategy) {
        score += 2.0;
    }
    score + (6.0 - card.cmc).max(0.0) * 0.5
}
