use deckforge_core::{
    validate, Archetype, AvailabilityLedger, BasicLand, Card, CardId, CardType, ColorSet, Deck,
    Format,
};
use deckforge_engine::{generate_deck, DeckRequest, GaParams};

fn card(id: i64, name: &str, type_line: &str, identity: &str, cmc: f64, text: &str) -> Card {
    let mut card = BasicLand::Plains.card();
    card.id = CardId(id);
    card.name = name.to_string();
    card.type_line = type_line.to_string();
    card.card_types = if type_line.contains("Creature") {
        vec![CardType::Creature]
    } else if type_line.contains("Land") {
        vec![CardType::Land]
    } else if type_line.contains("Instant") {
        vec![CardType::Instant]
    } else {
        vec![CardType::Sorcery]
    };
    card.color_identity = ColorSet::from_codes(identity);
    card.cmc = cmc;
    card.oracle_text = text.to_string();
    card.quantity = 4;
    card
}

/// A five-color collection with commanders, creatures, interaction, and card
/// draw in every color.
fn collection() -> Vec<Card> {
    let mut cards = Vec::new();
    let mut id = 0i64;
    for code in ["W", "U", "B", "R", "G"] {
        id += 1;
        let mut commander = card(
            id,
            &format!("General of {code}"),
            "Legendary Creature — Human Soldier",
            code,
            4.0,
            "Other creatures you control get +1/+1.",
        );
        commander.quantity = 1;
        cards.push(commander);
        for i in 0..24 {
            id += 1;
            cards.push(card(
                id,
                &format!("{code} Creature {i}"),
                "Creature — Human Soldier",
                code,
                1.0 + (i % 5) as f64,
                "Vigilance",
            ));
        }
        for i in 0..8 {
            id += 1;
            cards.push(card(
                id,
                &format!("{code} Removal {i}"),
                "Instant",
                code,
                (i % 3 + 1) as f64,
                "Destroy target creature.",
            ));
        }
        for i in 0..4 {
            id += 1;
            cards.push(card(
                id,
                &format!("{code} Draw {i}"),
                "Sorcery",
                code,
                (i % 2 + 2) as f64,
                "Draw two cards.",
            ));
        }
    }
    cards
}

fn full_ledger(collection: &[Card]) -> AvailabilityLedger {
    AvailabilityLedger::from_counts(collection.iter().map(|c| (c.id, c.quantity as i64)))
}

fn quick_params() -> GaParams {
    GaParams {
        population: 10,
        generations: 8,
        ..GaParams::deck_defaults()
    }
}

fn run(format: Format, archetype: Archetype, colors: &str) -> Deck {
    let collection = collection();
    let ledger = full_ledger(&collection);
    let mut request = DeckRequest::new("generated", archetype, format);
    request.colors = ColorSet::from_codes(colors);
    request.params = quick_params();
    generate_deck(&collection, &ledger, &request)
        .expect("generation should succeed")
        .deck
}

macro_rules! legal_run_case {
    ($name:ident, $format:expr, $archetype:expr, $colors:expr) => {
        #[test]
        fn $name() {
            let deck = run($format, $archetype, $colors);
            assert!(
                validate(&deck).is_empty(),
                "violations: {:?}",
                validate(&deck)
            );
        }
    };
}

legal_run_case!(standard_aggro_red_is_legal, Format::Standard, Archetype::Aggro, "R");
legal_run_case!(modern_control_azorius_is_legal, Format::Modern, Archetype::Control, "WU");
legal_run_case!(pauper_midrange_golgari_is_legal, Format::Pauper, Archetype::Midrange, "BG");
legal_run_case!(legacy_combo_grixis_is_legal, Format::Legacy, Archetype::Combo, "UBR");
legal_run_case!(commander_midrange_is_legal, Format::Commander, Archetype::Midrange, "R");
legal_run_case!(brawl_aggro_is_legal, Format::Brawl, Archetype::Aggro, "W");

#[test]
fn standard_deck_stays_inside_requested_colors() {
    let deck = run(Format::Standard, Archetype::Aggro, "R");
    assert_eq!(deck.mainboard_count(), 60);
    assert!(deck.colors().is_subset_of(ColorSet::from_codes("R")));
}

#[test]
fn commander_deck_is_singleton_with_contained_identity() {
    let collection = collection();
    let ledger = full_ledger(&collection);
    let mut request = DeckRequest::new("edh", Archetype::Midrange, Format::Commander);
    request.colors = ColorSet::from_codes("G");
    request.params = quick_params();
    let result = generate_deck(&collection, &ledger, &request).unwrap();
    let deck = &result.deck;

    assert_eq!(deck.mainboard_count(), 100);
    let commander = deck.commander().expect("commander assigned");
    assert_eq!(commander.quantity, 1);
    for entry in deck.mainboard() {
        if !entry.card.is_basic_land() {
            assert_eq!(entry.quantity, 1, "{} above one copy", entry.card.name);
            assert!(
                entry.card.color_identity.is_subset_of(commander.card.color_identity),
                "{} outside commander identity",
                entry.card.name
            );
        }
    }
}

#[test]
fn exhausted_availability_still_yields_a_legal_deck() {
    let collection = collection();
    // every copy already committed elsewhere
    let ledger = AvailabilityLedger::from_counts(collection.iter().map(|c| (c.id, 0)));
    let mut request = DeckRequest::new("broke", Archetype::Aggro, Format::Standard);
    request.colors = ColorSet::from_codes("R");
    request.params = quick_params();
    let result = generate_deck(&collection, &ledger, &request).unwrap();

    assert!(validate(&result.deck).is_empty());
    for entry in result.deck.mainboard() {
        assert!(entry.card.is_basic_land(), "{} should be unavailable", entry.card.name);
    }
    assert!(!result.warnings.is_empty());
}

#[test]
fn generated_deck_respects_partial_availability() {
    let collection = collection();
    let ledger = AvailabilityLedger::from_counts(collection.iter().map(|c| (c.id, 2)));
    let mut request = DeckRequest::new("thin", Archetype::Aggro, Format::Standard);
    request.colors = ColorSet::from_codes("R");
    request.params = quick_params();
    let result = generate_deck(&collection, &ledger, &request).unwrap();

    assert!(validate(&result.deck).is_empty());
    for entry in result.deck.mainboard() {
        if !entry.card.is_basic_land() {
            assert!(entry.quantity <= 2, "{} over availability", entry.card.name);
        }
    }
}

#[test]
fn post_processing_is_idempotent_under_validation() {
    let deck = run(Format::Commander, Archetype::Control, "U");
    assert!(validate(&deck).is_empty());
    // validation is a pure read; a second pass sees the same deck
    assert!(validate(&deck).is_empty());
}

#[test]
fn fixed_seed_reproduces_the_run() {
    let first = {
        let collection = collection();
        let ledger = full_ledger(&collection);
        let mut request = DeckRequest::new("seeded", Archetype::Midrange, Format::Commander);
        request.colors = ColorSet::from_codes("B");
        request.params = quick_params();
        generate_deck(&collection, &ledger, &request).unwrap()
    };
    let second = {
        let collection = collection();
        let ledger = full_ledger(&collection);
        let mut request = DeckRequest::new("seeded", Archetype::Midrange, Format::Commander);
        request.colors = ColorSet::from_codes("B");
        request.params = quick_params();
        generate_deck(&collection, &ledger, &request).unwrap()
    };

    assert_eq!(first.deck.mainboard_count(), second.deck.mainboard_count());
    assert_eq!(
        first.deck.commander().map(|e| e.card.name.clone()),
        second.deck.commander().map(|e| e.card.name.clone())
    );
    assert_eq!(first.fitness, second.fitness);
    assert_eq!(first.summary.generations_run, second.summary.generations_run);
}

#[test]
fn explicit_commander_anchors_the_deck() {
    let collection = collection();
    let ledger = full_ledger(&collection);
    let general = collection
        .iter()
        .find(|c| c.name == "General of R")
        .unwrap()
        .clone();
    let mut request = DeckRequest::new("anchored", Archetype::Aggro, Format::Commander);
    request.commander = Some(general.clone());
    request.params = quick_params();
    let result = generate_deck(&collection, &ledger, &request).unwrap();

    let commander = result.deck.commander().unwrap();
    assert_eq!(commander.card.name, general.name);
    assert!(validate(&result.deck).is_empty());
}

#[test]
fn report_serializes_to_json() {
    let collection = collection();
    let ledger = full_ledger(&collection);
    let mut request = DeckRequest::new("report", Archetype::Aggro, Format::Standard);
    request.colors = ColorSet::from_codes("R");
    request.params = quick_params();
    let result = generate_deck(&collection, &ledger, &request).unwrap();

    let body = serde_json::to_string(&result).unwrap();
    assert!(body.contains("\"fitness\""));
    assert!(body.contains("\"summary\""));
}
