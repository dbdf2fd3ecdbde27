use deckforge_core::{AvailabilityLedger, BasicLand, Card, CardId, CardType, ColorSet, CubeStyle, Rarity};
use deckforge_engine::{generate_cube, CubeRequest, GaParams};

fn card(id: i64, kind: CardType, rarity: Rarity, color: &str, cmc: f64, text: &str) -> Card {
    let mut card = BasicLand::Plains.card();
    card.id = CardId(id);
    card.name = format!("{} {id}", kind.label());
    card.type_line = format!("{} — Test", kind.label());
    card.card_types = vec![kind];
    card.color_identity = ColorSet::from_codes(color);
    card.rarity = Some(rarity);
    card.cmc = cmc;
    card.oracle_text = text.to_string();
    card.quantity = 1;
    card
}

fn collection() -> Vec<Card> {
    let kinds = [
        CardType::Creature,
        CardType::Instant,
        CardType::Sorcery,
        CardType::Enchantment,
        CardType::Artifact,
        CardType::Planeswalker,
    ];
    let rarities = [Rarity::Common, Rarity::Uncommon, Rarity::Rare, Rarity::Mythic];
    let colors = ["W", "U", "B", "R", "G", ""];
    let texts = [
        "Destroy target creature.",
        "Draw a card.",
        "Haste",
        "Flashback {2}",
        "Create a 1/1 token.",
    ];
    (0..300)
        .map(|i| {
            card(
                i,
                kinds[(i % kinds.len() as i64) as usize],
                rarities[(i % rarities.len() as i64) as usize],
                colors[(i % colors.len() as i64) as usize],
                (i % 7) as f64,
                texts[(i % texts.len() as i64) as usize],
            )
        })
        .collect()
}

fn full_ledger(collection: &[Card]) -> AvailabilityLedger {
    AvailabilityLedger::from_counts(collection.iter().map(|c| (c.id, c.quantity as i64)))
}

fn quick_request(style: CubeStyle) -> CubeRequest {
    let mut request = CubeRequest::new("matrix cube", style);
    request.overrides.size = Some(180);
    request.params = GaParams {
        population: 6,
        generations: 4,
        ..GaParams::cube_defaults()
    };
    request
}

macro_rules! style_case {
    ($name:ident, $style:expr) => {
        #[test]
        fn $name() {
            let collection = collection();
            let ledger = full_ledger(&collection);
            let result = generate_cube(&collection, &ledger, &quick_request($style)).unwrap();
            assert_eq!(result.cube.total_cards(), 180);
            assert!(result.cube.validate().errors.is_empty());
        }
    };
}

style_case!(power_cube_hits_size, CubeStyle::PowerCube);
style_case!(vintage_cube_hits_size, CubeStyle::VintageCube);
style_case!(legacy_cube_hits_size, CubeStyle::LegacyCube);
style_case!(modern_cube_hits_size, CubeStyle::ModernCube);
style_case!(pauper_cube_hits_size, CubeStyle::PauperCube);
style_case!(themed_cube_hits_size, CubeStyle::ThemedCube);

#[test]
fn singleton_cube_has_no_duplicate_nonbasics() {
    let collection = collection();
    let ledger = full_ledger(&collection);
    let result = generate_cube(&collection, &ledger, &quick_request(CubeStyle::LegacyCube)).unwrap();
    let mut seen = std::collections::HashSet::new();
    for entry in &result.cube.entries {
        if !entry.is_basic_land {
            assert!(seen.insert(entry.card.id), "{} duplicated", entry.card.name);
            assert_eq!(entry.quantity, 1);
        }
    }
}

#[test]
fn fixed_seed_reproduces_the_cube() {
    let collection = collection();
    let ledger = full_ledger(&collection);
    let first = generate_cube(&collection, &ledger, &quick_request(CubeStyle::PowerCube)).unwrap();
    let second = generate_cube(&collection, &ledger, &quick_request(CubeStyle::PowerCube)).unwrap();

    assert_eq!(first.fitness, second.fitness);
    let names = |result: &deckforge_engine::CubeGeneration| {
        result
            .cube
            .entries
            .iter()
            .map(|e| (e.card.name.clone(), e.quantity))
            .collect::<Vec<_>>()
    };
    assert_eq!(names(&first), names(&second));
}

#[test]
fn overrides_replace_template_themes() {
    let collection = collection();
    let ledger = full_ledger(&collection);
    let mut request = quick_request(CubeStyle::ThemedCube);
    request.overrides.themes = Some(vec!["graveyard".to_string()]);
    let result = generate_cube(&collection, &ledger, &request).unwrap();
    assert_eq!(result.cube.themes, vec!["graveyard".to_string()]);
}
