use deckforge_core::{
    normalize_name, validate, BasicLand, Card, CardId, CardType, ColorSet, Deck, Format,
};

macro_rules! rules_case {
    ($name:ident, $format:expr, $min:expr, $max:expr, $copies:expr, $side:expr, $commander:expr) => {
        #[test]
        fn $name() {
            let rules = $format.rules();
            assert_eq!(rules.min_cards, $min);
            assert_eq!(rules.max_cards, $max);
            assert_eq!(rules.max_copies, $copies);
            assert_eq!(rules.sideboard_size, $side);
            assert_eq!(rules.requires_commander, $commander);
        }
    };
}

rules_case!(standard_rules, Format::Standard, 60, None, 4, 15, false);
rules_case!(modern_rules, Format::Modern, 60, None, 4, 15, false);
rules_case!(pauper_rules, Format::Pauper, 60, None, 4, 15, false);
rules_case!(legacy_rules, Format::Legacy, 60, None, 4, 15, false);
rules_case!(vintage_rules, Format::Vintage, 60, None, 4, 15, false);
rules_case!(commander_rules, Format::Commander, 100, Some(100), 1, 0, true);
rules_case!(brawl_rules, Format::Brawl, 60, Some(60), 1, 0, true);

macro_rules! parse_case {
    ($name:ident, $input:expr, $expected:expr) => {
        #[test]
        fn $name() {
            assert_eq!($input.parse::<Format>().unwrap(), $expected);
        }
    };
}

parse_case!(parse_standard, "Standard", Format::Standard);
parse_case!(parse_commander, "commander", Format::Commander);
parse_case!(parse_edh_alias, "EDH", Format::Commander);
parse_case!(parse_brawl, "brawl", Format::Brawl);

#[test]
fn unknown_format_is_a_parse_error() {
    assert!("oathbreaker".parse::<Format>().is_err());
}

fn spell(id: i64, name: &str) -> Card {
    let mut card = BasicLand::Plains.card();
    card.id = CardId(id);
    card.name = name.to_string();
    card.type_line = "Instant".to_string();
    card.card_types = vec![CardType::Instant];
    card.color_identity = ColorSet::from_codes("R");
    card.cmc = 1.0;
    card
}

fn legal_standard_deck() -> Deck {
    let mut deck = Deck::new("legal", Format::Standard);
    for i in 0..9 {
        deck.add_card(spell(i, &format!("Spell {i}")), 4, false, false);
    }
    deck.add_card(BasicLand::Mountain.card(), 24, false, false);
    deck
}

#[test]
fn legal_deck_has_no_violations() {
    assert!(validate(&legal_standard_deck()).is_empty());
}

#[test]
fn undersized_deck_is_flagged() {
    let mut deck = Deck::new("small", Format::Standard);
    deck.add_card(spell(1, "Shock"), 4, false, false);
    let violations = validate(&deck);
    assert_eq!(violations.len(), 1);
    assert!(violations[0].contains("minimum"));
}

#[test]
fn copy_limit_counts_across_printings_by_name() {
    let mut deck = legal_standard_deck();
    // a fifth copy under a different printing id
    let mut reprint = spell(100, "Spell 0");
    reprint.set_code = "2XM".to_string();
    deck.add_card(reprint, 1, false, false);
    deck.remove_card(CardId(8), 1, false);
    let violations = validate(&deck);
    assert_eq!(violations.len(), 1);
    assert!(violations[0].contains(&normalize_name("Spell 0")));
}

#[test]
fn basic_lands_are_exempt_from_copy_limits() {
    let deck = legal_standard_deck();
    assert!(deck.mainboard().any(|e| e.quantity > 4));
    assert!(validate(&deck).is_empty());
}

#[test]
fn oversized_sideboard_is_flagged() {
    let mut deck = legal_standard_deck();
    for i in 200..204 {
        deck.add_card(spell(i, &format!("Side {i}")), 4, false, true);
    }
    let violations = validate(&deck);
    assert_eq!(violations.len(), 1);
    assert!(violations[0].contains("sideboard"));
}

#[test]
fn commander_deck_needs_its_commander() {
    let mut deck = Deck::new("headless", Format::Commander);
    for i in 0..100 {
        deck.add_card(spell(i, &format!("Spell {i}")), 1, false, false);
    }
    let violations = validate(&deck);
    assert!(violations.iter().any(|v| v.contains("requires a commander")));
}

#[test]
fn commander_quantity_must_be_one() {
    let mut deck = Deck::new("doubled", Format::Commander);
    let mut krenko = spell(500, "Krenko, Mob Boss");
    krenko.type_line = "Legendary Creature — Goblin".to_string();
    krenko.card_types = vec![CardType::Creature];
    deck.add_card(krenko, 2, true, false);
    for i in 0..98 {
        deck.add_card(spell(i, &format!("Spell {i}")), 1, false, false);
    }
    let violations = validate(&deck);
    assert!(violations.iter().any(|v| v.contains("quantity of 1")));
}

#[test]
fn commander_deck_over_maximum_is_flagged() {
    let mut deck = Deck::new("fat", Format::Commander);
    let mut krenko = spell(500, "Krenko, Mob Boss");
    krenko.type_line = "Legendary Creature — Goblin".to_string();
    deck.add_card(krenko, 1, true, false);
    for i in 0..105 {
        deck.add_card(spell(i, &format!("Spell {i}")), 1, false, false);
    }
    let violations = validate(&deck);
    assert!(violations.iter().any(|v| v.contains("maximum")));
}
