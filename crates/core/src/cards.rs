use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Quantity sentinel for virtual basic lands; never decremented by the ledger.
pub const UNLIMITED_QUANTITY: u32 = u32::MAX;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Color {
    White,
    Blue,
    Black,
    Red,
    Green,
}

impl Color {
    pub const ALL: [Color; 5] = [
        Color::White,
        Color::Blue,
        Color::Black,
        Color::Red,
        Color::Green,
    ];

    pub fn code(self) -> char {
        match self {
            Color::White => 'W',
            Color::Blue => 'U',
            Color::Black => 'B',
            Color::Red => 'R',
            Color::Green => 'G',
        }
    }

    pub fn from_code(code: char) -> Option<Color> {
        match code.to_ascii_uppercase() {
            'W' => Some(Color::White),
            'U' => Some(Color::Blue),
            'B' => Some(Color::Black),
            'R' => Some(Color::Red),
            'G' => Some(Color::Green),
            _ => None,
        }
    }

    fn bit(self) -> u8 {
        match self {
            Color::White => 1,
            Color::Blue => 1 << 1,
            Color::Black => 1 << 2,
            Color::Red => 1 << 3,
            Color::Green => 1 << 4,
        }
    }
}

/// Set of the five colors, stored as a bitmask.
#[derive(
    Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord,
)]
pub struct ColorSet(u8);

impl ColorSet {
    pub const COLORLESS: ColorSet = ColorSet(0);

    pub fn from_colors(colors: &[Color]) -> Self {
        let mut set = ColorSet::COLORLESS;
        for color in colors {
            set.insert(*color);
        }
        set
    }

    /// Parse a run of color codes such as "WU" or "w,u".
    pub fn from_codes(codes: &str) -> Self {
        let mut set = ColorSet::COLORLESS;
        for ch in codes.chars() {
            if let Some(color) = Color::from_code(ch) {
                set.insert(color);
            }
        }
        set
    }

    pub fn insert(&mut self, color: Color) {
        self.0 |= color.bit();
    }

    pub fn contains(self, color: Color) -> bool {
        self.0 & color.bit() != 0
    }

    pub fn union(self, other: ColorSet) -> ColorSet {
        ColorSet(self.0 | other.0)
    }

    pub fn is_subset_of(self, other: ColorSet) -> bool {
        self.0 & !other.0 == 0
    }

    pub fn is_colorless(self) -> bool {
        self.0 == 0
    }

    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn iter(self) -> impl Iterator<Item = Color> {
        Color::ALL.into_iter().filter(move |c| self.contains(*c))
    }
}

impl fmt::Display for ColorSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_colorless() {
            return write!(f, "C");
        }
        for color in self.iter() {
            write!(f, "{}", color.code())?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Rarity {
    Common,
    Uncommon,
    Rare,
    Mythic,
}

impl Rarity {
    pub fn is_peasant(self) -> bool {
        matches!(self, Rarity::Common | Rarity::Uncommon)
    }
}

impl FromStr for Rarity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "common" => Ok(Rarity::Common),
            "uncommon" => Ok(Rarity::Uncommon),
            "rare" => Ok(Rarity::Rare),
            "mythic" | "mythic rare" => Ok(Rarity::Mythic),
            other => Err(format!("unknown rarity: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum CardType {
    Creature,
    Instant,
    Sorcery,
    Enchantment,
    Artifact,
    Planeswalker,
    Land,
    Battle,
}

impl CardType {
    pub const ALL: [CardType; 8] = [
        CardType::Creature,
        CardType::Instant,
        CardType::Sorcery,
        CardType::Enchantment,
        CardType::Artifact,
        CardType::Planeswalker,
        CardType::Land,
        CardType::Battle,
    ];

    pub fn label(self) -> &'static str {
        match self {
            CardType::Creature => "Creature",
            CardType::Instant => "Instant",
            CardType::Sorcery => "Sorcery",
            CardType::Enchantment => "Enchantment",
            CardType::Artifact => "Artifact",
            CardType::Planeswalker => "Planeswalker",
            CardType::Land => "Land",
            CardType::Battle => "Battle",
        }
    }
}

/// Stable card identity. Negative values mark virtual cards synthesized by the
/// engine (basic lands); they never exist in the owned collection.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord,
)]
pub struct CardId(pub i64);

impl CardId {
    pub fn is_virtual(self) -> bool {
        self.0 < 0
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum BasicLand {
    Plains,
    Island,
    Swamp,
    Mountain,
    Forest,
    Wastes,
}

impl BasicLand {
    pub const ALL: [BasicLand; 6] = [
        BasicLand::Plains,
        BasicLand::Island,
        BasicLand::Swamp,
        BasicLand::Mountain,
        BasicLand::Forest,
        BasicLand::Wastes,
    ];

    pub fn name(self) -> &'static str {
        match self {
            BasicLand::Plains => "Plains",
            BasicLand::Island => "Island",
            BasicLand::Swamp => "Swamp",
            BasicLand::Mountain => "Mountain",
            BasicLand::Forest => "Forest",
            BasicLand::Wastes => "Wastes",
        }
    }

    /// The color of mana this basic produces; Wastes is colorless.
    pub fn color(self) -> Option<Color> {
        match self {
            BasicLand::Plains => Some(Color::White),
            BasicLand::Island => Some(Color::Blue),
            BasicLand::Swamp => Some(Color::Black),
            BasicLand::Mountain => Some(Color::Red),
            BasicLand::Forest => Some(Color::Green),
            BasicLand::Wastes => None,
        }
    }

    pub fn for_color(color: Color) -> BasicLand {
        match color {
            Color::White => BasicLand::Plains,
            Color::Blue => BasicLand::Island,
            Color::Black => BasicLand::Swamp,
            Color::Red => BasicLand::Mountain,
            Color::Green => BasicLand::Forest,
        }
    }

    pub fn id(self) -> CardId {
        CardId(match self {
            BasicLand::Plains => -1,
            BasicLand::Island => -2,
            BasicLand::Swamp => -3,
            BasicLand::Mountain => -4,
            BasicLand::Forest => -5,
            BasicLand::Wastes => -6,
        })
    }

    /// Synthesize the virtual card used when the collection holds no physical copy.
    pub fn card(self) -> Card {
        let identity = match self.color() {
            Some(color) => ColorSet::from_colors(&[color]),
            None => ColorSet::COLORLESS,
        };
        let subtype = match self {
            BasicLand::Wastes => None,
            other => Some(other.name().to_string()),
        };
        Card {
            id: self.id(),
            name: self.name().to_string(),
            set_code: String::new(),
            collector_number: String::new(),
            mana_cost: String::new(),
            cmc: 0.0,
            colors: ColorSet::COLORLESS,
            color_identity: identity,
            type_line: match subtype.as_deref() {
                Some(sub) => format!("Basic Land — {sub}"),
                None => "Basic Land".to_string(),
            },
            card_types: vec![CardType::Land],
            subtypes: subtype.into_iter().collect(),
            oracle_text: String::new(),
            rarity: Some(Rarity::Common),
            quantity: UNLIMITED_QUANTITY,
            foil: false,
            condition: None,
            purchase_price: None,
            current_price: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Card {
    pub id: CardId,
    pub name: String,
    pub set_code: String,
    pub collector_number: String,
    #[serde(default)]
    pub mana_cost: String,
    #[serde(default)]
    pub cmc: f64,
    #[serde(default)]
    pub colors: ColorSet,
    #[serde(default)]
    pub color_identity: ColorSet,
    #[serde(default)]
    pub type_line: String,
    #[serde(default)]
    pub card_types: Vec<CardType>,
    #[serde(default)]
    pub subtypes: Vec<String>,
    #[serde(default)]
    pub oracle_text: String,
    #[serde(default)]
    pub rarity: Option<Rarity>,
    #[serde(default = "one")]
    pub quantity: u32,
    #[serde(default)]
    pub foil: bool,
    #[serde(default)]
    pub condition: Option<String>,
    #[serde(default)]
    pub purchase_price: Option<f64>,
    #[serde(default)]
    pub current_price: Option<f64>,
}

fn one() -> u32 {
    1
}

impl Card {
    pub fn has_type(&self, kind: CardType) -> bool {
        self.card_types.contains(&kind)
    }

    pub fn is_creature(&self) -> bool {
        self.has_type(CardType::Creature)
    }

    pub fn is_land(&self) -> bool {
        self.has_type(CardType::Land)
    }

    pub fn is_basic_land(&self) -> bool {
        self.is_land() && self.type_line.contains("Basic")
    }

    pub fn is_legendary(&self) -> bool {
        self.type_line.contains("Legendary")
    }

    pub fn is_instant_or_sorcery(&self) -> bool {
        self.has_type(CardType::Instant) || self.has_type(CardType::Sorcery)
    }

    /// Mana-curve bucket: CMC truncated and capped at 7+.
    pub fn curve_bucket(&self) -> usize {
        (self.cmc.max(0.0) as usize).min(7)
    }

    /// Primary type line segment, before the em dash.
    pub fn primary_type(&self) -> &str {
        self.type_line.split('—').next().unwrap_or("").trim()
    }
}

/// Normalize a card name for copy counting and ledger lookups: lowercase, keep
/// alphanumerics and spaces, collapse runs of whitespace.
pub fn normalize_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut pending_space = false;
    for ch in name.chars() {
        let lower = ch.to_ascii_lowercase();
        if lower.is_ascii_alphanumeric() {
            if pending_space && !out.is_empty() {
                out.push(' ');
            }
            pending_space = false;
            out.push(lower);
        } else {
            pending_space = true;
        }
    }
    out
}
