use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("no cards available after {filter} filtering")]
    EmptyPool { filter: String },
    #[error("collection is empty")]
    EmptyCollection,
    #[error("no suitable commander found")]
    NoSuitableCommander,
    #[error("population collapsed to zero individuals")]
    EmptyPopulation,
    #[error("draft has no seats")]
    NoDraftSeats,
    #[error("grid draft needs exactly two seats, got {seats}")]
    GridSeats { seats: usize },
    #[error("cube too small for this draft: need {need} draftable cards, have {have}")]
    DraftPoolTooSmall { need: usize, have: usize },
    #[error("io error: {0}")]
    Io(String),
    #[error("serialize error: {0}")]
    Serialize(String),
}

impl From<std::io::Error> for EngineError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value.to_string())
    }
}

impl From<serde_json::Error> for EngineError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialize(value.to_string())
    }
}
