use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DiceError {
    #[error("Roll abandoned: {reported} of {expected} dice reported a value")]
    RollAbandoned { reported: usize, expected: usize },
    #[error("Expected 5 dice, got {count}")]
    WrongDiceCount { count: usize },
    #[error("Invalid face value: {text:?}")]
    InvalidFace { text: String },
    #[error("Die index {index} is out of range or repeated")]
    InvalidIndex { index: usize },
}
