use serde::{Deserialize, Serialize};

/// Number of dice in a set. Fixed for the lifetime of a game.
pub const DICE_COUNT: usize = 5;
/// Lowest face a settled die can show.
pub const MIN_FACE: u8 = 1;
/// Highest face a settled die can show.
pub const MAX_FACE: u8 = 6;
/// Value of a die that has never been rolled.
pub const UNROLLED: u8 = 0;

/// A single die of the set.
/// `held` dice are kept out of the next roll; `value` is [`UNROLLED`] until the first roll settles.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Die {
    /// Position in the set (0..5), stable for the lifetime of the set
    pub index: usize,
    /// Current face (1..=6), or 0 when unrolled
    pub value: u8,
    /// Whether the die is kept out of the next roll
    pub held: bool,
}

impl Die {
    pub fn new(index: usize) -> Self {
        Self {
            index,
            value: UNROLLED,
            held: false,
        }
    }

    pub fn is_rolled(&self) -> bool {
        is_face(self.value)
    }
}

pub fn is_face(value: u8) -> bool {
    (MIN_FACE..=MAX_FACE).contains(&value)
}

pub fn all_faces() -> [u8; 6] {
    [1, 2, 3, 4, 5, 6]
}

/// Parses a face value leniently.
///
/// Anything that is not a face in `0..=6` (empty text, garbage, out of range
/// numbers) degrades to [`UNROLLED`] instead of failing.
///
/// ```
/// use yam_engine::die::parse_face;
///
/// assert_eq!(parse_face(" 4 "), 4);
/// assert_eq!(parse_face("seven"), 0);
/// assert_eq!(parse_face("9"), 0);
/// ```
pub fn parse_face(text: &str) -> u8 {
    match text.trim().parse::<u8>() {
        Ok(v) if v <= MAX_FACE => v,
        _ => UNROLLED,
    }
}
