use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::die::{Die, DICE_COUNT, MAX_FACE, UNROLLED};
use crate::errors::DiceError;

/// The five dice of a game session.
///
/// The set always holds exactly [`DICE_COUNT`] dice whose indices never
/// change. It is owned by the caller (the session/turn controller); the
/// selection and roll components only borrow it for the duration of a call.
///
/// Deserializing rebuilds the set: every index `0..5` must appear exactly
/// once, and faces above 6 are stored as unrolled.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawDiceSet")]
pub struct DiceSet {
    dice: [Die; DICE_COUNT],
}

#[derive(Deserialize)]
struct RawDiceSet {
    dice: Vec<Die>,
}

impl TryFrom<RawDiceSet> for DiceSet {
    type Error = DiceError;

    fn try_from(raw: RawDiceSet) -> Result<Self, Self::Error> {
        if raw.dice.len() != DICE_COUNT {
            return Err(DiceError::WrongDiceCount {
                count: raw.dice.len(),
            });
        }
        let mut set = Self::new();
        let mut seen = [false; DICE_COUNT];
        for die in raw.dice {
            if die.index >= DICE_COUNT || seen[die.index] {
                return Err(DiceError::InvalidIndex { index: die.index });
            }
            seen[die.index] = true;
            set.set_value(die.index, die.value);
            set.set_held(die.index, die.held);
        }
        Ok(set)
    }
}

impl Default for DiceSet {
    fn default() -> Self {
        Self::new()
    }
}

impl DiceSet {
    pub fn new() -> Self {
        Self {
            dice: std::array::from_fn(Die::new),
        }
    }

    pub fn with_values(values: [u8; DICE_COUNT]) -> Self {
        let mut set = Self::new();
        for (i, v) in values.into_iter().enumerate() {
            set.set_value(i, v);
        }
        set
    }

    pub fn dice(&self) -> &[Die; DICE_COUNT] {
        &self.dice
    }

    pub fn get(&self, index: usize) -> &Die {
        debug_assert!(index < DICE_COUNT, "die index {} out of range", index);
        &self.dice[index]
    }

    /// Current face values in index order (0 for unrolled dice).
    pub fn values(&self) -> [u8; DICE_COUNT] {
        self.dice.map(|d| d.value)
    }

    pub fn value_at(&self, index: usize) -> u8 {
        self.get(index).value
    }

    /// Writes a face value. Anything above 6 is stored as unrolled.
    pub fn set_value(&mut self, index: usize, value: u8) {
        debug_assert!(index < DICE_COUNT, "die index {} out of range", index);
        let value = if value > MAX_FACE {
            tracing::warn!(index, value, "face value out of range, storing as unrolled");
            UNROLLED
        } else {
            value
        };
        self.dice[index].value = value;
    }

    pub fn is_held(&self, index: usize) -> bool {
        self.get(index).held
    }

    pub fn set_held(&mut self, index: usize, held: bool) {
        debug_assert!(index < DICE_COUNT, "die index {} out of range", index);
        self.dice[index].held = held;
    }

    pub fn held_mask(&self) -> [bool; DICE_COUNT] {
        self.dice.map(|d| d.held)
    }

    /// Releases every die, keeping the faces.
    pub fn release_all(&mut self) {
        for d in self.dice.iter_mut() {
            d.held = false;
        }
    }

    /// Releases every die and returns it to the unrolled state.
    pub fn clear(&mut self) {
        for d in self.dice.iter_mut() {
            d.held = false;
            d.value = UNROLLED;
        }
    }

    pub fn is_fully_rolled(&self) -> bool {
        self.dice.iter().all(Die::is_rolled)
    }
}

impl fmt::Display for DiceSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, d) in self.dice.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            if d.held {
                write!(f, "[{}]", d.value)?;
            } else {
                write!(f, "{}", d.value)?;
            }
        }
        Ok(())
    }
}

/// Strict parsing: five faces separated by commas and/or whitespace.
impl FromStr for DiceSet {
    type Err = DiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|p| !p.is_empty())
            .collect();
        if parts.len() != DICE_COUNT {
            return Err(DiceError::WrongDiceCount { count: parts.len() });
        }
        let mut values = [UNROLLED; DICE_COUNT];
        for (slot, part) in values.iter_mut().zip(parts) {
            *slot = match part.parse::<u8>() {
                Ok(v) if v <= MAX_FACE => v,
                _ => {
                    return Err(DiceError::InvalidFace {
                        text: part.to_string(),
                    })
                }
            };
        }
        Ok(Self::with_values(values))
    }
}
