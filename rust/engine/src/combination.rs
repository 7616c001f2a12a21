use serde::{Deserialize, Serialize};

use crate::dice_set::DiceSet;
use crate::die::{is_face, DICE_COUNT, MAX_FACE, MIN_FACE, UNROLLED};

/// Named patterns over the five current faces.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Combination {
    ThreeOfAKind,
    FourOfAKind,
    FullHouse,
    /// Five distinct faces in a run: 1-5 or 2-6
    Street,
    /// All five dice share one face
    Yam,
}

impl Combination {
    pub fn all() -> [Combination; 5] {
        [
            Combination::ThreeOfAKind,
            Combination::FourOfAKind,
            Combination::FullHouse,
            Combination::Street,
            Combination::Yam,
        ]
    }

    pub fn label(&self) -> &'static str {
        match self {
            Combination::ThreeOfAKind => "three of a kind",
            Combination::FourOfAKind => "four of a kind",
            Combination::FullHouse => "full house",
            Combination::Street => "street",
            Combination::Yam => "yam",
        }
    }
}

/// How many dice show each face; slot 0 is face 1.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default, Serialize, Deserialize)]
pub struct FaceCounts([u8; 6]);

impl FaceCounts {
    pub fn from_values(values: &[u8; DICE_COUNT]) -> Self {
        let mut counts = [0u8; 6];
        for &v in values {
            // unrolled dice count towards no face
            if is_face(v) {
                counts[(v - MIN_FACE) as usize] += 1;
            }
        }
        Self(counts)
    }

    pub fn of(&self, face: u8) -> u8 {
        if is_face(face) {
            self.0[(face - MIN_FACE) as usize]
        } else {
            0
        }
    }

    /// Whether any face appears exactly `n` times.
    pub fn contains(&self, n: u8) -> bool {
        self.0.contains(&n)
    }

    pub fn max(&self) -> u8 {
        self.0.iter().copied().max().unwrap_or(0)
    }

    pub fn sum(&self) -> u8 {
        self.0.iter().sum()
    }

    pub fn as_array(&self) -> [u8; 6] {
        self.0
    }

    /// The face with the highest count, preferring the higher face on ties.
    pub fn most_common(&self) -> Option<u8> {
        // max_by_key keeps the last maximum, i.e. the highest face
        (MIN_FACE..=MAX_FACE)
            .filter(|&f| self.of(f) > 0)
            .max_by_key(|&f| self.of(f))
    }
}

/// Pure queries over a snapshot of the five face values.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct CombinationEvaluator {
    values: [u8; DICE_COUNT],
    counts: FaceCounts,
}

impl From<&DiceSet> for CombinationEvaluator {
    fn from(dice: &DiceSet) -> Self {
        Self::from_values(dice.values())
    }
}

impl CombinationEvaluator {
    /// Anything that is not a face counts as an unrolled die.
    pub fn from_values(values: [u8; DICE_COUNT]) -> Self {
        let values = values.map(|v| if is_face(v) { v } else { UNROLLED });
        Self {
            values,
            counts: FaceCounts::from_values(&values),
        }
    }

    pub fn value_at(&self, index: usize) -> u8 {
        debug_assert!(index < DICE_COUNT, "die index {} out of range", index);
        self.values[index]
    }

    pub fn all_values(&self) -> [u8; DICE_COUNT] {
        self.values
    }

    pub fn total(&self) -> u32 {
        self.values.iter().map(|&v| v as u32).sum()
    }

    pub fn count_of(&self, face: u8) -> u8 {
        self.counts.of(face)
    }

    pub fn counts(&self) -> FaceCounts {
        self.counts
    }

    pub fn is_three_of_a_kind(&self) -> bool {
        self.counts.max() >= 3
    }

    pub fn is_four_of_a_kind(&self) -> bool {
        self.counts.max() >= 4
    }

    /// A three plus a pair, or a Yam.
    pub fn is_full_house(&self) -> bool {
        (self.counts.contains(3) && self.counts.contains(2)) || self.counts.contains(5)
    }

    pub fn is_street(&self) -> bool {
        let c = &self.counts;
        // with exactly five dice this forces 1-2-3-4-5 or 2-3-4-5-6
        c.of(2) > 0 && c.of(3) > 0 && c.of(4) > 0 && c.of(5) > 0 && (c.of(1) > 0 || c.of(6) > 0)
    }

    pub fn is_yam(&self) -> bool {
        self.counts.contains(5)
    }

    pub fn has(&self, combination: Combination) -> bool {
        match combination {
            Combination::ThreeOfAKind => self.is_three_of_a_kind(),
            Combination::FourOfAKind => self.is_four_of_a_kind(),
            Combination::FullHouse => self.is_full_house(),
            Combination::Street => self.is_street(),
            Combination::Yam => self.is_yam(),
        }
    }

    /// Every combination currently showing, weakest first.
    pub fn combinations(&self) -> Vec<Combination> {
        Combination::all()
            .into_iter()
            .filter(|c| self.has(*c))
            .collect()
    }
}

/// Snapshot of everything a caller typically reads after a roll.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub values: [u8; DICE_COUNT],
    pub total: u32,
    pub counts: [u8; 6],
    pub combinations: Vec<Combination>,
}

pub fn evaluate(dice: &DiceSet) -> Evaluation {
    let eval = CombinationEvaluator::from(dice);
    Evaluation {
        values: eval.all_values(),
        total: eval.total(),
        counts: eval.counts().as_array(),
        combinations: eval.combinations(),
    }
}
