//! Hold/select gestures over a [`DiceSet`].
//!
//! Held state is the selection state: a selected die is a die kept out of
//! the next roll. Keeping any visual "checked" marker in sync is the
//! caller's job.

use crate::dice_set::DiceSet;
use crate::die::DICE_COUNT;

/// Flips the held flag of exactly one die.
pub fn toggle_held(dice: &mut DiceSet, index: usize) {
    let held = !dice.is_held(index);
    dice.set_held(index, held);
    tracing::debug!(index, held, "toggled die");
}

/// Sets `held` on every die currently showing `face`, whatever its previous state.
///
/// This is the "select all of this value" gesture. It overwrites rather than
/// toggles so all dice of the same value end up in the same state. Returns
/// the number of dice that matched; zero matches leaves the set untouched.
///
/// ```
/// use yam_engine::dice_set::DiceSet;
/// use yam_engine::selection::{filter_by_held, toggle_held_by_value};
///
/// let mut dice = DiceSet::with_values([6, 2, 6, 3, 6]);
/// assert_eq!(toggle_held_by_value(&mut dice, 6, true), 3);
/// assert_eq!(filter_by_held(&dice, true), vec![0, 2, 4]);
/// ```
pub fn toggle_held_by_value(dice: &mut DiceSet, face: u8, held: bool) -> usize {
    let mut matched = 0;
    for i in 0..DICE_COUNT {
        if dice.value_at(i) == face {
            dice.set_held(i, held);
            matched += 1;
        }
    }
    tracing::debug!(face, held, matched, "bulk selection by value");
    matched
}

/// Indices whose held flag equals `held`, in index order.
pub fn filter_by_held(dice: &DiceSet, held: bool) -> Vec<usize> {
    dice.dice()
        .iter()
        .filter(|d| d.held == held)
        .map(|d| d.index)
        .collect()
}

/// Indices that the next roll will touch.
pub fn unheld(dice: &DiceSet) -> Vec<usize> {
    filter_by_held(dice, false)
}
