//! # yam-engine: Yam dice core
//!
//! State and rules for the five dice of a Yam (Yahtzee-style) game: holding
//! dice between rolls, rolling the rest through a pluggable render adapter,
//! and reading scoring combinations off the faces.
//!
//! ## Core Modules
//!
//! - [`die`] - A single die and face constants
//! - [`dice_set`] - The fixed set of five dice
//! - [`selection`] - Hold/select gestures, including select-all-of-a-value
//! - [`combination`] - Combination detection (three/four of a kind, full house, street, yam)
//! - [`roll`] - Concurrent rolling of the unheld dice with a single completion
//! - [`roller`] - A seeded ChaCha20 roll adapter with optional juggling
//! - [`logger`] - Roll history records in JSONL
//! - [`errors`] - Error types
//!
//! ## Quick Start
//!
//! ```rust
//! use yam_engine::combination::CombinationEvaluator;
//! use yam_engine::dice_set::DiceSet;
//!
//! let dice = DiceSet::with_values([2, 2, 2, 5, 5]);
//! let eval = CombinationEvaluator::from(&dice);
//! assert!(eval.is_full_house());
//! assert_eq!(eval.total(), 16);
//! ```
//!
//! ## Rolling
//!
//! The caller owns the [`dice_set::DiceSet`] and injects the adapter:
//!
//! ```rust
//! use std::sync::Arc;
//! use yam_engine::dice_set::DiceSet;
//! use yam_engine::roll::{RollCoordinator, RollRequest};
//! use yam_engine::roller::SeededRoller;
//! use yam_engine::selection::toggle_held;
//!
//! # tokio::runtime::Builder::new_current_thread().enable_time().build().unwrap().block_on(async {
//! let coordinator = RollCoordinator::new(Arc::new(SeededRoller::new(42)));
//! let mut dice = DiceSet::new();
//! coordinator.roll_unheld(&mut dice, &RollRequest::default()).await.unwrap();
//!
//! toggle_held(&mut dice, 0);
//! let kept = dice.value_at(0);
//! let outcome = coordinator.roll_unheld(&mut dice, &RollRequest::default()).await.unwrap();
//! assert_eq!(outcome.rolled, vec![1, 2, 3, 4]);
//! assert_eq!(dice.value_at(0), kept);
//! # });
//! ```

pub mod combination;
pub mod dice_set;
pub mod die;
pub mod errors;
pub mod logger;
pub mod roll;
pub mod roller;
pub mod selection;
