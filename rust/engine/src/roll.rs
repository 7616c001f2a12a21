//! Rolling the unheld dice.
//!
//! Each die is handed to a [`DieRoller`] (the render/animation adapter)
//! together with a [`DieReport`] it must settle once with the rolled face.
//! Reports may arrive in any order and from any thread. A [`RollLatch`]
//! joins them and fires the completion exactly once, after the last
//! targeted die has reported.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::oneshot;

use crate::dice_set::DiceSet;
use crate::die::{is_face, UNROLLED};
use crate::errors::DiceError;
use crate::selection;

/// Options passed through to the roll adapter.
///
/// Only `keep_juggling` and `juggle_timeout` carry meaning for timing; the
/// style is opaque to the core.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollRequest {
    /// Opaque die color/style hint for the renderer
    #[serde(default)]
    pub style: Option<String>,
    /// Keep the dice rattling until the adapter is told to stop
    #[serde(default)]
    pub keep_juggling: bool,
    /// Upper bound on a rattle started with `keep_juggling`
    #[serde(default)]
    pub juggle_timeout: Option<Duration>,
}

impl RollRequest {
    pub fn with_style(mut self, style: impl Into<String>) -> Self {
        self.style = Some(style.into());
        self
    }

    pub fn juggling(mut self) -> Self {
        self.keep_juggling = true;
        self
    }

    pub fn with_juggle_timeout(mut self, timeout: Duration) -> Self {
        self.juggle_timeout = Some(timeout);
        self
    }
}

/// One settled die.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollResult {
    pub index: usize,
    pub value: u8,
}

/// The per-die roll primitive provided by the render/animation adapter.
///
/// Implementations must eventually call [`DieReport::settle`] with a face in
/// `1..=6`, synchronously or later from any thread. While
/// `request.keep_juggling` is set they may keep the die rattling until their
/// own stop signal.
pub trait DieRoller: Send + Sync {
    fn roll(&self, index: usize, request: &RollRequest, report: DieReport);
}

impl<F> DieRoller for F
where
    F: Fn(usize, &RollRequest, DieReport) + Send + Sync,
{
    fn roll(&self, index: usize, request: &RollRequest, report: DieReport) {
        self(index, request, report)
    }
}

/// What a roll completion receives: every result, or why the roll fell short.
pub type RollStatus = Result<Vec<RollResult>, DiceError>;

pub type RollCompletion = Box<dyn FnOnce(RollStatus) + Send>;

#[derive(Default)]
struct LatchState {
    results: Vec<RollResult>,
    abandoned: usize,
    completion: Option<RollCompletion>,
}

/// Count-down join over a fixed number of dispatched rolls.
///
/// Recording a result and checking for completion happen under one lock, so
/// two results landing back to back can neither both fire nor both miss the
/// completion. The completion itself runs outside the lock.
pub struct RollLatch {
    expected: usize,
    state: Mutex<LatchState>,
}

impl std::fmt::Debug for RollLatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RollLatch")
            .field("expected", &self.expected)
            .field("reported", &self.reported())
            .finish()
    }
}

impl RollLatch {
    /// A latch expecting zero results completes before this returns.
    pub fn new(expected: usize, completion: RollCompletion) -> Arc<Self> {
        let latch = Arc::new(Self {
            expected,
            state: Mutex::new(LatchState {
                results: Vec::with_capacity(expected),
                abandoned: 0,
                completion: Some(completion),
            }),
        });
        if expected == 0 {
            let fire = latch.take_if_done(&mut latch.lock());
            Self::fire(fire);
        }
        latch
    }

    pub fn expected(&self) -> usize {
        self.expected
    }

    pub fn reported(&self) -> usize {
        self.lock().results.len()
    }

    pub fn is_complete(&self) -> bool {
        self.lock().completion.is_none()
    }

    /// Records one settled die. Returns true when this result completed the roll.
    ///
    /// The push and the completion check share one critical section, so
    /// exactly one arrival (the last one) sees `true`.
    pub fn arrive(&self, result: RollResult) -> bool {
        let fire = {
            let mut state = self.lock();
            if state.completion.is_none() || state.results.len() + state.abandoned >= self.expected
            {
                tracing::warn!(
                    index = result.index,
                    value = result.value,
                    "late die result ignored"
                );
                return false;
            }
            state.results.push(result);
            tracing::debug!(
                index = result.index,
                value = result.value,
                reported = state.results.len(),
                expected = self.expected,
                "die settled"
            );
            self.take_if_done(&mut state)
        };
        Self::fire(fire)
    }

    fn abandon(&self, index: usize) {
        let fire = {
            let mut state = self.lock();
            if state.completion.is_none() {
                return;
            }
            state.abandoned += 1;
            tracing::warn!(index, "die report dropped without a value");
            self.take_if_done(&mut state)
        };
        Self::fire(fire);
    }

    fn take_if_done(&self, state: &mut LatchState) -> Option<(RollCompletion, RollStatus)> {
        if state.results.len() + state.abandoned != self.expected {
            return None;
        }
        let completion = state.completion.take()?;
        let outcome = if state.abandoned == 0 {
            Ok(state.results.clone())
        } else {
            Err(DiceError::RollAbandoned {
                reported: state.results.len(),
                expected: self.expected,
            })
        };
        Some((completion, outcome))
    }

    // runs the completion outside the lock
    fn fire(fire: Option<(RollCompletion, RollStatus)>) -> bool {
        let Some((completion, outcome)) = fire else {
            return false;
        };
        let completed = outcome.is_ok();
        completion(outcome);
        completed
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, LatchState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Per-die result callback. Settling consumes it, so a die reports at most once.
#[derive(Debug)]
pub struct DieReport {
    index: usize,
    latch: Arc<RollLatch>,
    settled: bool,
}

impl DieReport {
    fn new(index: usize, latch: Arc<RollLatch>) -> Self {
        Self {
            index,
            latch,
            settled: false,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Reports the rolled face. A value outside `1..=6` is recorded as unrolled.
    pub fn settle(mut self, value: u8) {
        self.settled = true;
        let value = if is_face(value) {
            value
        } else {
            tracing::warn!(index = self.index, value, "adapter settled an invalid face");
            UNROLLED
        };
        self.latch.arrive(RollResult {
            index: self.index,
            value,
        });
    }
}

impl Drop for DieReport {
    fn drop(&mut self) {
        if !self.settled {
            self.latch.abandon(self.index);
        }
    }
}

/// Result of one `roll_unheld` call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollOutcome {
    /// Indices that were rolled, in index order
    pub rolled: Vec<usize>,
    /// Settled values in arrival order
    pub results: Vec<RollResult>,
}

impl RollOutcome {
    pub fn is_empty(&self) -> bool {
        self.rolled.is_empty()
    }
}

/// Rolls every die that is not held through the injected adapter.
#[derive(Clone)]
pub struct RollCoordinator {
    roller: Arc<dyn DieRoller>,
}

impl std::fmt::Debug for RollCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RollCoordinator").finish_non_exhaustive()
    }
}

impl RollCoordinator {
    pub fn new(roller: Arc<dyn DieRoller>) -> Self {
        Self { roller }
    }

    /// Dispatches a roll for each of `targets` and calls `on_done` once every
    /// one of them has settled.
    ///
    /// With no targets `on_done` runs before this returns. If the adapter drops
    /// a report without settling it, `on_done` never runs.
    pub fn dispatch<F>(&self, targets: &[usize], request: &RollRequest, on_done: F)
    where
        F: FnOnce(Vec<RollResult>) + Send + 'static,
    {
        self.dispatch_with(
            targets,
            request,
            Box::new(move |outcome| match outcome {
                Ok(results) => on_done(results),
                Err(e) => tracing::warn!(error = %e, "roll did not complete"),
            }),
        );
    }

    fn dispatch_with(&self, targets: &[usize], request: &RollRequest, completion: RollCompletion) {
        tracing::debug!(
            targets = ?targets,
            keep_juggling = request.keep_juggling,
            "dispatching roll"
        );
        let latch = RollLatch::new(targets.len(), completion);
        for &index in targets {
            self.roller
                .roll(index, request, DieReport::new(index, Arc::clone(&latch)));
        }
    }

    /// Rolls the unheld dice and records their new faces into `dice`.
    ///
    /// Holding all five dice is not an error: the outcome is empty and the
    /// set is left as it was.
    ///
    /// # Errors
    ///
    /// [`DiceError::RollAbandoned`] when the adapter dropped at least one
    /// report unsettled. The set is not modified in that case.
    pub async fn roll_unheld(
        &self,
        dice: &mut DiceSet,
        request: &RollRequest,
    ) -> Result<RollOutcome, DiceError> {
        let rolled = selection::unheld(dice);
        let expected = rolled.len();
        let (tx, rx) = oneshot::channel();
        self.dispatch_with(
            &rolled,
            request,
            Box::new(move |outcome| {
                // receiver gone means the caller stopped waiting
                let _ = tx.send(outcome);
            }),
        );
        let results = rx.await.map_err(|_| DiceError::RollAbandoned {
            reported: 0,
            expected,
        })??;

        for r in &results {
            dice.set_value(r.index, r.value);
        }
        tracing::info!(values = ?dice.values(), rolled = expected, "roll completed");
        Ok(RollOutcome { rolled, results })
    }

    /// [`roll_unheld`](Self::roll_unheld) with an optional continuation run
    /// once on success.
    pub async fn roll_unheld_then<F>(
        &self,
        dice: &mut DiceSet,
        request: &RollRequest,
        on_done: Option<F>,
    ) -> Result<RollOutcome, DiceError>
    where
        F: FnOnce(&DiceSet, &RollOutcome),
    {
        let outcome = self.roll_unheld(dice, request).await?;
        if let Some(f) = on_done {
            f(dice, &outcome);
        }
        Ok(outcome)
    }
}
