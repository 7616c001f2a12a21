use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use tokio::runtime::Handle;
use tokio::sync::watch;

use crate::die::{MAX_FACE, MIN_FACE};
use crate::roll::{DieReport, DieRoller, RollRequest};

/// Deterministic roll adapter backed by ChaCha20.
///
/// Faces are drawn when a die is dispatched, so the same seed yields the same
/// faces in dispatch order no matter when each die settles. Dice settle on a
/// tokio task after `settle_delay`; a request with `keep_juggling` rattles
/// until [`stop_juggling`](Self::stop_juggling) or its `juggle_timeout`.
#[derive(Debug)]
pub struct SeededRoller {
    rng: Mutex<ChaCha20Rng>,
    settle_delay: Duration,
    stop: watch::Sender<u64>,
    juggling: Arc<AtomicUsize>,
}

impl SeededRoller {
    pub fn new(seed: u64) -> Self {
        let (stop, _) = watch::channel(0);
        Self {
            rng: Mutex::new(ChaCha20Rng::seed_from_u64(seed)),
            settle_delay: Duration::ZERO,
            stop,
            juggling: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn with_settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay = delay;
        self
    }

    /// Ends every rattle in progress; each juggling die then settles.
    pub fn stop_juggling(&self) {
        self.stop.send_modify(|epoch| *epoch += 1);
        tracing::debug!("juggling stopped");
    }

    /// Number of dice currently rattling.
    pub fn juggling(&self) -> usize {
        self.juggling.load(Ordering::Acquire)
    }

    fn next_face(&self) -> u8 {
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        rng.random_range(MIN_FACE..=MAX_FACE)
    }
}

impl DieRoller for SeededRoller {
    fn roll(&self, index: usize, request: &RollRequest, report: DieReport) {
        let face = self.next_face();
        if !request.keep_juggling && self.settle_delay.is_zero() {
            report.settle(face);
            return;
        }
        let Ok(handle) = Handle::try_current() else {
            tracing::warn!(index, "no tokio runtime, settling die immediately");
            report.settle(face);
            return;
        };

        // subscribe before spawning so a stop sent in between is not missed
        let juggle = request
            .keep_juggling
            .then(|| (self.stop.subscribe(), request.juggle_timeout));
        if juggle.is_some() {
            self.juggling.fetch_add(1, Ordering::AcqRel);
        }
        let juggling = Arc::clone(&self.juggling);
        let delay = self.settle_delay;

        handle.spawn(async move {
            if let Some((mut stop, timeout)) = juggle {
                match timeout {
                    Some(t) => {
                        let _ = tokio::time::timeout(t, stop.changed()).await;
                    }
                    None => {
                        let _ = stop.changed().await;
                    }
                }
                juggling.fetch_sub(1, Ordering::AcqRel);
            }
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            report.settle(face);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dice_set::DiceSet;
    use crate::roll::RollCoordinator;

    #[test]
    fn same_seed_same_faces() {
        let a = SeededRoller::new(42);
        let b = SeededRoller::new(42);
        let fa: Vec<u8> = (0..20).map(|_| a.next_face()).collect();
        let fb: Vec<u8> = (0..20).map(|_| b.next_face()).collect();
        assert_eq!(fa, fb);
        assert!(fa.iter().all(|f| (1..=6).contains(f)));
    }

    #[tokio::test]
    async fn immediate_roller_fills_all_dice() {
        let coordinator = RollCoordinator::new(Arc::new(SeededRoller::new(1)));
        let mut dice = DiceSet::new();
        let outcome = coordinator
            .roll_unheld(&mut dice, &RollRequest::default())
            .await
            .unwrap();
        assert_eq!(outcome.rolled, vec![0, 1, 2, 3, 4]);
        assert!(dice.is_fully_rolled());
    }

    #[tokio::test]
    async fn juggle_times_out_without_stop() {
        let roller = Arc::new(SeededRoller::new(3));
        let coordinator = RollCoordinator::new(roller.clone());
        let mut dice = DiceSet::new();
        let request = RollRequest::default()
            .juggling()
            .with_juggle_timeout(Duration::from_millis(5));
        coordinator.roll_unheld(&mut dice, &request).await.unwrap();
        assert!(dice.is_fully_rolled());
        assert_eq!(roller.juggling(), 0);
    }
}
