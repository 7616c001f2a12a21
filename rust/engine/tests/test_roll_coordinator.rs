use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{mpsc, Arc, Mutex};
use std::time::Duration;

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

use yam_engine::dice_set::DiceSet;
use yam_engine::errors::DiceError;
use yam_engine::roll::{DieReport, DieRoller, RollCoordinator, RollRequest, RollResult};
use yam_engine::roller::SeededRoller;
use yam_engine::selection::{toggle_held, unheld};

/// Keeps every report so the test decides when and in what order dice settle.
#[derive(Default)]
struct ScriptedRoller {
    pending: Mutex<Vec<DieReport>>,
    requests: Mutex<Vec<RollRequest>>,
}

impl DieRoller for ScriptedRoller {
    fn roll(&self, _index: usize, request: &RollRequest, report: DieReport) {
        self.requests.lock().unwrap().push(request.clone());
        self.pending.lock().unwrap().push(report);
    }
}

impl ScriptedRoller {
    fn take(&self) -> Vec<DieReport> {
        std::mem::take(&mut *self.pending.lock().unwrap())
    }
}

fn face_for(index: usize) -> u8 {
    (index as u8 % 6) + 1
}

#[test]
fn on_done_fires_once_after_last_result_in_any_order() {
    for seed in 0..200u64 {
        let mut rng = ChaCha20Rng::seed_from_u64(seed);
        let mut dice = DiceSet::new();
        for i in 0..5 {
            if rng.random_bool(0.4) {
                dice.set_held(i, true);
            }
        }
        let targets = unheld(&dice);
        let n = targets.len();

        let roller = Arc::new(ScriptedRoller::default());
        let coordinator = RollCoordinator::new(roller.clone());
        let fired = Arc::new(AtomicUsize::new(0));
        let collected = Arc::new(Mutex::new(Vec::new()));
        {
            let fired = Arc::clone(&fired);
            let collected = Arc::clone(&collected);
            coordinator.dispatch(&targets, &RollRequest::default(), move |results| {
                fired.fetch_add(1, Ordering::SeqCst);
                *collected.lock().unwrap() = results;
            });
        }

        let mut reports = roller.take();
        assert_eq!(reports.len(), n);
        reports.shuffle(&mut rng);

        if n == 0 {
            assert_eq!(fired.load(Ordering::SeqCst), 1, "seed {}", seed);
            continue;
        }
        let order: Vec<usize> = reports.iter().map(|r| r.index()).collect();
        for (k, report) in reports.into_iter().enumerate() {
            assert_eq!(fired.load(Ordering::SeqCst), 0, "fired early, seed {}", seed);
            let value = face_for(report.index());
            report.settle(value);
            if k + 1 == n {
                assert_eq!(fired.load(Ordering::SeqCst), 1, "seed {}", seed);
            }
        }

        let results = collected.lock().unwrap().clone();
        let arrived: Vec<usize> = results.iter().map(|r| r.index).collect();
        assert_eq!(arrived, order, "results keep arrival order");
        assert_eq!(fired.load(Ordering::SeqCst), 1);
    }
}

/// Settles each die from its own OS thread after a random pause.
struct ThreadedRoller {
    seed: u64,
    handles: Mutex<Vec<std::thread::JoinHandle<()>>>,
}

impl DieRoller for ThreadedRoller {
    fn roll(&self, index: usize, _request: &RollRequest, report: DieReport) {
        let mut rng = ChaCha20Rng::seed_from_u64(self.seed + index as u64);
        let pause = Duration::from_micros(rng.random_range(0..300));
        let value = rng.random_range(1..=6);
        let handle = std::thread::spawn(move || {
            std::thread::sleep(pause);
            report.settle(value);
        });
        self.handles.lock().unwrap().push(handle);
    }
}

#[test]
fn concurrent_completions_fire_exactly_once() {
    for seed in 0..50u64 {
        let roller = Arc::new(ThreadedRoller {
            seed,
            handles: Mutex::new(Vec::new()),
        });
        let coordinator = RollCoordinator::new(roller.clone());
        let fired = Arc::new(AtomicUsize::new(0));
        let (tx, rx) = mpsc::channel();
        {
            let fired = Arc::clone(&fired);
            coordinator.dispatch(&[0, 1, 2, 3, 4], &RollRequest::default(), move |results| {
                fired.fetch_add(1, Ordering::SeqCst);
                let _ = tx.send(results);
            });
        }
        let results: Vec<RollResult> = rx.recv_timeout(Duration::from_secs(5)).expect("roll done");
        for h in std::mem::take(&mut *roller.handles.lock().unwrap()) {
            h.join().unwrap();
        }
        assert_eq!(fired.load(Ordering::SeqCst), 1);
        let mut indices: Vec<usize> = results.iter().map(|r| r.index).collect();
        indices.sort_unstable();
        assert_eq!(indices, vec![0, 1, 2, 3, 4]);
    }
}

#[tokio::test]
async fn roll_unheld_records_values_and_skips_held_dice() {
    let roller = Arc::new(ScriptedRoller::default());
    let coordinator = RollCoordinator::new(roller.clone());
    let mut dice = DiceSet::with_values([6, 1, 6, 1, 1]);
    dice.set_held(0, true);
    dice.set_held(2, true);

    let request = RollRequest::default().with_style("ivory");
    let settle = async {
        let mut reports = roller.take();
        while reports.is_empty() {
            tokio::task::yield_now().await;
            reports = roller.take();
        }
        reports.reverse();
        for r in reports {
            r.settle(5);
        }
    };
    let (outcome, ()) = tokio::join!(coordinator.roll_unheld(&mut dice, &request), settle);
    let outcome = outcome.unwrap();

    assert_eq!(outcome.rolled, vec![1, 3, 4]);
    assert_eq!(
        outcome.results.iter().map(|r| r.index).collect::<Vec<_>>(),
        vec![4, 3, 1]
    );
    assert_eq!(dice.values(), [6, 5, 6, 5, 5]);
    assert_eq!(dice.held_mask(), [true, false, true, false, false]);
    let requests = roller.requests.lock().unwrap();
    assert!(requests.iter().all(|r| r.style.as_deref() == Some("ivory")));
}

#[tokio::test]
async fn all_held_completes_immediately() {
    let roller = Arc::new(ScriptedRoller::default());
    let coordinator = RollCoordinator::new(roller.clone());
    let mut dice = DiceSet::with_values([1, 2, 3, 4, 5]);
    for i in 0..5 {
        toggle_held(&mut dice, i);
    }

    let fired = Arc::new(AtomicUsize::new(0));
    let f = Arc::clone(&fired);
    coordinator.dispatch(&unheld(&dice), &RollRequest::default(), move |results| {
        assert!(results.is_empty());
        f.fetch_add(1, Ordering::SeqCst);
    });
    assert_eq!(fired.load(Ordering::SeqCst), 1);

    let outcome = coordinator
        .roll_unheld(&mut dice, &RollRequest::default())
        .await
        .unwrap();
    assert!(outcome.is_empty());
    assert_eq!(dice.values(), [1, 2, 3, 4, 5]);
    assert!(roller.take().is_empty());
}

#[tokio::test]
async fn dropped_reports_abandon_the_roll() {
    let coordinator = RollCoordinator::new(Arc::new(
        |index: usize, _request: &RollRequest, report: DieReport| {
            if index % 2 == 0 {
                report.settle(3);
            }
        },
    ));
    let mut dice = DiceSet::with_values([1, 1, 1, 1, 1]);
    let err = coordinator
        .roll_unheld(&mut dice, &RollRequest::default())
        .await
        .unwrap_err();
    assert_eq!(
        err,
        DiceError::RollAbandoned {
            reported: 3,
            expected: 5
        }
    );
    assert_eq!(dice.values(), [1, 1, 1, 1, 1]);
}

#[tokio::test]
async fn invalid_adapter_faces_agree_with_the_dice() {
    let coordinator = RollCoordinator::new(Arc::new(
        |index: usize, _request: &RollRequest, report: DieReport| {
            report.settle(if index == 1 { 9 } else { 2 });
        },
    ));
    let mut dice = DiceSet::with_values([5, 5, 5, 5, 5]);
    dice.set_held(4, true);
    let outcome = coordinator
        .roll_unheld(&mut dice, &RollRequest::default())
        .await
        .unwrap();
    assert_eq!(dice.values(), [2, 0, 2, 2, 5]);
    for r in &outcome.results {
        assert_eq!(r.value, dice.value_at(r.index));
    }
}

#[tokio::test]
async fn juggling_dice_settle_after_stop() {
    let roller = Arc::new(SeededRoller::new(11).with_settle_delay(Duration::from_millis(1)));
    let coordinator = RollCoordinator::new(roller.clone());
    let mut dice = DiceSet::new();
    dice.set_held(4, true);
    let request = RollRequest::default().juggling();

    let stopper = async {
        while roller.juggling() < 4 {
            tokio::task::yield_now().await;
        }
        roller.stop_juggling();
    };
    let (outcome, ()) = tokio::join!(coordinator.roll_unheld(&mut dice, &request), stopper);

    assert_eq!(outcome.unwrap().rolled, vec![0, 1, 2, 3]);
    assert_eq!(roller.juggling(), 0);
    assert_eq!(dice.value_at(4), 0);
    assert!((0..4).all(|i| dice.get(i).is_rolled()));
}

#[tokio::test]
async fn same_seed_rolls_same_faces() {
    let mut a = DiceSet::new();
    let mut b = DiceSet::new();
    RollCoordinator::new(Arc::new(SeededRoller::new(99)))
        .roll_unheld(&mut a, &RollRequest::default())
        .await
        .unwrap();
    RollCoordinator::new(Arc::new(
        SeededRoller::new(99).with_settle_delay(Duration::from_millis(2)),
    ))
    .roll_unheld(&mut b, &RollRequest::default())
    .await
    .unwrap();
    assert_eq!(a.values(), b.values());
}

#[tokio::test]
async fn continuation_sees_updated_dice() {
    let coordinator = RollCoordinator::new(Arc::new(SeededRoller::new(5)));
    let mut dice = DiceSet::new();
    let mut seen = None;
    coordinator
        .roll_unheld_then(
            &mut dice,
            &RollRequest::default(),
            Some(|d: &DiceSet, o: &yam_engine::roll::RollOutcome| {
                seen = Some((d.values(), o.results.len()));
            }),
        )
        .await
        .unwrap();
    let (values, count) = seen.expect("continuation ran");
    assert_eq!(values, dice.values());
    assert_eq!(count, 5);
}
