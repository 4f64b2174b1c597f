// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use cadence_core::{CancelToken, CycleStats, ManualClock, PacerError, Task, TaskPriority};
use cadence_pacer::drift::ideal_cycle_start;
use cadence_pacer::{CyclePacer, ErrorBehavior, PacerConfig};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

type Recorded = Arc<Mutex<Vec<CycleStats>>>;

/// A stats sink that records every snapshot and cancels after `cycles`.
fn recorder(cancel: &CancelToken, cycles: u64) -> (impl FnMut(CycleStats) + Send, Recorded) {
    let recorded: Recorded = Arc::new(Mutex::new(Vec::new()));
    let sink_records = recorded.clone();
    let stop = cancel.clone();
    let sink = move |stats: CycleStats| {
        sink_records.lock().unwrap().push(stats);
        if stats.cycle_id >= cycles {
            stop.cancel();
        }
    };
    (sink, recorded)
}

/// A task whose action advances the manual clock by `cost`.
fn costly_task(clock: &Arc<ManualClock>, cost: Duration, runs: &Arc<AtomicUsize>) -> Task {
    let clock = clock.clone();
    let runs = runs.clone();
    Task::new("costly", move || {
        clock.advance(cost);
        runs.fetch_add(1, Ordering::SeqCst);
    })
}

#[test]
fn test_sustains_target_rate_within_budget() {
    // --- 1. ARRANGE ---
    // 24 TPS gives ~41.6ms per cycle; update + draw cost 35ms.
    let clock = Arc::new(ManualClock::new());
    let cancel = CancelToken::new();
    let (sink, recorded) = recorder(&cancel, 120);
    let mut pacer = CyclePacer::builder(PacerConfig::with_target_tps(24))
        .with_clock(clock.clone())
        .with_stats_sink(sink)
        .build()
        .unwrap();

    // --- 2. ACT ---
    pacer
        .execute_fn(
            &cancel,
            |_| {
                clock.advance(Duration::from_millis(25));
                Ok(())
            },
            || {
                clock.advance(Duration::from_millis(10));
                Ok(())
            },
        )
        .unwrap();

    // --- 3. ASSERT ---
    let recorded = recorded.lock().unwrap();
    assert_eq!(recorded.len(), 120);
    for stats in recorded.iter() {
        assert!(stats.throttle_time > Duration::ZERO, "cycle {} did not throttle", stats.cycle_id);
        assert_eq!(stats.ticks_this_cycle, 1);
        assert_eq!(stats.possible_fps, 28);
    }
    // rates are reported once the first second has elapsed
    for stats in recorded.iter().filter(|s| s.cycle_id >= 25) {
        assert_eq!(stats.current_tps, 24, "cycle {}", stats.cycle_id);
        assert_eq!(stats.current_fps, 24, "cycle {}", stats.cycle_id);
    }
}

#[test]
fn test_overrun_clamps_throttle_and_drops_rate() {
    // --- 1. ARRANGE ---
    // 50ms of work per cycle against a ~41.6ms budget.
    let clock = Arc::new(ManualClock::new());
    let cancel = CancelToken::new();
    let (sink, recorded) = recorder(&cancel, 100);
    let mut pacer = CyclePacer::builder(PacerConfig::with_target_tps(24))
        .with_clock(clock.clone())
        .with_stats_sink(sink)
        .build()
        .unwrap();

    // --- 2. ACT ---
    pacer
        .execute_fn(
            &cancel,
            |_| {
                clock.advance(Duration::from_millis(40));
                Ok(())
            },
            || {
                clock.advance(Duration::from_millis(10));
                Ok(())
            },
        )
        .unwrap();

    // --- 3. ASSERT ---
    let recorded = recorded.lock().unwrap();
    assert!(recorded.iter().all(|s| s.throttle_time.is_zero()));
    assert!(recorded.iter().all(|s| s.ticks_this_cycle == 1));
    for stats in recorded.iter().filter(|s| s.cycle_id >= 20) {
        assert!(stats.current_tps > 0);
        assert!(stats.current_tps < 24, "reported {} TPS", stats.current_tps);
    }
}

/// Runs two cycles at 50 TPS where the first update stalls for `stall`, and
/// returns the updates run by each cycle.
fn ticks_after_stall(config: PacerConfig, stall: Duration) -> Vec<u32> {
    let clock = Arc::new(ManualClock::new());
    let cancel = CancelToken::new();
    let (sink, recorded) = recorder(&cancel, 2);
    let mut pacer = CyclePacer::builder(config)
        .with_clock(clock.clone())
        .with_stats_sink(sink)
        .build()
        .unwrap();

    pacer
        .execute_fn(
            &cancel,
            |tick| {
                if tick.cycle_id == 1 {
                    clock.advance(stall);
                }
                Ok(())
            },
            || Ok(()),
        )
        .unwrap();

    let recorded = recorded.lock().unwrap();
    recorded.iter().map(|s| s.ticks_this_cycle).collect()
}

#[test]
fn test_long_stall_is_fully_caught_up_by_default() {
    // --- 1. ARRANGE ---
    // 20ms per cycle; the first update stalls for just over ten periods.
    let config = PacerConfig::with_target_tps(50);

    // --- 2. ACT ---
    let ticks = ticks_after_stall(config, Duration::from_millis(201));

    // --- 3. ASSERT ---
    assert_eq!(ticks, vec![1, 10]);
}

#[test]
fn test_catch_up_cap_drops_excess_ticks() {
    // --- 1. ARRANGE ---
    let config = PacerConfig::with_target_tps(50).max_catch_up_ticks(5);

    // --- 2. ACT ---
    let ticks = ticks_after_stall(config, Duration::from_millis(201));

    // --- 3. ASSERT ---
    assert_eq!(ticks, vec![1, 5]);
}

#[test]
fn test_drift_stays_bounded_over_a_thousand_cycles() {
    // --- 1. ARRANGE ---
    // Every sleep wakes up 0.3ms late.
    let clock = Arc::new(ManualClock::new().with_sleep_overshoot(Duration::from_micros(300)));
    let cancel = CancelToken::new();
    let (sink, recorded) = recorder(&cancel, 1000);
    let mut pacer = CyclePacer::builder(PacerConfig::with_target_tps(60))
        .with_clock(clock.clone())
        .with_stats_sink(sink)
        .build()
        .unwrap();

    // --- 2. ACT ---
    pacer
        .execute_fn(
            &cancel,
            |_| {
                clock.advance(Duration::from_millis(5));
                Ok(())
            },
            || Ok(()),
        )
        .unwrap();

    // --- 3. ASSERT ---
    // Without correction the last cycle would start ~300ms late.
    let recorded = recorded.lock().unwrap();
    assert_eq!(recorded.len(), 1000);
    let worst = recorded
        .iter()
        .map(|s| {
            let ideal = ideal_cycle_start(s.game.start, s.cycle_id, s.rate);
            s.cycle.start.saturating_duration_since(ideal)
        })
        .max()
        .unwrap();
    assert!(worst <= Duration::from_micros(300), "drifted by {worst:?}");
}

#[test]
fn test_exit_policy_returns_first_failure() {
    let clock = Arc::new(ManualClock::new());
    let mut pacer = CyclePacer::builder(PacerConfig::with_target_tps(30))
        .with_clock(clock.clone())
        .build()
        .unwrap();
    let draws = AtomicUsize::new(0);

    let err = pacer
        .execute_fn(
            &CancelToken::new(),
            |tick| {
                clock.advance(Duration::from_millis(1));
                if tick.cycle_id == 3 {
                    anyhow::bail!("state corrupted");
                }
                Ok(())
            },
            || {
                draws.fetch_add(1, Ordering::SeqCst);
                Ok(())
            },
        )
        .unwrap_err();

    assert!(matches!(err, PacerError::Update { cycle_id: 3, .. }));
    assert_eq!(err.to_string(), "update failed on cycle 3: state corrupted");
    assert_eq!(draws.load(Ordering::SeqCst), 2);
}

#[test]
fn test_exit_policy_on_draw_failure() {
    let mut pacer = CyclePacer::builder(PacerConfig::with_target_tps(30))
        .with_clock(Arc::new(ManualClock::new()))
        .build()
        .unwrap();

    let err = pacer
        .execute_fn(
            &CancelToken::new(),
            |_| Ok(()),
            || Err(anyhow::anyhow!("device lost")),
        )
        .unwrap_err();

    assert_eq!(err.cycle_id(), Some(1));
    assert!(matches!(err, PacerError::Draw { .. }));
}

#[test]
fn test_log_policy_keeps_pacing() {
    // --- 1. ARRANGE ---
    let clock = Arc::new(ManualClock::new());
    let cancel = CancelToken::new();
    let (sink, recorded) = recorder(&cancel, 10);
    let errors = Arc::new(Mutex::new(Vec::new()));
    let error_log = errors.clone();
    let config = PacerConfig::with_target_tps(25).error_behavior(ErrorBehavior::Log);
    let mut pacer = CyclePacer::builder(config)
        .with_clock(clock.clone())
        .with_stats_sink(sink)
        .with_error_sink(move |err: &PacerError| error_log.lock().unwrap().push(err.to_string()))
        .build()
        .unwrap();

    // --- 2. ACT ---
    pacer
        .execute_fn(
            &cancel,
            |_| {
                clock.advance(Duration::from_millis(10));
                Err(anyhow::anyhow!("tick failed"))
            },
            || {
                clock.advance(Duration::from_millis(5));
                Err(anyhow::anyhow!("frame failed"))
            },
        )
        .unwrap();

    // --- 3. ASSERT ---
    let errors = errors.lock().unwrap();
    assert_eq!(errors.len(), 20);
    assert_eq!(errors[0], "update failed on cycle 1: tick failed");
    assert_eq!(errors[1], "draw failed on cycle 1: frame failed");

    let recorded = recorded.lock().unwrap();
    assert_eq!(recorded.len(), 10);
    assert!(recorded.iter().all(|s| s.throttle_time == Duration::from_millis(25)));
}

#[test]
fn test_tasks_run_in_spare_time() {
    // --- 1. ARRANGE ---
    let clock = Arc::new(ManualClock::new());
    let cancel = CancelToken::new();
    let (sink, recorded) = recorder(&cancel, 120);
    let runs = Arc::new(AtomicUsize::new(0));
    let task = costly_task(&clock, Duration::from_millis(2), &runs)
        .with_priority(TaskPriority::High)
        .run_at_least_once_in(Duration::from_secs(1))
        .run_at_most_once_in(Duration::from_millis(100));
    let mut pacer = CyclePacer::builder(PacerConfig::with_target_tps(24))
        .with_clock(clock.clone())
        .with_task(task)
        .with_stats_sink(sink)
        .build()
        .unwrap();

    // --- 2. ACT ---
    // ~5 simulated seconds with ~6.6ms of spare time per cycle.
    pacer
        .execute_fn(
            &cancel,
            |_| {
                clock.advance(Duration::from_millis(25));
                Ok(())
            },
            || {
                clock.advance(Duration::from_millis(10));
                Ok(())
            },
        )
        .unwrap();

    // --- 3. ASSERT ---
    // rate-limited to one run per 100ms, i.e. every third cycle
    let count = runs.load(Ordering::SeqCst);
    assert!((35..=45).contains(&count), "ran {count} times");

    let recorded = recorded.lock().unwrap();
    assert!(recorded.iter().all(|s| s.throttle_time > Duration::ZERO));
    assert_eq!(recorded.iter().map(|s| s.tasks_run).sum::<usize>(), count);

    let task_stats = pacer.scheduler().task_stats();
    assert_eq!(task_stats[0].avg_duration, Duration::from_millis(2));
}

#[test]
fn test_overdue_task_runs_even_when_overrunning() {
    // --- 1. ARRANGE ---
    let clock = Arc::new(ManualClock::new());
    let cancel = CancelToken::new();
    let (sink, _recorded) = recorder(&cancel, 100);
    let runs = Arc::new(AtomicUsize::new(0));
    let task = costly_task(&clock, Duration::from_millis(1), &runs)
        .with_priority(TaskPriority::Low)
        .run_at_least_once_in(Duration::from_secs(1))
        .run_at_most_once_in(Duration::from_millis(100));
    let mut pacer = CyclePacer::builder(PacerConfig::with_target_tps(24))
        .with_clock(clock.clone())
        .with_task(task)
        .with_stats_sink(sink)
        .build()
        .unwrap();

    // --- 2. ACT ---
    // 50ms of work per cycle: the budget is always negative.
    pacer
        .execute_fn(
            &cancel,
            |_| {
                clock.advance(Duration::from_millis(50));
                Ok(())
            },
            || Ok(()),
        )
        .unwrap();

    // --- 3. ASSERT ---
    // ~5 simulated seconds: the forced first run plus one per second
    let count = runs.load(Ordering::SeqCst);
    assert!((4..=6).contains(&count), "ran {count} times");
}

#[test]
fn test_system_clock_smoke() {
    let mut pacer = CyclePacer::new(PacerConfig::with_target_tps(100)).unwrap();
    let cancel = CancelToken::new().cancel_after(Duration::from_millis(200));
    let mut updates = 0u32;

    pacer
        .execute_fn(
            &cancel,
            |_| {
                updates += 1;
                Ok(())
            },
            || Ok(()),
        )
        .unwrap();

    assert!(updates >= 5, "only {updates} updates in 200ms");
    assert!(pacer.stats().cycle_id >= 5);
}
