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

use cadence_control::{Capacity, Scheduler};
use cadence_core::{ManualClock, Task, TaskPriority};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// A task whose action advances the manual clock by `cost` and counts its runs.
fn counting_task(
    name: &str,
    clock: &Arc<ManualClock>,
    cost: Duration,
) -> (Task, Arc<AtomicUsize>) {
    let runs = Arc::new(AtomicUsize::new(0));
    let task_runs = runs.clone();
    let clock = clock.clone();
    let task = Task::new(name, move || {
        clock.advance(cost);
        task_runs.fetch_add(1, Ordering::SeqCst);
    });
    (task, runs)
}

#[test]
fn test_every_task_runs_once_on_first_pass() {
    // --- 1. ARRANGE ---
    let clock = Arc::new(ManualClock::new());
    let (a, a_runs) = counting_task("a", &clock, Duration::from_millis(5));
    let (b, b_runs) = counting_task("b", &clock, Duration::from_millis(5));
    let (c, c_runs) = counting_task("c", &clock, Duration::from_millis(5));
    let mut scheduler = Scheduler::with_tasks(
        clock.clone(),
        [a, b.with_priority(TaskPriority::Low), c.with_priority(TaskPriority::High)],
    );

    // --- 2. ACT ---
    // No budget at all: never-run tasks are critical and bypass it.
    let executed = scheduler.execute(Capacity::ZERO);

    // --- 3. ASSERT ---
    assert_eq!(executed, 3);
    assert_eq!(a_runs.load(Ordering::SeqCst), 1);
    assert_eq!(b_runs.load(Ordering::SeqCst), 1);
    assert_eq!(c_runs.load(Ordering::SeqCst), 1);
    for snapshot in scheduler.task_stats() {
        assert_eq!(snapshot.runs_count, 1);
        assert_eq!(snapshot.avg_duration, Duration::from_millis(5));
    }
}

#[test]
fn test_overdue_task_runs_even_with_negative_capacity() {
    // --- 1. ARRANGE ---
    let clock = Arc::new(ManualClock::new());
    let (task, runs) = counting_task("reclaim", &clock, Duration::from_millis(2));
    let mut scheduler = Scheduler::with_tasks(
        clock.clone(),
        [task
            .with_priority(TaskPriority::Low)
            .run_at_least_once_in(Duration::from_secs(5))
            .run_at_most_once_in(Duration::from_millis(100))],
    );
    let overrun = Capacity::remaining(Duration::from_millis(40), Duration::from_millis(55));

    // --- 2. ACT ---
    // Every cycle overruns its budget, 40ms of simulated time per cycle.
    for _ in 0..500 {
        scheduler.execute(overrun);
        clock.advance(Duration::from_millis(40));
    }

    // --- 3. ASSERT ---
    // 500 cycles of ~40ms is ~20s: the first forced run plus one per 5s.
    let count = runs.load(Ordering::SeqCst);
    assert!((4..=5).contains(&count), "ran {count} times");
}

#[test]
fn test_rate_limit_caps_frequency_with_unlimited_budget() {
    // --- 1. ARRANGE ---
    let clock = Arc::new(ManualClock::new());
    let (task, runs) = counting_task("poll", &clock, Duration::from_millis(1));
    let mut scheduler = Scheduler::with_tasks(
        clock.clone(),
        [task
            .run_at_least_once_in(Duration::from_secs(10))
            .run_at_most_once_in(Duration::from_millis(100))],
    );
    let budget = Capacity::from_duration(Duration::from_secs(1));

    // --- 2. ACT ---
    // One simulated second in 10ms steps.
    for _ in 0..100 {
        scheduler.execute(budget);
        clock.advance(Duration::from_millis(10));
    }

    // --- 3. ASSERT ---
    let count = runs.load(Ordering::SeqCst);
    assert!(count <= 11, "rate limit exceeded: {count} runs");
    assert!(count >= 9, "task starved: {count} runs");
}

#[test]
fn test_average_converges_to_steady_cost() {
    // --- 1. ARRANGE ---
    let clock = Arc::new(ManualClock::new());
    let (task, _runs) = counting_task("steady", &clock, Duration::from_millis(3));
    let mut scheduler = Scheduler::with_tasks(
        clock.clone(),
        [task.run_at_most_once_in(Duration::ZERO)],
    );

    // --- 2. ACT ---
    for _ in 0..20 {
        scheduler.execute(Capacity::from_duration(Duration::from_millis(10)));
        clock.advance(Duration::from_millis(1));
    }

    // --- 3. ASSERT ---
    let stats = scheduler.task_stats();
    assert_eq!(stats[0].runs_count, 20);
    assert_eq!(stats[0].avg_duration, Duration::from_millis(3));
}

#[test]
fn test_empty_scheduler_is_a_no_op() {
    let mut scheduler = Scheduler::new(Arc::new(ManualClock::new()));
    assert!(scheduler.is_empty());
    assert_eq!(scheduler.execute(Capacity::from_duration(Duration::from_secs(1))), 0);
}
