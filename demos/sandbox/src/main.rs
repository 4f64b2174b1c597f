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

// Paces a synthetic workload and prints one table row per cycle.
// Run with: cargo run -p sandbox -- --tps 24 --update-ms 25 --draw-ms 10

use anyhow::{Context, Result};
use cadence_sdk::prelude::*;
use cadence_sdk::{init_logging, FanOut};
use clap::Parser;
use std::thread;
use std::time::{Duration, Instant};

#[derive(Debug, Parser)]
#[command(name = "sandbox", about = "Frame pacer sandbox")]
struct Args {
    /// Target ticks per second.
    #[arg(long, default_value_t = 24)]
    tps: u32,
    /// How long to run, in seconds.
    #[arg(long, default_value_t = 1.0)]
    seconds: f64,
    /// Simulated cost of one state update, in milliseconds.
    #[arg(long, default_value_t = 25)]
    update_ms: u64,
    /// Simulated cost of one draw, in milliseconds.
    #[arg(long, default_value_t = 10)]
    draw_ms: u64,
    /// Simulated cost of the background task, in milliseconds.
    #[arg(long, default_value_t = 5)]
    task_ms: u64,
    /// Keep running when a callback fails.
    #[arg(long)]
    log_errors: bool,
}

/// A task that only fits when the CPU outpaces the target rate, but still
/// runs at least once a second.
fn busy_task(latency: Duration) -> Task {
    Task::new("busy-work", move || thread::sleep(latency))
        .with_priority(TaskPriority::High)
        .run_at_least_once_in(Duration::from_secs(1))
        .run_at_most_once_in(Duration::from_millis(500))
}

/// Converts the `--seconds` flag, rejecting values a `Duration` cannot hold.
fn run_duration(seconds: f64) -> Result<Duration> {
    Duration::try_from_secs_f64(seconds)
        .with_context(|| format!("invalid run duration: {seconds}s"))
}

fn print_row(started: Instant, stats: &CycleStats) {
    println!(
        "|  {:04}ms |  {:03}  | {:02}/{:02} |   {:02}  |     {:02}ms |     {:02}ms |     {:02}ms |     {:02}ms |     {:02}ms |",
        started.elapsed().as_millis(),
        stats.cycle_id,
        stats.current_tps,
        stats.target_tps,
        stats.current_fps,
        stats.rate.as_millis(),
        stats.tick.duration.as_millis(),
        stats.frame.duration.as_millis(),
        stats.tasks.duration.as_millis(),
        stats.throttle_time.as_millis(),
    );
}

fn main() -> Result<()> {
    init_logging();
    let args = Args::parse();

    let behavior = if args.log_errors {
        ErrorBehavior::Log
    } else {
        ErrorBehavior::Exit
    };
    let config = PacerConfig::with_target_tps(args.tps).error_behavior(behavior);

    let history: StatsHistory = StatsHistory::new();
    let started = Instant::now();
    let table = move |stats: CycleStats| print_row(started, &stats);

    let mut pacer = CyclePacer::builder(config)
        .with_task(busy_task(Duration::from_millis(args.task_ms)))
        .with_task(memory_reclaim(|| log::trace!("sandbox: reclaiming scratch buffers")))
        .with_stats_sink(FanOut::new().with(table).with(history.clone()))
        .build()?;

    println!("| -- STATS --                     | -- Frame --                                          |");
    println!("| elapsed | frame |  TPS  |  FPS  | capacity |   update |    frame |    tasks | throttle |");

    let cancel = CancelToken::new().cancel_after(run_duration(args.seconds)?);
    let update_cost = Duration::from_millis(args.update_ms);
    let draw_cost = Duration::from_millis(args.draw_ms);

    pacer.execute_fn(
        &cancel,
        |_| {
            thread::sleep(update_cost);
            Ok(())
        },
        || {
            thread::sleep(draw_cost);
            Ok(())
        },
    )?;

    let summary = history.summary();
    log::info!(
        "{} cycles: mean {:.2}ms (variance {:.3}), worst {:.2}ms, mean throttle {:.2}ms",
        pacer.stats().cycle_id,
        summary.cycle_mean_ms,
        summary.cycle_variance,
        summary.cycle_max_ms,
        summary.throttle_mean_ms,
    );
    for task in pacer.scheduler().task_stats() {
        log::info!(
            "task '{}': {} run(s), avg {:?}",
            task.name,
            task.runs_count,
            task.avg_duration
        );
    }
    Ok(())
}
