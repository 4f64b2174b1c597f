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

//! The cycle loop.

use crate::catch_up::plan_ticks;
use crate::config::{ErrorBehavior, PacerConfig};
use crate::drift::{ideal_cycle_start, throttle_correction};
use crate::rate::RateCounter;
use cadence_control::{Capacity, Scheduler};
use cadence_core::cancel::CancelToken;
use cadence_core::clock::{Clock, SystemClock};
use cadence_core::error::{ConfigError, PacerError};
use cadence_core::sink::{ErrorSink, NoopStatsSink, StatsSink};
use cadence_core::stats::{possible_fps, CycleStats, TickContext, Timings};
use cadence_core::task::Task;
use cadence_core::utils::timer::Stopwatch;
use cadence_telemetry::LogErrorSink;
use std::sync::Arc;

/// The caller's simulation, driven by the pacer.
pub trait Simulation {
    /// Advances the state by one fixed step. Called at least once per cycle.
    fn update(&mut self, tick: TickContext) -> anyhow::Result<()>;

    /// Presents the current state. Called exactly once per cycle.
    fn draw(&mut self) -> anyhow::Result<()>;
}

/// A [`Simulation`] made of two closures.
pub struct FnSimulation<U, D> {
    update: U,
    draw: D,
}

impl<U, D> FnSimulation<U, D>
where
    U: FnMut(TickContext) -> anyhow::Result<()>,
    D: FnMut() -> anyhow::Result<()>,
{
    /// Wraps an update and a draw closure.
    pub fn new(update: U, draw: D) -> Self {
        Self { update, draw }
    }
}

impl<U, D> Simulation for FnSimulation<U, D>
where
    U: FnMut(TickContext) -> anyhow::Result<()>,
    D: FnMut() -> anyhow::Result<()>,
{
    fn update(&mut self, tick: TickContext) -> anyhow::Result<()> {
        (self.update)(tick)
    }

    fn draw(&mut self) -> anyhow::Result<()> {
        (self.draw)()
    }
}

/// A builder for [`CyclePacer`].
///
/// Everything is applied once here; the pacer cannot be reconfigured while
/// it runs.
pub struct PacerBuilder {
    config: PacerConfig,
    clock: Arc<dyn Clock>,
    tasks: Vec<Task>,
    error_sink: Box<dyn ErrorSink>,
    stats_sink: Box<dyn StatsSink>,
}

impl PacerBuilder {
    fn new(config: PacerConfig) -> Self {
        Self {
            config,
            clock: Arc::new(SystemClock),
            tasks: Vec::new(),
            error_sink: Box::new(LogErrorSink),
            stats_sink: Box::new(NoopStatsSink),
        }
    }

    /// Replaces the wall clock, e.g. with a `ManualClock` in tests.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Registers a background task.
    pub fn with_task(mut self, task: Task) -> Self {
        self.tasks.push(task);
        self
    }

    /// Registers several background tasks.
    pub fn with_tasks(mut self, tasks: impl IntoIterator<Item = Task>) -> Self {
        self.tasks.extend(tasks);
        self
    }

    /// Receives failures under [`ErrorBehavior::Log`]. Defaults to
    /// [`LogErrorSink`].
    pub fn with_error_sink(mut self, sink: impl ErrorSink + 'static) -> Self {
        self.error_sink = Box::new(sink);
        self
    }

    /// Receives one snapshot per cycle. Defaults to a no-op sink.
    pub fn with_stats_sink(mut self, sink: impl StatsSink + 'static) -> Self {
        self.stats_sink = Box::new(sink);
        self
    }

    /// Validates the configuration and builds the pacer.
    ///
    /// # Errors
    /// Returns a [`ConfigError`] if the configuration is invalid.
    pub fn build(self) -> Result<CyclePacer, ConfigError> {
        self.config.validate()?;

        let rate = self.config.rate_duration();
        let scheduler = Scheduler::with_tasks(Arc::clone(&self.clock), self.tasks);
        let stats = CycleStats::new(self.config.target_tps, rate, self.clock.now());

        log::info!(
            "CyclePacer configured: {} TPS ({:?} per cycle), {} background task(s), on error: {:?}",
            self.config.target_tps,
            rate,
            scheduler.len(),
            self.config.error_behavior,
        );

        Ok(CyclePacer {
            config: self.config,
            rate,
            clock: self.clock,
            scheduler,
            error_sink: self.error_sink,
            stats_sink: self.stats_sink,
            stats,
        })
    }
}

/// Drives a [`Simulation`] at a fixed tick rate.
///
/// One cycle is `update × n → draw → background tasks → throttle`, where `n`
/// is at least 1 and grows with each period the previous cycle stalled for,
/// unless `max_catch_up_ticks` caps it. Every update receives the same fixed
/// `delta_time` of `1s / target_tps`.
pub struct CyclePacer {
    config: PacerConfig,
    rate: std::time::Duration,
    clock: Arc<dyn Clock>,
    scheduler: Scheduler,
    error_sink: Box<dyn ErrorSink>,
    stats_sink: Box<dyn StatsSink>,
    stats: CycleStats,
}

impl CyclePacer {
    /// Starts building a pacer.
    pub fn builder(config: PacerConfig) -> PacerBuilder {
        PacerBuilder::new(config)
    }

    /// A pacer with default collaborators and no background task.
    pub fn new(config: PacerConfig) -> Result<Self, ConfigError> {
        Self::builder(config).build()
    }

    /// The configuration the pacer was built with.
    pub fn config(&self) -> &PacerConfig {
        &self.config
    }

    /// The snapshot of the last completed cycle.
    pub fn stats(&self) -> &CycleStats {
        &self.stats
    }

    /// The background task scheduler, for diagnostics.
    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    /// Runs the loop until `cancel` is observed at a cycle boundary.
    ///
    /// # Errors
    /// Under [`ErrorBehavior::Exit`], returns the first update or draw
    /// failure. Under [`ErrorBehavior::Log`] the loop never fails.
    pub fn execute<S: Simulation>(
        &mut self,
        cancel: &CancelToken,
        simulation: &mut S,
    ) -> Result<(), PacerError> {
        let clock = Arc::clone(&self.clock);
        let rate = self.rate;
        let target_tps = self.config.target_tps;
        let max_ticks = self.config.max_catch_up_ticks;

        let game_start = clock.now();
        let mut last_sync_at = game_start;
        let mut rates = RateCounter::new(game_start);
        let mut cycle_id = 0u64;

        self.stats = CycleStats::new(target_tps, rate, game_start);
        log::info!("CyclePacer started at {} TPS", target_tps);

        while !cancel.is_cancelled() {
            // 1. Start
            cycle_id += 1;
            let cycle_start = clock.now();
            let delta_time = cycle_start.saturating_duration_since(last_sync_at);
            last_sync_at += delta_time;

            let mut stats = CycleStats::new(target_tps, rate, game_start);
            stats.cycle_id = cycle_id;
            stats.delta_time = delta_time;
            stats.cycle = Timings::at(cycle_start);
            stats.current_tps = rates.current_tps();
            stats.current_fps = rates.current_fps();

            // 2. Drift correction
            let ideal_start = ideal_cycle_start(game_start, cycle_id, rate);
            stats.throttle_correction = throttle_correction(cycle_start, ideal_start, rate);

            // 3. Catch-up updates
            let ticks = plan_ticks(delta_time, rate, max_ticks);
            let watch = Stopwatch::start(clock.as_ref());
            for tick_index in 0..ticks {
                let tick = TickContext {
                    cycle_id,
                    tick_index,
                    delta_time: rate,
                };
                if let Err(source) = simulation.update(tick) {
                    self.fail(PacerError::Update { cycle_id, source })?;
                }
            }
            stats.tick = Timings {
                start: watch.started_at(),
                duration: watch.elapsed(),
            };
            stats.ticks_this_cycle = ticks;
            if ticks > 1 {
                log::debug!("CyclePacer: cycle {} caught up with {} ticks", cycle_id, ticks);
            }

            // 4. Draw
            let watch = Stopwatch::start(clock.as_ref());
            if let Err(source) = simulation.draw() {
                self.fail(PacerError::Draw { cycle_id, source })?;
            }
            stats.frame = Timings {
                start: watch.started_at(),
                duration: watch.elapsed(),
            };

            // 5. Background tasks, possibly with a negative budget
            let capacity = Capacity::remaining(rate, stats.busy_time());
            let watch = Stopwatch::start(clock.as_ref());
            stats.tasks_run = self.scheduler.execute(capacity);
            stats.tasks = Timings {
                start: watch.started_at(),
                duration: watch.elapsed(),
            };

            // 6. Throttle
            let spent = stats.busy_time() + stats.tasks.duration;
            let throttle = rate
                .saturating_sub(spent)
                .saturating_sub(stats.throttle_correction);
            if throttle.is_zero() {
                log::trace!(
                    "CyclePacer: cycle {} overran its budget ({:?} > {:?})",
                    cycle_id,
                    spent,
                    rate
                );
            } else {
                clock.sleep(throttle);
            }
            stats.throttle_time = throttle;

            // 7. End
            let cycle_end = clock.now();
            stats.cycle.duration = cycle_end.saturating_duration_since(cycle_start);
            stats.game.duration = cycle_end.saturating_duration_since(game_start);
            stats.possible_fps = possible_fps(stats.busy_time());

            if rates.roll(cycle_end) {
                stats.current_tps = rates.current_tps();
                stats.current_fps = rates.current_fps();
            }
            rates.record(ticks, 1);

            self.stats = stats;
            self.stats_sink.collect(stats);
        }

        log::info!("CyclePacer stopped after {} cycle(s)", cycle_id);
        Ok(())
    }

    /// [`execute`](Self::execute) with closures instead of a [`Simulation`].
    pub fn execute_fn<U, D>(
        &mut self,
        cancel: &CancelToken,
        update: U,
        draw: D,
    ) -> Result<(), PacerError>
    where
        U: FnMut(TickContext) -> anyhow::Result<()>,
        D: FnMut() -> anyhow::Result<()>,
    {
        self.execute(cancel, &mut FnSimulation::new(update, draw))
    }

    fn fail(&mut self, error: PacerError) -> Result<(), PacerError> {
        match self.config.error_behavior {
            ErrorBehavior::Exit => {
                log::debug!("CyclePacer: aborting, {}", error);
                Err(error)
            }
            ErrorBehavior::Log => {
                self.error_sink.report(&error);
                Ok(())
            }
        }
    }
}

impl std::fmt::Debug for CyclePacer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CyclePacer")
            .field("config", &self.config)
            .field("rate", &self.rate)
            .field("scheduler", &self.scheduler)
            .field("stats", &self.stats)
            .finish_non_exhaustive()
    }
}
