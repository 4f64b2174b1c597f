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

//! # Cadence Pacer
//!
//! The fixed-rate cycle loop. Each cycle runs the catch-up state updates, one
//! draw call, the background tasks admitted by the leftover budget, and a
//! drift-corrected sleep, then hands a [`CycleStats`] snapshot to the stats
//! sink.
//!
//! The loop is single-threaded: every callback runs on the thread that called
//! [`CyclePacer::execute`], and the [`CancelToken`] is only observed between
//! cycles.
//!
//! [`CycleStats`]: cadence_core::CycleStats
//! [`CancelToken`]: cadence_core::CancelToken

#![warn(missing_docs)]

pub mod catch_up;
pub mod config;
pub mod drift;
pub mod executor;
pub mod rate;

pub use config::{ErrorBehavior, PacerConfig};
pub use executor::{CyclePacer, FnSimulation, PacerBuilder, Simulation};
pub use rate::RateCounter;
