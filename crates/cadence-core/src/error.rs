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

//! Error types of the pacer and its configuration.
//!
//! Background tasks have no error channel: they are opportunistic and must
//! never be able to halt the loop.

use thiserror::Error;

/// A failure surfaced by the cycle loop.
#[derive(Debug, Error)]
pub enum PacerError {
    /// The state-update callback failed.
    #[error("update failed on cycle {cycle_id}: {source}")]
    Update {
        /// Cycle during which the failure happened.
        cycle_id: u64,
        /// The callback's error.
        #[source]
        source: anyhow::Error,
    },
    /// The draw callback failed.
    #[error("draw failed on cycle {cycle_id}: {source}")]
    Draw {
        /// Cycle during which the failure happened.
        cycle_id: u64,
        /// The callback's error.
        #[source]
        source: anyhow::Error,
    },
    /// The pacer could not be constructed.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl PacerError {
    /// The cycle the failure belongs to, if it came from a callback.
    pub fn cycle_id(&self) -> Option<u64> {
        match self {
            PacerError::Update { cycle_id, .. } | PacerError::Draw { cycle_id, .. } => {
                Some(*cycle_id)
            }
            PacerError::Config(_) => None,
        }
    }
}

/// An invalid pacer configuration, rejected before the loop starts.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// `target_tps` must be strictly positive.
    #[error("target tick rate must be greater than zero")]
    NonPositiveRate,
    /// `target_tps` is so high that one cycle would last less than a
    /// nanosecond.
    #[error("target tick rate of {0} TPS leaves no time per cycle")]
    RateTooHigh(u32),
    /// `max_catch_up_ticks` must allow at least one update per cycle.
    #[error("max catch-up ticks must be at least 1")]
    ZeroCatchUpTicks,
    /// The configuration document could not be parsed.
    #[error("failed to parse pacer configuration: {0}")]
    Parse(#[from] serde_json::Error),
}
