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

//! Construction-time configuration of the pacer.

use cadence_core::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const DEFAULT_TARGET_TPS: u32 = 60;
const NANOS_PER_SEC: u32 = 1_000_000_000;

/// What the loop does when the update or draw callback fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorBehavior {
    /// Abort the loop and return the first failure to the caller.
    #[default]
    Exit,
    /// Report the failure to the error sink and keep going.
    Log,
}

/// Immutable settings of a [`CyclePacer`](crate::CyclePacer).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PacerConfig {
    /// State updates per second. Must be greater than zero.
    pub target_tps: u32,
    /// Policy applied to update and draw failures.
    pub error_behavior: ErrorBehavior,
    /// Upper bound on the updates run in one cycle to catch up after a stall.
    /// `None` runs every update the stall owes.
    pub max_catch_up_ticks: Option<u32>,
}

impl Default for PacerConfig {
    fn default() -> Self {
        Self {
            target_tps: DEFAULT_TARGET_TPS,
            error_behavior: ErrorBehavior::default(),
            max_catch_up_ticks: None,
        }
    }
}

impl PacerConfig {
    /// Default configuration running at `target_tps`.
    pub fn with_target_tps(target_tps: u32) -> Self {
        Self {
            target_tps,
            ..Self::default()
        }
    }

    /// Sets the error policy.
    pub fn error_behavior(mut self, behavior: ErrorBehavior) -> Self {
        self.error_behavior = behavior;
        self
    }

    /// Caps the catch-up updates of a cycle. Updates beyond the cap are
    /// dropped and the simulation falls behind wall time.
    pub fn max_catch_up_ticks(mut self, ticks: u32) -> Self {
        self.max_catch_up_ticks = Some(ticks);
        self
    }

    /// Checks the invariants the loop relies on.
    ///
    /// # Errors
    /// Returns [`ConfigError::NonPositiveRate`] for a zero tick rate,
    /// [`ConfigError::RateTooHigh`] when a cycle would last less than a
    /// nanosecond and [`ConfigError::ZeroCatchUpTicks`] when no update would
    /// be allowed.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.target_tps == 0 {
            return Err(ConfigError::NonPositiveRate);
        }
        if self.target_tps > NANOS_PER_SEC {
            return Err(ConfigError::RateTooHigh(self.target_tps));
        }
        if self.max_catch_up_ticks == Some(0) {
            return Err(ConfigError::ZeroCatchUpTicks);
        }
        Ok(())
    }

    /// The cycle budget, `1s / target_tps`.
    ///
    /// A zero rate (rejected by [`validate`](Self::validate)) is treated as 1.
    pub fn rate_duration(&self) -> Duration {
        Duration::from_secs(1) / self.target_tps.max(1)
    }

    /// Parses and validates a JSON document. Missing fields take their
    /// default value.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Serializes the configuration to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
