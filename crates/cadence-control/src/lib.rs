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

//! # Cadence Control
//!
//! Decides which background tasks run in the spare time of a cycle.
//!
//! The [`PriorityEvaluator`] turns a task's bookkeeping into an urgency score;
//! the [`Scheduler`] sorts tasks by that score and greedily admits them against
//! the remaining [`Capacity`] of the cycle. Overdue tasks bypass the budget, so
//! every task eventually runs.

#![warn(missing_docs)]

pub mod capacity;
pub mod priority;
pub mod scheduler;
pub mod state;

pub use capacity::Capacity;
pub use priority::{PriorityEvaluator, TaskScore};
pub use scheduler::{Scheduler, TaskSnapshot};
pub use state::TaskState;
