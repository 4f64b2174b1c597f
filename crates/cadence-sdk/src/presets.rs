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

//! Ready-made background tasks.

use cadence_core::task::{Task, TaskPriority};
use std::time::Duration;

/// Name of the task built by [`memory_reclaim`].
pub const MEMORY_RECLAIM: &str = "memory-reclaim";

/// A low-priority housekeeping task for caches, pools, or arenas.
///
/// It runs at most every 100ms when the cycle has room for it, and at least
/// once every 5s regardless of load.
pub fn memory_reclaim(reclaim: impl FnMut() + Send + 'static) -> Task {
    Task::new(MEMORY_RECLAIM, reclaim)
        .with_priority(TaskPriority::Low)
        .run_at_least_once_in(Duration::from_secs(5))
        .run_at_most_once_in(Duration::from_millis(100))
}
