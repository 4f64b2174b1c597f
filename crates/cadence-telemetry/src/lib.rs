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

//! # Cadence Telemetry
//!
//! Ready-made collaborators for the cycle pacer: an error sink backed by the
//! `log` facade, statistics sinks that log, trace, or forward each cycle, and
//! a rolling history of cycle timings for stutter analysis.

#![warn(missing_docs)]

pub mod sinks;
pub mod storage;

pub use sinks::channel::ChannelStatsSink;
pub use sinks::fan_out::FanOut;
pub use sinks::logging::{LogErrorSink, SummaryStatsSink};
pub use sinks::structured::TracingStatsSink;
pub use storage::history::{HistorySummary, StatsHistory};
pub use storage::ring_buffer::RingBuffer;
