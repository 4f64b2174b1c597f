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

//! Forwarding of snapshots to another thread.

use cadence_core::sink::StatsSink;
use cadence_core::stats::CycleStats;
use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};

/// Sends every snapshot over a bounded channel without ever blocking the loop.
///
/// When the consumer falls behind the snapshot is dropped and counted.
#[derive(Debug)]
pub struct ChannelStatsSink {
    sender: Sender<CycleStats>,
    dropped: u64,
    disconnected: bool,
}

impl ChannelStatsSink {
    /// Creates a sink with room for `capacity` pending snapshots, and the
    /// receiving end.
    pub fn new(capacity: usize) -> (Self, Receiver<CycleStats>) {
        let (sender, receiver) = bounded(capacity);
        (Self::from_sender(sender), receiver)
    }

    /// Wraps an existing sender.
    pub fn from_sender(sender: Sender<CycleStats>) -> Self {
        Self {
            sender,
            dropped: 0,
            disconnected: false,
        }
    }

    /// Snapshots dropped because the channel was full or closed.
    pub fn dropped(&self) -> u64 {
        self.dropped
    }
}

impl StatsSink for ChannelStatsSink {
    fn collect(&mut self, stats: CycleStats) {
        match self.sender.try_send(stats) {
            Ok(()) => {}
            Err(TrySendError::Full(_)) => self.dropped += 1,
            Err(TrySendError::Disconnected(_)) => {
                if !self.disconnected {
                    log::warn!("ChannelStatsSink: receiver dropped, discarding further stats");
                    self.disconnected = true;
                }
                self.dropped += 1;
            }
        }
    }
}
