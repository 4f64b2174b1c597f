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

//! Cooperative cancellation for the cycle loop.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

/// A cloneable cancellation flag.
///
/// The pacer polls [`is_cancelled`](Self::is_cancelled) once at the top of every
/// cycle; cancellation never interrupts an in-flight update, draw, or task.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    /// Creates a token that is not cancelled.
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation. Idempotent.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    /// Non-blocking check.
    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }

    /// Cancels this token after `timeout` from a detached timer thread.
    ///
    /// Returns a clone of the token for convenience.
    pub fn cancel_after(&self, timeout: Duration) -> Self {
        let token = self.clone();
        thread::spawn(move || {
            thread::sleep(timeout);
            log::debug!("CancelToken: timeout of {:?} reached", timeout);
            token.cancel();
        });
        self.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_the_flag() {
        let token = CancelToken::new();
        let other = token.clone();
        assert!(!other.is_cancelled());

        token.cancel();
        assert!(other.is_cancelled());
    }

    #[test]
    fn cancel_after_fires() {
        let token = CancelToken::new();
        token.cancel_after(Duration::from_millis(20));

        thread::sleep(Duration::from_millis(200));
        assert!(token.is_cancelled());
    }
}
