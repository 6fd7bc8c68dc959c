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

//! Cooperative cancellation for the pipeline.
//!
//! Shutdown is signalled, never forced: the orchestrator checks the token at
//! the top of every loop iteration and before every stage invocation, and a
//! stage suspended on a collaborator call is expected to observe the token
//! itself and unwind promptly. There is no preemption anywhere.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Cloneable handle over a shared stop flag.
///
/// The process-lifecycle collaborator that owns the host (a Ctrl-C handler,
/// a window close event, a supervisor task) keeps one clone and calls
/// [`request_stop`](ShutdownToken::request_stop); the orchestrator and the
/// stages poll [`is_stop_requested`](ShutdownToken::is_stop_requested) at
/// their checkpoints.
///
/// All clones observe the same flag. Requesting stop is idempotent and can
/// never be undone for the lifetime of the token.
#[derive(Debug, Clone, Default)]
pub struct ShutdownToken {
    flag: Arc<AtomicBool>,
}

impl ShutdownToken {
    /// Creates a token with no stop requested.
    #[must_use]
    pub fn new() -> Self {
        Self {
            flag: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Signals every holder of this token to stop at its next checkpoint.
    #[inline]
    pub fn request_stop(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    /// Non-blocking query of the stop flag.
    #[inline]
    #[must_use]
    pub fn is_stop_requested(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fresh_token_is_not_stopped() {
        let token = ShutdownToken::new();
        assert!(!token.is_stop_requested());
    }

    #[test]
    fn request_stop_is_visible_to_all_clones() {
        let token = ShutdownToken::new();
        let observer = token.clone();

        token.request_stop();

        assert!(token.is_stop_requested());
        assert!(observer.is_stop_requested());
    }

    #[test]
    fn request_stop_is_idempotent() {
        let token = ShutdownToken::new();
        token.request_stop();
        token.request_stop();
        assert!(token.is_stop_requested());
    }

    #[test]
    fn clones_made_after_stop_observe_the_flag() {
        let token = ShutdownToken::new();
        token.request_stop();
        assert!(token.clone().is_stop_requested());
    }
}
