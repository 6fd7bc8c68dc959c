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

//! Fixed-capacity circular store of historical frame states.
//!
//! The orchestrator owns exactly one ring for the lifetime of the run loop.
//! Logic stages write into the slot under the cursor; after every completed
//! logic tick the ring rotates, so render stages can look one and two ticks
//! into the past without retaining full history.

use crate::error::ConfigError;

/// Circular buffer of `N >= 2` application-defined frame payloads.
///
/// The payload type is opaque to the pipeline; the only requirement is the
/// move (or clone, for [`filled`](FrameRing::filled)) semantics needed to
/// place values into the slots. All accessors are pure;
/// [`rotate`](FrameRing::rotate) is the single cursor mutator and is called
/// exactly once per completed logic tick.
#[derive(Debug, Clone)]
pub struct FrameRing<F> {
    slots: Vec<F>,
    cursor: usize,
}

impl<F> FrameRing<F> {
    /// Builds a ring from pre-populated slots.
    ///
    /// Fails with [`ConfigError::FrameHistoryTooShort`] when fewer than two
    /// slots are supplied; with a single slot there is no previous frame for
    /// render stages to interpolate from.
    pub fn from_slots(slots: Vec<F>) -> Result<Self, ConfigError> {
        if slots.len() < 2 {
            return Err(ConfigError::FrameHistoryTooShort { got: slots.len() });
        }
        Ok(Self { slots, cursor: 0 })
    }

    /// Builds a ring of `capacity` clones of `seed`.
    pub fn filled(capacity: usize, seed: F) -> Result<Self, ConfigError>
    where
        F: Clone,
    {
        Self::from_slots(vec![seed; capacity])
    }

    /// Number of slots; fixed at construction, never resized.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Current write-cursor position, always in `0..capacity()`.
    #[inline]
    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// The slot logic stages are currently writing into.
    #[inline]
    #[must_use]
    pub fn current(&self) -> &F {
        &self.slots[self.cursor]
    }

    /// Mutable view of the current slot, for logic stages.
    #[inline]
    #[must_use]
    pub fn current_mut(&mut self) -> &mut F {
        &mut self.slots[self.cursor]
    }

    /// The slot completed by the most recent rotation.
    #[inline]
    #[must_use]
    pub fn previous(&self) -> &F {
        let n = self.slots.len();
        &self.slots[(self.cursor + n - 1) % n]
    }

    /// The slot completed two rotations ago.
    ///
    /// On a ring of capacity 2 this wraps onto the current write slot.
    /// Callers that need three genuinely distinct historical frames must
    /// configure a capacity of at least 3; the ring does not check this.
    #[inline]
    #[must_use]
    pub fn before_previous(&self) -> &F {
        let n = self.slots.len();
        &self.slots[(self.cursor + n - 2) % n]
    }

    /// Advances the cursor by one slot, wrapping at capacity.
    #[inline]
    pub fn rotate(&mut self) {
        self.cursor = (self.cursor + 1) % self.slots.len();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_capacity_below_two() {
        assert!(matches!(
            FrameRing::from_slots(vec![0u32]),
            Err(ConfigError::FrameHistoryTooShort { got: 1 })
        ));
        assert!(matches!(
            FrameRing::<u32>::from_slots(Vec::new()),
            Err(ConfigError::FrameHistoryTooShort { got: 0 })
        ));
        assert!(matches!(
            FrameRing::filled(1, 0u32),
            Err(ConfigError::FrameHistoryTooShort { got: 1 })
        ));
    }

    #[test]
    fn ring_identity_after_k_rotations() {
        // After k rotations the cursor sits on the slot originally written
        // at index k mod N, for every capacity.
        for n in 2..=6usize {
            let mut ring = FrameRing::from_slots((0..n).collect::<Vec<_>>()).unwrap();
            for k in 0..(3 * n) {
                assert_eq!(*ring.current(), k % n, "capacity {n}, rotation {k}");
                ring.rotate();
            }
        }
    }

    #[test]
    fn previous_is_the_pre_rotation_current() {
        let mut ring = FrameRing::filled(4, 0u64).unwrap();
        for tick in 1..=10u64 {
            *ring.current_mut() = tick;
            ring.rotate();
            assert_eq!(*ring.previous(), tick);
        }
    }

    #[test]
    fn capacity_two_write_rotate_write() {
        let mut ring = FrameRing::filled(2, "").unwrap();
        *ring.current_mut() = "A";
        ring.rotate();
        *ring.current_mut() = "B";

        assert_eq!(*ring.current(), "B");
        assert_eq!(*ring.previous(), "A");
        // Documented aliasing on capacity 2: two rotations ago wraps onto
        // the write slot.
        assert_eq!(*ring.before_previous(), "B");
    }

    #[test]
    fn before_previous_is_distinct_with_capacity_three() {
        let mut ring = FrameRing::filled(3, 0u32).unwrap();
        *ring.current_mut() = 1;
        ring.rotate();
        *ring.current_mut() = 2;
        ring.rotate();
        *ring.current_mut() = 3;

        assert_eq!(*ring.current(), 3);
        assert_eq!(*ring.previous(), 2);
        assert_eq!(*ring.before_previous(), 1);
    }

    #[test]
    fn accessors_do_not_move_the_cursor() {
        let ring = FrameRing::filled(3, 7u8).unwrap();
        let _ = ring.current();
        let _ = ring.previous();
        let _ = ring.before_previous();
        assert_eq!(ring.cursor(), 0);
    }

    #[test]
    fn cursor_stays_in_range() {
        let mut ring = FrameRing::filled(3, ()).unwrap();
        for _ in 0..100 {
            ring.rotate();
            assert!(ring.cursor() < ring.capacity());
        }
    }
}
