// Copyright (c) 2025 Graphcore Ltd. All rights reserved.

//! This module represents the time during a simulation.
//!
//! Time is a logical clock measured in microseconds. It is owned by the
//! pipeline orchestrator and advanced in fixed quanta; stages never advance
//! it themselves, they only read it. The [`SimContext`] also owns the two
//! other pieces of process-wide simulation state: the event identity
//! allocator and the seeded random source used for percentile sampling.
//! Threading the context through every call keeps runs reproducible and
//! avoids any hidden global.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::event::{Event, EventId};

/// One microsecond, the base unit of simulated time.
pub const USEC: f64 = 1.0;

/// One millisecond in microseconds.
pub const MSEC: f64 = 1_000.0;

/// One second in microseconds.
pub const SEC: f64 = 1_000_000.0;

/// The overall owner of simulation state: clock, identities and randomness.
pub struct SimContext {
    now_us: f64,
    next_event_id: u64,
    seed: u64,
    rng: StdRng,
}

impl SimContext {
    /// Create a context at time zero.
    ///
    /// Two contexts created from the same seed produce identical identity
    /// sequences and identical random samples.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            now_us: 0.0,
            next_event_id: 1,
            seed,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// The current simulated time in microseconds.
    #[must_use]
    pub fn now_us(&self) -> f64 {
        self.now_us
    }

    /// Advance the clock by `dt_us` microseconds.
    pub fn advance(&mut self, dt_us: f64) {
        assert!(dt_us >= 0.0, "the simulation clock can only move forwards");
        self.now_us += dt_us;
    }

    /// Return the context to its initial state, reseeding the random source.
    pub fn reset(&mut self) {
        self.now_us = 0.0;
        self.next_event_id = 1;
        self.rng = StdRng::seed_from_u64(self.seed);
    }

    /// Issue a brand-new [`Event`] stamped with the current time.
    ///
    /// Identities are unique and strictly increasing across the whole run;
    /// a recycled event never reuses the identity of its predecessor.
    pub fn issue_event(&mut self) -> Event {
        let id = EventId::new(self.next_event_id);
        self.next_event_id += 1;
        Event::new(id, self.now_us)
    }

    /// Draw a uniform random value in `[0, 100)`.
    pub fn sample_percent(&mut self) -> f64 {
        self.rng.gen_range(0.0..100.0)
    }
}
