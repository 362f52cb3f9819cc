// Copyright (c) 2025 Graphcore Ltd. All rights reserved.

//! A bucketed histogram for duration statistics.
//!
//! The histogram is constructed from a non-decreasing sequence of bucket
//! upper bounds (conventionally microseconds, but it is unit-agnostic) and
//! keeps one extra overflow bucket for values at or above the last bound.
//! Percentiles are estimated by a cumulative scan, so the resolution is
//! fixed by the bucket table.

use itertools::Itertools;

use crate::sim_error;
use crate::types::SimResult;

/// Counts observations against a fixed table of bucket upper bounds.
#[derive(Clone, Debug)]
pub struct Histogram {
    bounds: Vec<u64>,
    counts: Vec<u64>,
}

impl Histogram {
    /// Create a histogram from bucket upper bounds.
    ///
    /// The bounds must be non-decreasing and there must be at least one;
    /// anything else is a configuration error.
    pub fn new(bounds: &[u64]) -> SimResult<Self> {
        if bounds.is_empty() {
            sim_error!("histogram needs at least one bucket bound");
        }
        if !bounds.iter().tuple_windows().all(|(a, b)| a <= b) {
            sim_error!("histogram bucket bounds must be non-decreasing");
        }
        Ok(Self {
            bounds: bounds.to_vec(),
            counts: vec![0; bounds.len() + 1],
        })
    }

    /// Count one observation.
    ///
    /// The first bucket whose bound exceeds `value` is incremented, or the
    /// overflow bucket if none does.
    pub fn add_duration(&mut self, value: u64) {
        for (i, bound) in self.bounds.iter().enumerate() {
            if value < *bound {
                self.counts[i] += 1;
                return;
            }
        }
        let overflow = self.counts.len() - 1;
        self.counts[overflow] += 1;
    }

    /// Estimate the `percentile`-th percentile of the observed values.
    ///
    /// Scans buckets in order and returns the upper bound of the first
    /// bucket whose cumulative count reaches `floor(percentile/100 * total)`.
    /// With no observations the threshold is zero and the first bucket's
    /// bound is returned whatever the data; this is long-standing behaviour
    /// that callers rely on, not an accident. The overflow bucket reports
    /// the last configured bound.
    pub fn percentile(&self, percentile: u32) -> SimResult<u64> {
        if percentile > 100 {
            sim_error!("percentile must be between 0 and 100");
        }

        let total: u64 = self.counts.iter().sum();
        let threshold = ((percentile as f64 / 100.0) * total as f64) as u64;

        let mut cumulative = 0;
        for (i, count) in self.counts.iter().enumerate() {
            cumulative += count;
            if cumulative >= threshold {
                return Ok(self.bounds[i.min(self.bounds.len() - 1)]);
            }
        }

        // The overflow bucket makes the cumulative count reach `total`, and
        // `threshold <= total` always holds.
        unreachable!("histogram percentile scan exhausted every bucket");
    }

    /// Total number of observations counted so far.
    #[must_use]
    pub fn total_count(&self) -> u64 {
        self.counts.iter().sum()
    }

    /// The configured bucket upper bounds.
    #[must_use]
    pub fn bounds(&self) -> &[u64] {
        &self.bounds
    }

    /// Per-bucket counts; the final entry is the overflow bucket.
    #[must_use]
    pub fn counts(&self) -> &[u64] {
        &self.counts
    }
}
