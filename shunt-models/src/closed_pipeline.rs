// Copyright (c) 2025 Graphcore Ltd. All rights reserved.

//! The closed-loop pipeline orchestrator.
//!
//! A [`ClosedPipeline`] owns an ordered chain of stages, with the input
//! queue at position zero and the last stage feeding back into it. Events
//! that fall off the tail are counted, their end-to-end latency is
//! recorded, and a brand-new event is pushed into the head to start the
//! next lap, so the total event population is constant: it models a fixed
//! window of outstanding work under saturation.
//!
//! The orchestrator is also the sole owner of the simulation context. One
//! call to [`tick`](ClosedPipeline::tick) advances the logical clock by one
//! quantum, ticks every stage, drains the tail and then moves events
//! downstream wherever a producer has a finished event and its consumer has
//! a free slot.

use std::rc::Rc;

use shunt_components::executor::Executor;
use shunt_components::flush::FlushController;
use shunt_components::processors::{
    FixedTimeProcessor, PercentileTable, PercentileTimeProcessor,
};
use shunt_components::queue::Queue;
use shunt_engine::histogram::Histogram;
use shunt_engine::sim_error;
use shunt_engine::time::{SEC, SimContext};
use shunt_engine::traits::Stage;
use shunt_engine::types::SimResult;
use shunt_track::entity::Entity;

/// Default end-to-end latency bucket bounds in microseconds, 1µs to 4s.
pub const LATENCY_BOUNDS_US: &[u64] = &[
    1, 2, 3, 4, 5, 8, 10, 20, 40, 50, 60, 70, 80, 100, 200, 250, 500, 750, 1_000, 1_500, 2_000,
    4_000, 8_000, 16_000, 32_000, 64_000, 128_000, 256_000, 512_000, 1_000_000, 1_500_000,
    2_000_000, 3_000_000, 4_000_000,
];

/// A read-only snapshot of one stage, for telemetry and rendering.
#[derive(Clone, Debug)]
pub struct StageStats {
    /// The stage's name within the pipeline.
    pub name: String,
    /// Events currently held.
    pub occupancy: usize,
    /// Pool size for bounded stages, `None` for unbounded ones.
    pub capacity: Option<usize>,
    /// The stage's p90 wait time, for stages that keep a wait histogram.
    pub wait_p90_us: Option<u64>,
}

/// An ordered chain of stages forming a closed loop.
pub struct ClosedPipeline {
    entity: Rc<Entity>,
    ctx: SimContext,
    stages: Vec<Box<dyn Stage>>,
    completed_events: u64,
    latency_us: Histogram,
}

impl ClosedPipeline {
    /// Create an empty pipeline with its own deterministic context.
    pub fn new(parent: &Rc<Entity>, name: &str, seed: u64) -> SimResult<Self> {
        Ok(Self {
            entity: Rc::new(Entity::new(parent, name)),
            ctx: SimContext::new(seed),
            stages: Vec::new(),
            completed_events: 0,
            latency_us: Histogram::new(LATENCY_BOUNDS_US)?,
        })
    }

    /// The entity naming this pipeline.
    #[must_use]
    pub fn entity(&self) -> &Rc<Entity> {
        &self.entity
    }

    /// Append an unbounded queue, optionally seeded with events.
    ///
    /// The first stage added must be a queue; in a closed loop it is the
    /// input queue that recycled events return to, and seeding it fixes the
    /// circulating population.
    pub fn add_queue(&mut self, name: &str, initial_events: usize) -> SimResult {
        let queue = Queue::new(&self.entity, name, initial_events, &mut self.ctx)?;
        self.stages.push(Box::new(queue));
        Ok(())
    }

    /// Append an executor whose processors take a constant service time.
    pub fn add_fixed_time_executor(
        &mut self,
        name: &str,
        processor_count: usize,
        service_time_us: f64,
    ) -> SimResult {
        self.ensure_head_exists()?;
        let executor = Executor::new(
            &self.entity,
            name,
            processor_count,
            FixedTimeProcessor::new(service_time_us),
        )?;
        self.stages.push(Box::new(executor));
        Ok(())
    }

    /// Append an executor whose processors sample service times from a
    /// percentile table.
    pub fn add_percentile_time_executor(
        &mut self,
        name: &str,
        processor_count: usize,
        table: PercentileTable,
    ) -> SimResult {
        self.ensure_head_exists()?;
        let executor = Executor::new(
            &self.entity,
            name,
            processor_count,
            PercentileTimeProcessor::new(table),
        )?;
        self.stages.push(Box::new(executor));
        Ok(())
    }

    /// Append a strict-order completion barrier.
    pub fn add_flush_controller(&mut self, name: &str) -> SimResult {
        self.ensure_head_exists()?;
        let flush = FlushController::new(&self.entity, name)?;
        self.stages.push(Box::new(flush));
        Ok(())
    }

    fn ensure_head_exists(&self) -> SimResult {
        if self.stages.is_empty() {
            sim_error!(format!(
                "{}: the first stage must be the input queue",
                self.entity
            ));
        }
        Ok(())
    }

    /// Advance the simulation by one quantum of `dt_us` microseconds.
    pub fn tick(&mut self, dt_us: f64) -> SimResult {
        if self.stages.len() < 2 {
            sim_error!(format!(
                "{}: a closed pipeline needs at least two stages",
                self.entity
            ));
        }

        self.ctx.advance(dt_us);
        for stage in &mut self.stages {
            stage.tick(&self.ctx, dt_us);
        }

        self.drain_tail()?;

        // A second pass is needed for "instant" stages, so that an event
        // registered in the first pass can finish and move on in the same
        // tick. Two fixed passes, deliberately not a loop to a fixpoint.
        self.propagate()?;
        self.propagate()?;

        Ok(())
    }

    /// Recycle finished events from the tail back into the input queue.
    fn drain_tail(&mut self) -> SimResult {
        let Some((head, rest)) = self.stages.split_first_mut() else {
            return Ok(());
        };
        let Some(tail) = rest.last_mut() else {
            return Ok(());
        };

        while tail.is_ready_to_pop_event() && head.is_ready_to_push_event() {
            let event = tail.pop_event(&self.ctx)?;

            self.completed_events += 1;
            self.latency_us
                .add_duration(event.duration_us(&self.ctx) as u64);
            shunt_track::debug!(self.entity ; "{} completed a lap in {:.1}us",
                event, event.duration_us(&self.ctx));

            // The finished event's identity is retired; a brand-new event
            // begins the next lap.
            let fresh = self.ctx.issue_event();
            head.push_event(&mut self.ctx, fresh)?;
        }
        Ok(())
    }

    /// One tail-to-head scan moving events between adjacent stages.
    fn propagate(&mut self) -> SimResult {
        for i in (1..self.stages.len()).rev() {
            let (producers, consumers) = self.stages.split_at_mut(i);
            let producer = &mut producers[i - 1];
            let consumer = &mut consumers[0];

            while producer.is_ready_to_pop_event() && consumer.is_ready_to_push_event() {
                let event = producer.pop_event(&self.ctx)?;
                consumer.push_event(&mut self.ctx, event)?;
            }
        }
        Ok(())
    }

    /// Simulated time elapsed so far, in microseconds.
    #[must_use]
    pub fn now_us(&self) -> f64 {
        self.ctx.now_us()
    }

    /// Events that have completed a full lap.
    #[must_use]
    pub fn completed_events(&self) -> u64 {
        self.completed_events
    }

    /// Average throughput over the whole run, in events per second.
    #[must_use]
    pub fn events_per_second(&self) -> f64 {
        if self.ctx.now_us() <= 0.0 {
            0.0
        } else {
            self.completed_events as f64 * SEC / self.ctx.now_us()
        }
    }

    /// The `percentile`-th percentile of end-to-end latency, in µs.
    pub fn latency_percentile(&self, percentile: u32) -> SimResult<u64> {
        self.latency_us.percentile(percentile)
    }

    /// The end-to-end latency histogram.
    #[must_use]
    pub fn latencies(&self) -> &Histogram {
        &self.latency_us
    }

    /// Total events currently held across all stages.
    ///
    /// In a closed loop this is invariant: it equals the number of events
    /// seeded at construction.
    #[must_use]
    pub fn population(&self) -> usize {
        self.stages.iter().map(|stage| stage.occupancy()).sum()
    }

    /// Number of stages in the chain.
    #[must_use]
    pub fn stage_count(&self) -> usize {
        self.stages.len()
    }

    /// The stages in pipeline order, for read-only inspection.
    pub fn stages(&self) -> impl Iterator<Item = &dyn Stage> {
        self.stages.iter().map(|stage| stage.as_ref())
    }

    /// Per-stage snapshots in pipeline order.
    pub fn stage_stats(&self) -> SimResult<Vec<StageStats>> {
        self.stages
            .iter()
            .map(|stage| {
                let wait_p90_us = match stage.wait_times() {
                    Some(waits) => Some(waits.percentile(90)?),
                    None => None,
                };
                Ok(StageStats {
                    name: stage.entity().name.clone(),
                    occupancy: stage.occupancy(),
                    capacity: stage.capacity(),
                    wait_p90_us,
                })
            })
            .collect()
    }
}
