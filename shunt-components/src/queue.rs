// Copyright (c) 2025 Graphcore Ltd. All rights reserved.

//! An unbounded FIFO queue stage.
//!
//! The queue always accepts pushed events and is ready to pop whenever it is
//! non-empty. The time each event spends waiting is recorded into a
//! per-queue histogram when it is popped.
//!
//! A queue may be seeded with freshly issued events at construction. In a
//! closed pipeline this fixes the loop's event population, i.e. the number
//! of logically outstanding units of work.

use std::collections::VecDeque;
use std::rc::Rc;

use shunt_engine::event::Event;
use shunt_engine::histogram::Histogram;
use shunt_engine::time::SimContext;
use shunt_engine::traits::Stage;
use shunt_engine::types::{SimError, SimResult};
use shunt_track::entity::Entity;
use shunt_track::{enter, exit};

/// Default wait-time bucket bounds in microseconds, 1µs to 512ms.
pub const QUEUE_WAIT_BOUNDS_US: &[u64] = &[
    1, 2, 3, 4, 5, 8, 10, 20, 40, 50, 60, 70, 80, 100, 200, 250, 500, 750, 1_000, 1_500, 2_000,
    4_000, 8_000, 16_000, 32_000, 64_000, 128_000, 256_000, 512_000,
];

/// An unbounded FIFO buffer stage.
pub struct Queue {
    entity: Rc<Entity>,
    events: VecDeque<Event>,
    wait_times_us: Histogram,
}

impl Queue {
    /// Create a queue, optionally pre-seeded with `initial_events` freshly
    /// issued events.
    pub fn new(
        parent: &Rc<Entity>,
        name: &str,
        initial_events: usize,
        ctx: &mut SimContext,
    ) -> SimResult<Self> {
        let entity = Rc::new(Entity::new(parent, name));

        let mut events = VecDeque::new();
        for _ in 0..initial_events {
            let mut event = ctx.issue_event();
            event.start_stage(ctx);
            enter!(entity ; event.id());
            events.push_back(event);
        }

        Ok(Self {
            entity,
            events,
            wait_times_us: Histogram::new(QUEUE_WAIT_BOUNDS_US)?,
        })
    }

    /// Number of events waiting in the queue.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether the queue is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl Stage for Queue {
    fn entity(&self) -> &Rc<Entity> {
        &self.entity
    }

    fn tick(&mut self, _ctx: &SimContext, _dt_us: f64) {
        // Waiting takes no work.
    }

    fn is_ready_to_push_event(&self) -> bool {
        // The queue is infinite.
        true
    }

    fn push_event(&mut self, ctx: &mut SimContext, mut event: Event) -> SimResult {
        event.start_stage(ctx);
        enter!(self.entity ; event.id());
        self.events.push_back(event);
        Ok(())
    }

    fn is_ready_to_pop_event(&self) -> bool {
        !self.events.is_empty()
    }

    fn pop_event(&mut self, ctx: &SimContext) -> SimResult<Event> {
        let Some(event) = self.events.pop_front() else {
            return Err(SimError(format!("{}: pop from an empty queue", self.entity)));
        };

        self.wait_times_us
            .add_duration(event.stage_duration_us(ctx) as u64);
        exit!(self.entity ; event.id());
        Ok(event)
    }

    fn occupancy(&self) -> usize {
        self.events.len()
    }

    fn wait_times(&self) -> Option<&Histogram> {
        Some(&self.wait_times_us)
    }
}
