// Copyright (c) 2025 Graphcore Ltd. All rights reserved.

//! A strict-order completion barrier.
//!
//! Events may be pushed in any order but are only released in contiguous
//! identity order: the controller keeps a barrier (the highest identity
//! released so far) and is ready to pop only while the smallest waiting
//! identity is exactly `barrier + 1`. This models, for example, a
//! write-behind log that must acknowledge in submission order even when the
//! underlying work completes out of order.

use std::collections::BTreeMap;
use std::rc::Rc;

use shunt_engine::event::{Event, EventId};
use shunt_engine::histogram::Histogram;
use shunt_engine::sim_error;
use shunt_engine::time::SimContext;
use shunt_engine::traits::Stage;
use shunt_engine::types::SimResult;
use shunt_track::entity::Entity;
use shunt_track::{enter, exit};

use crate::queue::QUEUE_WAIT_BOUNDS_US;

/// Releases events in contiguous identity order.
pub struct FlushController {
    entity: Rc<Entity>,
    /// Highest identity released so far; 0 means none yet.
    barrier: u64,
    waiting: BTreeMap<EventId, Event>,
    wait_times_us: Histogram,
}

impl FlushController {
    /// Create a flush controller with an empty waiting set.
    pub fn new(parent: &Rc<Entity>, name: &str) -> SimResult<Self> {
        Ok(Self {
            entity: Rc::new(Entity::new(parent, name)),
            barrier: 0,
            waiting: BTreeMap::new(),
            wait_times_us: Histogram::new(QUEUE_WAIT_BOUNDS_US)?,
        })
    }

    /// The highest identity released so far.
    #[must_use]
    pub fn barrier(&self) -> u64 {
        self.barrier
    }
}

impl Stage for FlushController {
    fn entity(&self) -> &Rc<Entity> {
        &self.entity
    }

    fn tick(&mut self, _ctx: &SimContext, _dt_us: f64) {
        // Ordering needs no time to enforce.
    }

    fn is_ready_to_push_event(&self) -> bool {
        true
    }

    fn push_event(&mut self, ctx: &mut SimContext, mut event: Event) -> SimResult {
        event.start_stage(ctx);
        enter!(self.entity ; event.id());

        let id = event.id();
        if self.waiting.insert(id, event).is_some() {
            // Identities are unique by construction; a duplicate means a
            // defect somewhere upstream.
            panic!("{}: duplicate event identity {id}", self.entity);
        }
        Ok(())
    }

    fn is_ready_to_pop_event(&self) -> bool {
        self.waiting
            .keys()
            .next()
            .is_some_and(|id| id.as_u64() == self.barrier + 1)
    }

    fn pop_event(&mut self, ctx: &SimContext) -> SimResult<Event> {
        if !self.is_ready_to_pop_event() {
            sim_error!(format!("{}: no events ready", self.entity));
        }

        let Some((id, event)) = self.waiting.pop_first() else {
            unreachable!("{}: ready but the waiting set is empty", self.entity);
        };
        assert!(
            id.as_u64() == self.barrier + 1,
            "{}: released identity {id} is not contiguous with barrier {}",
            self.entity,
            self.barrier
        );

        self.wait_times_us
            .add_duration(event.stage_duration_us(ctx) as u64);
        exit!(self.entity ; id);
        self.barrier = id.as_u64();
        Ok(event)
    }

    fn occupancy(&self) -> usize {
        self.waiting.len()
    }

    fn wait_times(&self) -> Option<&Histogram> {
        Some(&self.wait_times_us)
    }
}
