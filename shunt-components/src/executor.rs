// Copyright (c) 2025 Graphcore Ltd. All rights reserved.

//! A fixed-size pool of processors behind one stage interface.
//!
//! The executor models simulated concurrency: its pool size is the number
//! of logically parallel workers, tracked purely by counters. It accepts a
//! push only while a processor is idle, and releases the first finished
//! event on pop. Pushing when full or popping with nothing ready breaks the
//! check-before-act contract and fails with an error.

use std::rc::Rc;

use shunt_engine::event::Event;
use shunt_engine::sim_error;
use shunt_engine::time::SimContext;
use shunt_engine::traits::Stage;
use shunt_engine::types::SimResult;
use shunt_track::entity::Entity;
use shunt_track::{enter, exit};

use crate::processors::Processor;

/// A pool of identical processors of one kind.
pub struct Executor<P: Processor> {
    entity: Rc<Entity>,
    processors: Vec<P>,
    busy_count: usize,
    ready_count: usize,
}

impl<P: Processor + Clone> Executor<P> {
    /// Create an executor whose pool is `processor_count` clones of
    /// `prototype`.
    pub fn new(
        parent: &Rc<Entity>,
        name: &str,
        processor_count: usize,
        prototype: P,
    ) -> SimResult<Self> {
        let entity = Rc::new(Entity::new(parent, name));
        if processor_count == 0 {
            sim_error!(format!("{entity}: executor needs at least one processor"));
        }
        Ok(Self {
            entity,
            processors: vec![prototype; processor_count],
            busy_count: 0,
            ready_count: 0,
        })
    }
}

impl<P: Processor> Executor<P> {
    /// The configured pool size.
    #[must_use]
    pub fn processor_count(&self) -> usize {
        self.processors.len()
    }

    /// Processors currently working or holding a finished event.
    #[must_use]
    pub fn busy_processor_count(&self) -> usize {
        self.busy_count
    }
}

impl<P: Processor> Stage for Executor<P> {
    fn entity(&self) -> &Rc<Entity> {
        &self.entity
    }

    fn tick(&mut self, ctx: &SimContext, _dt_us: f64) {
        self.busy_count = 0;
        self.ready_count = 0;

        for processor in &mut self.processors {
            processor.tick(ctx);
            if processor.is_busy() {
                self.busy_count += 1;
            }
            if processor.is_event_ready() {
                self.ready_count += 1;
            }
        }
    }

    fn is_ready_to_push_event(&self) -> bool {
        self.busy_count < self.processors.len()
    }

    fn push_event(&mut self, ctx: &mut SimContext, mut event: Event) -> SimResult {
        if !self.is_ready_to_push_event() {
            sim_error!(format!("{}: executor is full", self.entity));
        }

        event.start_stage(ctx);
        enter!(self.entity ; event.id());

        match self.processors.iter().position(|p| !p.is_busy()) {
            Some(idle) => {
                self.processors[idle].start_work(ctx, event);
                self.busy_count += 1;
                Ok(())
            }
            // A busy count below the pool size means an idle processor
            // exists.
            None => unreachable!("{}: no idle processor found", self.entity),
        }
    }

    fn is_ready_to_pop_event(&self) -> bool {
        self.ready_count > 0
    }

    fn pop_event(&mut self, _ctx: &SimContext) -> SimResult<Event> {
        if !self.is_ready_to_pop_event() {
            sim_error!(format!("{}: no events ready", self.entity));
        }

        match self.processors.iter().position(|p| p.is_event_ready()) {
            Some(ready) => {
                let Some(event) = self.processors[ready].take_event() else {
                    unreachable!("{}: ready processor held no event", self.entity);
                };
                self.ready_count -= 1;
                self.busy_count -= 1;
                exit!(self.entity ; event.id());
                Ok(event)
            }
            None => sim_error!(format!("{}: no events ready", self.entity)),
        }
    }

    fn occupancy(&self) -> usize {
        self.busy_count
    }

    fn capacity(&self) -> Option<usize> {
        Some(self.processors.len())
    }
}
