// Copyright (c) 2025 Graphcore Ltd. All rights reserved.

//! A set of common traits used across the SHUNT engine.

use std::rc::Rc;

use shunt_track::entity::Entity;

use crate::event::Event;
use crate::histogram::Histogram;
use crate::time::SimContext;
use crate::types::SimResult;

/// One element of a pipeline: it can receive, hold and release events.
///
/// Stages are owned exclusively by the pipeline orchestrator as
/// `Box<dyn Stage>` and never reference each other; all movement between
/// them is mediated by the orchestrator. Callers must follow the
/// check-before-act protocol: query [`is_ready_to_push_event`] /
/// [`is_ready_to_pop_event`] before calling [`push_event`] / [`pop_event`].
/// Pushing or popping against an unwilling stage is a contract violation
/// and fails with a [`SimError`](crate::types::SimError) rather than being
/// clamped.
///
/// [`is_ready_to_push_event`]: Stage::is_ready_to_push_event
/// [`is_ready_to_pop_event`]: Stage::is_ready_to_pop_event
/// [`push_event`]: Stage::push_event
/// [`pop_event`]: Stage::pop_event
pub trait Stage {
    /// The entity naming this stage within the simulation hierarchy.
    fn entity(&self) -> &Rc<Entity>;

    /// Advance internal state by one quantum of `dt_us` microseconds.
    ///
    /// The context has already been advanced when this is called; stages
    /// read the clock, they never move it.
    fn tick(&mut self, ctx: &SimContext, dt_us: f64);

    /// Whether a call to [`push_event`](Stage::push_event) would be accepted.
    fn is_ready_to_push_event(&self) -> bool;

    /// Hand an event to this stage.
    ///
    /// Implementations call [`Event::start_stage`] before storing the event.
    /// The context is mutable because some stages draw from the random
    /// source when work starts.
    fn push_event(&mut self, ctx: &mut SimContext, event: Event) -> SimResult;

    /// Whether a finished event is waiting to be collected.
    fn is_ready_to_pop_event(&self) -> bool;

    /// Take a finished event from this stage.
    fn pop_event(&mut self, ctx: &SimContext) -> SimResult<Event>;

    /// Number of events currently held by this stage.
    fn occupancy(&self) -> usize;

    /// Maximum number of events this stage can hold, if bounded.
    fn capacity(&self) -> Option<usize> {
        None
    }

    /// The stage's wait-time histogram, for stages that keep one.
    fn wait_times(&self) -> Option<&Histogram> {
        None
    }
}
