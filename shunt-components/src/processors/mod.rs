// Copyright (c) 2025 Graphcore Ltd. All rights reserved.

//! Service-time models used inside an [executor](crate::executor).
//!
//! A processor is one logical worker: it is idle, working on exactly one
//! event, or holding a finished event that has not been collected yet. The
//! two provided models differ only in how the service time is chosen when
//! work starts:
//!
//!  - [`FixedTimeProcessor`]: a constant configured at construction.
//!  - [`PercentileTimeProcessor`]: sampled from a discretized empirical
//!    distribution.

use shunt_engine::event::Event;
use shunt_engine::time::SimContext;

pub mod fixed_time;
pub mod percentile_time;

pub use fixed_time::FixedTimeProcessor;
pub use percentile_time::{PercentileTable, PercentileTimeProcessor};

/// The behaviour an [`Executor`](crate::executor::Executor) requires of its
/// workers.
pub trait Processor {
    /// Advance: a working processor whose service time has elapsed becomes
    /// event-ready.
    fn tick(&mut self, ctx: &SimContext);

    /// Accept an event and start working on it.
    ///
    /// The caller must ensure the processor is not busy. The context is
    /// mutable so implementations can draw a service time from the random
    /// source.
    fn start_work(&mut self, ctx: &mut SimContext, event: Event);

    /// Working or holding a finished event.
    fn is_busy(&self) -> bool;

    /// Holding a finished event ready to be collected.
    fn is_event_ready(&self) -> bool;

    /// Collect the finished event and return to idle.
    fn take_event(&mut self) -> Option<Event>;
}

/// The {idle, working, event-ready} slot state shared by every processor
/// kind. Owns at most one event at a time.
#[derive(Clone, Debug, Default)]
pub(crate) struct ProcessorCore {
    event: Option<Event>,
    working: bool,
    event_ready: bool,
    started_at_us: f64,
}

impl ProcessorCore {
    pub(crate) fn start(&mut self, now_us: f64, event: Event) {
        self.event = Some(event);
        self.working = true;
        self.event_ready = false;
        self.started_at_us = now_us;
    }

    /// The shared tick rule: once the chosen service time has elapsed the
    /// event becomes collectable.
    pub(crate) fn finish_if_elapsed(&mut self, now_us: f64, service_time_us: f64) {
        if self.working && now_us - self.started_at_us >= service_time_us {
            self.working = false;
            self.event_ready = true;
        }
    }

    pub(crate) fn is_busy(&self) -> bool {
        self.working || self.event_ready
    }

    pub(crate) fn is_event_ready(&self) -> bool {
        self.event_ready
    }

    pub(crate) fn take(&mut self) -> Option<Event> {
        let event = self.event.take();
        self.working = false;
        self.event_ready = false;
        self.started_at_us = 0.0;
        event
    }
}
