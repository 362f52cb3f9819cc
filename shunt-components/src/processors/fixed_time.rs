// Copyright (c) 2025 Graphcore Ltd. All rights reserved.

//! A processor with a deterministic service time.

use shunt_engine::event::Event;
use shunt_engine::time::SimContext;

use super::{Processor, ProcessorCore};

/// Serves every event in exactly the configured time.
#[derive(Clone, Debug)]
pub struct FixedTimeProcessor {
    service_time_us: f64,
    core: ProcessorCore,
}

impl FixedTimeProcessor {
    /// Create a processor that takes `service_time_us` per event.
    #[must_use]
    pub fn new(service_time_us: f64) -> Self {
        Self {
            service_time_us,
            core: ProcessorCore::default(),
        }
    }
}

impl Processor for FixedTimeProcessor {
    fn tick(&mut self, ctx: &SimContext) {
        self.core.finish_if_elapsed(ctx.now_us(), self.service_time_us);
    }

    fn start_work(&mut self, ctx: &mut SimContext, event: Event) {
        self.core.start(ctx.now_us(), event);
    }

    fn is_busy(&self) -> bool {
        self.core.is_busy()
    }

    fn is_event_ready(&self) -> bool {
        self.core.is_event_ready()
    }

    fn take_event(&mut self) -> Option<Event> {
        self.core.take()
    }
}
