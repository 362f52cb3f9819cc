// Copyright (c) 2025 Graphcore Ltd. All rights reserved.

//! Pipeline models.
//!
//! This crate provides the [closed-loop
//! orchestrator](crate::closed_pipeline::ClosedPipeline) that owns a chain
//! of [stages](shunt_components) and keeps a fixed population of events
//! circulating through them, plus ready-made models such as the
//! [storage I/O path](crate::io_path).
//!
//! # Simple Application
//!
//! A very simple application would look like:
//!
//! ```rust
//! use shunt_models::closed_pipeline::ClosedPipeline;
//! use shunt_track::entity::toplevel;
//!
//! let top = toplevel("top");
//! let mut pipeline = ClosedPipeline::new(&top, "pipeline", 42).unwrap();
//! pipeline.add_queue("input", 4).unwrap();
//! pipeline.add_fixed_time_executor("disk", 2, 10.0).unwrap();
//!
//! for _ in 0..1_000 {
//!     pipeline.tick(1.0).unwrap();
//! }
//!
//! assert!(pipeline.completed_events() > 0);
//! // The loop is closed: the population never changes.
//! assert_eq!(pipeline.population(), 4);
//! ```

pub mod closed_pipeline;
pub mod io_path;

/// Format a count with a K/M/G suffix for compact readouts.
#[must_use]
pub fn format_count(num: u64) -> String {
    if num < 1_000 {
        num.to_string()
    } else if num < 1_000_000 {
        format!("{}K", num / 1_000)
    } else if num < 1_000_000_000 {
        format!("{}M", num / 1_000_000)
    } else {
        format!("{}G", num / 1_000_000_000)
    }
}
