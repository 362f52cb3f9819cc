// Copyright (c) 2025 Graphcore Ltd. All rights reserved.

//! Pipeline stage components.
//!
//! Every component here implements the
//! [`Stage`](shunt_engine::traits::Stage) trait so that a
//! [pipeline](../shunt_models/index.html) can own and tick them uniformly:
//!
//!  - [`Queue`](crate::queue::Queue): an unbounded FIFO buffer.
//!  - [`Executor`](crate::executor::Executor): a fixed-size pool of
//!    [processors](crate::processors) modelling simulated concurrency.
//!  - [`FlushController`](crate::flush::FlushController): a strict-order
//!    completion barrier.

pub mod executor;
pub mod flush;
pub mod processors;
pub mod queue;
