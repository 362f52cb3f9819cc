// Copyright (c) 2025 Graphcore Ltd. All rights reserved.

//! Helpers shared by the test suites of all SHUNT crates.

use std::rc::Rc;

use shunt_track::entity::{Entity, toplevel};
use shunt_track::logger::try_init_stdout;

use crate::time::SimContext;

/// Seed used by every test context so failures reproduce exactly.
pub const TEST_SEED: u64 = 0x5EED;

/// Standard test entry point: install the stdout logger (once per process)
/// and hand back a top-level entity plus a deterministic context.
///
/// Call as `start_test(file!())` so the entity names the test file.
pub fn start_test(name: &str) -> (Rc<Entity>, SimContext) {
    let _ = try_init_stdout(log::Level::Debug);
    (toplevel(name), SimContext::new(TEST_SEED))
}
