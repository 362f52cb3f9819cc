// Copyright (c) 2025 Graphcore Ltd. All rights reserved.

//! This crate provides combined _track_ capabilities for the SHUNT project.
//!
//! _Track_ means the combination of _log_ and _trace_ where:
//!
//!   - _log_ are text-based human-readable messages emitted at various levels
//!     of verbosity (from `Trace` through to `Error`).
//!   - _trace_ provides a standard set of modelling events that can be
//!     emitted. For example, events entering or exitting simulation
//!     [`Entities`](crate::entity::Entity).
//!
//! All events are emitted through the [log](https://docs.rs/log) crate
//! facade. Binaries install the [text logger](crate::logger) to direct them
//! to stdout.

// Enable warnings for missing documentation
#![warn(missing_docs)]

use std::str::FromStr;

pub use log;

pub mod entity;
pub mod logger;

/// Take the command-line string and convert it to a Level
#[must_use]
pub fn str_to_level(lvl: &str) -> log::Level {
    match log::Level::from_str(lvl) {
        Ok(level) => level,
        Err(_) => panic!("Unable to parse level string '{lvl}'"),
    }
}

// Track an enter event.
#[doc(hidden)]
#[macro_export]
macro_rules! enter {
    ($entity:expr ; $object:expr) => {
        $crate::log::trace!("{}: enter {}", $entity, $object)
    };
}

// Track an exit event.
#[doc(hidden)]
#[macro_export]
macro_rules! exit {
    ($entity:expr ; $object:expr) => {
        $crate::log::trace!("{}: exit {}", $entity, $object)
    };
}

/// Log an error-level message prefixed with the emitting entity.
#[macro_export]
macro_rules! error {
    ($entity:expr ; $($arg:tt)+) => {
        $crate::log::error!("{}: {}", $entity, format_args!($($arg)+))
    };
}

/// Log a warn-level message prefixed with the emitting entity.
#[macro_export]
macro_rules! warn {
    ($entity:expr ; $($arg:tt)+) => {
        $crate::log::warn!("{}: {}", $entity, format_args!($($arg)+))
    };
}

/// Log an info-level message prefixed with the emitting entity.
#[macro_export]
macro_rules! info {
    ($entity:expr ; $($arg:tt)+) => {
        $crate::log::info!("{}: {}", $entity, format_args!($($arg)+))
    };
}

/// Log a debug-level message prefixed with the emitting entity.
#[macro_export]
macro_rules! debug {
    ($entity:expr ; $($arg:tt)+) => {
        $crate::log::debug!("{}: {}", $entity, format_args!($($arg)+))
    };
}

/// Log a trace-level message prefixed with the emitting entity.
#[macro_export]
macro_rules! trace {
    ($entity:expr ; $($arg:tt)+) => {
        $crate::log::trace!("{}: {}", $entity, format_args!($($arg)+))
    };
}
