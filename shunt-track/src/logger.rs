// Copyright (c) 2025 Graphcore Ltd. All rights reserved.

//! A simple text logger to output messages to stdout.
//!
//! Entities already prefix their messages with their hierarchical name, so
//! the logger only adds the level.

use log::{Level, Log, Metadata, Record, SetLoggerError};

/// Text logger writing `LEVEL: message` lines to stdout.
pub struct TextLogger {
    level: Level,
}

impl Log for TextLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            println!("{}: {}", record.level(), record.args());
        }
    }

    fn flush(&self) {}
}

/// Install the [`TextLogger`] as the global logger.
///
/// Returns an error if a logger has already been installed; tests that share
/// a process should use this form and ignore the error.
pub fn try_init_stdout(level: Level) -> Result<(), SetLoggerError> {
    log::set_max_level(level.to_level_filter());
    log::set_boxed_logger(Box::new(TextLogger { level }))
}

/// Install the [`TextLogger`] as the global logger.
///
/// Installing two loggers is a programming error and panics.
pub fn init_stdout(level: Level) {
    match try_init_stdout(level) {
        Ok(()) => {}
        Err(_) => panic!("a global logger has already been installed"),
    }
}
