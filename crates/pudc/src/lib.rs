//! pudc: a minimal init process (PID 1).
//!
//! Startup sequence:
//! 1. Announce the version
//! 2. Verify we are PID 1 / TID 1 and that the runtime directory exists
//! 3. Run the main body, which for now halts straight away

use std::io::Write;

use pudc_common::log::Logger;

pub mod guard;
pub mod paths;

#[cfg(test)]
mod testing;

/// Main body, entered once startup is complete. Never returns.
///
/// Nothing is supervised yet, so this halts without writing a record.
pub fn supervise<O: Write, E: Write>(logger: &Logger<O, E>) -> ! {
    // TODO: start and reap services here.
    logger.halt()
}
