//! Helpers for observing halts without leaving the test process.

use std::panic::{self, AssertUnwindSafe};

use pudc_common::log::Logger;

use crate::guard::ProcessIds;

pub const INIT: ProcessIds = ProcessIds { pid: 1, tid: 1 };

struct Halted;

fn unwind() -> ! {
    panic::resume_unwind(Box::new(Halted))
}

/// Run `f`, returning whether it halted.
pub fn halted(f: impl FnOnce()) -> bool {
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(()) => false,
        Err(payload) => payload.is::<Halted>(),
    }
}

/// Captures both streams, prints no timestamps, unwinds instead of exiting.
pub fn test_logger() -> Logger<Vec<u8>, Vec<u8>> {
    Logger::new(Vec::new(), Vec::new())
        .with_clock(|| None)
        .with_halt(unwind)
        .with_debug(true)
}

pub fn text(buf: Vec<u8>) -> String {
    String::from_utf8(buf).unwrap()
}
