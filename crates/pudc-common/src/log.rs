//! Logging utilities for pudc.
//!
//! Every record is a single line:
//!
//! ```text
//! [2024-05-17 09:30:05] pudc (info): starting pudc v0.1.0.
//! [2024-05-17 09:30:05] pudc (error): failed to stat '/run/pudc': No such file or directory
//! ```
//!
//! Info and debug records go to the output sink and end with `.`; error
//! records go to the error sink and end with the description of an OS error.
//! Each piece of a record is flushed as soon as it is written, so nothing is
//! lost when the process halts right after logging.

use std::fmt;
use std::io::{self, Stderr, Stdout, Write};
use std::process;
use std::sync::{LazyLock, Mutex, PoisonError};
use std::time::{SystemTime, UNIX_EPOCH};

use chrono::{DateTime, Local, NaiveDateTime, Utc};
use nix::errno::Errno;

use crate::os_error;

/// Name printed in front of every record.
pub const PROGRAM: &str = "pudc";

/// Exit status of a halted process.
pub const HALT_EXIT_CODE: i32 = 1;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Source of the record timestamp. `None` drops the timestamp prefix.
pub type Clock = fn() -> Option<NaiveDateTime>;

/// Called after a fatal record has been written. Must not return.
pub type Halt = fn() -> !;

/// Severity of a record, fixed at the call site.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Error,
    Debug,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Error => "error",
            Severity::Debug => "debug",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Current local wall-clock time, or `None` if the clock can't be read.
pub fn local_now() -> Option<NaiveDateTime> {
    let since_epoch = SystemTime::now().duration_since(UNIX_EPOCH).ok()?;
    let secs = i64::try_from(since_epoch.as_secs()).ok()?;
    let utc = DateTime::<Utc>::from_timestamp(secs, 0)?;
    Some(utc.with_timezone(&Local).naive_local())
}

/// Terminate the process immediately with [`HALT_EXIT_CODE`].
///
/// No destructors or other cleanup run.
pub fn halt() -> ! {
    process::exit(HALT_EXIT_CODE)
}

/// Writes leveled records to an output sink and an error sink.
///
/// Each sink sits behind its own mutex and a record is written while holding
/// it, so records from concurrent callers never interleave within a line.
pub struct Logger<O, E> {
    out: Mutex<O>,
    err: Mutex<E>,
    clock: Clock,
    halt: Halt,
    debug: bool,
}

impl<O: Write, E: Write> Logger<O, E> {
    /// Logger using the system clock and halting via process exit.
    ///
    /// Debug records are enabled when built with the `debug` feature.
    pub fn new(out: O, err: E) -> Self {
        Self {
            out: Mutex::new(out),
            err: Mutex::new(err),
            clock: local_now,
            halt,
            debug: cfg!(feature = "debug"),
        }
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_halt(mut self, halt: Halt) -> Self {
        self.halt = halt;
        self
    }

    pub fn with_debug(mut self, enabled: bool) -> Self {
        self.debug = enabled;
        self
    }

    /// Give back the sinks, e.g. to inspect captured output.
    pub fn into_sinks(self) -> (O, E) {
        (
            self.out.into_inner().unwrap_or_else(PoisonError::into_inner),
            self.err.into_inner().unwrap_or_else(PoisonError::into_inner),
        )
    }

    /// Write an info record to the output sink.
    pub fn info(&self, message: fmt::Arguments<'_>) {
        emit(&self.out, self.clock, Severity::Info, message, None);
    }

    /// Write a debug record to the output sink, if debug records are enabled.
    ///
    /// When disabled, neither the clock nor the message is touched.
    pub fn debug(&self, message: fmt::Arguments<'_>) {
        if !self.debug {
            return;
        }
        emit(&self.out, self.clock, Severity::Debug, message, None);
    }

    /// Write an error record to the error sink, followed by the description
    /// of `errno`.
    pub fn error(&self, errno: Errno, message: fmt::Arguments<'_>) {
        emit(&self.err, self.clock, Severity::Error, message, Some(errno));
    }

    /// Like [`Logger::error`], then halt.
    pub fn fatal(&self, errno: Errno, message: fmt::Arguments<'_>) -> ! {
        self.error(errno, message);
        self.halt()
    }

    /// Halt without writing anything.
    pub fn halt(&self) -> ! {
        (self.halt)()
    }
}

fn emit<W: Write>(
    sink: &Mutex<W>,
    clock: Clock,
    severity: Severity,
    message: fmt::Arguments<'_>,
    errno: Option<Errno>,
) {
    let mut sink = sink.lock().unwrap_or_else(PoisonError::into_inner);
    // A failed write has nowhere else to be reported.
    let _ = write_record(&mut *sink, clock(), severity, message, errno);
}

fn write_record<W: Write>(
    w: &mut W,
    timestamp: Option<NaiveDateTime>,
    severity: Severity,
    message: fmt::Arguments<'_>,
    errno: Option<Errno>,
) -> io::Result<()> {
    if let Some(timestamp) = timestamp {
        write!(w, "[{}] ", timestamp.format(TIMESTAMP_FORMAT))?;
        w.flush()?;
    }

    write!(w, "{PROGRAM} (")?;
    w.flush()?;
    w.write_all(severity.as_str().as_bytes())?;
    w.flush()?;
    w.write_all(b"): ")?;
    w.flush()?;

    w.write_fmt(message)?;
    w.flush()?;

    match errno {
        Some(errno) => {
            w.write_all(b": ")?;
            w.flush()?;
            writeln!(w, "{}", os_error::describe(errno))?;
        }
        None => w.write_all(b".\n")?,
    }
    w.flush()
}

static LOGGER: LazyLock<Logger<Stdout, Stderr>> =
    LazyLock::new(|| Logger::new(io::stdout(), io::stderr()));

/// Process-wide logger on standard output and standard error.
pub fn logger() -> &'static Logger<Stdout, Stderr> {
    &LOGGER
}

/// Log an info record to standard output, or to `logger => ...`.
#[macro_export]
macro_rules! log_info {
    ($logger:expr => $($arg:tt)*) => {
        $logger.info(format_args!($($arg)*))
    };
    ($($arg:tt)*) => {
        $crate::log_info!($crate::log::logger() => $($arg)*)
    };
}

/// Log an error record to standard error (or `logger => ...`), followed by
/// the current `errno`.
///
/// `errno` is read before anything else in the call is evaluated. The first
/// argument says whether to halt afterwards; a literal `true` expands to a
/// diverging call, so anything after it is unreachable.
#[macro_export]
macro_rules! log_error {
    ($logger:expr => true, $($arg:tt)*) => {{
        let errno = $crate::os_error::last();
        $logger.fatal(errno, format_args!($($arg)*))
    }};
    ($logger:expr => false, $($arg:tt)*) => {{
        let errno = $crate::os_error::last();
        $logger.error(errno, format_args!($($arg)*))
    }};
    ($logger:expr => $halt:expr, $($arg:tt)*) => {{
        let errno = $crate::os_error::last();
        if $halt {
            $logger.fatal(errno, format_args!($($arg)*))
        } else {
            $logger.error(errno, format_args!($($arg)*))
        }
    }};
    (true, $($arg:tt)*) => {
        $crate::log_error!($crate::log::logger() => true, $($arg)*)
    };
    (false, $($arg:tt)*) => {
        $crate::log_error!($crate::log::logger() => false, $($arg)*)
    };
    ($halt:expr, $($arg:tt)*) => {
        $crate::log_error!($crate::log::logger() => $halt, $($arg)*)
    };
}

/// Log a debug record to standard output, or to `logger => ...`.
#[cfg(feature = "debug")]
#[macro_export]
macro_rules! log_debug {
    ($logger:expr => $($arg:tt)*) => {
        $logger.debug(format_args!($($arg)*))
    };
    ($($arg:tt)*) => {
        $crate::log_debug!($crate::log::logger() => $($arg)*)
    };
}

/// Log a debug record to standard output, or to `logger => ...`.
///
/// Built without the `debug` feature: the call compiles to nothing. The
/// format string is still checked but neither the logger nor the arguments
/// are evaluated.
#[cfg(not(feature = "debug"))]
#[macro_export]
macro_rules! log_debug {
    ($logger:expr => $($arg:tt)*) => {
        if false {
            let _ = &$logger;
            let _ = format_args!($($arg)*);
        }
    };
    ($($arg:tt)*) => {
        if false {
            let _ = format_args!($($arg)*);
        }
    };
}
