//! OS error numbers attached to error records.
//!
//! `errno` is overwritten by any later system call, including the writes the
//! logger itself performs. Callers capture it right next to the failing call
//! and pass the value along instead of reading it back later.

use std::io;

use nix::errno::Errno;

/// Current value of the calling thread's `errno`.
pub fn last() -> Errno {
    Errno::last()
}

/// OS error carried by an `io::Error`.
///
/// Errors raised by std itself (e.g. a path with an interior NUL byte) carry
/// no errno; those get the closest errno for their kind, never 0.
pub fn of(err: &io::Error) -> Errno {
    match err.raw_os_error() {
        Some(raw) if raw != 0 => Errno::from_raw(raw),
        _ => match err.kind() {
            io::ErrorKind::NotFound => Errno::ENOENT,
            io::ErrorKind::PermissionDenied => Errno::EACCES,
            io::ErrorKind::AlreadyExists => Errno::EEXIST,
            io::ErrorKind::InvalidInput => Errno::EINVAL,
            io::ErrorKind::OutOfMemory => Errno::ENOMEM,
            _ => Errno::EIO,
        },
    }
}

/// Platform description of `errno`, as `strerror` would print it.
pub fn describe(errno: Errno) -> &'static str {
    // nix has no text for 0; libc reports it as "Success".
    if errno == Errno::UnknownErrno {
        "Success"
    } else {
        errno.desc()
    }
}
