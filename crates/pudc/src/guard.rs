//! Startup preconditions.
//!
//! pudc must be the first process (and thread) of its namespace, and its
//! runtime directory must already exist. Each check is fatal: a failure is
//! logged as an error and the process halts.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use nix::errno::Errno;
use nix::unistd::{getpid, gettid};
use pudc_common::log::Logger;
use pudc_common::{log_debug, os_error};

#[derive(Debug, thiserror::Error)]
pub enum GuardError {
    #[error("'pudc' is supposed to be PID 1, but it is PID {pid}")]
    NotPid1 { pid: i32 },

    #[error("'pudc' is supposed to be TID 1, but it is TID {tid}")]
    NotTid1 { tid: i32 },

    #[error("'{}' exists and it's not a directory", .path.display())]
    NotADirectory { path: PathBuf },

    #[error("failed to stat '{}'", .path.display())]
    Stat {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl GuardError {
    /// OS error reported alongside the message.
    pub fn errno(&self) -> Errno {
        match self {
            GuardError::NotPid1 { .. } | GuardError::NotTid1 { .. } => Errno::UnknownErrno,
            GuardError::NotADirectory { .. } => Errno::ENOTDIR,
            GuardError::Stat { source, .. } => os_error::of(source),
        }
    }
}

/// Process and thread ID as seen by the kernel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessIds {
    pub pid: i32,
    pub tid: i32,
}

impl ProcessIds {
    pub fn current() -> Self {
        Self {
            pid: getpid().as_raw(),
            tid: gettid().as_raw(),
        }
    }
}

/// Both IDs must be 1. The PID is checked first.
pub fn check_identity(ids: ProcessIds) -> Result<(), GuardError> {
    if ids.pid != 1 {
        return Err(GuardError::NotPid1 { pid: ids.pid });
    }
    if ids.tid != 1 {
        return Err(GuardError::NotTid1 { tid: ids.tid });
    }
    Ok(())
}

/// `path` must exist and be a directory (symlinks are followed).
pub fn check_dir(path: &Path) -> Result<(), GuardError> {
    let meta = std::fs::metadata(path).map_err(|source| GuardError::Stat {
        path: path.to_path_buf(),
        source,
    })?;
    if !meta.is_dir() {
        return Err(GuardError::NotADirectory {
            path: path.to_path_buf(),
        });
    }
    Ok(())
}

/// How far startup has got. There is no halted stage: halting ends the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Unchecked,
    IdentityVerified,
    DirectoryVerified,
    Ready,
}

/// Runs the startup checks in order, reporting failures through `logger`.
pub struct Startup<'a, O, E> {
    logger: &'a Logger<O, E>,
    stage: Stage,
}

impl<'a, O: Write, E: Write> Startup<'a, O, E> {
    pub fn new(logger: &'a Logger<O, E>) -> Self {
        Self {
            logger,
            stage: Stage::Unchecked,
        }
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn verify_identity(&mut self, ids: ProcessIds) {
        self.require(check_identity(ids));
        self.stage = Stage::IdentityVerified;
    }

    pub fn verify_dir(&mut self, path: &Path) {
        self.require(check_dir(path));
        log_debug!(self.logger => "directory '{}' found", path.display());
        self.stage = Stage::DirectoryVerified;
    }

    /// Run every check. Only returns if all of them passed.
    pub fn run(mut self, ids: ProcessIds, runtime_dir: &Path) -> Stage {
        self.verify_identity(ids);
        self.verify_dir(runtime_dir);
        self.stage = Stage::Ready;
        self.stage
    }

    fn require(&self, result: Result<(), GuardError>) {
        if let Err(e) = result {
            self.logger.fatal(e.errno(), format_args!("{e}"));
        }
    }
}
