//! Fixed filesystem locations.

/// Runtime state directory. Must exist before startup completes.
pub const RUNTIME_DIR: &str = "/run/pudc";
