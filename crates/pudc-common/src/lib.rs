//! Common utilities for the pudc init process.
//!
//! This crate provides:
//! - Leveled, timestamped console logging (`log_info!`, `log_error!`, `log_debug!`)
//! - The fatal halt used after unrecoverable errors
//! - OS error number capture and description

pub mod log;
pub mod os_error;
