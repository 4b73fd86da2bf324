use std::path::Path;

use pudc::guard::{ProcessIds, Startup};
use pudc::paths::RUNTIME_DIR;
use pudc_common::log::logger;
use pudc_common::log_info;

fn main() {
    log_info!("starting pudc v{}", env!("CARGO_PKG_VERSION"));

    // Step 1: Early checks, each one halts on failure
    Startup::new(logger()).run(ProcessIds::current(), Path::new(RUNTIME_DIR));

    // Step 2: Main body
    pudc::supervise(logger())
}
