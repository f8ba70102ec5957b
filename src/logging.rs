use log::LevelFilter;
use simplelog::{Config, SimpleLogger};

/// Installs the process logger. Returns false if a logger was already set.
pub fn init(level: LevelFilter) -> bool {
    SimpleLogger::init(level, Config::default()).is_ok()
}

/// Flushes buffered log output; call before the host shuts down.
pub fn shutdown() {
    log::logger().flush();
}
