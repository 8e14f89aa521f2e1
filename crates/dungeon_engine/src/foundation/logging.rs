//! Logging utilities and structured logging support

pub use log::{debug, info, warn, error, trace};

/// Initialize the logging system with a default filter
///
/// `RUST_LOG` still wins when it is set. Calling this more than once is
/// harmless; later calls are ignored.
pub fn init_with_level(default_filter: &str) {
    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| default_filter.to_string());
    let result = env_logger::Builder::new()
        .parse_filters(&filter)
        .format_timestamp_millis()
        .try_init();

    if result.is_err() {
        log::trace!("Logger already initialized");
    }
}

/// Initialize logging for unit tests (captured per test)
#[cfg(test)]
pub fn init_for_tests() {
    let _ = env_logger::Builder::new()
        .parse_filters("debug")
        .is_test(true)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repeated_init_is_harmless() {
        init_with_level("warn");
        init_with_level("debug");
        init_for_tests();
        log::info!("logger still usable after repeated init");
    }
}
