/// Development helper: initialize tracing subscriber when `RUST_LOG` is set.
///
/// Benches, tests and examples can call `ferrule::dev_tracing::init_tracing()`
/// to see the events `ferrule-core` emits:
///
/// - `debug`: context created, shut down, terminated and released on drop;
///   sockets opened and closed; `EINTR` retries while releasing a context
/// - `trace`: every context option read or set, with its value
/// - `error`: failures swallowed by drop (`Failed to terminate context on
///   drop`, `Failed to close socket on drop`) and a context that could not be
///   torn down after its options were rejected
///
/// This is a no-op when `RUST_LOG` is not set or when a global subscriber is
/// already installed.
pub fn init_tracing() {
    use std::env;

    if env::var("RUST_LOG").is_ok() {
        // Best-effort: try to init a fmt subscriber from env filter.
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    }
}
