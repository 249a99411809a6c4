// ABOUTME: env_logger initialization, controlled by RUST_LOG

/// Installs the `env_logger` backend for the `log` facade. Safe to call
/// more than once; later calls are no-ops.
pub fn init() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).try_init();
}
