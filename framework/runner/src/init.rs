/// Initialise logging for an embedding harness.
///
/// Safe to call once per scenario; calls after the first are no-ops.
pub fn init_logging() {
    let _ = env_logger::Builder::from_default_env().try_init();
}
