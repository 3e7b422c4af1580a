use std::sync::Once;

static RUNTIME_INIT: Once = Once::new();

/// Configure the coroutine runtime and test logging once per test binary.
/// Connection coroutines run the full routing pass on their own stack, so
/// give them more room than the default.
pub fn setup_runtime() {
    RUNTIME_INIT.call_once(|| {
        may::config().set_stack_size(0x20000);
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}
