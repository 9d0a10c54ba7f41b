/// Runs `f` on the UI thread inside a tracing span. Loads and imports are
/// short enough on the desktop target that no worker thread is needed.
pub fn run_blocking<F, T>(label: &'static str, f: F) -> T
where
    F: FnOnce() -> T,
{
    let span = tracing::debug_span!("blocking", task = label);
    let _guard = span.enter();
    f()
}
