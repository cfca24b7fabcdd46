// Request lifecycle notifications
// Lets a front end show a busy indicator while requests are in flight

/// Notified once when a request starts and once when it finishes
pub trait LoadingObserver: Send + Sync {
    fn on_request_start(&self);
    fn on_request_end(&self);
}

/// Ignores all notifications
pub struct NoopObserver;

impl LoadingObserver for NoopObserver {
    fn on_request_start(&self) {}
    fn on_request_end(&self) {}
}

/// Logs lifecycle transitions at debug level
pub struct TracingObserver;

impl LoadingObserver for TracingObserver {
    fn on_request_start(&self) {
        tracing::debug!("request started");
    }

    fn on_request_end(&self) {
        tracing::debug!("request finished");
    }
}

/// Fires `on_request_start` when created and `on_request_end` when dropped,
/// so the end notification also happens on early returns and cancellation
pub(crate) struct RequestLifecycle<'a> {
    observer: &'a dyn LoadingObserver,
}

impl<'a> RequestLifecycle<'a> {
    pub(crate) fn start(observer: &'a dyn LoadingObserver) -> Self {
        observer.on_request_start();
        Self { observer }
    }
}

impl Drop for RequestLifecycle<'_> {
    fn drop(&mut self) {
        self.observer.on_request_end();
    }
}
