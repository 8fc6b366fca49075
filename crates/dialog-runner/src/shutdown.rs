use std::future::Future;
use tracing::warn;

/// Resolves on Ctrl+C or, on unix, SIGTERM.
///
/// The handlers are installed when this is called, not when the returned
/// future is first polled, so a signal delivered in between is held until the
/// future is awaited. If a handler cannot be installed that signal is never
/// reported.
#[cfg(unix)]
pub fn shutdown_signal() -> impl Future<Output = ()> + Send + 'static {
    use tokio::signal::unix::{signal, SignalKind};

    let mut interrupt = signal(SignalKind::interrupt())
        .map_err(|e| warn!("[dialog-runner] Failed to install Ctrl+C handler: {e}"))
        .ok();
    let mut terminate = signal(SignalKind::terminate())
        .map_err(|e| warn!("[dialog-runner] Failed to install SIGTERM handler: {e}"))
        .ok();

    async move {
        let interrupt = async {
            match interrupt.as_mut() {
                Some(signal) => {
                    signal.recv().await;
                }
                None => std::future::pending::<()>().await,
            }
        };
        let terminate = async {
            match terminate.as_mut() {
                Some(signal) => {
                    signal.recv().await;
                }
                None => std::future::pending::<()>().await,
            }
        };

        tokio::select! {
            _ = interrupt => {},
            _ = terminate => {},
        }
    }
}

/// Resolves on Ctrl+C.
#[cfg(not(unix))]
pub fn shutdown_signal() -> impl Future<Output = ()> + Send + 'static {
    async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("[dialog-runner] Failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
    }
}
