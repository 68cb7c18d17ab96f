//! Shutdown wiring shared by the plain and TLS listeners.

use std::future::Future;
use std::net::SocketAddr;
use std::time::Duration;

use axum_server::Handle;

/// Resolve on Ctrl-C. If the signal cannot be installed, never resolve.
pub async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

/// Server handle that starts a graceful shutdown once `signal` resolves.
///
/// Connections still open after `grace` are closed.
pub fn graceful_handle<F>(signal: F, grace: Duration) -> Handle<SocketAddr>
where
    F: Future<Output = ()> + Send + 'static,
{
    let handle = Handle::new();
    let shutdown = handle.clone();
    tokio::spawn(async move {
        signal.await;
        shutdown.graceful_shutdown(Some(grace));
    });
    handle
}
