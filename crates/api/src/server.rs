//! Server loop with a bounded graceful-shutdown window.
//!
//! Once the shutdown signal fires the listener stops accepting, and
//! in-flight requests get `grace` to finish. Requests still running after
//! that are abandoned and the call reports [`ServerError::GracePeriodElapsed`].

use std::future::Future;
use std::time::Duration;

use axum::Router;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;

/// Failures from [`serve_with_grace`].
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Server I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("In-flight requests did not finish within {0:?}")]
    GracePeriodElapsed(Duration),

    #[error("Server task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// Serve `app` on `listener` until `signal` resolves, then drain for at
/// most `grace`.
pub async fn serve_with_grace<S>(
    listener: TcpListener,
    app: Router,
    signal: S,
    grace: Duration,
) -> Result<(), ServerError>
where
    S: Future<Output = ()> + Send + 'static,
{
    let stop = CancellationToken::new();
    let stop_serving = stop.clone();

    let mut server = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async move { stop_serving.cancelled().await })
            .await
    });

    tokio::select! {
        result = &mut server => {
            // Exited without a shutdown request.
            return Ok(result??);
        }
        () = signal => {}
    }

    tracing::info!(grace = ?grace, "Shutting down, draining in-flight requests");
    stop.cancel();

    match tokio::time::timeout(grace, &mut server).await {
        Ok(result) => {
            result??;
            tracing::info!("Graceful shutdown complete");
            Ok(())
        }
        Err(_) => {
            server.abort();
            tracing::error!(grace = ?grace, "Forced shutdown, requests still in flight");
            Err(ServerError::GracePeriodElapsed(grace))
        }
    }
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix). A handler that
/// cannot be installed is logged and never fires.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl-C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
