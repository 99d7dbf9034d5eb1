//! Shutdown signals

use std::{fmt, io, time::Duration};

use salvo::server::ServerHandle;
use thiserror::Error;
use tokio::signal;
use tracing::info;

#[derive(Debug, Error)]
pub(crate) enum ShutdownSignalError {
    #[error("failed to install Ctrl+C handler: {0}")]
    CtrlC(#[source] io::Error),

    #[cfg(unix)]
    #[error("failed to install SIGTERM handler: {0}")]
    SigTerm(#[source] io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Signal {
    Interrupt,
    Terminate,
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Interrupt => "interrupt",
            Self::Terminate => "terminate",
        })
    }
}

#[cfg(unix)]
async fn wait_for_signal() -> Result<Signal, ShutdownSignalError> {
    let mut terminate = signal::unix::signal(signal::unix::SignalKind::terminate())
        .map_err(ShutdownSignalError::SigTerm)?;

    tokio::select! {
        result = signal::ctrl_c() => result.map(|()| Signal::Interrupt).map_err(ShutdownSignalError::CtrlC),
        _ = terminate.recv() => Ok(Signal::Terminate),
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() -> Result<Signal, ShutdownSignalError> {
    signal::ctrl_c()
        .await
        .map(|()| Signal::Interrupt)
        .map_err(ShutdownSignalError::CtrlC)
}

/// Stop the server once an interrupt or terminate signal arrives.
///
/// In-flight requests get `grace` to finish. A scheduler tick cut off here leaves its
/// remaining sales for the next tick.
pub(crate) async fn listen(handle: ServerHandle, grace: Duration) -> Result<(), ShutdownSignalError> {
    let signal = wait_for_signal().await?;

    info!(%signal, grace_seconds = grace.as_secs(), "shutting down");

    handle.stop_graceful(Some(grace));

    Ok(())
}
