//! Process shutdown signals shared by the service binaries.

use std::io;

#[cfg(unix)]
use tokio::signal::unix::{signal, Signal, SignalKind};

/// Resolves on Ctrl-C, or on SIGTERM where the platform has it.
///
/// The SIGTERM listener is registered by [`install`](Self::install), so a
/// signal delivered between install and [`recv`](Self::recv) is not lost.
pub struct ShutdownSignal {
    #[cfg(unix)]
    terminate: Signal,
}

impl ShutdownSignal {
    /// Registers the listeners. Must be called from inside a tokio runtime.
    pub fn install() -> io::Result<Self> {
        Ok(Self {
            #[cfg(unix)]
            terminate: signal(SignalKind::terminate())?,
        })
    }

    /// Waits for the first shutdown signal.
    pub async fn recv(self) {
        let ctrl_c = async {
            if tokio::signal::ctrl_c().await.is_err() {
                std::future::pending::<()>().await;
            }
        };

        #[cfg(unix)]
        let terminate = {
            let mut terminate = self.terminate;
            async move {
                terminate.recv().await;
            }
        };

        #[cfg(not(unix))]
        let terminate = std::future::pending::<()>();

        tokio::select! {
            _ = ctrl_c => {},
            _ = terminate => {},
        }
    }
}
