use std::future::Future;
use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Initializing,
    Serving,
    Draining,
    Stopped,
}

#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("illegal lifecycle transition from {from:?} to {to:?}")]
    IllegalTransition { from: Phase, to: Phase },
    #[error("graceful shutdown did not complete within {0:?}")]
    ShutdownTimeout(Duration),
    #[error("server error: {0}")]
    Server(#[from] std::io::Error),
    #[error("server task failed: {0}")]
    ServerTask(String),
    #[error("failed to wait for shutdown signal: {0}")]
    Signal(#[source] std::io::Error),
}

/// Tracks the service through Initializing -> Serving -> Draining -> Stopped.
/// A failed startup goes straight from Initializing to Stopped.
#[derive(Debug)]
pub struct Lifecycle {
    phase: Phase,
}

impl Default for Lifecycle {
    fn default() -> Self {
        Self::new()
    }
}

impl Lifecycle {
    pub fn new() -> Self {
        Self {
            phase: Phase::Initializing,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn advance(&mut self, to: Phase) -> Result<(), LifecycleError> {
        use Phase::*;
        match (self.phase, to) {
            (Initializing, Serving)
            | (Initializing, Stopped)
            | (Serving, Draining)
            | (Draining, Stopped) => {
                log::info!("Lifecycle {:?} -> {:?}", self.phase, to);
                self.phase = to;
                Ok(())
            }
            (from, to) => Err(LifecycleError::IllegalTransition { from, to }),
        }
    }
}

/// Waits for `stop` to finish, giving up once `grace` elapses.
pub async fn drain<F>(stop: F, grace: Duration) -> Result<(), LifecycleError>
where
    F: Future<Output = Result<(), LifecycleError>>,
{
    match actix_rt::time::timeout(grace, stop).await {
        Ok(result) => result,
        Err(_elapsed) => Err(LifecycleError::ShutdownTimeout(grace)),
    }
}

/// Resolves on SIGINT or SIGTERM.
#[cfg(unix)]
pub async fn shutdown_signal() -> std::io::Result<()> {
    use actix_rt::signal::unix::{signal, SignalKind};
    use futures::future::{self, Either};

    let mut terminate = signal(SignalKind::terminate())?;
    let interrupt = Box::pin(actix_rt::signal::ctrl_c());
    let terminated = Box::pin(terminate.recv());

    match future::select(interrupt, terminated).await {
        Either::Left((result, _)) => {
            result?;
            log::info!("Shutdown signal received (SIGINT)");
        }
        Either::Right(_) => log::info!("Shutdown signal received (SIGTERM)"),
    }
    Ok(())
}

#[cfg(not(unix))]
pub async fn shutdown_signal() -> std::io::Result<()> {
    actix_rt::signal::ctrl_c().await?;
    log::info!("Shutdown signal received");
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use actix_rt::time::sleep;

    #[test]
    fn test_full_lifecycle() {
        let mut lifecycle = Lifecycle::new();
        assert_eq!(lifecycle.phase(), Phase::Initializing);

        lifecycle.advance(Phase::Serving).unwrap();
        lifecycle.advance(Phase::Draining).unwrap();
        lifecycle.advance(Phase::Stopped).unwrap();
        assert_eq!(lifecycle.phase(), Phase::Stopped);
    }

    #[test]
    fn test_failed_startup_stops_directly() {
        let mut lifecycle = Lifecycle::new();

        lifecycle.advance(Phase::Stopped).unwrap();
        assert_eq!(lifecycle.phase(), Phase::Stopped);
    }

    #[test]
    fn test_illegal_transitions() {
        let mut lifecycle = Lifecycle::new();
        assert!(matches!(
            lifecycle.advance(Phase::Draining),
            Err(LifecycleError::IllegalTransition {
                from: Phase::Initializing,
                to: Phase::Draining,
            })
        ));

        lifecycle.advance(Phase::Serving).unwrap();
        assert!(lifecycle.advance(Phase::Serving).is_err());
        assert!(lifecycle.advance(Phase::Stopped).is_err());
        assert_eq!(lifecycle.phase(), Phase::Serving);
    }

    #[actix_rt::test]
    async fn test_drain_within_grace_period() {
        let stop = async {
            sleep(Duration::from_millis(20)).await;
            Ok::<_, LifecycleError>(())
        };

        assert!(drain(stop, Duration::from_secs(1)).await.is_ok());
    }

    #[actix_rt::test]
    async fn test_drain_past_grace_period_times_out() {
        let stop = async {
            sleep(Duration::from_secs(5)).await;
            Ok::<_, LifecycleError>(())
        };

        let result = drain(stop, Duration::from_millis(50)).await;
        assert!(matches!(result, Err(LifecycleError::ShutdownTimeout(_))));
    }

    #[actix_rt::test]
    async fn test_drain_propagates_stop_error() {
        let stop = async { Err::<(), _>(LifecycleError::ServerTask("panicked".to_string())) };

        let result = drain(stop, Duration::from_secs(1)).await;
        assert!(matches!(result, Err(LifecycleError::ServerTask(_))));
    }
}
