// A test session owns the one event loop every async fixture runs on and
// the one simulator every deployment mutates. Both live until the session
// is closed (or, for the global session, until the process exits).

use crate::artifacts::ContractResolver;
use crate::config::{HarnessConfig, GLOBAL_CONFIG};
use crate::core::{ChainSimulator, Starknet};
use crate::error::{HarnessError, Result};
use crate::testnet::init_logging;
use log::{error, info};
use once_cell::sync::Lazy;
use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::runtime::{Builder, Runtime};
use tokio::sync::OnceCell;

const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(1);

static GLOBAL_SESSION: Lazy<Result<TestSession>> = Lazy::new(|| {
    init_logging(&GLOBAL_CONFIG)?;
    TestSession::new(&GLOBAL_CONFIG)
});

pub struct TestSession<S: ChainSimulator = Starknet> {
    runtime: Runtime,
    // Held for a whole `block_on`, so bodies from different threads take turns
    turn: Mutex<()>,
    // Holds the first construction outcome, failures included
    simulator: OnceCell<Result<Arc<S>>>,
    resolver: ContractResolver,
}

impl TestSession<Starknet> {
    /// The process-wide session, built from `GLOBAL_CONFIG` on first access.
    /// If building it failed, every caller gets the same error.
    pub fn global() -> Result<&'static TestSession> {
        GLOBAL_SESSION.as_ref().map_err(HarnessError::clone)
    }
}

impl<S: ChainSimulator> TestSession<S> {
    pub fn new(config: &HarnessConfig) -> Result<TestSession<S>> {
        Self::with_resolver(ContractResolver::from_config(config))
    }

    pub fn with_resolver(resolver: ContractResolver) -> Result<TestSession<S>> {
        // Single-threaded: fixtures and tests take turns on one loop
        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| HarnessError::SessionInit(format!("Failed to build event loop: {e}")))?;

        info!(
            "Starting test session (artifacts: {})",
            resolver.contracts_dir().display()
        );
        Ok(TestSession {
            runtime,
            turn: Mutex::new(()),
            simulator: OnceCell::new(),
            resolver,
        })
    }

    /// Run a test body to completion on the session loop.
    ///
    /// Callers on other threads wait until the running body has finished.
    pub fn block_on<F: Future>(&self, future: F) -> F::Output {
        let _turn = self.turn.lock().unwrap_or_else(|e| e.into_inner());
        self.runtime.block_on(future)
    }

    /// The session's simulator, constructed empty on first call.
    ///
    /// Every later call returns the same instance. A failed construction is
    /// not retried: the session stays unusable.
    pub async fn simulator(&self) -> Result<Arc<S>> {
        self.simulator
            .get_or_init(|| async {
                S::empty().await.map(Arc::new).map_err(|e| {
                    error!("Failed to create simulator: {e}");
                    HarnessError::SessionInit(e.to_string())
                })
            })
            .await
            .clone()
    }

    pub fn resolver(&self) -> &ContractResolver {
        &self.resolver
    }

    /// Shut the session loop down. Pending tasks get a short grace period.
    pub fn close(self) {
        info!("Closing test session");
        self.runtime.shutdown_timeout(SHUTDOWN_TIMEOUT);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use crate::core::{ContractDefinition, DeployedContract, Felt};

    struct BrokenSimulator;

    #[async_trait]
    impl ChainSimulator for BrokenSimulator {
        async fn empty() -> Result<Self> {
            Err(HarnessError::Io("state directory unavailable".to_string()))
        }

        async fn deploy(
            &self,
            _constructor_calldata: Vec<Felt>,
            _contract_definition: ContractDefinition,
        ) -> Result<DeployedContract> {
            Err(HarnessError::Deployment("unreachable".to_string()))
        }
    }

    fn config() -> HarnessConfig {
        HarnessConfig::with_artifacts_dir("does-not-matter")
    }

    #[test]
    fn test_simulator_is_shared_within_session() {
        let session: TestSession = TestSession::new(&config()).unwrap();
        let (first, second) = session.block_on(async {
            (
                session.simulator().await.unwrap(),
                session.simulator().await.unwrap(),
            )
        });
        assert!(Arc::ptr_eq(&first, &second));
        session.close();
    }

    #[test]
    fn test_separate_sessions_get_separate_simulators() {
        let a: TestSession = TestSession::new(&config()).unwrap();
        let b: TestSession = TestSession::new(&config()).unwrap();
        let sim_a = a.block_on(a.simulator()).unwrap();
        let sim_b = b.block_on(b.simulator()).unwrap();
        assert!(!Arc::ptr_eq(&sim_a, &sim_b));
    }

    #[test]
    fn test_construction_failure_is_fatal() {
        let session: TestSession<BrokenSimulator> = TestSession::new(&config()).unwrap();
        let first = session.block_on(session.simulator());
        let second = session.block_on(session.simulator());

        assert!(matches!(first, Err(HarnessError::SessionInit(ref msg)) if msg.contains("unavailable")));
        assert_eq!(first.err(), second.err());
    }

    #[test]
    fn test_bodies_from_different_threads_take_turns() {
        use std::sync::atomic::{AtomicUsize, Ordering};
        use std::thread;

        let session: TestSession = TestSession::new(&config()).unwrap();
        let active = AtomicUsize::new(0);
        let peak = AtomicUsize::new(0);

        thread::scope(|scope| {
            for _ in 0..4 {
                scope.spawn(|| {
                    session.block_on(async {
                        let now = active.fetch_add(1, Ordering::SeqCst) + 1;
                        peak.fetch_max(now, Ordering::SeqCst);
                        // Blocking on purpose: an overlapping body would be seen here
                        thread::sleep(Duration::from_millis(50));
                        active.fetch_sub(1, Ordering::SeqCst);
                    })
                });
            }
        });

        assert_eq!(peak.load(Ordering::SeqCst), 1);
        assert_eq!(active.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_panicking_body_does_not_wedge_the_session() {
        let session: TestSession = TestSession::new(&config()).unwrap();
        let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            session.block_on(async { panic!("body failed") })
        }));
        assert!(outcome.is_err());

        let simulator = session.block_on(session.simulator());
        assert!(simulator.is_ok());
    }

    #[test]
    fn test_global_session_is_a_singleton() {
        let a = TestSession::global().unwrap();
        let b = TestSession::global().unwrap();
        assert!(std::ptr::eq(a, b));
    }
}
