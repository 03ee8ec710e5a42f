//! Shared resources and helpers for integration tests.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures_util::future::BoxFuture;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use healthcheck::{BoxError, Healthcheck, LifecycleError, MultiError, Resource, Shutdown};

/// A scriptable resource: optional delay, optional failure message, and a
/// counter of completed probe bodies.
pub struct ScriptedResource {
    name: String,
    delay: Duration,
    failure: Option<String>,
    probes: AtomicU32,
}

impl ScriptedResource {
    pub fn passing(name: &str) -> Arc<Self> {
        Self::build(name, Duration::ZERO, None)
    }

    pub fn failing(name: &str, message: &str) -> Arc<Self> {
        Self::build(name, Duration::ZERO, Some(message))
    }

    pub fn slow_failing(name: &str, delay: Duration, message: &str) -> Arc<Self> {
        Self::build(name, delay, Some(message))
    }

    pub fn slow_passing(name: &str, delay: Duration) -> Arc<Self> {
        Self::build(name, delay, None)
    }

    fn build(name: &str, delay: Duration, failure: Option<&str>) -> Arc<Self> {
        Arc::new(Self {
            name: name.to_string(),
            delay,
            failure: failure.map(str::to_string),
            probes: AtomicU32::new(0),
        })
    }

    /// Number of probe bodies that ran to completion.
    pub fn probes(&self) -> u32 {
        self.probes.load(Ordering::SeqCst)
    }
}

impl Resource for ScriptedResource {
    fn name(&self) -> &str {
        &self.name
    }

    fn probe(&self) -> BoxFuture<'_, Result<(), BoxError>> {
        Box::pin(async move {
            if self.delay > Duration::ZERO {
                tokio::time::sleep(self.delay).await;
            }
            self.probes.fetch_add(1, Ordering::SeqCst);
            match &self.failure {
                Some(message) => Err(message.clone().into()),
                None => Ok(()),
            }
        })
    }
}

pub type ServeHandle = JoinHandle<Result<(), MultiError<LifecycleError>>>;

fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "healthcheck=debug".into()),
        )
        .try_init();
}

/// Bind an ephemeral port and serve `hc` on it.
///
/// Returns the base URL, the shutdown coordinator, and the serve task.
pub async fn spawn_service(hc: Healthcheck) -> (String, Shutdown, ServeHandle) {
    init_tracing();

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let signal = shutdown.subscribe();
    let handle = tokio::spawn(async move { hc.serve(listener, signal).await });

    (format!("http://{addr}"), shutdown, handle)
}
