//! Single owner of the native mount session.
//!
//! Every filesystem operation funnels through [`Executor::run`], which
//! lazily mounts, detects the dead-transport signature and remounts
//! exactly once per operation. The lock covers only the get-or-create
//! and teardown-and-replace sections, never the operation itself, so a
//! slow read does not stall unrelated calls.

use std::future::Future;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::client::{ClientResult, MountClient, MountedFs};
use crate::config::MountConfig;
use crate::error::{Error, Result};

struct State<F> {
    config: Arc<MountConfig>,
    fs: Option<Arc<F>>,
}

/// Owns the one live session per provider instance. Callers never touch
/// the mounted filesystem except through the `run` variants.
pub struct Executor<C: MountClient> {
    client: C,
    state: Mutex<State<C::Fs>>,
}

impl<C: MountClient> Executor<C> {
    pub fn new(client: C, config: MountConfig) -> Self {
        Self {
            client,
            state: Mutex::new(State {
                config: Arc::new(config),
                fs: None,
            }),
        }
    }

    /// Current config snapshot.
    pub async fn config(&self) -> Arc<MountConfig> {
        self.state.lock().await.config.clone()
    }

    /// Replaces the config snapshot and invalidates the live session.
    /// The next operation remounts with the new parameters.
    pub async fn set_config(&self, config: MountConfig) {
        let mut state = self.state.lock().await;
        state.config = Arc::new(config);
        if let Some(dead) = state.fs.take() {
            if let Err(e) = dead.unmount().await {
                warn!("unmount on config change: {}", e);
            }
        }
    }

    async fn acquire(&self) -> ClientResult<Arc<C::Fs>> {
        let mut state = self.state.lock().await;
        if let Some(fs) = &state.fs {
            return Ok(fs.clone());
        }
        let fs = Arc::new(self.client.mount(&state.config).await?);
        state.fs = Some(fs.clone());
        Ok(fs)
    }

    /// Replaces `stale` with a fresh mount. If another task already
    /// replaced it, returns that session instead of mounting again.
    async fn remount(&self, stale: &Arc<C::Fs>) -> ClientResult<Arc<C::Fs>> {
        let mut state = self.state.lock().await;
        if let Some(current) = &state.fs {
            if !Arc::ptr_eq(current, stale) {
                return Ok(current.clone());
            }
        }
        if let Some(dead) = state.fs.take() {
            // best effort; a dead transport usually cannot unmount cleanly
            if let Err(e) = dead.unmount().await {
                warn!("unmount of dead session: {}", e);
            }
        }
        let fs = Arc::new(self.client.mount(&state.config).await?);
        state.fs = Some(fs.clone());
        Ok(fs)
    }

    /// Runs `op` against a live session, mounting one if needed.
    ///
    /// On the transport-shutdown signature the dead session is torn down,
    /// a fresh one is mounted and `op` is retried exactly once; a second
    /// failure of any kind propagates unmodified. Every other failure
    /// propagates immediately. A failed mount leaves the session absent
    /// so a later call can try again.
    pub async fn run<T, F, Fut>(&self, op: F) -> ClientResult<T>
    where
        F: Fn(Arc<C::Fs>) -> Fut,
        Fut: Future<Output = ClientResult<T>>,
    {
        let fs = self.acquire().await?;
        match op(fs.clone()).await {
            Err(e) if e.is_transport_shutdown() => {
                debug!("transport shutdown, remounting");
                let fs = self.remount(&fs).await?;
                op(fs).await
            }
            other => other,
        }
    }

    /// [`run`](Self::run) with failures translated to POSIX codes and
    /// tagged with the failing operation's name. Not-found stays distinct.
    pub async fn run_errno<T, F, Fut>(&self, name: &'static str, op: F) -> Result<T>
    where
        F: Fn(Arc<C::Fs>) -> Fut,
        Fut: Future<Output = ClientResult<T>>,
    {
        self.run(op)
            .await
            .map_err(|e| Error::errno_shaped(name, e))
    }

    /// [`run`](Self::run) for listing-style calls: failures other than
    /// not-found land in `extras` as an out-of-band message and `None`
    /// is returned. Callers must treat `None` as no data.
    pub async fn run_soft<T, F, Fut>(&self, op: F, extras: &mut Option<String>) -> Result<Option<T>>
    where
        F: Fn(Arc<C::Fs>) -> Fut,
        Fut: Future<Output = ClientResult<T>>,
    {
        match self.run(op).await {
            Ok(value) => Ok(Some(value)),
            Err(e @ crate::client::ClientError::NotFound(_)) => Err(e.into()),
            Err(e) => {
                *extras = Some(e.to_string());
                Ok(None)
            }
        }
    }

    /// [`run`](Self::run) for calls whose not-found must propagate
    /// distinctly while every other failure becomes the fatal I/O kind.
    pub async fn run_unchecked<T, F, Fut>(&self, op: F) -> Result<T>
    where
        F: Fn(Arc<C::Fs>) -> Fut,
        Fut: Future<Output = ClientResult<T>>,
    {
        self.run(op).await.map_err(Error::from)
    }
}
