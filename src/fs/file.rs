use std::sync::Arc;
use tokio::sync::Mutex;

use crate::client::{Fd, MountClient, MountedFs, OpenFlags};
use crate::error::Result;
use crate::executor::Executor;

/// Access mode requested by the host for an open document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenMode {
    Read,
    Write,
    ReadWrite,
}

impl OpenMode {
    pub(crate) fn flags(self) -> OpenFlags {
        match self {
            Self::Read => OpenFlags::READ,
            Self::Write => OpenFlags::WRITE,
            Self::ReadWrite => OpenFlags::READ | OpenFlags::WRITE,
        }
    }
}

struct FileState<F> {
    fs: Arc<F>,
    fd: Fd,
}

/// An open file that survives session recycling.
///
/// Every access first checks whether the executor has replaced the
/// session this descriptor was opened on; if so, the same path and mode
/// are reopened against the new session before continuing, so the
/// caller's offset-based semantics are preserved. `sync_all` and `close`
/// instead no-op on a changed session, since there is nothing meaningful
/// to flush or close server-side.
pub struct RemoteFile<C: MountClient> {
    executor: Arc<Executor<C>>,
    path: String,
    flags: OpenFlags,
    state: Mutex<FileState<C::Fs>>,
}

impl<C: MountClient> RemoteFile<C> {
    pub(crate) async fn open(
        executor: Arc<Executor<C>>,
        path: String,
        flags: OpenFlags,
    ) -> Result<Self> {
        let (fs, fd) = executor
            .run_unchecked(|fs| {
                let path = path.clone();
                async move {
                    let fd = fs.open(&path, flags, 0).await?;
                    Ok((fs, fd))
                }
            })
            .await?;
        Ok(Self {
            executor,
            path,
            flags,
            state: Mutex::new(FileState { fs, fd }),
        })
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Reads up to `len` bytes at `offset`, returning the bytes actually
    /// transferred. An empty result means end of file.
    pub async fn read_at(&self, offset: u64, len: usize) -> Result<Vec<u8>> {
        self.executor
            .run_errno("read", |fs| async move {
                let mut state = self.state.lock().await;
                self.reopen_if_stale(&mut state, &fs).await?;
                let mut buf = vec![0; len];
                let n = fs.read(state.fd, offset, &mut buf).await?;
                buf.truncate(n);
                Ok(buf)
            })
            .await
    }

    /// Writes `data` at `offset`, returning the bytes actually written.
    pub async fn write_at(&self, offset: u64, data: &[u8]) -> Result<usize> {
        self.executor
            .run_errno("write", |fs| async move {
                let mut state = self.state.lock().await;
                self.reopen_if_stale(&mut state, &fs).await?;
                fs.write(state.fd, offset, data).await
            })
            .await
    }

    /// Current file size via a fresh fstat.
    pub async fn size(&self) -> Result<u64> {
        self.executor
            .run_errno("fstat", |fs| async move {
                let mut state = self.state.lock().await;
                self.reopen_if_stale(&mut state, &fs).await?;
                let stat = fs.fstat(state.fd).await?;
                Ok(stat.size)
            })
            .await
    }

    /// Flushes the descriptor. No-op when the session changed since
    /// open, there is nothing left to flush.
    pub async fn sync_all(&self) -> Result<()> {
        self.executor
            .run_errno("fsync", |fs| async move {
                let state = self.state.lock().await;
                if Arc::ptr_eq(&state.fs, &fs) {
                    fs.fsync(state.fd, false).await?;
                }
                Ok(())
            })
            .await
    }

    /// Releases the descriptor against the session it was opened on.
    /// Stale handles are not reopened just to be closed; a failure here
    /// is logged and swallowed.
    pub async fn close(&self) {
        let state = self.state.lock().await;
        if let Err(e) = state.fs.close(state.fd).await {
            warn!("close {}: {}", self.path, e);
        }
    }

    async fn reopen_if_stale(
        &self,
        state: &mut FileState<C::Fs>,
        fs: &Arc<C::Fs>,
    ) -> crate::client::ClientResult<()> {
        if !Arc::ptr_eq(&state.fs, fs) {
            debug!("session changed, reopening {}", self.path);
            state.fd = fs.open(&self.path, self.flags, 0).await?;
            state.fs = fs.clone();
        }
        Ok(())
    }
}
