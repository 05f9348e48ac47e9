//! Boundary to the native CephFS client.
//!
//! The real client is an opaque libcephfs binding; everything the crate
//! needs from it is expressed by [`MountClient`] (the mount factory) and
//! [`MountedFs`] (one live mount). The provider core never holds a mount
//! outside of [`Executor`](crate::Executor).

mod stat;

pub use stat::{FileKind, FileMode, FileStat, OpenFlags, StatVfs};

use thiserror::Error;

use crate::config::MountConfig;

/// Failure message libcephfs produces once the transport is torn down.
/// The executor intercepts it for remounting; it never reaches callers.
pub const SHUTDOWN_MESSAGE: &str = "Cannot send after transport endpoint shutdown";

/// Errors surfaced by the native client.
///
/// The client reports failures as `strerror()` text, not codes; the only
/// failure it distinguishes structurally is a missing path.
#[derive(Debug, Clone, Error)]
pub enum ClientError {
    #[error("not found: {0}")]
    NotFound(String),
    #[error("{0}")]
    Io(String),
}

impl ClientError {
    /// Whether this is the dead-transport signature that triggers a remount.
    pub fn is_transport_shutdown(&self) -> bool {
        matches!(self, Self::Io(msg) if msg == SHUTDOWN_MESSAGE)
    }
}

pub type ClientResult<T> = Result<T, ClientError>;

/// File descriptor handed out by [`MountedFs::open`].
pub type Fd = u64;

/// Factory for mounted filesystems.
#[async_trait]
pub trait MountClient: Send + Sync + 'static {
    type Fs: MountedFs;

    /// Establishes a mount from a config snapshot. Applies every pair of
    /// [`MountConfig::options`] before mounting at [`MountConfig::path`].
    async fn mount(&self, config: &MountConfig) -> ClientResult<Self::Fs>;
}

/// One live mount. Paths are rooted at the mount point.
///
/// Assumed safe for concurrent calls on one handle; serialization of the
/// mount lifecycle is the executor's job, not the client's.
#[async_trait]
pub trait MountedFs: Send + Sync + 'static {
    async fn unmount(&self) -> ClientResult<()>;

    async fn stat(&self, path: &str) -> ClientResult<FileStat>;
    async fn lstat(&self, path: &str) -> ClientResult<FileStat>;
    async fn readlink(&self, path: &str) -> ClientResult<String>;
    async fn listdir(&self, path: &str) -> ClientResult<Vec<String>>;
    async fn mkdir(&self, path: &str, mode: u32) -> ClientResult<()>;
    async fn unlink(&self, path: &str) -> ClientResult<()>;
    async fn rename(&self, from: &str, to: &str) -> ClientResult<()>;
    async fn statfs(&self, path: &str) -> ClientResult<StatVfs>;
    async fn getxattr(&self, path: &str, name: &str) -> ClientResult<Vec<u8>>;

    async fn open(&self, path: &str, flags: OpenFlags, mode: u32) -> ClientResult<Fd>;
    async fn close(&self, fd: Fd) -> ClientResult<()>;
    async fn read(&self, fd: Fd, offset: u64, buf: &mut [u8]) -> ClientResult<usize>;
    async fn write(&self, fd: Fd, offset: u64, data: &[u8]) -> ClientResult<usize>;
    async fn fstat(&self, fd: Fd) -> ClientResult<FileStat>;
    async fn fsync(&self, fd: Fd, dataonly: bool) -> ClientResult<()>;
}
