//! In-memory mock of the native CephFS client for integration tests.
//!
//! One shared tree backs every mounted session, so a remount observes
//! the same files; sessions are distinguished by a generation counter.
//! `fail_next` injects one failure into the next native call.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

use cephfs_provider::client::{
    ClientError, ClientResult, Fd, FileStat, MountClient, MountedFs, OpenFlags, StatVfs,
    SHUTDOWN_MESSAGE,
};
use cephfs_provider::config::MountConfig;

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

pub fn shutdown_error() -> ClientError {
    ClientError::Io(SHUTDOWN_MESSAGE.to_owned())
}

pub fn test_config() -> MountConfig {
    MountConfig::from_prefs("admin", "ceph0:6789", "secret", "/vol", "20", true)
}

pub fn test_config_no_perm_check() -> MountConfig {
    MountConfig::from_prefs("admin", "ceph0:6789", "secret", "/vol", "20", false)
}

/// Identity most test fixtures are owned by.
pub const UID: u32 = 1000;
pub const GID: u32 = 1000;

#[derive(Debug, Clone)]
pub struct Node {
    pub mode: u32,
    pub uid: u32,
    pub gid: u32,
    pub mtime: u64,
    pub data: Vec<u8>,
    pub link: Option<String>,
    pub xattrs: HashMap<String, Vec<u8>>,
}

impl Node {
    pub fn dir(perm: u32, uid: u32, gid: u32) -> Self {
        Self {
            mode: 0o040000 | perm,
            uid,
            gid,
            mtime: 1_700_000_000,
            data: Vec::new(),
            link: None,
            xattrs: HashMap::new(),
        }
    }

    pub fn file(perm: u32, uid: u32, gid: u32, data: &[u8]) -> Self {
        Self {
            mode: 0o100000 | perm,
            uid,
            gid,
            mtime: 1_700_000_000,
            data: data.to_vec(),
            link: None,
            xattrs: HashMap::new(),
        }
    }

    pub fn symlink(target: &str) -> Self {
        Self {
            mode: 0o120777,
            uid: UID,
            gid: GID,
            mtime: 1_700_000_000,
            data: Vec::new(),
            link: Some(target.to_owned()),
            xattrs: HashMap::new(),
        }
    }

    pub fn with_xattr(mut self, name: &str, value: &str) -> Self {
        let _ = self.xattrs.insert(name.to_owned(), value.as_bytes().to_vec());
        self
    }

    fn stat(&self) -> FileStat {
        FileStat {
            mode: self.mode,
            size: self.data.len() as u64,
            mtime: self.mtime,
            uid: self.uid,
            gid: self.gid,
        }
    }
}

struct Tree {
    nodes: HashMap<String, Node>,
    fail_next: Option<ClientError>,
    statvfs: StatVfs,
}

pub struct MockState {
    tree: Mutex<Tree>,
    mounts: AtomicUsize,
    mount_delay: Mutex<Option<Duration>>,
}

#[derive(Clone)]
pub struct MockClient {
    state: Arc<MockState>,
}

impl MockClient {
    pub fn new() -> Self {
        let mut nodes = HashMap::new();
        let _ = nodes.insert("/".to_owned(), Node::dir(0o755, UID, GID));
        Self {
            state: Arc::new(MockState {
                tree: Mutex::new(Tree {
                    nodes,
                    fail_next: None,
                    statvfs: StatVfs {
                        blocks: 1000,
                        bavail: 500,
                        frsize: 4096,
                    },
                }),
                mounts: AtomicUsize::new(0),
                mount_delay: Mutex::new(None),
            }),
        }
    }

    pub async fn insert(&self, path: &str, node: Node) {
        let _ = self
            .state
            .tree
            .lock()
            .await
            .nodes
            .insert(path.to_owned(), node);
    }

    pub async fn remove(&self, path: &str) {
        let _ = self.state.tree.lock().await.nodes.remove(path);
    }

    pub async fn fail_next(&self, error: ClientError) {
        self.state.tree.lock().await.fail_next = Some(error);
    }

    pub async fn set_mount_delay(&self, delay: Duration) {
        *self.state.mount_delay.lock().await = Some(delay);
    }

    pub fn mounts(&self) -> usize {
        self.state.mounts.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl MountClient for MockClient {
    type Fs = MockFs;

    async fn mount(&self, _config: &MountConfig) -> ClientResult<MockFs> {
        if let Some(delay) = *self.state.mount_delay.lock().await {
            tokio::time::sleep(delay).await;
        }
        {
            let mut tree = self.state.tree.lock().await;
            if let Some(e) = tree.fail_next.take() {
                return Err(e);
            }
        }
        let generation = self.state.mounts.fetch_add(1, Ordering::SeqCst) + 1;
        Ok(MockFs {
            state: self.state.clone(),
            generation,
            open: Mutex::new(HashMap::new()),
            next_fd: AtomicU64::new(1),
        })
    }
}

pub struct MockFs {
    state: Arc<MockState>,
    pub generation: usize,
    open: Mutex<HashMap<Fd, String>>,
    next_fd: AtomicU64,
}

fn normalize(path: &str) -> String {
    if path.len() > 1 && path.ends_with('/') {
        path[..path.len() - 1].to_owned()
    } else if path.is_empty() {
        "/".to_owned()
    } else {
        path.to_owned()
    }
}

fn parent_of(path: &str) -> String {
    match path.rfind('/') {
        Some(0) | None => "/".to_owned(),
        Some(i) => path[..i].to_owned(),
    }
}

fn join(dir: &str, target: &str) -> String {
    if target.starts_with('/') {
        target.to_owned()
    } else if dir == "/" {
        format!("/{target}")
    } else {
        format!("{dir}/{target}")
    }
}

impl MockFs {
    async fn take_failure(&self) -> ClientResult<()> {
        match self.state.tree.lock().await.fail_next.take() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    async fn node(&self, path: &str) -> ClientResult<Node> {
        let path = normalize(path);
        self.state
            .tree
            .lock()
            .await
            .nodes
            .get(&path)
            .cloned()
            .ok_or(ClientError::NotFound(path))
    }

    /// Follows one symlink hop, like the real client does server-side.
    async fn resolved(&self, path: &str) -> ClientResult<Node> {
        let node = self.node(path).await?;
        match &node.link {
            Some(target) => {
                let resolved = join(&parent_of(&normalize(path)), target);
                self.node(&resolved).await
            }
            None => Ok(node),
        }
    }
}

#[async_trait::async_trait]
impl MountedFs for MockFs {
    async fn unmount(&self) -> ClientResult<()> {
        Ok(())
    }

    async fn stat(&self, path: &str) -> ClientResult<FileStat> {
        self.take_failure().await?;
        Ok(self.resolved(path).await?.stat())
    }

    async fn lstat(&self, path: &str) -> ClientResult<FileStat> {
        self.take_failure().await?;
        Ok(self.node(path).await?.stat())
    }

    async fn readlink(&self, path: &str) -> ClientResult<String> {
        self.take_failure().await?;
        self.node(path)
            .await?
            .link
            .ok_or_else(|| ClientError::Io("Invalid argument".to_owned()))
    }

    async fn listdir(&self, path: &str) -> ClientResult<Vec<String>> {
        self.take_failure().await?;
        let dir = normalize(path);
        let node = self.node(&dir).await?;
        if node.mode & 0o170000 != 0o040000 {
            return Err(ClientError::Io("Not a directory".to_owned()));
        }
        let prefix = if dir == "/" { "/".to_owned() } else { format!("{dir}/") };
        let tree = self.state.tree.lock().await;
        let mut names: Vec<String> = tree
            .nodes
            .keys()
            .filter_map(|p| {
                let rest = p.strip_prefix(&prefix)?;
                (!rest.is_empty() && !rest.contains('/')).then(|| rest.to_owned())
            })
            .collect();
        names.sort();
        Ok(names)
    }

    async fn mkdir(&self, path: &str, mode: u32) -> ClientResult<()> {
        self.take_failure().await?;
        let path = normalize(path);
        let mut tree = self.state.tree.lock().await;
        if tree.nodes.contains_key(&path) {
            return Err(ClientError::Io("File exists".to_owned()));
        }
        let _ = tree.nodes.insert(path, Node::dir(mode, UID, GID));
        Ok(())
    }

    async fn unlink(&self, path: &str) -> ClientResult<()> {
        self.take_failure().await?;
        let path = normalize(path);
        self.state
            .tree
            .lock()
            .await
            .nodes
            .remove(&path)
            .map(|_| ())
            .ok_or(ClientError::NotFound(path))
    }

    async fn rename(&self, from: &str, to: &str) -> ClientResult<()> {
        self.take_failure().await?;
        let from = normalize(from);
        let to = normalize(to);
        let mut tree = self.state.tree.lock().await;
        let node = tree
            .nodes
            .remove(&from)
            .ok_or(ClientError::NotFound(from))?;
        let _ = tree.nodes.insert(to, node);
        Ok(())
    }

    async fn statfs(&self, _path: &str) -> ClientResult<StatVfs> {
        self.take_failure().await?;
        Ok(self.state.tree.lock().await.statvfs)
    }

    async fn getxattr(&self, path: &str, name: &str) -> ClientResult<Vec<u8>> {
        self.take_failure().await?;
        self.node(path)
            .await?
            .xattrs
            .get(name)
            .cloned()
            .ok_or_else(|| ClientError::Io("No data available".to_owned()))
    }

    async fn open(&self, path: &str, flags: OpenFlags, mode: u32) -> ClientResult<Fd> {
        self.take_failure().await?;
        let path = normalize(path);
        {
            let mut tree = self.state.tree.lock().await;
            let exists = tree.nodes.contains_key(&path);
            if exists && flags.contains(OpenFlags::CREATE | OpenFlags::EXCL) {
                return Err(ClientError::Io("File exists".to_owned()));
            }
            if !exists {
                if !flags.contains(OpenFlags::CREATE) {
                    return Err(ClientError::NotFound(path));
                }
                let _ = tree.nodes.insert(path.clone(), Node::file(mode, UID, GID, b""));
            }
        }
        let fd = self.next_fd.fetch_add(1, Ordering::SeqCst);
        let _ = self.open.lock().await.insert(fd, path);
        Ok(fd)
    }

    async fn close(&self, fd: Fd) -> ClientResult<()> {
        self.open
            .lock()
            .await
            .remove(&fd)
            .map(|_| ())
            .ok_or_else(|| ClientError::Io("Bad file descriptor".to_owned()))
    }

    async fn read(&self, fd: Fd, offset: u64, buf: &mut [u8]) -> ClientResult<usize> {
        self.take_failure().await?;
        let path = self
            .open
            .lock()
            .await
            .get(&fd)
            .cloned()
            .ok_or_else(|| ClientError::Io("Bad file descriptor".to_owned()))?;
        let node = self.node(&path).await?;
        let start = (offset as usize).min(node.data.len());
        let n = buf.len().min(node.data.len() - start);
        buf[..n].copy_from_slice(&node.data[start..start + n]);
        Ok(n)
    }

    async fn write(&self, fd: Fd, offset: u64, data: &[u8]) -> ClientResult<usize> {
        self.take_failure().await?;
        let path = self
            .open
            .lock()
            .await
            .get(&fd)
            .cloned()
            .ok_or_else(|| ClientError::Io("Bad file descriptor".to_owned()))?;
        let mut tree = self.state.tree.lock().await;
        let node = tree
            .nodes
            .get_mut(&path)
            .ok_or(ClientError::NotFound(path))?;
        let end = offset as usize + data.len();
        if node.data.len() < end {
            node.data.resize(end, 0);
        }
        node.data[offset as usize..end].copy_from_slice(data);
        Ok(data.len())
    }

    async fn fstat(&self, fd: Fd) -> ClientResult<FileStat> {
        self.take_failure().await?;
        let path = self
            .open
            .lock()
            .await
            .get(&fd)
            .cloned()
            .ok_or_else(|| ClientError::Io("Bad file descriptor".to_owned()))?;
        Ok(self.node(&path).await?.stat())
    }

    async fn fsync(&self, _fd: Fd, _dataonly: bool) -> ClientResult<()> {
        self.take_failure().await
    }
}
