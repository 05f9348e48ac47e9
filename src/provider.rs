//! The narrow operation interface the host document layer calls.
//!
//! Every operation resolves a document identifier to a rooted path, runs
//! through the executor with the appropriate error shaping and, for
//! query-style calls, decorates results per entry. Cursor plumbing,
//! change notifications and toasts stay on the host side.

use std::sync::Arc;

use crate::client::{ClientError, FileStat, MountClient, MountedFs, OpenFlags};
use crate::config::MountConfig;
use crate::entry::{DocumentEntry, EntryDecorator};
use crate::error::{Error, Result};
use crate::executor::Executor;
use crate::fs::{OpenMode, RemoteFile};
use crate::mime;
use crate::thumbs::{self, ThumbnailIndex};

/// Root presentation of the mounted filesystem.
#[derive(Debug, Clone)]
pub struct RootInfo {
    pub root_id: String,
    pub document_id: String,
    pub title: String,
    pub summary: String,
    pub capacity_bytes: u64,
    pub available_bytes: u64,
}

/// Result envelope of a listing. A failed listing carries the error
/// message out-of-band instead of failing the call, so the host can
/// present a partial or empty table.
#[derive(Debug, Default)]
pub struct Listing {
    pub entries: Vec<DocumentEntry>,
    pub error: Option<String>,
}

/// Format-specific metadata bundle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentMetadata {
    /// Recursive totals of a directory subtree
    Directory { tree_count: u64, tree_size: u64 },
}

/// Rooted path of a document identifier. The root identifier itself maps
/// to `/`.
pub fn path_from_document_id(document_id: &str) -> String {
    let rest = document_id
        .find("://")
        .map_or(document_id, |i| &document_id[i + 3..]);
    match rest.find('/') {
        Some(j) => rest[j..].to_owned(),
        None => "/".to_owned(),
    }
}

/// Identifier of the parent document; the root is its own parent.
pub fn parent_document_id(document_id: &str) -> String {
    if path_from_document_id(document_id) == "/" {
        return document_id.to_owned();
    }
    match document_id.rfind('/') {
        Some(i) => document_id[..i].to_owned(),
        None => document_id.to_owned(),
    }
}

/// Whether `document_id` lives under `parent_document_id`.
pub fn is_child_document(parent_document_id: &str, document_id: &str) -> bool {
    document_id.starts_with(parent_document_id)
        && document_id[parent_document_id.len()..].starts_with('/')
}

fn split_path(path: &str) -> (&str, &str) {
    match path.rfind('/') {
        Some(i) => (&path[..=i], &path[i + 1..]),
        None => ("/", path),
    }
}

fn child_path(parent: &str, name: &str) -> String {
    if parent == "/" {
        format!("/{name}")
    } else {
        format!("{parent}/{name}")
    }
}

/// Document provider core over one mounted remote filesystem.
pub struct Provider<C: MountClient> {
    executor: Arc<Executor<C>>,
    /// Requester identity used for permission-derived capability flags
    uid: u32,
    gid: u32,
}

impl<C: MountClient> Provider<C> {
    pub fn new(client: C, config: MountConfig, uid: u32, gid: u32) -> Self {
        Self {
            executor: Arc::new(Executor::new(client, config)),
            uid,
            gid,
        }
    }

    pub fn executor(&self) -> &Arc<Executor<C>> {
        &self.executor
    }

    /// Applies a new preference snapshot; the session is remounted on
    /// the next operation.
    pub async fn set_config(&self, config: MountConfig) {
        self.executor.set_config(config).await;
    }

    async fn decorator(&self) -> EntryDecorator<'_, C> {
        EntryDecorator::new(
            &self.executor,
            self.executor.config().await,
            self.uid,
            self.gid,
        )
    }

    /// Root identifier, titles and statfs-derived capacity.
    pub async fn query_root(&self) -> Result<RootInfo> {
        let vfs = self
            .executor
            .run_unchecked(|fs| async move { fs.statfs("/").await })
            .await?;
        let config = self.executor.config().await;
        let root_uri = config.root_uri();
        Ok(RootInfo {
            document_id: root_uri.clone(),
            root_id: root_uri,
            title: config.title(),
            summary: config.summary(),
            capacity_bytes: vfs.capacity_bytes(),
            available_bytes: vfs.available_bytes(),
        })
    }

    /// Lists and decorates the children of a directory. Listing failures
    /// other than not-found land in [`Listing::error`]; entries that
    /// vanish between listdir and lstat are skipped.
    pub async fn list_children(&self, parent_document_id: &str) -> Result<Listing> {
        debug!("list_children {}", parent_document_id);
        let path = path_from_document_id(parent_document_id);
        let mut listing = Listing::default();

        let names = self
            .executor
            .run_soft(
                |fs| {
                    let path = path.clone();
                    async move { fs.listdir(&path).await }
                },
                &mut listing.error,
            )
            .await?;
        let Some(names) = names else {
            return Ok(listing);
        };

        let parent_stat = self
            .executor
            .run_soft(
                |fs| {
                    let path = path.clone();
                    async move { fs.stat(&path).await }
                },
                &mut listing.error,
            )
            .await?;
        let Some(parent_stat) = parent_stat else {
            return Ok(listing);
        };

        let dir = if path == "/" {
            "/".to_owned()
        } else {
            format!("{path}/")
        };
        let thumbnails = self.load_thumbnail_index(&dir).await;

        let decorator = self.decorator().await;
        listing.entries.reserve(names.len());
        for name in names {
            if name == "." || name == ".." {
                continue;
            }
            match decorator
                .decorate(&dir, &name, thumbnails.as_ref(), Some(&parent_stat))
                .await
            {
                Ok(entry) => listing.entries.push(entry),
                Err(Error::NotFound(_)) => {}
                Err(e) => return Err(e),
            }
        }
        Ok(listing)
    }

    /// One [`ThumbnailIndex`] per listing; a missing cache directory is
    /// an empty index, any other failure falls back to per-entry probes.
    async fn load_thumbnail_index(&self, dir: &str) -> Option<ThumbnailIndex> {
        let cache_dir = format!("{}{}", dir, thumbs::THUMBNAIL_SUBDIR);
        let result = self
            .executor
            .run(|fs| {
                let cache_dir = cache_dir.clone();
                async move {
                    match fs.listdir(&cache_dir).await {
                        Ok(names) => Ok(names),
                        Err(ClientError::NotFound(_)) => Ok(Vec::new()),
                        Err(e) => Err(e),
                    }
                }
            })
            .await;
        match result {
            Ok(names) => Some(ThumbnailIndex::from_names(names)),
            Err(e) => {
                warn!(
                    "fail to list thumbnails directory, falling back to per-file slow path: {}",
                    e
                );
                None
            }
        }
    }

    /// Decorated entry for a single document.
    pub async fn query_document(&self, document_id: &str) -> Result<DocumentEntry> {
        debug!("query_document {}", document_id);
        let path = path_from_document_id(document_id);
        let (dir, name) = split_path(&path);
        self.decorator().await.decorate(dir, name, None, None).await
    }

    pub async fn document_type(&self, document_id: &str) -> Result<String> {
        Ok(self.query_document(document_id).await?.mime_type)
    }

    /// Opens a document as a proxied byte-stream handle.
    pub async fn open_document(
        &self,
        document_id: &str,
        mode: OpenMode,
    ) -> Result<RemoteFile<C>> {
        debug!("open_document {:?} {}", mode, document_id);
        let path = path_from_document_id(document_id);
        RemoteFile::open(self.executor.clone(), path, mode.flags()).await
    }

    /// Opens the cached thumbnail for a document, not-found when the
    /// cache has none. Formats with embedded thumbnails are the host's
    /// concern via the open document itself.
    pub async fn open_thumbnail(&self, document_id: &str) -> Result<RemoteFile<C>> {
        let path = path_from_document_id(document_id);
        let (dir, name) = split_path(&path);
        let thumbnail = thumbs::thumbnail_path(dir, name);
        RemoteFile::open(self.executor.clone(), thumbnail, OpenFlags::READ).await
    }

    /// Creates a child and returns its document identifier. Files are
    /// created exclusively; an existing name is a failure, not a
    /// truncation.
    pub async fn create_document(
        &self,
        parent_document_id: &str,
        display_name: &str,
        is_directory: bool,
    ) -> Result<String> {
        debug!(
            "create_document {} {} dir={}",
            parent_document_id, display_name, is_directory
        );
        let parent = path_from_document_id(parent_document_id);
        let path = child_path(&parent, display_name);
        if is_directory {
            self.executor
                .run_unchecked(|fs| {
                    let path = path.clone();
                    async move { fs.mkdir(&path, 0o700).await }
                })
                .await?;
        } else {
            self.executor
                .run_unchecked(|fs| {
                    let path = path.clone();
                    async move {
                        let fd = fs
                            .open(
                                &path,
                                OpenFlags::WRITE | OpenFlags::CREATE | OpenFlags::EXCL,
                                0o700,
                            )
                            .await?;
                        fs.close(fd).await
                    }
                })
                .await?;
        }
        Ok(self.executor.config().await.document_id(&path))
    }

    pub async fn delete_document(&self, document_id: &str) -> Result<()> {
        debug!("delete_document {}", document_id);
        let path = path_from_document_id(document_id);
        self.executor
            .run_unchecked(|fs| {
                let path = path.clone();
                async move { fs.unlink(&path).await }
            })
            .await
    }

    /// Renames within the same parent, returning the new identifier.
    pub async fn rename_document(
        &self,
        document_id: &str,
        display_name: &str,
    ) -> Result<String> {
        let from = path_from_document_id(document_id);
        let parent = path_from_document_id(&parent_document_id(document_id));
        let to = child_path(&parent, display_name);
        self.executor
            .run_unchecked(|fs| {
                let from = from.clone();
                let to = to.clone();
                async move { fs.rename(&from, &to).await }
            })
            .await?;
        Ok(self.executor.config().await.document_id(&to))
    }

    /// Extended metadata. Directories report recursive entry and byte
    /// totals from filesystem xattrs; for media formats the host
    /// extracts tags from the opened stream itself.
    pub async fn document_metadata(&self, document_id: &str) -> Result<Option<DocumentMetadata>> {
        debug!("document_metadata {}", document_id);
        let mime_type = self.document_type(document_id).await?;
        if mime_type != mime::MIME_DIRECTORY {
            return Ok(None);
        }
        let path = path_from_document_id(document_id);
        Ok(Some(DocumentMetadata::Directory {
            tree_count: self.xattr_u64(&path, "ceph.dir.rentries").await?,
            tree_size: self.xattr_u64(&path, "ceph.dir.rbytes").await?,
        }))
    }

    async fn xattr_u64(&self, path: &str, name: &'static str) -> Result<u64> {
        let raw = self
            .executor
            .run_unchecked(|fs| {
                let path = path.to_owned();
                async move { fs.getxattr(&path, name).await }
            })
            .await?;
        std::str::from_utf8(&raw)
            .ok()
            .and_then(|s| s.trim().parse().ok())
            .ok_or_else(|| Error::IO(format!("unparsable xattr {name} on {path}")))
    }

    /// Stat of a rooted path, shaped for proxied-descriptor callers.
    pub async fn stat_path(&self, path: &str) -> Result<FileStat> {
        self.executor
            .run_errno("stat", |fs| {
                let path = path.to_owned();
                async move { fs.stat(&path).await }
            })
            .await
    }
}
