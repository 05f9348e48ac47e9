//! Decoration of raw stat results into presentable document entries.

use std::sync::Arc;

use crate::client::{ClientError, FileKind, FileStat, MountClient, MountedFs};
use crate::config::MountConfig;
use crate::error::Result;
use crate::executor::Executor;
use crate::mime;
use crate::thumbs::{self, ThumbnailIndex};

/// Capability flags of a document entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EntryFlags(u32);

bitflags! {
    impl EntryFlags: u32 {
        /// Entry cannot be opened directly as a stream (symlink)
        const PARTIAL = 0x0001;
        /// Directory accepts new children
        const DIR_SUPPORTS_CREATE = 0x0002;
        const SUPPORTS_WRITE = 0x0004;
        const SUPPORTS_DELETE = 0x0008;
        const SUPPORTS_RENAME = 0x0010;
        /// A cached thumbnail is known to exist
        const SUPPORTS_THUMBNAIL = 0x0020;
        const SUPPORTS_METADATA = 0x0040;
    }
}

/// Icon override for entries the host would otherwise misrender.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IconHint {
    SymlinkToDir,
    BrokenSymlink,
}

/// One row of a directory listing. Constructed fresh on every query,
/// never persisted.
#[derive(Debug, Clone)]
pub struct DocumentEntry {
    pub display_name: String,
    pub document_id: String,
    pub mime_type: String,
    pub flags: EntryFlags,
    pub size: u64,
    /// Seconds since the epoch
    pub modified: u64,
    pub icon: Option<IconHint>,
    /// e.g. "Broken symlink to target"
    pub summary: Option<String>,
}

/// Derives a [`DocumentEntry`] from lstat/stat output: MIME type,
/// permission-gated capability flags and thumbnail availability.
pub struct EntryDecorator<'a, C: MountClient> {
    executor: &'a Executor<C>,
    config: Arc<MountConfig>,
    uid: u32,
    gid: u32,
}

impl<'a, C: MountClient> EntryDecorator<'a, C> {
    pub fn new(executor: &'a Executor<C>, config: Arc<MountConfig>, uid: u32, gid: u32) -> Self {
        Self {
            executor,
            config,
            uid,
            gid,
        }
    }

    /// Relevant rwx triplet for the requester, all bits when permission
    /// checking is off.
    fn permission_bits(&self, stat: &FileStat) -> u32 {
        if !self.config.check_permissions {
            return 0o7;
        }
        let triplet = if stat.uid == self.uid {
            stat.mode >> 6
        } else if stat.gid == self.gid {
            stat.mode >> 3
        } else {
            stat.mode
        };
        triplet & 0o7
    }

    fn may_read(&self, stat: &FileStat) -> bool {
        self.permission_bits(stat) & 0o4 != 0
    }

    fn may_write(&self, stat: &FileStat) -> bool {
        self.permission_bits(stat) & 0o2 != 0
    }

    /// Builds the entry for `dir/name`, `dir` ending in a slash.
    ///
    /// `thumbnails` is the pre-listed cache index when the caller has
    /// one; without it thumbnail existence costs a stat probe per call.
    /// `parent_stat` likewise avoids re-statting the parent on every
    /// entry of a listing. Fails with the not-found kind when the lstat
    /// itself does.
    pub async fn decorate(
        &self,
        dir: &str,
        name: &str,
        thumbnails: Option<&ThumbnailIndex>,
        parent_stat: Option<&FileStat>,
    ) -> Result<DocumentEntry> {
        let path = format!("{dir}{name}");

        let lcs = self
            .executor
            .run_unchecked(|fs| {
                let path = path.clone();
                async move { fs.lstat(&path).await }
            })
            .await?;

        let was_symlink = lcs.is_symlink();
        let cs = if was_symlink {
            // follow the link for rendering; a dangling target keeps the
            // lstat result and marks the entry broken
            let followed = self
                .executor
                .run(|fs| {
                    let path = path.clone();
                    async move { fs.stat(&path).await }
                })
                .await;
            match followed {
                Ok(stat) => stat,
                Err(ClientError::NotFound(_)) => {
                    error!("stat: {} not found", path);
                    lcs.clone()
                }
                Err(e) => return Err(e.into()),
            }
        } else {
            lcs.clone()
        };

        let mime_type = mime::for_kind(cs.kind(), name);

        let mut flags = EntryFlags::empty();
        match cs.kind() {
            FileKind::Symlink => flags |= EntryFlags::PARTIAL,
            FileKind::Directory => {
                if self.may_write(&cs) {
                    flags |= EntryFlags::DIR_SUPPORTS_CREATE;
                }
                if self.may_read(&cs) {
                    flags |= EntryFlags::SUPPORTS_METADATA;
                }
            }
            FileKind::Regular => {
                if mime::supports_metadata(mime_type) && self.may_read(&cs) {
                    flags |= EntryFlags::SUPPORTS_METADATA;
                }
                if self.may_write(&cs) {
                    flags |= EntryFlags::SUPPORTS_WRITE;
                }
                // formats with an embeddable thumbnail are served from the
                // document itself, so the cache is not even consulted
                if !mime::is_exif_supported(mime_type)
                    && self.thumbnail_exists(dir, name, thumbnails).await?
                {
                    flags |= EntryFlags::SUPPORTS_THUMBNAIL;
                }
            }
            _ => {}
        }

        let parent = match parent_stat {
            Some(stat) => stat.clone(),
            None => {
                self.executor
                    .run_unchecked(|fs| {
                        let dir = dir.to_owned();
                        async move { fs.stat(&dir).await }
                    })
                    .await?
            }
        };
        if self.may_write(&parent) {
            if !lcs.is_dir() {
                flags |= EntryFlags::SUPPORTS_DELETE;
            }
            flags |= EntryFlags::SUPPORTS_RENAME;
        }

        let icon = if was_symlink && cs.is_dir() {
            // grid views tend to hard-code the folder icon otherwise
            Some(IconHint::SymlinkToDir)
        } else if cs.is_symlink() {
            Some(IconHint::BrokenSymlink)
        } else {
            None
        };

        let summary = if cs.is_symlink() {
            let target = self
                .executor
                .run_unchecked(|fs| {
                    let path = path.clone();
                    async move { fs.readlink(&path).await }
                })
                .await?;
            Some(format!("Broken symlink to {target}"))
        } else {
            None
        };

        Ok(DocumentEntry {
            display_name: name.to_owned(),
            document_id: self.config.document_id(&path),
            mime_type: mime_type.to_owned(),
            flags,
            size: lcs.size,
            modified: lcs.mtime,
            icon,
            summary,
        })
    }

    /// Cached-thumbnail existence, via the index when available, else a
    /// direct stat probe of the well-known cache path.
    async fn thumbnail_exists(
        &self,
        dir: &str,
        name: &str,
        thumbnails: Option<&ThumbnailIndex>,
    ) -> Result<bool> {
        if let Some(index) = thumbnails {
            return Ok(index.contains(&thumbs::thumbnail_file(name)));
        }
        let probe = thumbs::thumbnail_path(dir, name);
        let result = self
            .executor
            .run(|fs| {
                let probe = probe.clone();
                async move { fs.stat(&probe).await }
            })
            .await;
        match result {
            Ok(_) => Ok(true),
            Err(ClientError::NotFound(_)) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}
