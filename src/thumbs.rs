//! XDG-style cached thumbnails.
//!
//! Thumbnails for `dir/name` live at
//! `dir/.sh_thumbnails/normal/<hex(md5("./" + name))>.png`. A listing
//! builds one [`ThumbnailIndex`] for the whole directory to avoid a stat
//! probe per entry; the index is discarded after the listing.

use md5::{Digest, Md5};
use std::collections::HashSet;
use std::fmt::Write;

/// Per-directory cache subfolder, relative to the entry's parent.
pub const THUMBNAIL_SUBDIR: &str = ".sh_thumbnails/normal";

/// Cache file name for an entry name.
pub fn thumbnail_file(name: &str) -> String {
    let digest = Md5::digest(format!("./{name}").as_bytes());
    let mut hex = String::with_capacity(36);
    for byte in digest {
        // infallible on String
        let _ = write!(hex, "{byte:02x}");
    }
    hex.push_str(".png");
    hex
}

/// Full cache path for `dir/name`, `dir` ending in a slash.
pub fn thumbnail_path(dir: &str, name: &str) -> String {
    format!("{}{}/{}", dir, THUMBNAIL_SUBDIR, thumbnail_file(name))
}

/// Ephemeral set of file names present in a cache subfolder.
#[derive(Debug)]
pub struct ThumbnailIndex(HashSet<String>);

impl ThumbnailIndex {
    pub fn from_names(names: Vec<String>) -> Self {
        Self(names.into_iter().collect())
    }

    pub fn contains(&self, file: &str) -> bool {
        self.0.contains(file)
    }
}
