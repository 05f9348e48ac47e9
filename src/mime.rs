//! MIME derivation for directory entries.

use crate::client::FileKind;

pub const MIME_DIRECTORY: &str = "inode/directory";
pub const MIME_DEFAULT: &str = "application/octet-stream";

/// Extension to MIME map for regular files. Lookup is case-insensitive.
static EXTENSIONS: &[(&str, &str)] = &[
    ("aac", "audio/aac"),
    ("avi", "video/x-msvideo"),
    ("bmp", "image/bmp"),
    ("bz2", "application/x-bzip2"),
    ("css", "text/css"),
    ("csv", "text/csv"),
    ("dng", "image/x-adobe-dng"),
    ("doc", "application/msword"),
    (
        "docx",
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    ),
    ("epub", "application/epub+zip"),
    ("flac", "audio/flac"),
    ("gif", "image/gif"),
    ("gz", "application/gzip"),
    ("heic", "image/heic"),
    ("heif", "image/heif"),
    ("htm", "text/html"),
    ("html", "text/html"),
    ("ico", "image/x-icon"),
    ("jpeg", "image/jpeg"),
    ("jpg", "image/jpeg"),
    ("js", "text/javascript"),
    ("json", "application/json"),
    ("m4a", "audio/mp4"),
    ("md", "text/markdown"),
    ("mkv", "video/x-matroska"),
    ("mov", "video/quicktime"),
    ("mp3", "audio/mpeg"),
    ("mp4", "video/mp4"),
    ("odp", "application/vnd.oasis.opendocument.presentation"),
    ("ods", "application/vnd.oasis.opendocument.spreadsheet"),
    ("odt", "application/vnd.oasis.opendocument.text"),
    ("oga", "audio/ogg"),
    ("ogg", "audio/ogg"),
    ("ogv", "video/ogg"),
    ("opus", "audio/opus"),
    ("pdf", "application/pdf"),
    ("png", "image/png"),
    ("ppt", "application/vnd.ms-powerpoint"),
    (
        "pptx",
        "application/vnd.openxmlformats-officedocument.presentationml.presentation",
    ),
    ("rar", "application/vnd.rar"),
    ("svg", "image/svg+xml"),
    ("tar", "application/x-tar"),
    ("tif", "image/tiff"),
    ("tiff", "image/tiff"),
    ("txt", "text/plain"),
    ("wav", "audio/wav"),
    ("weba", "audio/webm"),
    ("webm", "video/webm"),
    ("webp", "image/webp"),
    ("xls", "application/vnd.ms-excel"),
    (
        "xlsx",
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
    ),
    ("xml", "application/xml"),
    ("zip", "application/zip"),
    ("7z", "application/x-7z-compressed"),
];

/// Image formats that may carry an embedded (EXIF) thumbnail; the host
/// extracts those from the document itself, so the cache directory is
/// never probed for them.
static EXIF_MIMES: &[&str] = &[
    "image/jpeg",
    "image/png",
    "image/webp",
    "image/heic",
    "image/heif",
    "image/x-adobe-dng",
    "image/x-canon-cr2",
    "image/x-nikon-nef",
    "image/x-sony-arw",
    "image/x-olympus-orf",
    "image/x-panasonic-rw2",
    "image/x-fuji-raf",
    "image/x-pentax-pef",
    "image/x-samsung-srw",
];

/// MIME type of a regular file from its name. A leading dot does not
/// count as an extension separator.
pub fn from_name(name: &str) -> &'static str {
    if let Some(idx) = name.rfind('.') {
        if idx > 0 {
            let ext = &name[idx + 1..];
            if let Some((_, mime)) = EXTENSIONS
                .iter()
                .find(|(e, _)| e.eq_ignore_ascii_case(ext))
            {
                return mime;
            }
        }
    }
    MIME_DEFAULT
}

/// MIME type for a stat'd entry.
pub fn for_kind(kind: FileKind, name: &str) -> &'static str {
    match kind {
        FileKind::Socket => "inode/socket",
        FileKind::Symlink => "inode/symlink",
        FileKind::Regular => from_name(name),
        FileKind::BlockDevice => "inode/blockdevice",
        FileKind::Directory => MIME_DIRECTORY,
        FileKind::CharDevice => "inode/chardevice",
        FileKind::Fifo => "inode/fifo",
        FileKind::Unknown => MIME_DEFAULT,
    }
}

pub fn is_exif_supported(mime: &str) -> bool {
    EXIF_MIMES.contains(&mime)
}

/// Formats the metadata operation can extract tags from.
pub fn supports_metadata(mime: &str) -> bool {
    is_exif_supported(mime) || mime.starts_with("video/")
}
