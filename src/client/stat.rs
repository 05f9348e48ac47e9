/// File type bits of the `st_mode` word
#[derive(Default, Clone, Copy, PartialEq, Eq)]
pub struct FileMode(u32);

bitflags! {
    impl FileMode: u32 {
        const FIFO = 0o010000;
        const CHR = 0o020000;
        const DIR = 0o040000;
        const BLK = 0o060000;
        const REG = 0o100000;
        const LNK = 0o120000;
        const SOCK = 0o140000;
    }
}

/// Flags for [`MountedFs::open`](super::MountedFs::open)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpenFlags(u32);

bitflags! {
    impl OpenFlags: u32 {
        const READ = 0x0001;
        const WRITE = 0x0002;
        const CREATE = 0x0040;
        const EXCL = 0x0080;
        const TRUNCATE = 0x0200;
    }
}

const KIND_MASK: u32 = 0o170000;
const PERM_MASK: u32 = 0o7777;

/// File kind derived from the mode word.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Regular,
    Directory,
    Symlink,
    Socket,
    BlockDevice,
    CharDevice,
    Fifo,
    Unknown,
}

/// Result of a `stat`/`lstat`/`fstat` call against the native client.
/// Never cached beyond the query it was produced for.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileStat {
    /// Type and permission bits, POSIX `st_mode` layout
    pub mode: u32,
    pub size: u64,
    /// Modification time, seconds since the epoch
    pub mtime: u64,
    pub uid: u32,
    pub gid: u32,
}

macro_rules! impl_fn_kind {
    ($name:ident, $doc_name:expr, $flag:ident) => {
        #[doc = "Returns `true` if this is a "]
        #[doc = $doc_name]
        pub fn $name(&self) -> bool {
            self.mode & KIND_MASK == FileMode::$flag.bits()
        }
    };
}

impl FileStat {
    impl_fn_kind!(is_dir, "directory", DIR);
    impl_fn_kind!(is_regular, "regular file", REG);
    impl_fn_kind!(is_symlink, "symlink", LNK);

    pub fn kind(&self) -> FileKind {
        match FileMode::from_bits_truncate(self.mode & KIND_MASK) {
            FileMode::SOCK => FileKind::Socket,
            FileMode::LNK => FileKind::Symlink,
            FileMode::REG => FileKind::Regular,
            FileMode::BLK => FileKind::BlockDevice,
            FileMode::DIR => FileKind::Directory,
            FileMode::CHR => FileKind::CharDevice,
            FileMode::FIFO => FileKind::Fifo,
            _ => FileKind::Unknown,
        }
    }

    /// Permission bits without the kind bits.
    pub fn permissions(&self) -> u32 {
        self.mode & PERM_MASK
    }
}

/// Result of `statfs` on the mounted filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct StatVfs {
    pub blocks: u64,
    pub bavail: u64,
    pub frsize: u64,
}

impl StatVfs {
    /// Total capacity of the filesystem in bytes.
    pub fn capacity_bytes(&self) -> u64 {
        self.blocks * self.frsize
    }

    /// Bytes available to an unprivileged caller.
    pub fn available_bytes(&self) -> u64 {
        self.bavail * self.frsize
    }
}
