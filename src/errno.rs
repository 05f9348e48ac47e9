//! Translation of native client failures into POSIX error codes.
//!
//! libcephfs surfaces kernel `strerror()` text rather than raw codes, so
//! the mapping is a fixed message table with [`Errno::EIO`] as the
//! documented fallback for anything unrecognized. The transport-shutdown
//! message is deliberately absent: the executor intercepts it as a
//! remount trigger before translation ever happens.

use thiserror::Error;

/// POSIX error codes surfaced by the native client.
#[allow(non_camel_case_types)]
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum Errno {
    #[error("EPERM")]
    EPERM = 1,
    #[error("ENOENT")]
    ENOENT = 2,
    #[error("ESRCH")]
    ESRCH = 3,
    #[error("EINTR")]
    EINTR = 4,
    #[error("EIO")]
    EIO = 5,
    #[error("ENXIO")]
    ENXIO = 6,
    #[error("E2BIG")]
    E2BIG = 7,
    #[error("ENOEXEC")]
    ENOEXEC = 8,
    #[error("EBADF")]
    EBADF = 9,
    #[error("ECHILD")]
    ECHILD = 10,
    #[error("EAGAIN")]
    EAGAIN = 11,
    #[error("ENOMEM")]
    ENOMEM = 12,
    #[error("EACCES")]
    EACCES = 13,
    #[error("EFAULT")]
    EFAULT = 14,
    #[error("EBUSY")]
    EBUSY = 16,
    #[error("EEXIST")]
    EEXIST = 17,
    #[error("EXDEV")]
    EXDEV = 18,
    #[error("ENODEV")]
    ENODEV = 19,
    #[error("ENOTDIR")]
    ENOTDIR = 20,
    #[error("EISDIR")]
    EISDIR = 21,
    #[error("EINVAL")]
    EINVAL = 22,
    #[error("ENFILE")]
    ENFILE = 23,
    #[error("EMFILE")]
    EMFILE = 24,
    #[error("ENOTTY")]
    ENOTTY = 25,
    #[error("ETXTBSY")]
    ETXTBSY = 26,
    #[error("EFBIG")]
    EFBIG = 27,
    #[error("ENOSPC")]
    ENOSPC = 28,
    #[error("ESPIPE")]
    ESPIPE = 29,
    #[error("EROFS")]
    EROFS = 30,
    #[error("EMLINK")]
    EMLINK = 31,
    #[error("EPIPE")]
    EPIPE = 32,
    #[error("EDOM")]
    EDOM = 33,
    #[error("ERANGE")]
    ERANGE = 34,
    #[error("EDEADLK")]
    EDEADLK = 35,
    #[error("ENAMETOOLONG")]
    ENAMETOOLONG = 36,
    #[error("ENOLCK")]
    ENOLCK = 37,
    #[error("ENOSYS")]
    ENOSYS = 38,
    #[error("ENOTEMPTY")]
    ENOTEMPTY = 39,
    #[error("ELOOP")]
    ELOOP = 40,
    #[error("ENOMSG")]
    ENOMSG = 42,
    #[error("EIDRM")]
    EIDRM = 43,
    #[error("ENOSTR")]
    ENOSTR = 60,
    #[error("ENODATA")]
    ENODATA = 61,
    #[error("ETIME")]
    ETIME = 62,
    #[error("ENOSR")]
    ENOSR = 63,
    #[error("ENONET")]
    ENONET = 64,
    #[error("ENOLINK")]
    ENOLINK = 67,
    #[error("EPROTO")]
    EPROTO = 71,
    #[error("EMULTIHOP")]
    EMULTIHOP = 72,
    #[error("EBADMSG")]
    EBADMSG = 74,
    #[error("EOVERFLOW")]
    EOVERFLOW = 75,
    #[error("EILSEQ")]
    EILSEQ = 84,
    #[error("ENOTSOCK")]
    ENOTSOCK = 88,
    #[error("EDESTADDRREQ")]
    EDESTADDRREQ = 89,
    #[error("EMSGSIZE")]
    EMSGSIZE = 90,
    #[error("EPROTOTYPE")]
    EPROTOTYPE = 91,
    #[error("ENOPROTOOPT")]
    ENOPROTOOPT = 92,
    #[error("EPROTONOSUPPORT")]
    EPROTONOSUPPORT = 93,
    #[error("EOPNOTSUPP")]
    EOPNOTSUPP = 95,
    #[error("EAFNOSUPPORT")]
    EAFNOSUPPORT = 97,
    #[error("EADDRINUSE")]
    EADDRINUSE = 98,
    #[error("EADDRNOTAVAIL")]
    EADDRNOTAVAIL = 99,
    #[error("ENETDOWN")]
    ENETDOWN = 100,
    #[error("ENETUNREACH")]
    ENETUNREACH = 101,
    #[error("ENETRESET")]
    ENETRESET = 102,
    #[error("ECONNABORTED")]
    ECONNABORTED = 103,
    #[error("ECONNRESET")]
    ECONNRESET = 104,
    #[error("ENOBUFS")]
    ENOBUFS = 105,
    #[error("EISCONN")]
    EISCONN = 106,
    #[error("ENOTCONN")]
    ENOTCONN = 107,
    #[error("ETIMEDOUT")]
    ETIMEDOUT = 110,
    #[error("ECONNREFUSED")]
    ECONNREFUSED = 111,
    #[error("EHOSTUNREACH")]
    EHOSTUNREACH = 113,
    #[error("EALREADY")]
    EALREADY = 114,
    #[error("EINPROGRESS")]
    EINPROGRESS = 115,
    #[error("ESTALE")]
    ESTALE = 116,
    #[error("EDQUOT")]
    EDQUOT = 122,
    #[error("ECANCELED")]
    ECANCELED = 125,
}

impl Errno {
    /// Numeric errno value.
    pub fn code(self) -> i32 {
        self as i32
    }

    /* Bionic strerror:
     * https://android.googlesource.com/platform/bionic/+/refs/heads/main/libc/private/bionic_errdefs.h
     * sed 's|__BIONIC_ERRDEF(\([^,]*\), "\([^"]*\)").*|"\2" => Self::\1,|'
     * and delete where the code has no variant above
     */
    /// Maps a `strerror()` message to its error code, [`Self::EIO`] if
    /// the message is unknown.
    pub fn from_message(message: &str) -> Self {
        match message {
            "Operation not permitted" => Self::EPERM,
            "No such file or directory" => Self::ENOENT,
            "No such process" => Self::ESRCH,
            "Interrupted system call" => Self::EINTR,
            "I/O error" => Self::EIO,
            "No such device or address" => Self::ENXIO,
            "Argument list too long" => Self::E2BIG,
            "Exec format error" => Self::ENOEXEC,
            "Bad file descriptor" => Self::EBADF,
            "No child processes" => Self::ECHILD,
            "Try again" => Self::EAGAIN,
            "Out of memory" => Self::ENOMEM,
            "Permission denied" => Self::EACCES,
            "Bad address" => Self::EFAULT,
            "Device or resource busy" => Self::EBUSY,
            "File exists" => Self::EEXIST,
            "Cross-device link" => Self::EXDEV,
            "No such device" => Self::ENODEV,
            "Not a directory" => Self::ENOTDIR,
            "Is a directory" => Self::EISDIR,
            "Invalid argument" => Self::EINVAL,
            "File table overflow" => Self::ENFILE,
            "Too many open files" => Self::EMFILE,
            "Inappropriate ioctl for device" => Self::ENOTTY,
            "Text file busy" => Self::ETXTBSY,
            "File too large" => Self::EFBIG,
            "No space left on device" => Self::ENOSPC,
            "Illegal seek" => Self::ESPIPE,
            "Read-only file system" => Self::EROFS,
            "Too many links" => Self::EMLINK,
            "Broken pipe" => Self::EPIPE,
            "Math argument out of domain of func" => Self::EDOM,
            "Math result not representable" => Self::ERANGE,
            "Resource deadlock would occur" => Self::EDEADLK,
            "File name too long" => Self::ENAMETOOLONG,
            "No record locks available" => Self::ENOLCK,
            "Function not implemented" => Self::ENOSYS,
            "Directory not empty" => Self::ENOTEMPTY,
            "Too many symbolic links encountered" => Self::ELOOP,
            "No message of desired type" => Self::ENOMSG,
            "Identifier removed" => Self::EIDRM,
            "Device not a stream" => Self::ENOSTR,
            "No data available" => Self::ENODATA,
            "Timer expired" => Self::ETIME,
            "Out of streams resources" => Self::ENOSR,
            "Machine is not on the network" => Self::ENONET,
            "Link has been severed" => Self::ENOLINK,
            "Protocol error" => Self::EPROTO,
            "Multihop attempted" => Self::EMULTIHOP,
            "Not a data message" => Self::EBADMSG,
            "Value too large for defined data type" => Self::EOVERFLOW,
            "Illegal byte sequence" => Self::EILSEQ,
            "Socket operation on non-socket" => Self::ENOTSOCK,
            "Destination address required" => Self::EDESTADDRREQ,
            "Message too long" => Self::EMSGSIZE,
            "Protocol wrong type for socket" => Self::EPROTOTYPE,
            "Protocol not available" => Self::ENOPROTOOPT,
            "Protocol not supported" => Self::EPROTONOSUPPORT,
            "Operation not supported on transport endpoint" => Self::EOPNOTSUPP,
            "Address family not supported by protocol" => Self::EAFNOSUPPORT,
            "Address already in use" => Self::EADDRINUSE,
            "Cannot assign requested address" => Self::EADDRNOTAVAIL,
            "Network is down" => Self::ENETDOWN,
            "Network is unreachable" => Self::ENETUNREACH,
            "Network dropped connection because of reset" => Self::ENETRESET,
            "Software caused connection abort" => Self::ECONNABORTED,
            "Connection reset by peer" => Self::ECONNRESET,
            "No buffer space available" => Self::ENOBUFS,
            "Transport endpoint is already connected" => Self::EISCONN,
            "Transport endpoint is not connected" => Self::ENOTCONN,
            "Connection timed out" => Self::ETIMEDOUT,
            "Connection refused" => Self::ECONNREFUSED,
            "No route to host" => Self::EHOSTUNREACH,
            "Operation already in progress" => Self::EALREADY,
            "Operation now in progress" => Self::EINPROGRESS,
            "Stale NFS file handle" => Self::ESTALE,
            "Quota exceeded" => Self::EDQUOT,
            "Operation Canceled" => Self::ECANCELED,
            _ => Self::EIO,
        }
    }
}
