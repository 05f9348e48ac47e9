//! Long-lived open-file handles proxied to the host.
//!
//! The host drives reads and writes by offset on demand; each open
//! document maps to one [`RemoteFile`] that survives session recycling.

mod file;

pub use file::{OpenMode, RemoteFile};
