//! Connection parameters for a mount, captured once from the host's
//! preference store and immutable afterwards. Replacing the snapshot via
//! [`Executor::set_config`](crate::Executor::set_config) invalidates the
//! live session; the next operation remounts transparently.

use serde::Deserialize;

/// Scheme of root and document identifiers.
pub const URI_SCHEME: &str = "cephfs";

const DEFAULT_TIMEOUT_SECS: u64 = 20;

/// Immutable snapshot of everything needed to (re)establish a mount.
#[derive(Debug, Clone, Deserialize)]
pub struct MountConfig {
    /// Client identity (the cephx user)
    pub id: String,
    /// Monitor endpoints, `host:port[,host:port...]`
    pub mon_host: String,
    /// Secret key for the identity
    pub key: String,
    /// Subpath of the filesystem to mount as the root
    #[serde(default)]
    pub path: String,
    /// Mount timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    /// When `false`, every entry is treated as fully accessible
    /// (effectively superuser). Deliberate policy switch, not a gap:
    /// deployments that enforce permissions server-side disable the
    /// client-side check.
    #[serde(default = "default_true")]
    pub check_permissions: bool,
}

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_true() -> bool {
    true
}

impl MountConfig {
    /// Builds a snapshot from raw preference strings. The timeout must be
    /// numeric, anything else falls back to the default.
    pub fn from_prefs(
        id: &str,
        mon_host: &str,
        key: &str,
        path: &str,
        timeout: &str,
        check_permissions: bool,
    ) -> Self {
        Self {
            id: id.to_owned(),
            mon_host: mon_host.to_owned(),
            key: key.to_owned(),
            path: path.to_owned(),
            timeout_secs: timeout.parse().unwrap_or(DEFAULT_TIMEOUT_SECS),
            check_permissions,
        }
    }

    /// Native client `conf_set` pairs, including the fixed tuning options
    /// every mount gets.
    pub fn options(&self) -> Vec<(String, String)> {
        vec![
            ("mon_host".to_owned(), self.mon_host.clone()),
            ("key".to_owned(), self.key.clone()),
            (
                "client_mount_timeout".to_owned(),
                self.timeout_secs.to_string(),
            ),
            ("client_dirsize_rbytes".to_owned(), "false".to_owned()),
            (
                "client_permissions".to_owned(),
                self.check_permissions.to_string(),
            ),
            ("ms_connection_ready_timeout".to_owned(), "3".to_owned()),
        ]
    }

    /// Canonical root identifier: `cephfs://<id>@<mon_host>`.
    pub fn root_uri(&self) -> String {
        format!("{}://{}@{}", URI_SCHEME, self.id, self.mon_host)
    }

    /// Document identifier for a rooted path.
    pub fn document_id(&self, path: &str) -> String {
        if path == "/" {
            self.root_uri()
        } else {
            format!("{}{}", self.root_uri(), path)
        }
    }

    pub fn title(&self) -> String {
        format!("{}:{}", self.mon_host, self.path)
    }

    pub fn summary(&self) -> String {
        format!("CephFS with user: {}", self.id)
    }
}
