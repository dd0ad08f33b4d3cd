//! The os_id module contains the closed set of guest OS identities we know how to configure, and
//! the resolver that maps a free-text box name onto one of them.
//!
//! Resolution is a case-sensitive substring search over an ordered pattern table.  The first
//! pattern contained in the box name wins, so the table order is the priority order.
use crate::error::{self, Result};
use log::{debug, trace};
use serde::{Deserialize, Serialize};
use snafu::OptionExt;

/// Identifies a family of guest OS images that share network configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OsId {
    /// CentOS/RHEL 7, configured with network-scripts
    Redhat7,
    /// RHEL 8 and rebuilds, network-scripts applied through NetworkManager
    Redhat8,
    /// Ubuntu, configured with netplan
    Ubuntu,
}

serde_plain::derive_display_from_serialize!(OsId);
serde_plain::derive_fromstr_from_deserialize!(OsId);

impl OsId {
    pub const ALL: [OsId; 3] = [OsId::Redhat7, OsId::Redhat8, OsId::Ubuntu];
}

// Patterns are substrings of box names, not full image names.
const BOX_PATTERNS: &[(&str, OsId)] = &[
    // Debian family
    ("ubuntu", OsId::Ubuntu),
    // RHEL 7
    ("centos", OsId::Redhat7),
    ("rhel7", OsId::Redhat7),
    // RHEL 8
    ("almalinux/8", OsId::Redhat8),
    ("rhel8", OsId::Redhat8),
    ("rocky8", OsId::Redhat8),
];

/// The ordered (pattern, OS) table used by `resolve`.
pub fn box_patterns() -> &'static [(&'static str, OsId)] {
    BOX_PATTERNS
}

/// Find the OS identity for a box name.
pub fn resolve<S>(box_name: S) -> Result<OsId>
where
    S: AsRef<str>,
{
    let box_name = box_name.as_ref();
    let os = BOX_PATTERNS
        .iter()
        .find(|(pattern, _)| {
            trace!("Checking box '{}' against pattern '{}'", box_name, pattern);
            box_name.contains(pattern)
        })
        .map(|(_, os)| *os)
        .context(error::UnrecognizedBoxSnafu { box_name })?;

    debug!("Resolved box '{}' to OS '{}'", box_name, os);
    Ok(os)
}
