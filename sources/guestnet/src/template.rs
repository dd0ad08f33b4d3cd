//! The template module contains the per-OS network configuration templates: where the
//! configuration file lives, what goes in it, and the command that makes the guest pick it up.
//!
//! A `TemplateRegistry` is assembled once with a `TemplateRegistryBuilder` and is read-only from
//! then on.  Entries derived from another entry are independent copies.
use crate::error::{self, Result};
use crate::os_id::OsId;
use log::debug;
use snafu::OptionExt;
use std::collections::HashMap;

const IFCFG_ETH0_PATH: &str = "/etc/sysconfig/network-scripts/ifcfg-eth0";
const NETPLAN_PATH: &str = "/etc/netplan/01-netcfg.yaml";

// Both DNS lines are labeled DNS1; network-scripts accepts the repeated key.
const IFCFG_ETH0_TEMPLATE: &str = "\
BOOTPROTO=none
DEFROUTE=yes
DEVICE=eth0
DNS1={dns1}
DNS1={dns2}
GATEWAY={gateway_ip}
IPADDR={ip}
NAME=eth0
ONBOOT=yes
PREFIX={prefix_length:d}
TYPE=Ethernet
";

const NETPLAN_TEMPLATE: &str = "\
network:
  version: 2
  ethernets:
    eth0:
      dhcp4: no
      addresses: [{ip}/{prefix_length:d}]
      gateway4: {gateway_ip}
      nameservers:
        addresses: [{dns1}, {dns2}]
";

const REDHAT7_APPLY_CMD: &str = "sudo systemctl restart network --no-block";

// Reload NetworkManager's view of the files, then bounce eth0 in the background so the caller's
// connection (likely over eth0) isn't waiting on it.
const REDHAT8_APPLY_CMD: &str = "sudo nmcli con reload && \
{ nohup sh -c \"sudo nmcli con down eth0 && sudo nmcli con up eth0\" \
> /tmp/vagrant-network-apply.log 2>&1 & }";

const UBUNTU_APPLY_CMD: &str = "sudo netplan apply &";

/// A configuration file to be written inside the guest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigFile {
    pub path: String,
    pub content: String,
}

/// The network configuration recipe for one OS.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateEntry {
    pub config_file: ConfigFile,
    pub apply_cmd: String,
}

impl TemplateEntry {
    pub fn new<P, C, A>(path: P, content: C, apply_cmd: A) -> Self
    where
        P: Into<String>,
        C: Into<String>,
        A: Into<String>,
    {
        Self {
            config_file: ConfigFile {
                path: path.into(),
                content: content.into(),
            },
            apply_cmd: apply_cmd.into(),
        }
    }
}

/// Read-only map of OS identity to template entry.
#[derive(Debug, Clone)]
pub struct TemplateRegistry {
    entries: HashMap<OsId, TemplateEntry>,
}

impl TemplateRegistry {
    /// The templates for every OS `os_id::resolve` can return.
    pub fn builtin() -> Self {
        let mut builder = TemplateRegistryBuilder::new()
            .entry(
                OsId::Redhat7,
                TemplateEntry::new(IFCFG_ETH0_PATH, IFCFG_ETH0_TEMPLATE, REDHAT7_APPLY_CMD),
            )
            .entry(
                OsId::Ubuntu,
                TemplateEntry::new(NETPLAN_PATH, NETPLAN_TEMPLATE, UBUNTU_APPLY_CMD),
            );
        // RHEL 8 writes the same ifcfg file as RHEL 7; only the way it's applied differs.
        builder.derive(OsId::Redhat7, OsId::Redhat8, REDHAT8_APPLY_CMD);
        builder.build()
    }

    pub fn lookup(&self, os: OsId) -> Result<&TemplateEntry> {
        self.entries
            .get(&os)
            .context(error::UnknownOsTagSnafu { os })
    }

    /// The OS identities with a registered entry, in a stable order.
    pub fn os_ids(&self) -> Vec<OsId> {
        let mut ids: Vec<OsId> = self.entries.keys().copied().collect();
        ids.sort();
        ids
    }
}

impl Default for TemplateRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Assembles a `TemplateRegistry`.
#[derive(Debug, Default)]
pub struct TemplateRegistryBuilder {
    entries: HashMap<OsId, TemplateEntry>,
}

impl TemplateRegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace the entry for `os`.
    pub fn entry(mut self, os: OsId, entry: TemplateEntry) -> Self {
        self.entries.insert(os, entry);
        self
    }

    /// Add an entry for `os` that copies `base`'s configuration file and uses its own apply
    /// command.  Returns false, leaving the builder untouched, if `base` has no entry yet.
    pub fn derive<S>(&mut self, base: OsId, os: OsId, apply_cmd: S) -> bool
    where
        S: Into<String>,
    {
        let Some(base_entry) = self.entries.get(&base) else {
            return false;
        };
        let mut entry = base_entry.clone();
        entry.apply_cmd = apply_cmd.into();
        debug!("Deriving '{}' network template from '{}'", os, base);
        self.entries.insert(os, entry);
        true
    }

    pub fn entry_mut(&mut self, os: OsId) -> Option<&mut TemplateEntry> {
        self.entries.get_mut(&os)
    }

    pub fn build(self) -> TemplateRegistry {
        TemplateRegistry {
            entries: self.entries,
        }
    }
}
