/*!
# Introduction

guestnet produces what a provisioning layer needs to give a VM guest a static network
configuration: the path of the guest's network configuration file, the file's content, and the
shell command that applies it.

The guest OS is identified from the name of the box image it was built from.  Box names are
matched against a fixed, ordered list of substrings; the first match decides which OS template is
used.  Supported OS families are RHEL/CentOS 7, RHEL 8 and its rebuilds, and Ubuntu.

guestnet does not touch the guest.  Writing the file and running the command are left to the
caller.

```
use guestnet::{GuestConfig, NetworkSpec};

let spec: NetworkSpec = toml::from_str(r#"
    [vnic]
    ip = "10.0.0.1"
    prefix_length = 24

    [dns]
    dns1 = "8.8.8.8"
    dns2 = "8.8.4.4"
"#).unwrap();

let config = GuestConfig::default()
    .get_network_config("10.0.0.5", &spec, "bento/ubuntu-20.04")
    .unwrap();
assert_eq!(config.config_file_path, "/etc/netplan/01-netcfg.yaml");
assert_eq!(config.apply_cmd, "sudo netplan apply &");
```
*/

#![deny(rust_2018_idioms)]

pub mod error;
pub mod network;
pub mod os_id;
pub mod render;
pub mod template;

pub use error::{Error, Result};
pub use network::{Dns, NetworkParameters, NetworkSpec, Vnic};
pub use os_id::OsId;
pub use render::{TemplateValue, TemplateValues};
pub use template::{ConfigFile, TemplateEntry, TemplateRegistry, TemplateRegistryBuilder};

use log::info;
use serde::Serialize;

/// The rendered network configuration for one guest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedConfig {
    pub config_file_path: String,
    pub config_file_content: String,
    pub apply_cmd: String,
}

/// Renders guest network configuration from a registry of OS templates.
///
/// Build one and share it; it holds no mutable state.
#[derive(Debug, Clone, Default)]
pub struct GuestConfig {
    registry: TemplateRegistry,
}

impl GuestConfig {
    pub fn new(registry: TemplateRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &TemplateRegistry {
        &self.registry
    }

    /// Render the network configuration for a guest at `target_ip`, attached to the network
    /// described by `network_spec`, running the OS that `box_name` was built from.
    pub fn get_network_config<S>(
        &self,
        target_ip: S,
        network_spec: &NetworkSpec,
        box_name: &str,
    ) -> Result<RenderedConfig>
    where
        S: Into<String>,
    {
        let os = os_id::resolve(box_name)?;
        let params = NetworkParameters::new(target_ip, network_spec);
        let entry = self.registry.lookup(os)?;
        let content = render::render(&entry.config_file.content, &TemplateValues::from(&params))?;

        info!(
            "Generated {} network config for {} at '{}'",
            os, params.ip, entry.config_file.path
        );
        Ok(RenderedConfig {
            config_file_path: entry.config_file.path.clone(),
            config_file_content: content,
            apply_cmd: entry.apply_cmd.clone(),
        })
    }
}
