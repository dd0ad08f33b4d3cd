//! The network module contains the caller-facing network spec, and the flat set of network
//! parameters that templates are rendered with.
//!
//! Values are carried as given.  Whether an address is well-formed for the target file format is
//! the caller's concern.
use crate::error::{self, Result};
use crate::render::TemplateValues;
use serde::{Deserialize, Serialize};
use snafu::ResultExt;
use std::fs;
use std::path::Path;

/// The network a guest is being attached to, as described by the provisioning layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkSpec {
    pub vnic: Vnic,
    pub dns: Dns,
}

/// The host-side virtual NIC.  Its address doubles as the guest's gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vnic {
    pub ip: String,
    pub prefix_length: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dns {
    pub dns1: String,
    pub dns2: String,
}

impl NetworkSpec {
    /// Read a network spec from a TOML file.
    pub fn from_path<P>(path: P) -> Result<Self>
    where
        P: AsRef<Path>,
    {
        let path = path.as_ref();
        let s = fs::read_to_string(path).context(error::NetworkSpecReadSnafu { path })?;
        toml::from_str(&s).context(error::NetworkSpecParseSnafu { path })
    }
}

/// Everything a guest needs to configure its interface statically.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkParameters {
    pub ip: String,
    pub prefix_length: u8,
    pub gateway_ip: String,
    pub dns1: String,
    pub dns2: String,
}

impl NetworkParameters {
    /// Combine the guest's target address with the network it is joining.
    pub fn new<S>(target_ip: S, network_spec: &NetworkSpec) -> Self
    where
        S: Into<String>,
    {
        Self {
            ip: target_ip.into(),
            prefix_length: network_spec.vnic.prefix_length,
            gateway_ip: network_spec.vnic.ip.clone(),
            dns1: network_spec.dns.dns1.clone(),
            dns2: network_spec.dns.dns2.clone(),
        }
    }
}

impl From<&NetworkParameters> for TemplateValues {
    fn from(params: &NetworkParameters) -> Self {
        let mut values = TemplateValues::new();
        values.insert("ip", params.ip.as_str());
        values.insert("prefix_length", params.prefix_length);
        values.insert("gateway_ip", params.gateway_ip.as_str());
        values.insert("dns1", params.dns1.as_str());
        values.insert("dns2", params.dns2.as_str());
        values
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::error::Error;
    use crate::render::TemplateValue;
    use std::io::Write;
    use std::path::PathBuf;

    fn net_spec_data() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("test_data")
            .join("net_spec")
    }

    #[test]
    fn ok_spec() {
        let spec = NetworkSpec::from_path(net_spec_data().join("net_spec.toml")).unwrap();
        assert_eq!(spec.vnic.ip, "10.0.0.1");
        assert_eq!(spec.vnic.prefix_length, 24);
        assert_eq!(spec.dns.dns1, "8.8.8.8");
        assert_eq!(spec.dns.dns2, "8.8.4.4");
    }

    #[test]
    fn missing_dns() {
        let bad = net_spec_data().join("missing_dns.toml");
        assert!(matches!(
            NetworkSpec::from_path(bad),
            Err(Error::NetworkSpecParse { .. })
        ));
    }

    #[test]
    fn prefix_not_an_integer() {
        let bad = net_spec_data().join("bad_prefix.toml");
        assert!(matches!(
            NetworkSpec::from_path(bad),
            Err(Error::NetworkSpecParse { .. })
        ));
    }

    #[test]
    fn unreadable_spec() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("net_spec.toml");
        match NetworkSpec::from_path(&missing) {
            Err(Error::NetworkSpecRead { path, .. }) => assert_eq!(path, missing),
            other => panic!("expected NetworkSpecRead error, got {:?}", other),
        }
    }

    #[test]
    fn spec_from_scratch_file() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        write!(
            f,
            "[vnic]\nip = \"192.168.121.1\"\nprefix_length = 16\n\n[dns]\ndns1 = \"1.1.1.1\"\ndns2 = \"1.0.0.1\"\n"
        )
        .unwrap();
        let spec = NetworkSpec::from_path(f.path()).unwrap();
        assert_eq!(spec.vnic.prefix_length, 16);
        assert_eq!(spec.dns.dns2, "1.0.0.1");
    }

    #[test]
    fn parameters_from_spec() {
        let spec = NetworkSpec::from_path(net_spec_data().join("net_spec.toml")).unwrap();
        let params = NetworkParameters::new("10.0.0.5", &spec);
        assert_eq!(
            params,
            NetworkParameters {
                ip: "10.0.0.5".to_string(),
                prefix_length: 24,
                gateway_ip: "10.0.0.1".to_string(),
                dns1: "8.8.8.8".to_string(),
                dns2: "8.8.4.4".to_string(),
            }
        );

        let values = TemplateValues::from(&params);
        assert_eq!(values.get("prefix_length"), Some(&TemplateValue::Int(24)));
        assert_eq!(
            values.get("gateway_ip"),
            Some(&TemplateValue::Str("10.0.0.1".to_string()))
        );
    }
}
