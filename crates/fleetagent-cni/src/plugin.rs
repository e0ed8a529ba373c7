//! Input to the VPC ENI network plugin.

use std::net::Ipv4Addr;

use serde::{Deserialize, Serialize};

use crate::error::{CniError, Result};

/// Name of the VPC ENI plugin.
pub const VPC_ENI_PLUGIN_NAME: &str = "vpc-eni";

/// File name of the VPC ENI plugin executable.
pub const VPC_ENI_PLUGIN_EXECUTABLE: &str = "vpc-eni.exe";

/// CNI spec version the agent speaks to the plugin.
pub const DEFAULT_CNI_VERSION: &str = "0.3.0";

/// DNS settings handed to the plugin.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dns {
    /// Name servers, in priority order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub nameservers: Vec<String>,
    /// Local domain.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub domain: String,
    /// Search domains.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub search: Vec<String>,
    /// Resolver options.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<String>,
}

/// Everything required to invoke the VPC ENI plugin for one task.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VpcEniPluginConfig {
    /// Plugin name.
    #[serde(rename = "type", default, skip_serializing_if = "String::is_empty")]
    pub plugin_type: String,
    /// CNI spec version.
    #[serde(rename = "cniVersion", default, skip_serializing_if = "String::is_empty")]
    pub cni_version: String,
    /// DNS settings.
    #[serde(default)]
    pub dns: Dns,
    /// Name of the interface on the instance.
    #[serde(rename = "eniName")]
    pub eni_name: String,
    /// MAC address of the interface.
    #[serde(rename = "eniMACAddress")]
    pub eni_mac_address: String,
    /// IPv4 address of the interface, optionally with a prefix length.
    #[serde(rename = "eniIPAddress")]
    pub eni_ip_address: String,
    /// IPv4 address of the subnet gateway.
    #[serde(rename = "gatewayIPAddress")]
    pub gateway_ip_address: String,
    /// Whether an HCN namespace is used instead of an infra container.
    #[serde(rename = "noInfraContainer", default)]
    pub no_infra_container: bool,
    /// Whether to reuse an existing network instead of creating one.
    #[serde(rename = "useExistingNetwork", default)]
    pub use_existing_network: bool,
}

impl VpcEniPluginConfig {
    /// Creates a config for the given interface with the plugin name and
    /// CNI version filled in.
    #[must_use]
    pub fn new(
        eni_name: impl Into<String>,
        eni_mac_address: impl Into<String>,
        eni_ip_address: impl Into<String>,
        gateway_ip_address: impl Into<String>,
    ) -> Self {
        Self {
            plugin_type: VPC_ENI_PLUGIN_NAME.to_owned(),
            cni_version: DEFAULT_CNI_VERSION.to_owned(),
            eni_name: eni_name.into(),
            eni_mac_address: eni_mac_address.into(),
            eni_ip_address: eni_ip_address.into(),
            gateway_ip_address: gateway_ip_address.into(),
            ..Self::default()
        }
    }

    /// Parses a config from its JSON form and validates it.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or a field is invalid.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Serializes the config into the JSON the plugin reads from stdin.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Checks the interface fields the plugin cannot work without.
    ///
    /// # Errors
    ///
    /// Returns [`CniError::InvalidConfig`] naming the first bad field.
    pub fn validate(&self) -> Result<()> {
        if self.eni_name.is_empty() {
            return Err(invalid("eniName", "must not be empty"));
        }
        if !is_mac_address(&self.eni_mac_address) {
            return Err(invalid(
                "eniMACAddress",
                format!("not a MAC address: {:?}", self.eni_mac_address),
            ));
        }
        if !is_ipv4_with_prefix(&self.eni_ip_address) {
            return Err(invalid(
                "eniIPAddress",
                format!("not an IPv4 address: {:?}", self.eni_ip_address),
            ));
        }
        if self.gateway_ip_address.parse::<Ipv4Addr>().is_err() {
            return Err(invalid(
                "gatewayIPAddress",
                format!("not an IPv4 address: {:?}", self.gateway_ip_address),
            ));
        }
        Ok(())
    }
}

fn invalid(field: &'static str, message: impl Into<String>) -> CniError {
    CniError::InvalidConfig {
        field,
        message: message.into(),
    }
}

fn is_mac_address(value: &str) -> bool {
    let octets: Vec<&str> = value.split(':').collect();
    octets.len() == 6
        && octets
            .iter()
            .all(|octet| octet.len() == 2 && octet.chars().all(|c| c.is_ascii_hexdigit()))
}

fn is_ipv4_with_prefix(value: &str) -> bool {
    let (addr, prefix) = match value.split_once('/') {
        Some((addr, prefix)) => (addr, Some(prefix)),
        None => (value, None),
    };
    let prefix_ok = prefix.is_none_or(|p| p.parse::<u8>().is_ok_and(|p| p <= 32));
    prefix_ok && addr.parse::<Ipv4Addr>().is_ok()
}
