//! Typed views over configuration documents returned by the command channel

use crate::document::{ConfigDocument, XmlElement};
use crate::error::{Error, Result};

const NETWORK_CONFIG_PATH: &str = "/TMCmd/ResultDetails/DRINASConfig/DRINasNetworkConfig";
const SHARE_PATH: &str = "/TMCmd/ResultDetails/DRINASConfig/DRIShareConfig/Shares/Share";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IpConfigType {
    Static,
    Dhcp,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IpConfig {
    pub config_type: IpConfigType,
    pub ip: String,
    pub subnet: String,
    pub gateway: String,
    pub dns1: String,
    pub dns2: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JumboFrames {
    pub enabled: bool,
    pub mtu_size: u32,
}

/// `DRINasNetworkConfig` section of a network configuration reply
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkConfig {
    pub nas_name: String,
    pub workgroup: String,
    pub mac_address: String,
    /// Link speed in Mbps
    pub port_speed: String,
    pub port_duplex: String,
    pub ip: IpConfig,
    pub jumbo_frames: JumboFrames,
}

impl NetworkConfig {
    /// Read the `DRINasNetworkConfig` section of a `Network` reply
    pub fn from_document(doc: &ConfigDocument) -> Result<Self> {
        let config = doc
            .select(NETWORK_CONFIG_PATH)
            .ok_or_else(|| Error::MissingField(NETWORK_CONFIG_PATH.into()))?;

        let text = |path: &str| config.require_text(path).map(str::to_string);

        let config_type = if config.require_text("IPConfig/IPConfigType")? == "1" {
            IpConfigType::Static
        } else {
            IpConfigType::Dhcp
        };

        Ok(Self {
            nas_name: text("NasName")?,
            workgroup: text("NasWorkgroup")?,
            mac_address: text("MACAddress")?,
            port_speed: text("PortSpeed")?,
            port_duplex: text("PortDuplex")?,
            ip: IpConfig {
                config_type,
                ip: text("IPConfig/IP")?,
                subnet: text("IPConfig/Subnet")?,
                gateway: text("IPConfig/Gateway")?,
                dns1: text("IPConfig/DNS1")?,
                dns2: text("IPConfig/DNS2")?,
            },
            jumbo_frames: JumboFrames {
                enabled: config.require_flag("JumboFramesConfig/Enabled")?,
                mtu_size: config.require_parsed("JumboFramesConfig/MTUSize")?,
            },
        })
    }
}

/// One entry of a share configuration reply
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Share {
    pub name: String,
    pub time_machine_enabled: bool,
}

impl Share {
    /// All shares in document order (an empty list is valid)
    pub fn list_from_document(doc: &ConfigDocument) -> Result<Vec<Self>> {
        doc.select_all(SHARE_PATH)
            .into_iter()
            .map(Self::from_element)
            .collect()
    }

    fn from_element(el: &XmlElement) -> Result<Self> {
        Ok(Self {
            name: el.require_text("ShareName")?.to_string(),
            time_machine_enabled: el.require_flag("TimeMachineEnabled")?,
        })
    }
}
