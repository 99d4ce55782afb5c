//! Definition graph data model
//!
//! One `Definition` per device or connection. The graph is produced once by
//! the loader, stays immutable for the rest of the run, and is discarded
//! after rendering.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Device class a definition belongs to.
///
/// `Ethernet` and `Wifi` are physical: they match against existing hardware.
/// The rest are virtual: created by this configuration and named directly by
/// the definition id. Wifi structurally carries its SSID-keyed access points,
/// so a wifi definition without a network set is unrepresentable.
#[derive(Debug, Clone, PartialEq)]
pub enum DeviceKind {
    Ethernet,
    Wifi { access_points: BTreeMap<String, AccessPoint> },
    Bridge,
    Bond,
    Vlan,
}

impl DeviceKind {
    /// Physical devices are matched against hardware; virtual ones are created
    pub fn is_physical(&self) -> bool {
        matches!(self, DeviceKind::Ethernet | DeviceKind::Wifi { .. })
    }

    /// NetworkManager "type=" keyfile value
    pub fn type_str(&self) -> &'static str {
        match self {
            DeviceKind::Ethernet => "ethernet",
            DeviceKind::Wifi { .. } => "wifi",
            DeviceKind::Bridge => "bridge",
            DeviceKind::Bond => "bond",
            DeviceKind::Vlan => "vlan",
        }
    }
}

/// Hardware match predicate; any combination of criteria
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MatchSpec {
    /// MAC address, XX:XX:XX:XX:XX:XX
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mac: Option<String>,
    /// Kernel driver name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub driver: Option<String>,
    /// Original device name; may contain glob characters
    #[serde(rename = "name", skip_serializing_if = "Option::is_none")]
    pub original_name: Option<String>,
}

impl MatchSpec {
    /// True if any match criterion is set
    pub fn is_some(&self) -> bool {
        self.mac.is_some() || self.driver.is_some() || self.original_name.is_some()
    }
}

/// Wifi operating mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WifiMode {
    Infrastructure,
    Adhoc,
    Ap,
}

impl Default for WifiMode {
    fn default() -> Self {
        WifiMode::Infrastructure
    }
}

impl WifiMode {
    /// NetworkManager "mode=" keyfile value
    pub fn mode_str(&self) -> &'static str {
        match self {
            WifiMode::Infrastructure => "infrastructure",
            WifiMode::Adhoc => "adhoc",
            WifiMode::Ap => "ap",
        }
    }
}

/// One SSID-scoped configuration variant of a wifi definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccessPoint {
    pub ssid: String,
    #[serde(default)]
    pub mode: WifiMode,
    /// WPA-PSK passphrase, None for open networks
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

/// One node in the network-configuration graph
#[derive(Debug, Clone, PartialEq)]
pub struct Definition {
    /// Unique identifier, stable across re-renders
    pub id: String,
    pub kind: DeviceKind,
    pub matches: MatchSpec,
    /// Rename target; when set, downstream specifiers use the renamed value
    pub set_name: Option<String>,
    /// Subsystem that owns this definition
    pub backend: crate::backend::Backend,
    /// Parent bridge definition id; names the parent, does not own it
    pub bridge: Option<String>,
    pub dhcp4: bool,
    pub wake_on_lan: bool,
}

impl Definition {
    /// Access points for wifi definitions, None for every other kind
    pub fn access_points(&self) -> Option<&BTreeMap<String, AccessPoint>> {
        match self.kind {
            DeviceKind::Wifi { ref access_points } => Some(access_points),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::Backend;

    fn ethernet(id: &str) -> Definition {
        Definition {
            id: id.to_string(),
            kind: DeviceKind::Ethernet,
            matches: MatchSpec::default(),
            set_name: None,
            backend: Backend::NetworkManager,
            bridge: None,
            dhcp4: false,
            wake_on_lan: false,
        }
    }

    #[test]
    fn test_access_points_only_on_wifi() {
        let def = ethernet("eth0");
        assert!(def.access_points().is_none());

        let mut wifi = ethernet("wl0");
        let mut aps = BTreeMap::new();
        aps.insert(
            "Home".to_string(),
            AccessPoint {
                ssid: "Home".to_string(),
                mode: WifiMode::Infrastructure,
                password: None,
            },
        );
        wifi.kind = DeviceKind::Wifi { access_points: aps };
        assert_eq!(wifi.access_points().unwrap().len(), 1);
    }

    #[test]
    fn test_device_kind_physical() {
        assert!(DeviceKind::Ethernet.is_physical());
        assert!(DeviceKind::Wifi { access_points: BTreeMap::new() }.is_physical());
        assert!(!DeviceKind::Bridge.is_physical());
        assert!(!DeviceKind::Bond.is_physical());
        assert!(!DeviceKind::Vlan.is_physical());
    }
}
