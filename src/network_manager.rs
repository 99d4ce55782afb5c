//! NetworkManager keyfile backend
//!
//! Renders one keyfile connection per owned definition (one per SSID for
//! wifi), decides how to keep NetworkManager away from definitions owned by
//! other backends, and aggregates those exclusions into a single conf.d
//! stanza plus a single udev rules file.
//!
//! NetworkManager has two expressive gaps the renderer must reject rather
//! than mis-render: keyfiles cannot match by driver, and interface names in
//! keyfiles do not glob.

use crate::artifact::{Artifact, MODE_SECRET, MODE_WORLD_READABLE};
use crate::backend::{Backend, BackendRenderer};
use crate::error::{NetgenError, NetgenResult};
use crate::model::{AccessPoint, Definition, DeviceKind, WifiMode};
use crate::specifier;
use std::collections::BTreeSet;
use tracing::debug;

/// Runtime directory for generated connection keyfiles
pub const CONNECTION_DIR: &str = "run/NetworkManager/system-connections";

/// Aggregate unmanaged-devices stanza
pub const CONF_D_PATH: &str = "run/NetworkManager/conf.d/netgen.conf";

/// Aggregate udev exclusion rules
pub const UDEV_RULES_PATH: &str = "run/udev/rules.d/90-netgen.rules";

/// Prefix namespacing generated connection ids and filenames
const CONNECTION_PREFIX: &str = "netgen-";

/// Glob metacharacters NetworkManager keyfiles cannot express
const GLOB_CHARS: &[char] = &['*', '[', ']', '?'];

/// Percent-escape an SSID for use in a connection filename.
///
/// Everything except ASCII alphanumerics and `-._~` is escaped; the content
/// of the keyfile always carries the unescaped SSID.
pub fn escape_ssid(ssid: &str) -> String {
    let mut out = String::with_capacity(ssid.len());
    for byte in ssid.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{:02X}", byte)),
        }
    }
    out
}

/// Exclusions for definitions other backends own.
///
/// Set contents are all that matter; `BTreeSet` gives a stable join so the
/// aggregate artifacts reproduce byte-for-byte whatever the graph iteration
/// order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExclusionPlan {
    /// Device specifiers for the unmanaged-devices list
    pub unmanaged: BTreeSet<String>,
    /// Drivers excluded at the udev level, where specifiers cannot reach
    pub udev_drivers: BTreeSet<String>,
}

impl ExclusionPlan {
    pub fn is_empty(&self) -> bool {
        self.unmanaged.is_empty() && self.udev_drivers.is_empty()
    }
}

/// Decide the disposition of every definition not owned by `backend`.
///
/// Driver matches have no specifier vocabulary at all, so they become udev
/// rules tagging the device unmanaged as it appears; everything else encodes
/// to a specifier for the unmanaged-devices list. Per-definition decisions
/// are independent, so this is a plain fold with no ordering dependency.
pub fn arbitrate(defs: &[Definition], backend: Backend) -> NetgenResult<ExclusionPlan> {
    let mut plan = ExclusionPlan::default();
    for def in defs {
        if def.backend == backend {
            continue;
        }
        if let Some(ref driver) = def.matches.driver {
            plan.udev_drivers.insert(driver.clone());
        } else {
            plan.unmanaged.insert(specifier::encode(def)?);
        }
    }
    Ok(plan)
}

/// The NetworkManager backend renderer
#[derive(Debug, Default)]
pub struct NetworkManagerRenderer;

impl NetworkManagerRenderer {
    pub fn new() -> Self {
        Self
    }

    /// Render one keyfile connection for a definition, scoped to one access
    /// point for wifi definitions.
    fn render_connection(
        &self,
        def: &Definition,
        ap: Option<&AccessPoint>,
    ) -> NetgenResult<Artifact> {
        let mut s = String::new();

        s.push_str(&format!("[connection]\nid={}{}", CONNECTION_PREFIX, def.id));
        if let Some(ap) = ap {
            s.push_str(&format!("-{}", ap.ssid));
        }
        s.push_str(&format!("\ntype={}\n", def.kind.type_str()));

        if def.kind.is_physical() {
            // existing devices use matching; driver matching is rejected
            // upstream and MAC matching lives in its own section below, so
            // only names are bound here
            if let Some(ref name) = def.set_name {
                s.push_str(&format!("interface-name={}\n", name));
            } else if !def.matches.is_some() {
                s.push_str(&format!("interface-name={}\n", def.id));
            } else if let Some(ref name) = def.matches.original_name {
                if name.contains(GLOB_CHARS) {
                    return Err(NetgenError::Unsupported {
                        id: def.id.clone(),
                        reason: "NetworkManager definitions do not support name globbing"
                            .to_string(),
                    });
                }
                s.push_str(&format!("interface-name={}\n", name));
            }
            // else: matches on something other than the name, leave it open
        } else {
            // created devices always get a name
            s.push_str(&format!("interface-name={}\n", def.id));
        }

        if let Some(ref bridge) = def.bridge {
            s.push_str(&format!("slave-type=bridge\nmaster={}\n", bridge));
        }

        if def.kind.is_physical() {
            s.push_str(&format!("\n[ethernet]\nwake-on-lan={}\n", def.wake_on_lan as u8));

            if def.set_name.is_none() {
                if let Some(ref mac) = def.matches.mac {
                    // same semantics, different native section names
                    let section = match def.kind {
                        DeviceKind::Ethernet => "802-3-ethernet",
                        DeviceKind::Wifi { .. } => "802-11-wireless",
                        _ => {
                            return Err(NetgenError::Internal(format!(
                                "virtual definition {} carries a MAC match",
                                def.id
                            )))
                        }
                    };
                    s.push_str(&format!("\n[{}]\nmac-address={}\n", section, mac));
                }
            }
        }

        if def.dhcp4 {
            s.push_str("\n[ipv4]\nmethod=auto\n");
        }

        let mut filename = format!("{}{}", CONNECTION_PREFIX, def.id);

        if let Some(ap) = ap {
            filename.push('-');
            filename.push_str(&escape_ssid(&ap.ssid));

            if ap.mode == WifiMode::Ap {
                // the device serves addresses instead of requesting one
                s.push_str("\n[ipv4]\nmethod=shared\n");
            }

            s.push_str(&format!("\n[wifi]\nssid={}\nmode={}\n", ap.ssid, ap.mode.mode_str()));
            if let Some(ref password) = ap.password {
                s.push_str(&format!("\n[wifi-security]\nkey-mgmt=wpa-psk\npsk={}\n", password));
            }
        }

        // connection files may contain secrets; NM insists on tight modes
        Ok(Artifact::new(
            format!("{}/{}", CONNECTION_DIR, filename),
            s,
            MODE_SECRET,
        ))
    }

    /// Aggregate artifacts for an already-computed exclusion plan
    pub fn finish_plan(&self, plan: &ExclusionPlan, total_definitions: usize) -> Vec<Artifact> {
        let mut artifacts = Vec::new();

        if total_definitions == 0 {
            return artifacts;
        }

        // Set all devices we do not manage to unmanaged, so NM does not
        // auto-connect and interfere
        if !plan.unmanaged.is_empty() {
            let mut s = String::from("[keyfile]\n# devices managed by other backends\nunmanaged-devices+=");
            for spec in &plan.unmanaged {
                s.push_str(spec);
                s.push(',');
            }
            artifacts.push(Artifact::new(CONF_D_PATH, s, MODE_WORLD_READABLE));
        }

        if !plan.udev_drivers.is_empty() {
            let mut s = String::new();
            for driver in &plan.udev_drivers {
                s.push_str(&format!(
                    "ACTION==\"add|change\", SUBSYSTEM==\"net\", ENV{{ID_NET_DRIVER}}==\"{}\", ENV{{NM_UNMANAGED}}=\"1\"\n",
                    driver
                ));
            }
            artifacts.push(Artifact::new(UDEV_RULES_PATH, s, MODE_WORLD_READABLE));
        }

        artifacts
    }
}

impl BackendRenderer for NetworkManagerRenderer {
    fn backend(&self) -> Backend {
        Backend::NetworkManager
    }

    fn render(&self, def: &Definition) -> NetgenResult<Vec<Artifact>> {
        if def.backend != Backend::NetworkManager {
            debug!("NetworkManager: definition {} is not for us (backend {})", def.id, def.backend);
            return Ok(Vec::new());
        }

        if def.matches.driver.is_some() && def.set_name.is_none() {
            return Err(NetgenError::Unsupported {
                id: def.id.clone(),
                reason: "NetworkManager definitions do not support matching by driver".to_string(),
            });
        }

        // wifi needs a separate connection file for every SSID
        if let Some(access_points) = def.access_points() {
            if access_points.is_empty() {
                return Err(NetgenError::Internal(format!(
                    "wifi definition {} has no access points",
                    def.id
                )));
            }
            access_points
                .values()
                .map(|ap| self.render_connection(def, Some(ap)))
                .collect()
        } else {
            Ok(vec![self.render_connection(def, None)?])
        }
    }

    fn finish(&self, defs: &[Definition]) -> NetgenResult<Vec<Artifact>> {
        let plan = arbitrate(defs, self.backend())?;
        Ok(self.finish_plan(&plan, defs.len()))
    }
}
