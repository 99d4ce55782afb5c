//! Definition document loading and validation
//!
//! Parses the backend-agnostic TOML description of the device graph and
//! produces validated `Definition` values. Everything the renderers rely on
//! as a precondition is checked here: unique ids, access points only on wifi
//! definitions, resolvable bridge references, well-formed MAC addresses.
//! Backend-specific expressiveness limits (driver matching, glob names) are
//! deliberately not checked here; they belong to the renderer that cannot
//! express them.

use crate::backend::Backend;
use crate::error::{NetgenError, NetgenResult};
use crate::model::{AccessPoint, Definition, DeviceKind, MatchSpec};
use crate::validation;
use serde::Deserialize;
use std::collections::{BTreeMap, HashSet};
use std::path::Path;
use tracing::info;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawDocument {
    #[serde(default, rename = "definition")]
    definitions: Vec<RawDefinition>,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case")]
enum RawKind {
    Ethernet,
    Wifi,
    Bridge,
    Bond,
    Vlan,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
struct RawDefinition {
    id: String,
    #[serde(rename = "type")]
    kind: RawKind,
    #[serde(default, rename = "match")]
    matches: MatchSpec,
    set_name: Option<String>,
    #[serde(default = "default_backend")]
    backend: Backend,
    bridge: Option<String>,
    #[serde(default)]
    dhcp4: bool,
    #[serde(default)]
    wake_on_lan: bool,
    #[serde(default)]
    access_points: Vec<AccessPoint>,
}

fn default_backend() -> Backend {
    Backend::NetworkManager
}

/// Load and validate a definition document from a TOML file
pub fn load_document<P: AsRef<Path>>(path: P) -> NetgenResult<Vec<Definition>> {
    let path = path.as_ref();
    info!("Loading definitions from: {}", path.display());

    let contents = std::fs::read_to_string(path)?;
    parse_document(&contents)
}

/// Parse and validate a definition document
pub fn parse_document(contents: &str) -> NetgenResult<Vec<Definition>> {
    let raw: RawDocument = toml::from_str(contents)?;

    let mut seen = HashSet::new();
    let mut defs = Vec::with_capacity(raw.definitions.len());
    for raw_def in raw.definitions {
        if !seen.insert(raw_def.id.clone()) {
            return Err(NetgenError::ConfigError(format!(
                "Duplicate definition id '{}'",
                raw_def.id
            )));
        }
        defs.push(convert(raw_def)?);
    }

    resolve_bridges(&defs)?;
    Ok(defs)
}

fn convert(raw: RawDefinition) -> NetgenResult<Definition> {
    validation::validate_interface_name(&raw.id)?;
    if let Some(ref name) = raw.set_name {
        validation::validate_interface_name(name)?;
    }
    if let Some(ref mac) = raw.matches.mac {
        validation::validate_mac_address(mac)?;
    }
    // matches.name may contain glob characters; only renderers that cannot
    // express globs reject it

    if raw.kind != RawKind::Wifi && !raw.access_points.is_empty() {
        return Err(NetgenError::ConfigError(format!(
            "Definition '{}' is not wifi and cannot have access points",
            raw.id
        )));
    }

    let kind = match raw.kind {
        RawKind::Ethernet => DeviceKind::Ethernet,
        RawKind::Wifi => {
            if raw.access_points.is_empty() {
                return Err(NetgenError::ConfigError(format!(
                    "Wifi definition '{}' needs at least one access point",
                    raw.id
                )));
            }
            let mut access_points = BTreeMap::new();
            for ap in raw.access_points {
                validation::validate_ssid(&ap.ssid)?;
                if access_points.insert(ap.ssid.clone(), ap).is_some() {
                    return Err(NetgenError::ConfigError(format!(
                        "Wifi definition '{}' lists an SSID twice",
                        raw.id
                    )));
                }
            }
            DeviceKind::Wifi { access_points }
        }
        RawKind::Bridge => DeviceKind::Bridge,
        RawKind::Bond => DeviceKind::Bond,
        RawKind::Vlan => DeviceKind::Vlan,
    };

    if !kind.is_physical() && raw.matches.is_some() {
        return Err(NetgenError::ConfigError(format!(
            "Virtual definition '{}' cannot match existing hardware",
            raw.id
        )));
    }

    Ok(Definition {
        id: raw.id,
        kind,
        matches: raw.matches,
        set_name: raw.set_name,
        backend: raw.backend,
        bridge: raw.bridge,
        dhcp4: raw.dhcp4,
        wake_on_lan: raw.wake_on_lan,
    })
}

/// Every bridge back-reference must name an existing bridge definition
fn resolve_bridges(defs: &[Definition]) -> NetgenResult<()> {
    for def in defs {
        if let Some(ref bridge) = def.bridge {
            let parent = defs.iter().find(|d| &d.id == bridge);
            match parent {
                Some(parent) if parent.kind == DeviceKind::Bridge => {}
                Some(_) => {
                    return Err(NetgenError::ConfigError(format!(
                        "Definition '{}' references '{}' as bridge, but it is not one",
                        def.id, bridge
                    )))
                }
                None => {
                    return Err(NetgenError::ConfigError(format!(
                        "Definition '{}' references unknown bridge '{}'",
                        def.id, bridge
                    )))
                }
            }
        }
    }
    Ok(())
}
