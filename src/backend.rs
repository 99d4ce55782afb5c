//! Backend identifiers and the renderer contract
//!
//! Each definition is owned by exactly one management subsystem. A renderer
//! emits native artifacts for the definitions it owns and, once the whole
//! graph has been seen, the aggregate exclusion artifacts that keep it away
//! from everyone else's hardware.

use crate::artifact::Artifact;
use crate::error::NetgenResult;
use crate::model::Definition;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Network-management subsystem that can own a definition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Backend {
    NetworkManager,
    Networkd,
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Backend::NetworkManager => write!(f, "NetworkManager"),
            Backend::Networkd => write!(f, "networkd"),
        }
    }
}

/// Renderer contract shared by all backends.
///
/// `render` is called once per definition and must be a no-op for foreign
/// backends. `finish` is called exactly once after every definition has been
/// rendered and produces the aggregate exclusion artifacts; it must be
/// deterministic regardless of graph iteration order.
pub trait BackendRenderer {
    /// The backend this renderer serves
    fn backend(&self) -> Backend;

    /// Render artifacts for one definition; empty for foreign backends
    fn render(&self, def: &Definition) -> NetgenResult<Vec<Artifact>>;

    /// Aggregate exclusion artifacts, after the whole graph has been seen
    fn finish(&self, defs: &[Definition]) -> NetgenResult<Vec<Artifact>>;
}
