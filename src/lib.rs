//! netgen - Network Configuration Compiler
//!
//! Offline, deterministic compiler from a backend-agnostic description of
//! network devices to the native artifacts of a network-management backend:
//! - One keyfile connection per owned definition (per SSID for wifi)
//! - One aggregate unmanaged-devices stanza excluding foreign definitions
//! - One aggregate udev rules file for driver-matched foreign definitions
//!
//! The NetworkManager backend ships here; sibling backends implement the same
//! `BackendRenderer` contract.

pub mod error;
pub mod validation;
pub mod model;
pub mod config;
pub mod specifier;
pub mod artifact;
pub mod backend;
pub mod network_manager;
pub mod generator;

// Re-export commonly used types
pub use error::{NetgenError, NetgenResult};
pub use model::{AccessPoint, Definition, DeviceKind, MatchSpec, WifiMode};
pub use artifact::{Artifact, write_artifact};
pub use backend::{Backend, BackendRenderer};
pub use network_manager::{ExclusionPlan, NetworkManagerRenderer, arbitrate};
pub use generator::{GenerateSummary, generate};
