//! Compilation driver
//!
//! Runs one backend renderer over the whole definition graph: per-definition
//! artifacts are written as they are produced, the aggregate exclusion
//! artifacts only after every definition has been seen.

use crate::artifact::write_artifact;
use crate::backend::BackendRenderer;
use crate::error::NetgenResult;
use crate::model::Definition;
use serde::Serialize;
use std::path::Path;
use tracing::info;

/// What a run produced, for CLI reporting
#[derive(Debug, Clone, Default, Serialize)]
pub struct GenerateSummary {
    pub connection_files: usize,
    pub exclusion_files: usize,
}

/// Compile the definition graph and write all artifacts under `root`.
///
/// `root` sandboxes the output tree; `None` writes under the real filesystem
/// root. Fails fast on the first error; a partially written tree is never
/// reported as success.
pub fn generate(
    defs: &[Definition],
    renderer: &dyn BackendRenderer,
    root: Option<&Path>,
) -> NetgenResult<GenerateSummary> {
    let mut summary = GenerateSummary::default();

    for def in defs {
        for artifact in renderer.render(def)? {
            write_artifact(root, &artifact)?;
            summary.connection_files += 1;
        }
    }

    for artifact in renderer.finish(defs)? {
        write_artifact(root, &artifact)?;
        summary.exclusion_files += 1;
    }

    info!(
        "Generated {} connection file(s) and {} exclusion file(s) for {}",
        summary.connection_files,
        summary.exclusion_files,
        renderer.backend()
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::Backend;
    use crate::model::{DeviceKind, MatchSpec};
    use crate::network_manager::NetworkManagerRenderer;
    use std::fs;
    use tempfile::TempDir;

    fn def(id: &str, backend: Backend) -> Definition {
        Definition {
            id: id.to_string(),
            kind: DeviceKind::Ethernet,
            matches: MatchSpec::default(),
            set_name: None,
            backend,
            bridge: None,
            dhcp4: true,
            wake_on_lan: false,
        }
    }

    #[test]
    fn test_generate_writes_connections_and_exclusions() {
        let root = TempDir::new().unwrap();
        let defs = vec![
            def("eth0", Backend::NetworkManager),
            def("eth1", Backend::Networkd),
        ];

        let summary =
            generate(&defs, &NetworkManagerRenderer::new(), Some(root.path())).unwrap();
        assert_eq!(summary.connection_files, 1);
        assert_eq!(summary.exclusion_files, 1);

        assert!(root
            .path()
            .join("run/NetworkManager/system-connections/netgen-eth0")
            .exists());
        let conf = fs::read_to_string(root.path().join("run/NetworkManager/conf.d/netgen.conf"))
            .unwrap();
        assert!(conf.contains("type:ethernet"));
    }

    #[test]
    fn test_generate_twice_is_byte_identical() {
        let root = TempDir::new().unwrap();
        let defs = vec![
            def("eth0", Backend::NetworkManager),
            def("eth1", Backend::Networkd),
        ];

        let renderer = NetworkManagerRenderer::new();
        generate(&defs, &renderer, Some(root.path())).unwrap();
        let first = fs::read_to_string(
            root.path().join("run/NetworkManager/system-connections/netgen-eth0"),
        )
        .unwrap();
        let first_conf =
            fs::read_to_string(root.path().join("run/NetworkManager/conf.d/netgen.conf")).unwrap();

        generate(&defs, &renderer, Some(root.path())).unwrap();
        let second = fs::read_to_string(
            root.path().join("run/NetworkManager/system-connections/netgen-eth0"),
        )
        .unwrap();
        let second_conf =
            fs::read_to_string(root.path().join("run/NetworkManager/conf.d/netgen.conf")).unwrap();

        assert_eq!(first, second);
        assert_eq!(first_conf, second_conf);
    }

    #[test]
    fn test_generate_empty_graph_writes_nothing() {
        let root = TempDir::new().unwrap();
        let summary = generate(&[], &NetworkManagerRenderer::new(), Some(root.path())).unwrap();
        assert_eq!(summary.connection_files, 0);
        assert_eq!(summary.exclusion_files, 0);
        assert!(!root.path().join("run").exists());
    }

    #[test]
    fn test_generate_fails_without_writing_bad_definition() {
        let root = TempDir::new().unwrap();
        let mut bad = def("globbed", Backend::NetworkManager);
        bad.matches.original_name = Some("eth*".to_string());

        let result = generate(&[bad], &NetworkManagerRenderer::new(), Some(root.path()));
        assert!(result.is_err());
        assert!(!root
            .path()
            .join("run/NetworkManager/system-connections/netgen-globbed")
            .exists());
    }
}
