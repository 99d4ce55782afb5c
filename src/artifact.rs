//! Rendered artifacts and the artifact writer
//!
//! An artifact is a relative path, its full text content, and the Unix
//! permission mode it must carry on disk. Rendering produces artifact values;
//! writing them is a separate step so the core stays a pure compiler.

use crate::error::NetgenResult;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Default mode for artifacts without secrets
pub const MODE_WORLD_READABLE: u32 = 0o644;

/// Owner-only mode for artifacts that may embed secrets
pub const MODE_SECRET: u32 = 0o600;

/// One rendered configuration file
#[derive(Debug, Clone, PartialEq)]
pub struct Artifact {
    /// Path relative to the output root
    pub path: PathBuf,
    pub content: String,
    /// Unix permission bits applied to the created file
    pub mode: u32,
}

impl Artifact {
    pub fn new<P: Into<PathBuf>>(path: P, content: String, mode: u32) -> Self {
        Self { path: path.into(), content, mode }
    }
}

/// Write one artifact under an optional root prefix.
///
/// Parent directories are created as needed. The file is created with the
/// artifact's permission mode from the start, so a secret-bearing artifact is
/// never observable with wider permissions, whatever the process umask.
pub fn write_artifact(root: Option<&Path>, artifact: &Artifact) -> NetgenResult<()> {
    let path = match root {
        Some(root) => root.join(&artifact.path),
        None => PathBuf::from("/").join(&artifact.path),
    };

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    debug!("Writing artifact {} (mode {:o})", path.display(), artifact.mode);

    let mut options = fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(artifact.mode);
    }
    let mut file = options.open(&path)?;
    file.write_all(artifact.content.as_bytes())?;
    file.flush()?;

    // An existing file keeps its old mode through OpenOptions; enforce ours
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(&path, fs::Permissions::from_mode(artifact.mode))?;
    }

    Ok(())
}
