//! Error types for netgen

use std::fmt;
use std::io;

#[derive(Debug)]
pub enum NetgenError {
    /// IO error
    Io(io::Error),
    /// The target backend cannot express the requested match semantics
    Unsupported { id: String, reason: String },
    /// Broken invariant from the loader or graph construction; a bug, not bad input
    Internal(String),
    /// Configuration document error
    ConfigError(String),
    /// Parse error
    ParseError(String),
}

impl fmt::Display for NetgenError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NetgenError::Io(e) => write!(f, "IO error: {}", e),
            NetgenError::Unsupported { id, reason } => write!(f, "{}: {}", id, reason),
            NetgenError::Internal(msg) => write!(f, "Internal error: {}", msg),
            NetgenError::ConfigError(msg) => write!(f, "Configuration error: {}", msg),
            NetgenError::ParseError(msg) => write!(f, "Parse error: {}", msg),
        }
    }
}

impl std::error::Error for NetgenError {}

impl From<io::Error> for NetgenError {
    fn from(error: io::Error) -> Self {
        NetgenError::Io(error)
    }
}

impl From<toml::de::Error> for NetgenError {
    fn from(error: toml::de::Error) -> Self {
        NetgenError::ParseError(error.to_string())
    }
}

impl NetgenError {
    /// Exit code the CLI maps this error to
    pub fn exit_code(&self) -> i32 {
        match self {
            NetgenError::Internal(_) => 2,
            _ => 1,
        }
    }
}

pub type NetgenResult<T> = Result<T, NetgenError>;
