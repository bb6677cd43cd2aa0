//! Error handling for the harness
//!
//! Every fixture, resolver and simulator operation reports failures through
//! [`HarnessError`] so the test runner sees a setup error instead of a panic.

use std::fmt;
use std::path::PathBuf;

/// Result type alias for harness operations
pub type Result<T> = std::result::Result<T, HarnessError>;

/// Error types for artifact loading, deployment and session management
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HarnessError {
    /// No compiled artifact at the derived path
    ArtifactNotFound { path: PathBuf },
    /// Artifact text is not a valid contract definition
    ArtifactParse { path: PathBuf, reason: String },
    /// Contract name cannot be mapped to an artifact path
    InvalidContractName(String),
    /// The simulator rejected a deployment
    Deployment(String),
    /// The session loop or the simulator could not be created
    SessionInit(String),
    /// No contract registered at the given address
    UnknownContract(String),
    /// The contract ABI has no function with the given name
    UnknownFunction(String),
    /// Value is not a valid field element
    InvalidFelt(String),
    /// Configuration errors
    Config(String),
    /// File I/O errors
    Io(String),
    /// Serialization/deserialization errors
    Serialization(String),
}

impl fmt::Display for HarnessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HarnessError::ArtifactNotFound { path } => {
                write!(f, "Artifact not found: {}", path.display())
            }
            HarnessError::ArtifactParse { path, reason } => {
                write!(f, "Failed to parse artifact {}: {reason}", path.display())
            }
            HarnessError::InvalidContractName(name) => {
                write!(f, "Invalid contract name: {name:?}")
            }
            HarnessError::Deployment(msg) => write!(f, "Deployment error: {msg}"),
            HarnessError::SessionInit(msg) => write!(f, "Session initialization error: {msg}"),
            HarnessError::UnknownContract(addr) => write!(f, "Unknown contract: {addr}"),
            HarnessError::UnknownFunction(name) => write!(f, "Unknown function: {name}"),
            HarnessError::InvalidFelt(value) => write!(f, "Invalid field element: {value}"),
            HarnessError::Config(msg) => write!(f, "Configuration error: {msg}"),
            HarnessError::Io(msg) => write!(f, "I/O error: {msg}"),
            HarnessError::Serialization(msg) => write!(f, "Serialization error: {msg}"),
        }
    }
}

impl std::error::Error for HarnessError {}

impl From<std::io::Error> for HarnessError {
    fn from(err: std::io::Error) -> Self {
        HarnessError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for HarnessError {
    fn from(err: serde_json::Error) -> Self {
        HarnessError::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_names_the_path() {
        let err = HarnessError::ArtifactNotFound {
            path: PathBuf::from("starknet-artifacts/contracts/starknet/Missing.cairo/Missing.json"),
        };
        assert!(err
            .to_string()
            .contains("contracts/starknet/Missing.cairo/Missing.json"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: HarnessError = io.into();
        assert!(matches!(err, HarnessError::Io(msg) if msg.contains("denied")));
    }
}
