// The resolver turns a logical contract name into a deployed contract.
// Artifacts are read fresh on every request: no caching between tests,
// so a rebuilt artifact is picked up by the next deployment.

use crate::config::HarnessConfig;
use crate::core::{ChainSimulator, ContractDefinition, DeployedContract, Felt};
use crate::error::{HarnessError, Result};
use log::{debug, error, info, warn};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

const CONTRACTS_DIR: &str = "contracts";
const SOURCE_EXTENSION: &str = "cairo";
const ARTIFACT_EXTENSION: &str = "json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractResolver {
    artifacts_dir: PathBuf,
    namespace: String,
}

impl ContractResolver {
    pub fn new(artifacts_dir: impl Into<PathBuf>, namespace: impl Into<String>) -> ContractResolver {
        ContractResolver {
            artifacts_dir: artifacts_dir.into(),
            namespace: namespace.into(),
        }
    }

    pub fn from_config(config: &HarnessConfig) -> ContractResolver {
        Self::new(config.get_artifacts_dir(), config.get_namespace())
    }

    pub fn artifacts_dir(&self) -> &Path {
        &self.artifacts_dir
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// `<artifacts_dir>/contracts/<namespace>`
    pub fn contracts_dir(&self) -> PathBuf {
        self.artifacts_dir.join(CONTRACTS_DIR).join(&self.namespace)
    }

    /// `<artifacts_dir>/contracts/<namespace>/<name>.cairo/<name>.json`
    pub fn artifact_path(&self, contract_name: &str) -> Result<PathBuf> {
        validate_contract_name(contract_name)?;
        Ok(self
            .contracts_dir()
            .join(format!("{contract_name}.{SOURCE_EXTENSION}"))
            .join(format!("{contract_name}.{ARTIFACT_EXTENSION}")))
    }

    /// Locate, read and parse an artifact without deploying it
    pub fn load_definition(&self, contract_name: &str) -> Result<ContractDefinition> {
        let path = self.artifact_path(contract_name)?;
        debug!("Loading artifact {}", path.display());

        // Artifacts are small local files, a blocking read is fine here
        let text = fs::read_to_string(&path).map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                HarnessError::ArtifactNotFound { path: path.clone() }
            } else {
                HarnessError::Io(format!("Failed to read {}: {e}", path.display()))
            }
        })?;

        ContractDefinition::loads(&text).map_err(|e| {
            let reason = match e {
                HarnessError::Serialization(msg) => msg,
                other => other.to_string(),
            };
            HarnessError::ArtifactParse { path, reason }
        })
    }

    /// Deploy `contract_name` with no constructor arguments
    pub async fn deploy<S: ChainSimulator>(
        &self,
        simulator: &S,
        contract_name: &str,
    ) -> Result<DeployedContract> {
        self.deploy_with_calldata(simulator, contract_name, Vec::new())
            .await
    }

    pub async fn deploy_with_calldata<S: ChainSimulator>(
        &self,
        simulator: &S,
        contract_name: &str,
        constructor_calldata: Vec<Felt>,
    ) -> Result<DeployedContract> {
        let contract_definition = self.load_definition(contract_name).map_err(|e| {
            error!("Cannot deploy {contract_name}: {e}");
            e
        })?;

        let contract = simulator
            .deploy(constructor_calldata, contract_definition)
            .await?;
        info!("Deployed {contract_name} at {}", contract.address());
        Ok(contract)
    }

    /// Names of every contract with an artifact under the namespace, sorted
    pub fn available_contracts(&self) -> Result<Vec<String>> {
        let dir = self.contracts_dir();
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                warn!("No artifacts directory at {}", dir.display());
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry?;
            let file_name = entry.file_name();
            let Some(name) = file_name
                .to_str()
                .and_then(|n| n.strip_suffix(&format!(".{SOURCE_EXTENSION}")))
            else {
                continue;
            };
            if self.artifact_path(name).map(|p| p.is_file()).unwrap_or(false) {
                names.push(name.to_string());
            }
        }
        names.sort();
        Ok(names)
    }
}

fn validate_contract_name(contract_name: &str) -> Result<()> {
    let invalid = contract_name.trim().is_empty()
        || contract_name == "."
        || contract_name == ".."
        || contract_name.contains(|c: char| c == '/' || c == '\\');
    if invalid {
        return Err(HarnessError::InvalidContractName(contract_name.to_string()));
    }
    Ok(())
}
