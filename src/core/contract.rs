use crate::core::{AbiEntry, AbiEntryKind, Felt};
use crate::error::{HarnessError, Result};

/// Handle to a contract instance registered in a simulator.
///
/// Cloning the handle does not duplicate the contract; it is only an address
/// plus the interface it was deployed with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployedContract {
    address: Felt,
    class_hash: Felt,
    abi: Vec<AbiEntry>,
}

impl DeployedContract {
    pub fn new(address: Felt, class_hash: Felt, abi: Vec<AbiEntry>) -> DeployedContract {
        DeployedContract {
            address,
            class_hash,
            abi,
        }
    }

    pub fn address(&self) -> &Felt {
        &self.address
    }

    pub fn class_hash(&self) -> &Felt {
        &self.class_hash
    }

    pub fn abi(&self) -> &[AbiEntry] {
        &self.abi
    }

    /// Look up an external or L1 handler entry by name
    pub fn function(&self, name: &str) -> Result<&AbiEntry> {
        self.abi
            .iter()
            .find(|entry| {
                matches!(entry.kind, AbiEntryKind::Function | AbiEntryKind::L1Handler)
                    && entry.name == name
            })
            .ok_or_else(|| HarnessError::UnknownFunction(format!("{name} on {}", self.address)))
    }

    pub fn has_function(&self, name: &str) -> bool {
        self.function(name).is_ok()
    }
}
