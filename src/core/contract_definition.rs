//! Parsed form of a compiled Cairo artifact
//!
//! Only the parts the simulator validates are typed; the rest of the
//! compiler output (identifiers, hints, debug info) is carried opaquely.

use crate::core::Felt;
use crate::error::{HarnessError, Result};
use crate::utils::sha256_digest;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AbiEntryKind {
    Function,
    Constructor,
    L1Handler,
    Event,
    Struct,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypedParameter {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
}

impl TypedParameter {
    /// `felt*` style parameters take a variable number of calldata words
    pub fn is_array(&self) -> bool {
        self.ty.ends_with('*')
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbiEntry {
    #[serde(rename = "type")]
    pub kind: AbiEntryKind,
    pub name: String,
    #[serde(default)]
    pub inputs: Vec<TypedParameter>,
    #[serde(default)]
    pub outputs: Vec<TypedParameter>,
    #[serde(
        rename = "stateMutability",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub state_mutability: Option<String>,
}

impl AbiEntry {
    pub fn is_view(&self) -> bool {
        self.state_mutability.as_deref() == Some("view")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryPoint {
    pub selector: String,
    pub offset: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryPointsByType {
    #[serde(rename = "CONSTRUCTOR", default)]
    pub constructor: Vec<EntryPoint>,
    #[serde(rename = "EXTERNAL", default)]
    pub external: Vec<EntryPoint>,
    #[serde(rename = "L1_HANDLER", default)]
    pub l1_handler: Vec<EntryPoint>,
}

impl EntryPointsByType {
    pub fn iter(&self) -> impl Iterator<Item = &EntryPoint> {
        self.constructor
            .iter()
            .chain(self.external.iter())
            .chain(self.l1_handler.iter())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Program {
    pub prime: String,
    pub data: Vec<String>,
    #[serde(default)]
    pub builtins: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractDefinition {
    pub abi: Vec<AbiEntry>,
    pub entry_points_by_type: EntryPointsByType,
    pub program: Program,
}

impl ContractDefinition {
    /// Parse artifact JSON text
    pub fn loads(text: &str) -> Result<ContractDefinition> {
        serde_json::from_str(text).map_err(|e| {
            HarnessError::Serialization(format!("Invalid contract definition: {e}"))
        })
    }

    pub fn dumps(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Deterministic identifier for this definition.
    ///
    /// SHA-256 of the canonical JSON form, truncated into the field. Object
    /// keys serialize in sorted order, so key order in the artifact does not
    /// matter.
    pub fn class_hash(&self) -> Result<Felt> {
        let canonical = serde_json::to_vec(self)?;
        Ok(Felt::from_digest(&sha256_digest(&canonical)))
    }

    pub fn abi(&self) -> &[AbiEntry] {
        &self.abi
    }

    pub fn constructor(&self) -> Option<&AbiEntry> {
        self.abi
            .iter()
            .find(|entry| entry.kind == AbiEntryKind::Constructor)
    }

    pub fn function(&self, name: &str) -> Option<&AbiEntry> {
        self.abi.iter().find(|entry| {
            matches!(entry.kind, AbiEntryKind::Function | AbiEntryKind::L1Handler)
                && entry.name == name
        })
    }
}
