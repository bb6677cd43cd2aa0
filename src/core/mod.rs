//! Core simulator types
//!
//! Field elements, parsed contract definitions, deployed contract handles,
//! the simulator seam and the in-memory Starknet state behind it.

pub mod contract;
pub mod contract_definition;
pub mod felt;
pub mod simulator;
pub mod starknet;

pub use contract::DeployedContract;
pub use contract_definition::{
    AbiEntry, AbiEntryKind, ContractDefinition, EntryPoint, EntryPointsByType, Program,
    TypedParameter,
};
pub use felt::{Felt, FIELD_PRIME};
pub use simulator::ChainSimulator;
pub use starknet::Starknet;
