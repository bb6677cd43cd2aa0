//! # Starknet Harness - Contract Deployment Fixtures for Tests
//!
//! This crate is what my contract tests stand on: it loads compiled Cairo
//! artifacts, deploys them into an in-process Starknet state, and hands the
//! deployed contracts to test code.
//!
//! ## What It Does
//! - **Session**: one event loop and one simulator per test session, created lazily
//! - **Resolver**: contract name -> artifact path -> parsed definition -> deployment
//! - **Fixtures**: plain async functions that compose the two for a test
//! - **Simulator**: in-memory classes, contracts and storage behind a small trait
//!
//! ## How the Code Is Organized
//! - `core/`: field elements, contract definitions, handles and the simulator
//! - `artifacts/`: the on-disk layout of compiled contracts
//! - `testnet/`: the test session and the fixtures built on it
//! - `config/`: where artifacts live and how loud logging is
//! - `utils/`: hashing helpers
//!
//! Artifacts are expected at
//! `starknet-artifacts/contracts/starknet/<Name>.cairo/<Name>.json`,
//! relative to the directory tests run from.

pub mod artifacts;
pub mod config;
pub mod core;
pub mod error;
pub mod testnet;
pub mod utils;

// Re-export commonly used types for convenience
pub use crate::artifacts::ContractResolver;
pub use crate::config::{HarnessConfig, GLOBAL_CONFIG};
pub use crate::core::{
    AbiEntry, AbiEntryKind, ChainSimulator, ContractDefinition, DeployedContract, Felt, Starknet,
    FIELD_PRIME,
};
pub use crate::error::{HarnessError, Result};
pub use crate::testnet::{fixtures, init_logging, AuthMockContracts, TestSession};
pub use crate::utils::{sha256_digest, sha256_digest_parts};
