//! Fixtures for contract tests
//!
//! Each fixture is an async function over a [`TestSession`]. A test composes
//! the ones it needs and runs them on the session loop:
//!
//! ```no_run
//! use starknet_harness::testnet::{fixtures, TestSession};
//!
//! let session = TestSession::global().unwrap();
//! let contracts = session
//!     .block_on(fixtures::context_with_auth_mocks(session))
//!     .unwrap();
//! assert_ne!(contracts.l1.address(), contracts.l2.address());
//! ```

use crate::core::{ChainSimulator, DeployedContract, Felt};
use crate::error::Result;
use crate::testnet::TestSession;
use std::sync::Arc;

pub const L1_AUTH_MOCK: &str = "L1AuthMock";
pub const L2_AUTH_MOCK: &str = "L2AuthMock";

/// The session's shared simulator
pub async fn starknet<S: ChainSimulator>(session: &TestSession<S>) -> Result<Arc<S>> {
    session.simulator().await
}

/// Deploy `contract_name` from its compiled artifact with empty calldata
pub async fn deploy_contract<S: ChainSimulator>(
    session: &TestSession<S>,
    contract_name: &str,
) -> Result<DeployedContract> {
    let simulator = starknet(session).await?;
    session
        .resolver()
        .deploy(simulator.as_ref(), contract_name)
        .await
}

pub async fn deploy_contract_with_calldata<S: ChainSimulator>(
    session: &TestSession<S>,
    contract_name: &str,
    constructor_calldata: Vec<Felt>,
) -> Result<DeployedContract> {
    let simulator = starknet(session).await?;
    session
        .resolver()
        .deploy_with_calldata(simulator.as_ref(), contract_name, constructor_calldata)
        .await
}

pub async fn l1_auth_mock_contract<S: ChainSimulator>(
    session: &TestSession<S>,
) -> Result<DeployedContract> {
    deploy_contract(session, L1_AUTH_MOCK).await
}

pub async fn l2_auth_mock_contract<S: ChainSimulator>(
    session: &TestSession<S>,
) -> Result<DeployedContract> {
    deploy_contract(session, L2_AUTH_MOCK).await
}

#[derive(Debug, Clone)]
pub struct AuthMockContracts {
    pub l1: DeployedContract,
    pub l2: DeployedContract,
}

/// Both auth mocks, deployed one after the other into the same simulator
pub async fn context_with_auth_mocks<S: ChainSimulator>(
    session: &TestSession<S>,
) -> Result<AuthMockContracts> {
    let l1 = l1_auth_mock_contract(session).await?;
    let l2 = l2_auth_mock_contract(session).await?;
    Ok(AuthMockContracts { l1, l2 })
}
