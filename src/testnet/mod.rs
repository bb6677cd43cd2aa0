//! Test session and fixtures
//!
//! This module provides the session-scoped simulator, the single event loop
//! shared by a test session, and the fixtures that deploy contracts into it.

pub mod fixtures;
pub mod session;

pub use fixtures::{
    context_with_auth_mocks, deploy_contract, deploy_contract_with_calldata,
    l1_auth_mock_contract, l2_auth_mock_contract, starknet, AuthMockContracts,
};
pub use session::TestSession;

use crate::config::HarnessConfig;
use crate::error::Result;

/// Install the test logger once; later calls are no-ops.
/// An unknown log level is a configuration error.
pub fn init_logging(config: &HarnessConfig) -> Result<()> {
    let level = config.log_level_filter()?;
    let _ = env_logger::builder()
        .filter_level(level)
        .is_test(true)
        .try_init();
    Ok(())
}
