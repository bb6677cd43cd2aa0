use crate::core::{ContractDefinition, DeployedContract, Felt};
use crate::error::Result;
use async_trait::async_trait;

/// The narrow surface the harness needs from a chain simulator.
///
/// A session builds exactly one instance through [`ChainSimulator::empty`]
/// and routes every deployment through [`ChainSimulator::deploy`].
#[async_trait]
pub trait ChainSimulator: Send + Sync + Sized + 'static {
    /// Chain state with no accounts, classes, contracts or storage
    async fn empty() -> Result<Self>;

    /// Register and initialise a new contract instance.
    ///
    /// A rejected deployment must leave the state untouched.
    async fn deploy(
        &self,
        constructor_calldata: Vec<Felt>,
        contract_definition: ContractDefinition,
    ) -> Result<DeployedContract>;
}
