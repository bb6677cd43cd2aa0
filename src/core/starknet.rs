// This is the in-process chain state the harness deploys into.
// It keeps declared classes and deployed contracts in memory and checks every
// definition before touching state, so a rejected deployment changes nothing.
// It does not run Cairo: constructors are checked against the ABI, not executed.

use crate::core::{ChainSimulator, ContractDefinition, DeployedContract, Felt, FIELD_PRIME};
use crate::error::{HarnessError, Result};
use crate::utils::sha256_digest_parts;
use async_trait::async_trait;
use log::{debug, info, warn};
use num_bigint::BigUint;
use std::collections::HashMap;
use tokio::sync::RwLock;

const CONTRACT_ADDRESS_PREFIX: &[u8] = b"STARKNET_CONTRACT_ADDRESS";

struct ContractState {
    class_hash: Felt,
    storage: HashMap<Felt, Felt>,
}

#[derive(Default)]
struct ChainState {
    classes: HashMap<Felt, ContractDefinition>,
    contracts: HashMap<Felt, ContractState>,
    // Salt for the next deployment, so repeated deploys of one class get new addresses
    next_salt: u64,
}

pub struct Starknet {
    state: RwLock<ChainState>,
}

impl Default for Starknet {
    fn default() -> Self {
        Self::new()
    }
}

impl Starknet {
    pub fn new() -> Starknet {
        Starknet {
            state: RwLock::new(ChainState::default()),
        }
    }

    /// Register a class without deploying it. Declaring the same definition
    /// twice returns the same hash.
    pub async fn declare(&self, contract_definition: ContractDefinition) -> Result<Felt> {
        validate_definition(&contract_definition)?;
        let class_hash = contract_definition.class_hash()?;

        let mut state = self.state.write().await;
        if !state.classes.contains_key(&class_hash) {
            debug!("Declaring class {class_hash}");
            state.classes.insert(class_hash.clone(), contract_definition);
        }
        Ok(class_hash)
    }

    pub async fn is_declared(&self, class_hash: &Felt) -> bool {
        self.state.read().await.classes.contains_key(class_hash)
    }

    pub async fn contract_count(&self) -> usize {
        self.state.read().await.contracts.len()
    }

    pub async fn class_hash_at(&self, address: &Felt) -> Result<Felt> {
        self.state
            .read()
            .await
            .contracts
            .get(address)
            .map(|contract| contract.class_hash.clone())
            .ok_or_else(|| HarnessError::UnknownContract(address.to_string()))
    }

    /// Storage slots that were never written read as zero
    pub async fn get_storage_at(&self, address: &Felt, key: &Felt) -> Result<Felt> {
        let state = self.state.read().await;
        let contract = state
            .contracts
            .get(address)
            .ok_or_else(|| HarnessError::UnknownContract(address.to_string()))?;
        Ok(contract.storage.get(key).cloned().unwrap_or_default())
    }
}

#[async_trait]
impl ChainSimulator for Starknet {
    async fn empty() -> Result<Self> {
        info!("Creating empty Starknet state");
        Ok(Starknet::new())
    }

    async fn deploy(
        &self,
        constructor_calldata: Vec<Felt>,
        contract_definition: ContractDefinition,
    ) -> Result<DeployedContract> {
        validate_definition(&contract_definition)?;
        validate_constructor_calldata(&contract_definition, &constructor_calldata)?;
        let class_hash = contract_definition.class_hash()?;

        // Everything fallible is done; from here on the state update is all-or-nothing
        let mut state = self.state.write().await;
        let salt = state.next_salt;
        let address = contract_address(&class_hash, salt, &constructor_calldata);
        if state.contracts.contains_key(&address) {
            warn!("Address collision at {address}");
            return Err(HarnessError::Deployment(format!(
                "Contract already deployed at {address}"
            )));
        }

        let abi = contract_definition.abi.clone();
        state
            .classes
            .entry(class_hash.clone())
            .or_insert(contract_definition);
        state.contracts.insert(
            address.clone(),
            ContractState {
                class_hash: class_hash.clone(),
                storage: HashMap::new(),
            },
        );
        state.next_salt += 1;

        info!("Deployed contract at {address} (class {class_hash})");
        Ok(DeployedContract::new(address, class_hash, abi))
    }
}

fn validate_definition(contract_definition: &ContractDefinition) -> Result<()> {
    let program = &contract_definition.program;

    // The prime is not itself a felt, so it is parsed as a plain integer
    let prime = program
        .prime
        .trim()
        .strip_prefix("0x")
        .and_then(|digits| BigUint::parse_bytes(digits.as_bytes(), 16));
    if prime.as_ref() != Some(&*FIELD_PRIME) {
        return Err(HarnessError::Deployment(format!(
            "Unsupported program prime: {}",
            program.prime
        )));
    }

    if program.data.is_empty() {
        return Err(HarnessError::Deployment(
            "Invalid bytecode: program data is empty".to_string(),
        ));
    }
    for (i, word) in program.data.iter().enumerate() {
        Felt::parse(word).map_err(|_| {
            HarnessError::Deployment(format!("Invalid bytecode: word {i} is {word:?}"))
        })?;
    }

    for entry_point in contract_definition.entry_points_by_type.iter() {
        Felt::parse(&entry_point.selector).map_err(|_| {
            HarnessError::Deployment(format!(
                "Invalid entry point selector: {}",
                entry_point.selector
            ))
        })?;
        Felt::parse(&entry_point.offset).map_err(|_| {
            HarnessError::Deployment(format!(
                "Invalid entry point offset: {}",
                entry_point.offset
            ))
        })?;
    }

    Ok(())
}

fn validate_constructor_calldata(
    contract_definition: &ContractDefinition,
    calldata: &[Felt],
) -> Result<()> {
    let Some(constructor) = contract_definition.constructor() else {
        if calldata.is_empty() {
            return Ok(());
        }
        return Err(HarnessError::Deployment(format!(
            "Constructor mismatch: contract has no constructor but got {} calldata words",
            calldata.len()
        )));
    };

    let expected = constructor.inputs.len();
    let has_array = constructor.inputs.iter().any(|input| input.is_array());
    // Arrays contribute their elements, so only the scalar count is a lower bound
    let scalar = constructor
        .inputs
        .iter()
        .filter(|input| !input.is_array())
        .count();

    let fits = if has_array {
        calldata.len() >= scalar
    } else {
        calldata.len() == expected
    };
    if !fits {
        return Err(HarnessError::Deployment(format!(
            "Constructor mismatch: expected {expected} inputs, got {} calldata words",
            calldata.len()
        )));
    }
    Ok(())
}

fn contract_address(class_hash: &Felt, salt: u64, calldata: &[Felt]) -> Felt {
    let calldata_bytes: Vec<u8> = calldata
        .iter()
        .flat_map(|felt| felt.to_bytes_be())
        .collect();
    let digest = sha256_digest_parts(&[
        CONTRACT_ADDRESS_PREFIX,
        &class_hash.to_bytes_be(),
        &salt.to_be_bytes(),
        &calldata_bytes,
    ]);
    Felt::from_digest(&digest)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn definition(abi: &str, data: &str) -> ContractDefinition {
        ContractDefinition::loads(&format!(
            r#"{{
                "abi": {abi},
                "entry_points_by_type": {{
                    "CONSTRUCTOR": [], "EXTERNAL": [{{"offset": "0x0", "selector": "0x1"}}], "L1_HANDLER": []
                }},
                "program": {{
                    "prime": "0x800000000000011000000000000000000000000000000000000000000000001",
                    "data": {data},
                    "builtins": []
                }}
            }}"#
        ))
        .unwrap()
    }

    fn plain() -> ContractDefinition {
        definition(
            r#"[{"type": "function", "name": "execute", "inputs": [], "outputs": []}]"#,
            r#"["0x208b7fff7fff7ffe"]"#,
        )
    }

    fn with_constructor(inputs: &str) -> ContractDefinition {
        definition(
            &format!(r#"[{{"type": "constructor", "name": "constructor", "inputs": {inputs}, "outputs": []}}]"#),
            r#"["0x208b7fff7fff7ffe"]"#,
        )
    }

    #[tokio::test]
    async fn test_empty_has_no_contracts() {
        let starknet = Starknet::empty().await.unwrap();
        assert_eq!(starknet.contract_count().await, 0);
    }

    #[tokio::test]
    async fn test_deploy_registers_contract() {
        let starknet = Starknet::empty().await.unwrap();
        let contract = starknet.deploy(vec![], plain()).await.unwrap();

        assert_eq!(starknet.contract_count().await, 1);
        assert!(starknet.is_declared(contract.class_hash()).await);
        assert_eq!(
            &starknet.class_hash_at(contract.address()).await.unwrap(),
            contract.class_hash()
        );
        assert!(contract.has_function("execute"));
        assert!(starknet
            .get_storage_at(contract.address(), &Felt::from(1))
            .await
            .unwrap()
            .is_zero());
    }

    #[tokio::test]
    async fn test_same_class_gets_distinct_addresses() {
        let starknet = Starknet::empty().await.unwrap();
        let first = starknet.deploy(vec![], plain()).await.unwrap();
        let second = starknet.deploy(vec![], plain()).await.unwrap();

        assert_ne!(first.address(), second.address());
        assert_eq!(first.class_hash(), second.class_hash());
        assert_eq!(starknet.contract_count().await, 2);
    }

    #[tokio::test]
    async fn test_rejected_deploy_leaves_state_unchanged() {
        let starknet = Starknet::empty().await.unwrap();
        let broken = definition("[]", "[]");

        let err = starknet.deploy(vec![], broken).await.unwrap_err();
        assert!(matches!(err, HarnessError::Deployment(msg) if msg.contains("Invalid bytecode")));
        assert_eq!(starknet.contract_count().await, 0);

        // Salt was not consumed either
        let a = starknet.deploy(vec![], plain()).await.unwrap();
        let fresh = Starknet::empty().await.unwrap();
        let b = fresh.deploy(vec![], plain()).await.unwrap();
        assert_eq!(a.address(), b.address());
    }

    #[tokio::test]
    async fn test_rejects_bad_words_and_prime() {
        let starknet = Starknet::empty().await.unwrap();
        let bad_word = definition("[]", r#"["0xnope"]"#);
        assert!(starknet.deploy(vec![], bad_word).await.is_err());

        let mut wrong_prime = plain();
        wrong_prime.program.prime = "0x7".to_string();
        let err = starknet.deploy(vec![], wrong_prime).await.unwrap_err();
        assert!(matches!(err, HarnessError::Deployment(msg) if msg.contains("prime")));

        // The prime must carry exactly one 0x prefix
        let prime_hex = format!("{:x}", *FIELD_PRIME);
        for written in [format!("0x0x{prime_hex}"), prime_hex] {
            let mut def = plain();
            def.program.prime = written;
            assert!(starknet.deploy(vec![], def).await.is_err());
        }
        assert_eq!(starknet.contract_count().await, 0);
    }

    #[tokio::test]
    async fn test_constructor_calldata_checks() {
        let starknet = Starknet::empty().await.unwrap();

        let err = starknet
            .deploy(vec![Felt::from(1)], plain())
            .await
            .unwrap_err();
        assert!(matches!(err, HarnessError::Deployment(msg) if msg.contains("Constructor mismatch")));

        let two = with_constructor(r#"[{"name": "a", "type": "felt"}, {"name": "b", "type": "felt"}]"#);
        assert!(starknet.deploy(vec![], two.clone()).await.is_err());
        assert!(starknet
            .deploy(vec![Felt::from(1), Felt::from(2)], two)
            .await
            .is_ok());

        let array = with_constructor(
            r#"[{"name": "list_len", "type": "felt"}, {"name": "list", "type": "felt*"}]"#,
        );
        assert!(starknet.deploy(vec![], array.clone()).await.is_err());
        assert!(starknet
            .deploy(vec![Felt::from(3), Felt::from(1), Felt::from(2), Felt::from(3)], array)
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_declare_is_idempotent() {
        let starknet = Starknet::empty().await.unwrap();
        let first = starknet.declare(plain()).await.unwrap();
        let second = starknet.declare(plain()).await.unwrap();
        assert_eq!(first, second);
        assert!(starknet.is_declared(&first).await);
        assert_eq!(starknet.contract_count().await, 0);
    }

    #[tokio::test]
    async fn test_unknown_address_lookups_fail() {
        let starknet = Starknet::empty().await.unwrap();
        assert!(matches!(
            starknet.class_hash_at(&Felt::from(1)).await,
            Err(HarnessError::UnknownContract(_))
        ));
        assert!(starknet
            .get_storage_at(&Felt::from(1), &Felt::zero())
            .await
            .is_err());
    }
}
