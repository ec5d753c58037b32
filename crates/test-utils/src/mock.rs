use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
};

use alloy_primitives::{Address, B256, U64, U256, hex, keccak256};
use async_trait::async_trait;
use oxie_wallets::{
    Eip1193Provider, ErrorCode, ProviderDetail, ProviderInfo, ProviderRpcError, RequestArguments,
};
use parking_lot::Mutex;
use serde_json::{Value, json};
use tokio::sync::watch;

use crate::ALICE;

/// Returns deterministic announcement metadata for a wallet called `name`.
pub fn wallet_info(name: &str) -> ProviderInfo {
    let slug = name.to_lowercase().replace(' ', "");
    ProviderInfo {
        uuid: format!("{slug}-0000-4000-8000-000000000000"),
        name: name.to_string(),
        icon: "data:image/svg+xml,<svg xmlns=\"http://www.w3.org/2000/svg\"/>".to_string(),
        rdns: format!("io.{slug}"),
    }
}

#[derive(Debug)]
struct MockState {
    accounts: Vec<Address>,
    chain_id: u64,
    known_chains: HashSet<u64>,
    reject_connection: bool,
    reject_switch: bool,
    wrap_errors: bool,
    tx_error: Option<ProviderRpcError>,
    revert: bool,
    mine: bool,
    supply: U256,
    supply_error: bool,
    receipts: HashMap<B256, bool>,
    sent: Vec<Value>,
    calls: Vec<String>,
}

/// A scriptable in-memory wallet.
///
/// It knows its own chain and starts on chain 1. Switching to an unknown chain fails with
/// `4902` until the chain is added. Every successful transaction mints one token.
#[derive(Debug)]
pub struct MockWallet {
    state: Mutex<MockState>,
    /// Transactions block until the gate is open.
    gate: watch::Sender<bool>,
    /// `eth_call` blocks until the gate is open.
    reads: watch::Sender<bool>,
}

impl Default for MockWallet {
    fn default() -> Self {
        Self::new()
    }
}

impl MockWallet {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(MockState {
                accounts: vec![ALICE],
                chain_id: 1,
                known_chains: HashSet::from([1]),
                reject_connection: false,
                reject_switch: false,
                wrap_errors: false,
                tx_error: None,
                revert: false,
                mine: true,
                supply: U256::ZERO,
                supply_error: false,
                receipts: HashMap::new(),
                sent: Vec::new(),
                calls: Vec::new(),
            }),
            gate: watch::Sender::new(true),
            reads: watch::Sender::new(true),
        }
    }

    pub fn with_accounts(self, accounts: Vec<Address>) -> Self {
        self.state.lock().accounts = accounts;
        self
    }

    /// Starts the wallet on `chain_id`, which it then knows.
    pub fn on_chain(self, chain_id: u64) -> Self {
        {
            let mut state = self.state.lock();
            state.chain_id = chain_id;
            state.known_chains.insert(chain_id);
        }
        self
    }

    pub fn knowing_chain(self, chain_id: u64) -> Self {
        self.state.lock().known_chains.insert(chain_id);
        self
    }

    pub fn rejecting_connection(self) -> Self {
        self.state.lock().reject_connection = true;
        self
    }

    pub fn rejecting_switch(self) -> Self {
        self.state.lock().reject_switch = true;
        self
    }

    /// Reports wallet errors wrapped in a generic internal error, like MetaMask mobile does.
    pub fn wrapping_errors(self) -> Self {
        self.state.lock().wrap_errors = true;
        self
    }

    pub fn rejecting_transactions(self) -> Self {
        self.failing_transactions(ProviderRpcError::user_rejected())
    }

    pub fn failing_transactions(self, err: ProviderRpcError) -> Self {
        self.state.lock().tx_error = Some(err);
        self
    }

    /// Mines transactions with a failed status.
    pub fn reverting(self) -> Self {
        self.state.lock().revert = true;
        self
    }

    /// Accepts transactions but never mines them.
    pub fn never_mining(self) -> Self {
        self.state.lock().mine = false;
        self
    }

    pub fn with_supply(self, supply: U256) -> Self {
        self.state.lock().supply = supply;
        self
    }

    /// Holds transactions until [`MockWallet::release`] is called.
    pub fn gated(self) -> Self {
        self.gate.send_replace(false);
        self
    }

    /// Lets held transactions through.
    pub fn release(&self) {
        self.gate.send_replace(true);
    }

    /// Holds `eth_call` requests until [`MockWallet::release_reads`] is called.
    pub fn hold_reads(&self) {
        self.reads.send_replace(false);
    }

    pub fn release_reads(&self) {
        self.reads.send_replace(true);
    }

    /// Wraps the wallet in a [`ProviderDetail`] announced as `name`.
    pub fn detail(self: &Arc<Self>, name: &str) -> ProviderDetail {
        ProviderDetail::new(wallet_info(name), self.clone())
    }

    pub fn chain_id(&self) -> u64 {
        self.state.lock().chain_id
    }

    pub fn supply(&self) -> U256 {
        self.state.lock().supply
    }

    pub fn set_supply(&self, supply: U256) {
        self.state.lock().supply = supply;
    }

    /// Makes `totalSupply` calls fail.
    pub fn fail_supply(&self, fail: bool) {
        self.state.lock().supply_error = fail;
    }

    /// The methods called so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.state.lock().calls.clone()
    }

    pub fn call_count(&self, method: &str) -> usize {
        self.state.lock().calls.iter().filter(|call| *call == method).count()
    }

    /// The transactions submitted through `eth_sendTransaction`.
    pub fn sent_transactions(&self) -> Vec<Value> {
        self.state.lock().sent.clone()
    }

    fn wallet_error(state: &MockState, err: ProviderRpcError) -> ProviderRpcError {
        if !state.wrap_errors {
            return err;
        }
        ProviderRpcError::internal_error_with("Internal JSON-RPC error.")
            .with_data(json!({ "originalError": { "code": err.code, "message": err.message } }))
    }

    fn chain_param(params: Option<&Value>) -> Result<u64, ProviderRpcError> {
        params
            .and_then(|params| params.get(0))
            .and_then(|param| param.get("chainId"))
            .and_then(|id| serde_json::from_value::<U64>(id.clone()).ok())
            .map(|id| id.to::<u64>())
            .ok_or_else(|| ProviderRpcError::new(ErrorCode::InvalidParams))
    }

    async fn send_transaction(&self, params: Option<Value>) -> Result<Value, ProviderRpcError> {
        let mut gate = self.gate.subscribe();
        let _ = gate.wait_for(|open| *open).await;

        let mut state = self.state.lock();
        if let Some(err) = state.tx_error.clone() {
            return Err(Self::wallet_error(&state, err));
        }

        let tx = params.and_then(|params| params.get(0).cloned()).unwrap_or(Value::Null);
        state.sent.push(tx);
        let hash = keccak256(U256::from(state.sent.len()).to_be_bytes::<32>());
        let success = !state.revert;
        if state.mine {
            state.receipts.insert(hash, success);
        }
        if success {
            state.supply += U256::from(1);
        }
        Ok(json!(hash))
    }
}

#[async_trait]
impl Eip1193Provider for MockWallet {
    async fn request(&self, args: RequestArguments) -> Result<Value, ProviderRpcError> {
        let RequestArguments { method, params } = args;
        trace!(%method, ?params, "mock wallet request");
        self.state.lock().calls.push(method.to_string());

        if method == "eth_sendTransaction" {
            return self.send_transaction(params).await;
        }
        if method == "eth_call" {
            let _ = self.reads.subscribe().wait_for(|open| *open).await;
        }

        let mut state = self.state.lock();
        match method.as_ref() {
            "eth_requestAccounts" if state.reject_connection => {
                Err(Self::wallet_error(&state, ProviderRpcError::user_rejected()))
            }
            "eth_requestAccounts" | "eth_accounts" => Ok(json!(state.accounts)),
            "eth_chainId" => Ok(json!(format!("{:#x}", state.chain_id))),
            "wallet_switchEthereumChain" => {
                if state.reject_switch {
                    return Err(Self::wallet_error(&state, ProviderRpcError::user_rejected()));
                }
                let chain_id = Self::chain_param(params.as_ref())?;
                if !state.known_chains.contains(&chain_id) {
                    return Err(Self::wallet_error(&state, ProviderRpcError::unrecognized_chain()));
                }
                state.chain_id = chain_id;
                Ok(Value::Null)
            }
            "wallet_addEthereumChain" => {
                if state.reject_switch {
                    return Err(Self::wallet_error(&state, ProviderRpcError::user_rejected()));
                }
                let chain_id = Self::chain_param(params.as_ref())?;
                state.known_chains.insert(chain_id);
                state.chain_id = chain_id;
                Ok(Value::Null)
            }
            "eth_call" => {
                if state.supply_error {
                    return Err(ProviderRpcError::with_message(
                        ErrorCode::Other(-32000),
                        "execution reverted",
                    ));
                }
                Ok(json!(hex::encode_prefixed(state.supply.to_be_bytes::<32>())))
            }
            "eth_getTransactionReceipt" => {
                let hash = params
                    .as_ref()
                    .and_then(|params| params.get(0))
                    .and_then(|hash| serde_json::from_value::<B256>(hash.clone()).ok())
                    .ok_or_else(|| ProviderRpcError::new(ErrorCode::InvalidParams))?;
                Ok(match state.receipts.get(&hash) {
                    Some(success) => json!({
                        "transactionHash": hash,
                        "blockNumber": "0x1",
                        "status": if *success { "0x1" } else { "0x0" },
                    }),
                    None => Value::Null,
                })
            }
            _ => Err(ProviderRpcError::method_not_found()),
        }
    }
}
