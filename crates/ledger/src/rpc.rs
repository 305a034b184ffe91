//! JSON-RPC implementation of [`Ledger`] over an alloy provider.
//!
//! Talks to a node that holds the signing keys for the configured
//! accounts (`eth_sendTransaction`), so no key material passes through
//! this process. Writes block until the receipt is available; there is no
//! timeout, a stalled node stalls the caller.

use std::collections::BTreeMap;
use std::path::PathBuf;

use alloy::network::TransactionBuilder;
use alloy::primitives::Bytes;
use alloy::providers::{DynProvider, Provider, ProviderBuilder};
use alloy::rpc::client::RpcClient;
use alloy::rpc::types::{TransactionReceipt, TransactionRequest};
use alloy::sol_types::SolCall;
use alloy::transports::http::reqwest::Url;
use serde::Deserialize;

use marginctl_core::network::{Network, NetworkConfig};
use marginctl_core::types::Address;

use crate::ledger::{Ledger, LedgerError, Receipt};

/// Ledger client for one network's JSON-RPC endpoint.
#[derive(Debug)]
pub struct RpcLedger {
    provider: DynProvider,
    rpc_url: Url,
    network: Network,
    accounts: BTreeMap<String, Address>,
    artifacts_dir: PathBuf,
}

/// Compiled contract artifact; only the creation bytecode is used.
#[derive(Debug, Deserialize)]
struct Artifact {
    bytecode: String,
}

impl RpcLedger {
    /// Build a client for `config` without contacting the node.
    pub fn new(config: &NetworkConfig) -> Result<Self, LedgerError> {
        let rpc_url: Url = config
            .rpc_url
            .parse()
            .map_err(|e| LedgerError::Malformed(format!("rpc_url '{}': {e}", config.rpc_url)))?;
        let client = RpcClient::new_http(rpc_url.clone())
            .with_poll_interval(config.receipt_poll_interval());
        let provider = ProviderBuilder::new().connect_client(client).erased();

        Ok(Self {
            provider,
            rpc_url,
            network: config.network,
            accounts: config.accounts.clone(),
            artifacts_dir: config.artifacts_dir.clone(),
        })
    }

    /// Build a client and, when the config pins a chain id, verify the
    /// node reports the same one.
    pub async fn connect(config: &NetworkConfig) -> Result<Self, LedgerError> {
        let ledger = Self::new(config)?;

        if let Some(expected) = config.chain_id {
            let actual = ledger.chain_id().await?;
            if actual != expected {
                return Err(LedgerError::ChainMismatch { expected, actual });
            }
        }

        tracing::info!(
            network = %ledger.network,
            rpc_url = %ledger.rpc_url,
            "Connected to ledger",
        );
        Ok(ledger)
    }

    pub async fn chain_id(&self) -> Result<u64, LedgerError> {
        Ok(self.provider.get_chain_id().await?)
    }

    // ---- private helpers ----

    /// Send a transaction and block until it is mined successfully.
    async fn submit(&self, tx: TransactionRequest) -> Result<TransactionReceipt, LedgerError> {
        let pending = self.provider.send_transaction(tx).await?;
        tracing::debug!(tx_hash = %pending.tx_hash(), "Transaction submitted, awaiting receipt");

        let receipt = pending.get_receipt().await?;
        if !receipt.status() {
            return Err(LedgerError::Reverted {
                tx_hash: receipt.transaction_hash,
            });
        }
        Ok(receipt)
    }

    async fn read_artifact(&self, name: &str) -> Result<Vec<u8>, LedgerError> {
        let path = self.artifacts_dir.join(format!("{name}.json"));
        let artifact_error = |reason: String| LedgerError::Artifact {
            name: name.to_string(),
            reason,
        };

        let text = tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| artifact_error(format!("cannot read {}: {e}", path.display())))?;
        let artifact: Artifact =
            serde_json::from_str(&text).map_err(|e| artifact_error(e.to_string()))?;
        let bytecode =
            alloy::hex::decode(artifact.bytecode.trim()).map_err(|e| artifact_error(e.to_string()))?;
        if bytecode.is_empty() {
            return Err(artifact_error("empty bytecode".to_string()));
        }
        Ok(bytecode)
    }
}

impl Ledger for RpcLedger {
    fn network(&self) -> Network {
        self.network
    }

    fn account(&self, name: &str) -> Result<Address, LedgerError> {
        self.accounts
            .get(name)
            .copied()
            .ok_or_else(|| LedgerError::UnknownAccount(name.to_string()))
    }

    async fn call<C>(&self, to: Address, call: C) -> Result<C::Return, LedgerError>
    where
        C: SolCall + Send + 'static,
    {
        let tx = TransactionRequest::default()
            .with_to(to)
            .with_input(call.abi_encode());
        tracing::debug!(to = %to, function = C::SIGNATURE, "eth_call");

        let output = self.provider.call(tx).await?;
        Ok(C::abi_decode_returns(&output)?)
    }

    async fn send<C>(&self, from: Address, to: Address, call: C) -> Result<Receipt, LedgerError>
    where
        C: SolCall + Send + 'static,
    {
        let tx = TransactionRequest::default()
            .with_from(from)
            .with_to(to)
            .with_input(call.abi_encode());
        let raw = self.submit(tx).await?;
        let receipt = into_receipt(&raw);

        tracing::info!(
            to = %to,
            function = C::SIGNATURE,
            tx_hash = %receipt.tx_hash,
            block = receipt.block_number,
            logs = receipt.logs.len(),
            "Transaction confirmed",
        );
        Ok(receipt)
    }

    async fn deploy(
        &self,
        from: Address,
        artifact: &str,
        constructor_args: Vec<u8>,
    ) -> Result<Address, LedgerError> {
        let mut code = self.read_artifact(artifact).await?;
        code.extend(constructor_args);

        let tx = TransactionRequest::default()
            .with_from(from)
            .with_deploy_code(Bytes::from(code));
        let raw = self.submit(tx).await?;
        let address = raw.contract_address.ok_or_else(|| {
            LedgerError::Malformed(format!(
                "deployment {} has no contract address",
                raw.transaction_hash
            ))
        })?;

        tracing::info!(
            artifact,
            address = %address,
            tx_hash = %raw.transaction_hash,
            "Contract deployed",
        );
        Ok(address)
    }
}

fn into_receipt(raw: &TransactionReceipt) -> Receipt {
    Receipt {
        tx_hash: raw.transaction_hash,
        block_number: raw.block_number,
        logs: raw.inner.logs().iter().map(|log| log.inner.clone()).collect(),
    }
}
