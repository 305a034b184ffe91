//! The ledger boundary.
//!
//! [`Ledger`] is everything the operator needs from a chain client:
//! the active network, named accounts, read calls, confirmed write
//! calls and contract deployment. [`RpcLedger`](crate::rpc::RpcLedger)
//! implements it over an alloy provider; tests implement it with a
//! scripted recorder.

use std::future::Future;

use alloy::primitives::{Log, TxHash};
use alloy::providers::PendingTransactionError;
use alloy::sol_types::{SolCall, SolEvent};
use alloy::transports::TransportError;

use marginctl_core::network::Network;
use marginctl_core::types::Address;

/// Synchronous-confirmation access to an external ledger.
///
/// Every write returns only once the transaction is mined. A reverted
/// transaction is an error; implementations never retry.
pub trait Ledger: Send + Sync {
    /// Network this ledger is connected to.
    fn network(&self) -> Network;

    /// Resolve a signing account by its configured name.
    fn account(&self, name: &str) -> Result<Address, LedgerError>;

    /// Execute a read-only call and decode its return value.
    fn call<C>(
        &self,
        to: Address,
        call: C,
    ) -> impl Future<Output = Result<C::Return, LedgerError>> + Send
    where
        C: SolCall + Send + 'static;

    /// Submit a state-changing call from `from` and wait for its receipt.
    fn send<C>(
        &self,
        from: Address,
        to: Address,
        call: C,
    ) -> impl Future<Output = Result<Receipt, LedgerError>> + Send
    where
        C: SolCall + Send + 'static;

    /// Deploy the compiled artifact `artifact` with ABI-encoded
    /// `constructor_args` appended, and return the new contract's address.
    fn deploy(
        &self,
        from: Address,
        artifact: &str,
        constructor_args: Vec<u8>,
    ) -> impl Future<Output = Result<Address, LedgerError>> + Send;
}

// ---------------------------------------------------------------------------
// Receipt
// ---------------------------------------------------------------------------

/// A confirmed transaction and the raw logs it emitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    pub tx_hash: TxHash,
    pub block_number: Option<u64>,
    /// Logs in emission order, undecoded.
    pub logs: Vec<Log>,
}

impl Receipt {
    /// First log that decodes as `E`.
    ///
    /// A log whose first topic matches `E` but whose body does not (an
    /// ERC-721 `Transfer` against the ERC-20 one, say) is skipped.
    pub fn event<E: SolEvent>(&self) -> Option<E> {
        self.logs
            .iter()
            .filter(|log| log.topics().first() == Some(&E::SIGNATURE_HASH))
            .find_map(|log| match E::decode_log_data(&log.data) {
                Ok(event) => Some(event),
                Err(e) => {
                    tracing::debug!(
                        event = event_name::<E>(),
                        address = %log.address,
                        tx_hash = %self.tx_hash,
                        error = %e,
                        "Skipping log that does not decode",
                    );
                    None
                }
            })
    }

    /// First log that decodes as `E`, or [`LedgerError::MissingEvent`].
    pub fn expect_event<E: SolEvent>(&self) -> Result<E, LedgerError> {
        self.event::<E>().ok_or(LedgerError::MissingEvent {
            event: event_name::<E>(),
            tx_hash: self.tx_hash,
        })
    }
}

/// `Transfer` for `Transfer(address,address,uint256)`.
fn event_name<E: SolEvent>() -> &'static str {
    E::SIGNATURE.split('(').next().unwrap_or(E::SIGNATURE)
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors from the ledger layer.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    /// The request failed in transport or the node answered with an error.
    #[error("RPC request failed: {0}")]
    Transport(#[from] TransportError),

    #[error("Waiting for receipt failed: {0}")]
    Pending(#[from] PendingTransactionError),

    /// The transaction was mined with a failure status.
    #[error("Transaction {tx_hash} reverted")]
    Reverted { tx_hash: TxHash },

    #[error("ABI error: {0}")]
    Abi(#[from] alloy::sol_types::Error),

    /// The node returned a value that is not well-formed.
    #[error("Malformed RPC payload: {0}")]
    Malformed(String),

    #[error("Unknown account: {0}")]
    UnknownAccount(String),

    #[error("Artifact {name}: {reason}")]
    Artifact { name: String, reason: String },

    #[error("Chain id mismatch: expected {expected}, node reports {actual}")]
    ChainMismatch { expected: u64, actual: u64 },

    #[error("Event {event} not emitted by transaction {tx_hash}")]
    MissingEvent { event: &'static str, tx_hash: TxHash },
}
