//! Client side of the external ledger.
//!
//! [`Ledger`] is the seam the operator is written against. [`RpcLedger`]
//! drives a node that holds the signing keys through an alloy provider.
//! [`interfaces`] declares the fixed contract surfaces with `sol!`, and
//! [`contracts`] wraps them in typed handles.

pub mod contracts;
pub mod interfaces;
pub mod ledger;
pub mod rpc;

pub use ledger::{Ledger, LedgerError, Receipt};
pub use rpc::RpcLedger;
