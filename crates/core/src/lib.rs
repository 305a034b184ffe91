//! Domain types shared by the ledger client and the operator.
//!
//! Nothing in this crate talks to a node. It holds the value types the
//! other crates pass around (addresses, loan ids, 18-decimal amounts,
//! loan records, vesting tables) and the per-network address book.

pub mod amount;
pub mod curve;
pub mod error;
pub mod loan;
pub mod network;
pub mod types;
pub mod vesting;
