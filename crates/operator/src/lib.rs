//! Operator actions against the margin-trading protocol.
//!
//! An [`Operator`] binds a [`Ledger`](marginctl_ledger::Ledger), the
//! active network's address book section and a signing account. Each
//! [`Action`] is an independent, strictly sequential procedure: every
//! write is confirmed before the next call is made, and the first
//! rejection ends the action. Nothing is retried or rolled back.

pub mod action;
pub mod error;
mod liquidation;
pub mod operator;
mod pool;
mod prices;
mod rates;
pub mod report;
mod tokens;
pub mod trade;
mod vesting;

pub use action::Action;
pub use error::OperatorError;
pub use operator::Operator;
pub use report::Outcome;
