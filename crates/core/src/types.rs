//! Ledger value types: addresses, amounts and loan identifiers.
//!
//! Addresses and 256-bit amounts are alloy's primitives. [`LoanId`] wraps a
//! `bytes32` so a loan id cannot be confused with a transaction hash or an
//! event topic.

use std::fmt;
use std::str::FromStr;

use alloy::primitives::B256;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

pub use alloy::primitives::{Address, TxHash, U256};

/// All amounts, rates and prices are unsigned 18-decimal fixed point.
pub type Amount = U256;

/// Unix timestamp in seconds, as reported by the ledger.
pub type UnixSeconds = u64;

/// Parse a `0x`-prefixed address, reporting the offending text.
pub fn parse_address(text: &str) -> Result<Address, CoreError> {
    if !text.starts_with("0x") {
        return Err(CoreError::InvalidAddress(text.to_string()));
    }
    text.parse()
        .map_err(|_| CoreError::InvalidAddress(text.to_string()))
}

// ---------------------------------------------------------------------------
// LoanId
// ---------------------------------------------------------------------------

/// A 32-byte loan identifier assigned by the protocol.
///
/// [`LoanId::NEW`] (all zeroes) tells the margin trade call to open a
/// fresh loan instead of adding to an existing one.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LoanId(B256);

impl LoanId {
    pub const NEW: LoanId = LoanId(B256::ZERO);

    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(B256::new(bytes))
    }

    pub const fn as_b256(&self) -> B256 {
        self.0
    }
}

impl From<B256> for LoanId {
    fn from(value: B256) -> Self {
        Self(value)
    }
}

impl From<LoanId> for B256 {
    fn from(value: LoanId) -> Self {
        value.0
    }
}

impl FromStr for LoanId {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if !s.starts_with("0x") {
            return Err(CoreError::InvalidLoanId(s.to_string()));
        }
        s.parse::<B256>()
            .map(Self)
            .map_err(|_| CoreError::InvalidLoanId(s.to_string()))
    }
}

impl TryFrom<String> for LoanId {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<LoanId> for String {
    fn from(value: LoanId) -> Self {
        value.to_string()
    }
}

impl fmt::Display for LoanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

impl fmt::Debug for LoanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LoanId({self})")
    }
}
