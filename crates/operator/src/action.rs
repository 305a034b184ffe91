//! The closed set of operator actions.
//!
//! One invocation runs exactly one [`Action`]. Contract arguments are
//! logical names from the network's address book; a literal `0x` address
//! is accepted in their place.

use alloy::primitives::uint;
use marginctl_core::curve::DemandCurve;
use marginctl_core::types::{Address, Amount, LoanId};

/// Underlying sent into a round-trip trade when none is given: 100 tokens.
pub const DEFAULT_TRADE_AMOUNT: Amount = uint!(100000000000000000000_U256);

/// Leverage of a round-trip trade when none is given: 2x.
pub const DEFAULT_TRADE_LEVERAGE: Amount = uint!(2000000000000000000_U256);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Print a loan record.
    ReadLoan { loan_id: LoanId },
    /// Print a pool's supply, borrow, rate and liquidity figures.
    ReadPool { pool: String },
    /// Print the oracle rate between two tokens.
    ReadPrice { source: String, destination: String },
    /// Push a rate into the local test oracle.
    SetPrice {
        source: String,
        destination: String,
        rate: Amount,
    },
    /// Mint test tokens to `to`, or to the signing account.
    MintToken {
        token: String,
        amount: Amount,
        to: Option<String>,
    },
    /// Destroy test tokens held by `from` (an account, contract or address).
    BurnToken {
        token: String,
        from: String,
        amount: Amount,
    },
    /// Deposit underlying into a pool.
    Lend { pool: String, amount: Amount },
    /// Burn half of the account's pool tokens, optionally after depositing
    /// `deposit` of already-held underlying.
    Burn {
        pool: String,
        deposit: Option<Amount>,
    },
    /// Print the protocol's lending fee percentage.
    ReadLendingFee,
    /// Liquidate a loan if, and only if, it is under water.
    Liquidate { loan_id: LoanId },
    /// Open a margin trade and immediately close it again.
    TradeRoundTrip {
        pool: String,
        collateral: String,
        amount: Amount,
        leverage: Amount,
    },
    /// Reconfigure a pool's interest-rate curve through its settings target.
    ///
    /// `settings` and `logic` default to `<pool>Settings` and `<pool>Logic`.
    SetDemandCurve {
        pool: String,
        curve: DemandCurve,
        settings: Option<String>,
        logic: Option<String>,
    },
    /// Fund the registry and create every vesting in the network's table.
    CreateVestings,
    /// Same, for the team table with its shared schedule.
    CreateTeamVestings,
    /// Print a beneficiary's (team) vesting contract and its staked balance.
    ReadVesting { beneficiary: String, team: bool },
    /// Deploy the vested token, staking, fee sharing, factory and registry.
    DeployVesting { vesting_owner: Option<Address> },
}

impl Action {
    /// Short name used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::ReadLoan { .. } => "read-loan",
            Self::ReadPool { .. } => "read-pool",
            Self::ReadPrice { .. } => "read-price",
            Self::SetPrice { .. } => "set-price",
            Self::MintToken { .. } => "mint-token",
            Self::BurnToken { .. } => "burn-token",
            Self::Lend { .. } => "lend",
            Self::Burn { .. } => "burn",
            Self::ReadLendingFee => "read-lending-fee",
            Self::Liquidate { .. } => "liquidate",
            Self::TradeRoundTrip { .. } => "trade-round-trip",
            Self::SetDemandCurve { .. } => "set-demand-curve",
            Self::CreateVestings => "create-vestings",
            Self::CreateTeamVestings => "create-team-vestings",
            Self::ReadVesting { .. } => "read-vesting",
            Self::DeployVesting { .. } => "deploy-vesting",
        }
    }

    /// Whether the action submits transactions.
    pub fn writes(&self) -> bool {
        !matches!(
            self,
            Self::ReadLoan { .. }
                | Self::ReadPool { .. }
                | Self::ReadPrice { .. }
                | Self::ReadLendingFee
                | Self::ReadVesting { .. }
        )
    }
}
