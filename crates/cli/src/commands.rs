//! Subcommands and their mapping onto operator actions.

use clap::{Args, Subcommand};

use marginctl_core::amount::parse_units;
use marginctl_core::curve::DemandCurve;
use marginctl_core::types::{Address, Amount, LoanId};
use marginctl_operator::action::{DEFAULT_TRADE_AMOUNT, DEFAULT_TRADE_LEVERAGE};
use marginctl_operator::Action;

/// Decimal token amount (`"1.5"`), scaled to 18 decimals.
fn amount(text: &str) -> Result<Amount, String> {
    parse_units(text).map_err(|e| e.to_string())
}

// ---------------------------------------------------------------------------
// Subcommands
// ---------------------------------------------------------------------------

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print a loan record
    ReadLoan {
        /// 0x-prefixed 32-byte loan id
        loan_id: LoanId,
    },

    /// Print a lending pool's supply, borrow, rates and liquidity
    ReadPool {
        /// Pool name from the address book, or an address
        pool: String,
    },

    /// Print the oracle rate from one token to another
    ReadPrice { source: String, destination: String },

    /// Set the oracle rate on the local test price feed
    SetPrice {
        source: String,
        destination: String,
        #[arg(value_parser = amount)]
        rate: Amount,
    },

    /// Mint test tokens
    MintToken {
        token: String,
        #[arg(value_parser = amount)]
        amount: Amount,
        /// Recipient account name or address; defaults to the signing account
        #[arg(long)]
        to: Option<String>,
    },

    /// Burn test tokens held by an account, contract or address
    BurnToken {
        token: String,
        /// Holder account name, contract name or address
        from: String,
        #[arg(value_parser = amount)]
        amount: Amount,
    },

    /// Deposit underlying into a lending pool
    Lend {
        pool: String,
        #[arg(value_parser = amount)]
        amount: Amount,
    },

    /// Burn half of the account's pool tokens and verify the burn
    Burn {
        pool: String,
        /// Lend this much already-held underlying first
        #[arg(long, value_parser = amount)]
        deposit: Option<Amount>,
    },

    /// Print the protocol's lending fee
    ReadLendingFee,

    /// Liquidate a loan if it is below its maintenance margin
    Liquidate { loan_id: LoanId },

    /// Open a margin trade and close it again
    TradeRoundTrip {
        pool: String,
        /// Collateral token name or address
        collateral: String,
        /// Underlying sent into the trade
        #[arg(long, value_parser = amount)]
        amount: Option<Amount>,
        /// Leverage, e.g. `2` for 2x
        #[arg(long, value_parser = amount)]
        leverage: Option<Amount>,
    },

    /// Reconfigure a pool's interest-rate demand curve
    SetDemandCurve {
        pool: String,
        #[command(flatten)]
        curve: CurveArgs,
        /// Settings implementation; defaults to `<pool>Settings`
        #[arg(long)]
        settings: Option<String>,
        /// Logic implementation; defaults to `<pool>Logic`
        #[arg(long)]
        logic: Option<String>,
    },

    /// Fund the vesting registry and create every vesting in the network's table
    CreateVestings,

    /// Fund the vesting registry and create every team vesting
    CreateTeamVestings,

    /// Print a beneficiary's vesting contract and staked balance
    ReadVesting {
        beneficiary: String,
        /// Look up the team vesting instead
        #[arg(long)]
        team: bool,
    },

    /// Deploy the vested token, staking, fee sharing and the vesting registry
    DeployVesting {
        /// Owner of the created vestings; defaults to the signing account
        #[arg(long)]
        vesting_owner: Option<Address>,
    },
}

/// Demand curve parameters, as percentages (`10` is 10%). The low
/// utilisation pair defaults to the base pair.
#[derive(Debug, Args)]
pub struct CurveArgs {
    #[arg(long, value_parser = amount)]
    base_rate: Amount,
    #[arg(long, value_parser = amount)]
    rate_multiplier: Amount,
    #[arg(long, value_parser = amount)]
    low_util_base_rate: Option<Amount>,
    #[arg(long, value_parser = amount)]
    low_util_rate_multiplier: Option<Amount>,
}

impl From<CurveArgs> for DemandCurve {
    fn from(args: CurveArgs) -> Self {
        Self {
            base_rate: args.base_rate,
            rate_multiplier: args.rate_multiplier,
            low_util_base_rate: args.low_util_base_rate.unwrap_or(args.base_rate),
            low_util_rate_multiplier: args
                .low_util_rate_multiplier
                .unwrap_or(args.rate_multiplier),
        }
    }
}

impl From<Command> for Action {
    fn from(command: Command) -> Self {
        match command {
            Command::ReadLoan { loan_id } => Action::ReadLoan { loan_id },
            Command::ReadPool { pool } => Action::ReadPool { pool },
            Command::ReadPrice {
                source,
                destination,
            } => Action::ReadPrice {
                source,
                destination,
            },
            Command::SetPrice {
                source,
                destination,
                rate,
            } => Action::SetPrice {
                source,
                destination,
                rate,
            },
            Command::MintToken { token, amount, to } => Action::MintToken { token, amount, to },
            Command::BurnToken {
                token,
                from,
                amount,
            } => Action::BurnToken {
                token,
                from,
                amount,
            },
            Command::Lend { pool, amount } => Action::Lend { pool, amount },
            Command::Burn { pool, deposit } => Action::Burn { pool, deposit },
            Command::ReadLendingFee => Action::ReadLendingFee,
            Command::Liquidate { loan_id } => Action::Liquidate { loan_id },
            Command::TradeRoundTrip {
                pool,
                collateral,
                amount,
                leverage,
            } => Action::TradeRoundTrip {
                pool,
                collateral,
                amount: amount.unwrap_or(DEFAULT_TRADE_AMOUNT),
                leverage: leverage.unwrap_or(DEFAULT_TRADE_LEVERAGE),
            },
            Command::SetDemandCurve {
                pool,
                curve,
                settings,
                logic,
            } => Action::SetDemandCurve {
                pool,
                curve: curve.into(),
                settings,
                logic,
            },
            Command::CreateVestings => Action::CreateVestings,
            Command::CreateTeamVestings => Action::CreateTeamVestings,
            Command::ReadVesting { beneficiary, team } => Action::ReadVesting { beneficiary, team },
            Command::DeployVesting { vesting_owner } => Action::DeployVesting { vesting_owner },
        }
    }
}
