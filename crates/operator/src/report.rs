//! What each action reports back.
//!
//! Every report renders two ways: [`Display`](fmt::Display) for the
//! terminal and `Serialize` for `--json`. Amounts serialize as decimal
//! token-unit strings.

use std::fmt;

use serde::Serialize;

use marginctl_core::amount::{format_units, units};
use marginctl_core::curve::DemandCurve;
use marginctl_core::loan::Loan;
use marginctl_core::types::{Address, Amount, TxHash};

use crate::trade::ClosedTrade;

/// Result of one [`Action`](crate::action::Action).
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "action", content = "result", rename_all = "kebab-case")]
pub enum Outcome {
    ReadLoan(Loan),
    ReadPool(PoolReport),
    ReadPrice(PriceReport),
    SetPrice(PriceSet),
    MintToken(Minted),
    BurnToken(Burned),
    Lend(LendReport),
    Burn(BurnReport),
    ReadLendingFee(LendingFeeReport),
    Liquidate(LiquidationReport),
    TradeRoundTrip(ClosedTrade),
    SetDemandCurve(CurveReport),
    CreateVestings(VestingBatch),
    ReadVesting(VestingReport),
    DeployVesting(VestingDeployment),
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ReadLoan(r) => r.fmt(f),
            Self::ReadPool(r) => r.fmt(f),
            Self::ReadPrice(r) => r.fmt(f),
            Self::SetPrice(r) => r.fmt(f),
            Self::MintToken(r) => r.fmt(f),
            Self::BurnToken(r) => r.fmt(f),
            Self::Lend(r) => r.fmt(f),
            Self::Burn(r) => r.fmt(f),
            Self::ReadLendingFee(r) => r.fmt(f),
            Self::Liquidate(r) => r.fmt(f),
            Self::TradeRoundTrip(r) => r.fmt(f),
            Self::SetDemandCurve(r) => r.fmt(f),
            Self::CreateVestings(r) => r.fmt(f),
            Self::ReadVesting(r) => r.fmt(f),
            Self::DeployVesting(r) => r.fmt(f),
        }
    }
}

// ---------------------------------------------------------------------------
// Pools and prices
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PoolReport {
    pub pool: Address,
    pub underlying: Address,
    #[serde(with = "units")]
    pub total_asset_supply: Amount,
    #[serde(with = "units")]
    pub total_asset_borrow: Amount,
    #[serde(with = "units")]
    pub supply_interest_rate: Amount,
    #[serde(with = "units")]
    pub borrow_interest_rate: Amount,
    #[serde(with = "units")]
    pub avg_borrow_interest_rate: Amount,
    /// Supply rate with no further deposit.
    #[serde(with = "units")]
    pub next_supply_interest_rate: Amount,
    #[serde(with = "units")]
    pub market_liquidity: Amount,
    #[serde(with = "units")]
    pub token_price: Amount,
    /// Lending fees the protocol holds in the pool's underlying.
    #[serde(with = "units")]
    pub lending_fee_tokens_held: Amount,
}

impl fmt::Display for PoolReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "pool {}", self.pool)?;
        writeln!(f, "  underlying:           {}", self.underlying)?;
        writeln!(f, "  total asset supply:   {}", format_units(self.total_asset_supply))?;
        writeln!(f, "  total asset borrow:   {}", format_units(self.total_asset_borrow))?;
        writeln!(f, "  supply interest rate: {}%", format_units(self.supply_interest_rate))?;
        writeln!(f, "  borrow interest rate: {}%", format_units(self.borrow_interest_rate))?;
        writeln!(f, "  avg borrow rate:      {}%", format_units(self.avg_borrow_interest_rate))?;
        writeln!(f, "  next supply rate:     {}%", format_units(self.next_supply_interest_rate))?;
        writeln!(f, "  market liquidity:     {}", format_units(self.market_liquidity))?;
        writeln!(f, "  token price:          {}", format_units(self.token_price))?;
        write!(f, "  lending fees held:    {}", format_units(self.lending_fee_tokens_held))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LendingFeeReport {
    pub protocol: Address,
    #[serde(with = "units")]
    pub lending_fee_percent: Amount,
}

impl fmt::Display for LendingFeeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "protocol {} lending fee: {}%",
            self.protocol,
            format_units(self.lending_fee_percent),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PriceReport {
    pub source: Address,
    pub destination: Address,
    #[serde(with = "units")]
    pub rate: Amount,
    #[serde(with = "units")]
    pub precision: Amount,
}

impl fmt::Display for PriceReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} -> {}: rate {} (precision {})",
            self.source,
            self.destination,
            format_units(self.rate),
            format_units(self.precision),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PriceSet {
    pub source: Address,
    pub destination: Address,
    #[serde(with = "units")]
    pub rate: Amount,
    pub tx_hash: TxHash,
}

impl fmt::Display for PriceSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "set {} -> {} rate to {} ({})",
            self.source,
            self.destination,
            format_units(self.rate),
            self.tx_hash,
        )
    }
}

// ---------------------------------------------------------------------------
// Tokens
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Minted {
    pub token: Address,
    pub to: Address,
    #[serde(with = "units")]
    pub amount: Amount,
    pub tx_hash: TxHash,
}

impl fmt::Display for Minted {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "minted {} of {} to {} ({})",
            format_units(self.amount),
            self.token,
            self.to,
            self.tx_hash,
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Burned {
    pub token: Address,
    pub from: Address,
    #[serde(with = "units")]
    pub amount: Amount,
    pub tx_hash: TxHash,
}

impl fmt::Display for Burned {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "burned {} of {} held by {} ({})",
            format_units(self.amount),
            self.token,
            self.from,
            self.tx_hash,
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LendReport {
    pub pool: Address,
    #[serde(with = "units")]
    pub deposit: Amount,
    /// Pool tokens received.
    #[serde(with = "units")]
    pub token_amount: Amount,
    #[serde(with = "units")]
    pub price: Amount,
    pub tx_hash: TxHash,
}

impl fmt::Display for LendReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "lent {} to pool {}: received {} pool tokens at price {} ({})",
            format_units(self.deposit),
            self.pool,
            format_units(self.token_amount),
            format_units(self.price),
            self.tx_hash,
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BurnReport {
    pub pool: Address,
    /// Deposit made before reading the balance, when one was requested.
    pub deposit_tx: Option<TxHash>,
    #[serde(with = "units")]
    pub balance_before: Amount,
    #[serde(with = "units")]
    pub burned: Amount,
    /// Underlying paid out for the burned pool tokens.
    #[serde(with = "units")]
    pub asset_amount: Amount,
    #[serde(with = "units")]
    pub balance_after: Amount,
    pub tx_hash: TxHash,
}

impl fmt::Display for BurnReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "burned {} pool tokens of {}", format_units(self.burned), self.pool)?;
        if let Some(tx) = &self.deposit_tx {
            writeln!(f, "  deposited first: {tx}")?;
        }
        writeln!(f, "  balance before: {}", format_units(self.balance_before))?;
        writeln!(f, "  balance after:  {}", format_units(self.balance_after))?;
        writeln!(f, "  paid out:       {}", format_units(self.asset_amount))?;
        write!(f, "  tx:             {}", self.tx_hash)
    }
}

// ---------------------------------------------------------------------------
// Loans
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LiquidationReport {
    pub loan: Loan,
    /// `None` when the loan was healthy and nothing was sent.
    pub liquidation: Option<Liquidation>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Liquidation {
    #[serde(with = "units")]
    pub repaid: Amount,
    pub tx_hash: TxHash,
}

impl fmt::Display for LiquidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.liquidation {
            None => write!(
                f,
                "loan {} is healthy (maintenance margin {}% <= current margin {}%), nothing to do",
                self.loan.loan_id,
                format_units(self.loan.maintenance_margin),
                format_units(self.loan.current_margin),
            ),
            Some(l) => write!(
                f,
                "liquidated loan {}: repaid {} ({})",
                self.loan.loan_id,
                format_units(l.repaid),
                l.tx_hash,
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CurveReport {
    pub pool: Address,
    pub settings: Address,
    pub logic: Address,
    pub curve: DemandCurve,
    /// Read after the proxy is back on its logic implementation.
    #[serde(with = "units")]
    pub borrow_interest_rate: Amount,
    pub tx_hash: TxHash,
}

impl fmt::Display for CurveReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "pool {} demand curve set: {} ({})", self.pool, self.curve, self.tx_hash)?;
        write!(f, "  borrow interest rate now {}%", format_units(self.borrow_interest_rate))
    }
}

// ---------------------------------------------------------------------------
// Vesting
// ---------------------------------------------------------------------------

/// Which registry members a vesting batch or read uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum VestingKind {
    Individual,
    Team,
}

impl VestingKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Individual => "vesting",
            Self::Team => "team vesting",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreatedVesting {
    pub beneficiary: Address,
    pub vesting: Address,
    #[serde(with = "units")]
    pub amount: Amount,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VestingBatch {
    pub kind: VestingKind,
    pub registry: Address,
    #[serde(with = "units")]
    pub total: Amount,
    pub funding_tx: TxHash,
    pub created: Vec<CreatedVesting>,
}

impl fmt::Display for VestingBatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "funded registry {} with {} for {} ({})",
            self.registry,
            format_units(self.total),
            self.kind.as_str(),
            self.funding_tx,
        )?;
        for c in &self.created {
            write!(
                f,
                "\n  {} -> vesting {} staked {}",
                c.beneficiary,
                c.vesting,
                format_units(c.amount),
            )?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VestingReport {
    pub beneficiary: Address,
    pub kind: VestingKind,
    /// `None` when the registry has no vesting for the beneficiary.
    pub vesting: Option<Address>,
    #[serde(with = "units")]
    pub staked: Amount,
}

impl fmt::Display for VestingReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.vesting {
            Some(vesting) => write!(
                f,
                "{}: {} {} with {} staked",
                self.beneficiary,
                self.kind.as_str(),
                vesting,
                format_units(self.staked),
            ),
            None => write!(f, "{}: no {}", self.beneficiary, self.kind.as_str()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VestingDeployment {
    pub csov1: Address,
    pub csov2: Address,
    pub sov: Address,
    pub staking_logic: Address,
    /// Staking proxy; the address every other contract uses.
    pub staking: Address,
    pub fee_sharing: Address,
    pub factory: Address,
    pub registry: Address,
    pub vesting_owner: Address,
}

impl fmt::Display for VestingDeployment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "cSOV1:            {}", self.csov1)?;
        writeln!(f, "cSOV2:            {}", self.csov2)?;
        writeln!(f, "SOV:              {}", self.sov)?;
        writeln!(f, "staking logic:    {}", self.staking_logic)?;
        writeln!(f, "staking:          {}", self.staking)?;
        writeln!(f, "fee sharing:      {}", self.fee_sharing)?;
        writeln!(f, "vesting factory:  {}", self.factory)?;
        writeln!(f, "vesting registry: {}", self.registry)?;
        write!(f, "vesting owner:    {}", self.vesting_owner)
    }
}

#[cfg(test)]
mod tests {
    use alloy::primitives::{B256, U256};
    use marginctl_core::amount::wad;
    use marginctl_core::types::LoanId;

    use super::*;

    #[test]
    fn healthy_liquidation_says_so() {
        let loan = Loan {
            loan_id: LoanId::from_bytes([1u8; 32]),
            loan_token: Address::ZERO,
            collateral_token: Address::ZERO,
            principal: U256::ZERO,
            collateral: U256::ZERO,
            interest_owed_per_day: U256::ZERO,
            interest_deposit_remaining: U256::ZERO,
            start_rate: U256::ZERO,
            start_margin: U256::ZERO,
            maintenance_margin: wad(15),
            current_margin: wad(20),
            max_loan_term: 0,
            end_timestamp: 0,
            max_liquidatable: U256::ZERO,
            max_seizable: U256::ZERO,
        };
        let report = LiquidationReport {
            loan,
            liquidation: None,
        };
        let text = report.to_string();
        assert!(text.contains("is healthy"));
        assert!(text.contains("15% <= current margin 20%"));
    }

    #[test]
    fn outcome_json_is_tagged_by_action() {
        let outcome = Outcome::MintToken(Minted {
            token: Address::repeat_byte(1),
            to: Address::repeat_byte(2),
            amount: wad(5) / U256::from(2),
            tx_hash: B256::with_last_byte(1),
        });
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["action"], "mint-token");
        assert_eq!(json["result"]["amount"], "2.5");
        assert_eq!(json["result"]["tx_hash"], format!("0x{}01", "0".repeat(62)));
    }

    #[test]
    fn amounts_beyond_128_bits_serialize_as_units() {
        let outcome = Outcome::BurnToken(Burned {
            token: Address::repeat_byte(1),
            from: Address::repeat_byte(2),
            amount: U256::from(10).pow(U256::from(50)),
            tx_hash: B256::ZERO,
        });
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["action"], "burn-token");
        assert_eq!(json["result"]["amount"], format!("1{}", "0".repeat(32)));
    }

    #[test]
    fn team_vesting_read_names_its_kind() {
        let report = VestingReport {
            beneficiary: Address::repeat_byte(3),
            kind: VestingKind::Team,
            vesting: None,
            staked: U256::ZERO,
        };
        assert!(report.to_string().ends_with("no team vesting"));
        assert_eq!(serde_json::to_value(&report).unwrap()["kind"], "team");
    }
}
