//! Loan record as returned by the protocol's `getLoan` view.

use std::fmt;

use chrono::DateTime;
use serde::Serialize;

use crate::amount::{format_units, units};
use crate::types::{Address, Amount, LoanId, UnixSeconds};

/// Snapshot of a single loan.
///
/// Read-only from the operator's point of view: the protocol mutates it
/// only in response to submitted transactions. Amounts serialize as decimal token units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Loan {
    pub loan_id: LoanId,
    /// Token that was borrowed (the pool's underlying asset).
    pub loan_token: Address,
    pub collateral_token: Address,
    #[serde(with = "units")]
    pub principal: Amount,
    #[serde(with = "units")]
    pub collateral: Amount,
    #[serde(with = "units")]
    pub interest_owed_per_day: Amount,
    #[serde(with = "units")]
    pub interest_deposit_remaining: Amount,
    #[serde(with = "units")]
    pub start_rate: Amount,
    #[serde(with = "units")]
    pub start_margin: Amount,
    /// Margin below which the loan may be liquidated.
    #[serde(with = "units")]
    pub maintenance_margin: Amount,
    #[serde(with = "units")]
    pub current_margin: Amount,
    pub max_loan_term: UnixSeconds,
    pub end_timestamp: UnixSeconds,
    /// Largest repayment a liquidator may make right now.
    #[serde(with = "units")]
    pub max_liquidatable: Amount,
    #[serde(with = "units")]
    pub max_seizable: Amount,
}

impl Loan {
    /// A loan is liquidatable only when its maintenance margin strictly
    /// exceeds its current margin. Equal margins are healthy.
    pub fn is_liquidatable(&self) -> bool {
        self.maintenance_margin > self.current_margin
    }
}

impl fmt::Display for Loan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let end = DateTime::from_timestamp(self.end_timestamp as i64, 0)
            .map(|t| t.to_rfc3339())
            .unwrap_or_else(|| self.end_timestamp.to_string());

        writeln!(f, "loan {}", self.loan_id)?;
        writeln!(f, "  loan token:           {}", self.loan_token)?;
        writeln!(f, "  collateral token:     {}", self.collateral_token)?;
        writeln!(f, "  principal:            {}", format_units(self.principal))?;
        writeln!(f, "  collateral:           {}", format_units(self.collateral))?;
        writeln!(f, "  interest owed / day:  {}", format_units(self.interest_owed_per_day))?;
        writeln!(f, "  interest deposit:     {}", format_units(self.interest_deposit_remaining))?;
        writeln!(f, "  start rate:           {}", format_units(self.start_rate))?;
        writeln!(f, "  start margin:         {}%", format_units(self.start_margin))?;
        writeln!(f, "  maintenance margin:   {}%", format_units(self.maintenance_margin))?;
        writeln!(f, "  current margin:       {}%", format_units(self.current_margin))?;
        writeln!(f, "  max loan term:        {}s", self.max_loan_term)?;
        writeln!(f, "  end:                  {end}")?;
        writeln!(f, "  max liquidatable:     {}", format_units(self.max_liquidatable))?;
        writeln!(f, "  max seizable:         {}", format_units(self.max_seizable))?;
        write!(f, "  liquidatable:         {}", self.is_liquidatable())
    }
}
