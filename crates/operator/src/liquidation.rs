//! Liquidation check-and-act.

use marginctl_core::amount::format_units;
use marginctl_core::loan::Loan;
use marginctl_core::types::LoanId;
use marginctl_ledger::Ledger;

use crate::error::OperatorError;
use crate::operator::Operator;
use crate::report::{Liquidation, LiquidationReport};

impl<'a, L: Ledger> Operator<'a, L> {
    /// Print a loan record.
    pub async fn read_loan(&self, loan_id: LoanId) -> Result<Loan, OperatorError> {
        Ok(self.protocol()?.get_loan(loan_id).await?)
    }

    /// Liquidate `loan_id` if it is under water.
    ///
    /// A healthy loan issues no write at all. An unhealthy one is repaid
    /// with exactly its `max_liquidatable`: that amount of the loan token
    /// is minted to the operator, approved to the protocol and passed to
    /// `liquidate`.
    pub async fn liquidate(&self, loan_id: LoanId) -> Result<LiquidationReport, OperatorError> {
        let protocol = self.protocol()?;
        let loan = protocol.get_loan(loan_id).await?;

        if !loan.is_liquidatable() {
            tracing::info!(
                loan_id = %loan_id,
                maintenance_margin = %format_units(loan.maintenance_margin),
                current_margin = %format_units(loan.current_margin),
                "Loan is healthy, nothing to liquidate",
            );
            return Ok(LiquidationReport {
                loan,
                liquidation: None,
            });
        }

        let amount = loan.max_liquidatable;
        tracing::info!(
            loan_id = %loan_id,
            loan_token = %loan.loan_token,
            amount = %format_units(amount),
            "Loan is under water, liquidating",
        );

        self.fund_and_approve(loan.loan_token, protocol.address(), amount)
            .await?;
        let receipt = protocol.liquidate(loan_id, self.account, amount).await?;

        Ok(LiquidationReport {
            loan,
            liquidation: Some(Liquidation {
                repaid: amount,
                tx_hash: receipt.tx_hash,
            }),
        })
    }
}
