//! Margin trade round trip.
//!
//! Opening a trade is the only way to learn its loan id: the protocol
//! assigns it and reports it in the `Trade` event together with the
//! position size. [`OpenedTrade`] carries exactly those two values, and
//! [`OpenedTrade::close`] consumes it, so a close can neither be issued
//! twice nor be fed a position size that was not observed on the ledger.

use std::fmt;

use serde::Serialize;

use marginctl_core::amount::{format_units, units};
use marginctl_core::loan::Loan;
use marginctl_core::types::{Address, Amount, LoanId, TxHash};
use marginctl_ledger::contracts::{LoanToken, Protocol};
use marginctl_ledger::interfaces::IProtocol;
use marginctl_ledger::Ledger;

use crate::error::OperatorError;
use crate::operator::Operator;

/// A position the protocol has opened and reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenedTrade {
    loan_id: LoanId,
    position_size: Amount,
    open_tx: TxHash,
}

impl OpenedTrade {
    /// Open a new loan through `pool`, sending `loan_token_sent` of the
    /// pool's underlying (already approved to the pool).
    pub async fn open<L: Ledger>(
        pool: &LoanToken<'_, L>,
        trader: Address,
        collateral_token: Address,
        loan_token_sent: Amount,
        leverage: Amount,
    ) -> Result<Self, OperatorError> {
        let receipt = pool
            .margin_trade(
                LoanId::NEW,
                leverage,
                loan_token_sent,
                Amount::ZERO,
                collateral_token,
                trader,
            )
            .await?;
        let event = receipt.expect_event::<IProtocol::Trade>()?;
        let loan_id = LoanId::from(event.loanId);

        tracing::info!(
            loan_id = %loan_id,
            position_size = %format_units(event.positionSize),
            tx_hash = %receipt.tx_hash,
            "Trade opened",
        );

        Ok(Self {
            loan_id,
            position_size: event.positionSize,
            open_tx: receipt.tx_hash,
        })
    }

    pub fn loan_id(&self) -> LoanId {
        self.loan_id
    }

    pub fn position_size(&self) -> Amount {
        self.position_size
    }

    /// Close the whole position with a swap, returning collateral to
    /// `receiver`. `loan` is the record read between open and close.
    pub async fn close<L: Ledger>(
        self,
        protocol: &Protocol<'_, L>,
        receiver: Address,
        loan: Loan,
    ) -> Result<ClosedTrade, OperatorError> {
        let receipt = protocol
            .close_with_swap(self.loan_id, receiver, self.position_size, true)
            .await?;

        tracing::info!(
            loan_id = %self.loan_id,
            tx_hash = %receipt.tx_hash,
            "Trade closed",
        );

        Ok(ClosedTrade {
            loan_id: self.loan_id,
            position_size: self.position_size,
            open_tx: self.open_tx,
            close_tx: receipt.tx_hash,
            loan,
        })
    }
}

/// A round trip that ran to the end.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClosedTrade {
    pub loan_id: LoanId,
    #[serde(with = "units")]
    pub position_size: Amount,
    pub open_tx: TxHash,
    pub close_tx: TxHash,
    /// Loan as read between open and close.
    pub loan: Loan,
}

impl fmt::Display for ClosedTrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "opened {} ({})", self.loan_id, self.open_tx)?;
        writeln!(f, "{}", self.loan)?;
        write!(
            f,
            "closed position of {} ({})",
            format_units(self.position_size),
            self.close_tx,
        )
    }
}

impl<'a, L: Ledger> Operator<'a, L> {
    /// Open a margin trade on `pool` against `collateral` and close it
    /// again with the position size the open reported.
    pub async fn trade_round_trip(
        &self,
        pool: &str,
        collateral: &str,
        loan_token_sent: Amount,
        leverage: Amount,
    ) -> Result<ClosedTrade, OperatorError> {
        let pool = self.pool(pool)?;
        let collateral = self.resolve(collateral)?;
        let protocol = self.protocol()?;

        // 1. Fund the operator with the underlying and approve the pool.
        let underlying = pool.loan_token_address().await?;
        self.fund_and_approve(underlying, pool.address(), loan_token_sent)
            .await?;

        // 2. Open; the ledger assigns the loan id.
        let opened =
            OpenedTrade::open(&pool, self.account, collateral, loan_token_sent, leverage).await?;

        // 3. Confirm the loan exists under that id.
        let loan = protocol.get_loan(opened.loan_id()).await?;

        // 4. Close with the observed position size.
        opened.close(&protocol, self.account, loan).await
    }
}
