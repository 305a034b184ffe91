//! Lending pool actions: inspect, deposit, burn.

use alloy::primitives::U256;
use marginctl_core::amount::format_units;
use marginctl_core::types::Amount;
use marginctl_ledger::interfaces::ILoanToken;
use marginctl_ledger::Ledger;

use crate::error::OperatorError;
use crate::operator::Operator;
use crate::report::{BurnReport, LendReport, LendingFeeReport, PoolReport};

impl<'a, L: Ledger> Operator<'a, L> {
    pub async fn read_pool(&self, pool: &str) -> Result<PoolReport, OperatorError> {
        let pool = self.pool(pool)?;
        let underlying = pool.loan_token_address().await?;

        Ok(PoolReport {
            pool: pool.address(),
            underlying,
            total_asset_supply: pool.total_asset_supply().await?,
            total_asset_borrow: pool.total_asset_borrow().await?,
            supply_interest_rate: pool.supply_interest_rate().await?,
            borrow_interest_rate: pool.borrow_interest_rate().await?,
            avg_borrow_interest_rate: pool.avg_borrow_interest_rate().await?,
            next_supply_interest_rate: pool.next_supply_interest_rate(U256::ZERO).await?,
            market_liquidity: pool.market_liquidity().await?,
            token_price: pool.token_price().await?,
            lending_fee_tokens_held: self
                .protocol()?
                .lending_fee_tokens_held(underlying)
                .await?,
        })
    }

    pub async fn read_lending_fee(&self) -> Result<LendingFeeReport, OperatorError> {
        let protocol = self.protocol()?;
        Ok(LendingFeeReport {
            protocol: protocol.address(),
            lending_fee_percent: protocol.lending_fee_percent().await?,
        })
    }

    /// Deposit `amount` of freshly minted underlying into `pool`.
    pub async fn lend(&self, pool: &str, amount: Amount) -> Result<LendReport, OperatorError> {
        let pool = self.pool(pool)?;
        let underlying = pool.loan_token_address().await?;
        self.fund_and_approve(underlying, pool.address(), amount)
            .await?;

        let receipt = pool.mint(self.account, amount).await?;
        let minted = receipt.expect_event::<ILoanToken::Mint>()?;

        tracing::info!(
            pool = %pool.address(),
            deposit = %format_units(amount),
            pool_tokens = %format_units(minted.tokenAmount),
            "Deposited into pool",
        );

        Ok(LendReport {
            pool: pool.address(),
            deposit: amount,
            token_amount: minted.tokenAmount,
            price: minted.price,
            tx_hash: receipt.tx_hash,
        })
    }

    /// Burn half (rounded down) of the operator's pool tokens.
    ///
    /// With `deposit`, that much underlying the operator already holds is
    /// first approved to the pool and lent into it; nothing is minted.
    ///
    /// A balance below two pool tokens (in base units) leaves nothing to
    /// burn and fails with [`OperatorError::NothingToBurn`] before any
    /// burn is sent. The `Burn` event must report exactly the requested
    /// amount, and the balance afterwards must have dropped by exactly that
    /// amount. Either discrepancy fails the action.
    pub async fn burn(&self, pool: &str, deposit: Option<Amount>) -> Result<BurnReport, OperatorError> {
        let pool = self.pool(pool)?;

        let deposit_tx = match deposit {
            Some(amount) => {
                let underlying = pool.loan_token_address().await?;
                self.test_token(underlying)
                    .approve(pool.address(), amount)
                    .await?;
                let receipt = pool.mint(self.account, amount).await?;
                tracing::info!(
                    pool = %pool.address(),
                    deposit = %format_units(amount),
                    tx_hash = %receipt.tx_hash,
                    "Deposited before burn",
                );
                Some(receipt.tx_hash)
            }
            None => None,
        };

        let balance_before = pool.balance_of(self.account).await?;
        let burn_amount = balance_before / U256::from(2);
        if burn_amount.is_zero() {
            return Err(OperatorError::NothingToBurn {
                balance: balance_before,
            });
        }

        let receipt = pool.burn(self.account, burn_amount).await?;
        let burned = receipt.expect_event::<ILoanToken::Burn>()?;
        if burned.tokenAmount != burn_amount {
            tracing::error!(
                pool = %pool.address(),
                expected = %burn_amount,
                emitted = %burned.tokenAmount,
                tx_hash = %receipt.tx_hash,
                "Burn event amount does not match the requested burn",
            );
            return Err(OperatorError::BurnAmountMismatch {
                expected: burn_amount,
                emitted: burned.tokenAmount,
            });
        }

        let balance_after = pool.balance_of(self.account).await?;
        let expected_after = balance_before - burn_amount;
        if balance_after != expected_after {
            return Err(OperatorError::BalanceMismatch {
                expected: expected_after,
                actual: balance_after,
            });
        }

        tracing::info!(
            pool = %pool.address(),
            burned = %format_units(burn_amount),
            paid_out = %format_units(burned.assetAmount),
            "Burned pool tokens",
        );

        Ok(BurnReport {
            pool: pool.address(),
            deposit_tx,
            balance_before,
            burned: burn_amount,
            asset_amount: burned.assetAmount,
            balance_after,
            tx_hash: receipt.tx_hash,
        })
    }
}
