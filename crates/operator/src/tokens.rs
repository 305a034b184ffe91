use marginctl_core::types::Amount;
use marginctl_ledger::Ledger;

use crate::error::OperatorError;
use crate::operator::Operator;
use crate::report::{Burned, Minted};

impl<'a, L: Ledger> Operator<'a, L> {
    /// Mint test tokens to `to` (an account name, contract name or
    /// address), defaulting to the operator account.
    pub async fn mint_token(
        &self,
        token: &str,
        amount: Amount,
        to: Option<&str>,
    ) -> Result<Minted, OperatorError> {
        let token = self.test_token(self.resolve(token)?);
        let to = match to {
            Some(name) => self.resolve_recipient(name)?,
            None => self.account,
        };

        let receipt = token.mint(to, amount).await?;
        Ok(Minted {
            token: token.address(),
            to,
            amount,
            tx_hash: receipt.tx_hash,
        })
    }

    /// Destroy `amount` of `token` held by `from`, typically a pool that
    /// should be drained of its underlying.
    pub async fn burn_token(
        &self,
        token: &str,
        from: &str,
        amount: Amount,
    ) -> Result<Burned, OperatorError> {
        let token = self.test_token(self.resolve(token)?);
        let from = self.resolve_recipient(from)?;

        let receipt = token.burn(from, amount).await?;
        tracing::info!(
            token = %token.address(),
            from = %from,
            amount = %amount,
            tx_hash = %receipt.tx_hash,
            "Test tokens burned",
        );

        Ok(Burned {
            token: token.address(),
            from,
            amount,
            tx_hash: receipt.tx_hash,
        })
    }
}
