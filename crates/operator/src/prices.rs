//! Price-feed reads and test-oracle writes.

use marginctl_core::amount::format_units;
use marginctl_core::types::Amount;
use marginctl_ledger::Ledger;

use crate::error::OperatorError;
use crate::operator::Operator;
use crate::report::{PriceReport, PriceSet};

impl<'a, L: Ledger> Operator<'a, L> {
    pub async fn read_price(
        &self,
        source: &str,
        destination: &str,
    ) -> Result<PriceReport, OperatorError> {
        let source = self.resolve(source)?;
        let destination = self.resolve(destination)?;
        let (rate, precision) = self
            .price_feeds()?
            .query_rate(source, destination)
            .await?;

        Ok(PriceReport {
            source,
            destination,
            rate,
            precision,
        })
    }

    /// Only the local test oracle accepts this; elsewhere the call reverts.
    pub async fn set_price(
        &self,
        source: &str,
        destination: &str,
        rate: Amount,
    ) -> Result<PriceSet, OperatorError> {
        let source = self.resolve(source)?;
        let destination = self.resolve(destination)?;
        let receipt = self
            .price_feeds()?
            .set_rates(source, destination, rate)
            .await?;

        tracing::info!(
            source = %source,
            destination = %destination,
            rate = %format_units(rate),
            "Oracle rate set",
        );

        Ok(PriceSet {
            source,
            destination,
            rate,
            tx_hash: receipt.tx_hash,
        })
    }
}
