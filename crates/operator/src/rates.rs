//! Interest-rate curve reconfiguration.
//!
//! The pool proxy only exposes `setDemandCurve` while it targets the
//! settings implementation. The window is modelled by
//! [`SettingsWindow`](marginctl_ledger::contracts::SettingsWindow), which
//! takes the pool handle on entry and gives it back on exit, so nothing
//! else can be called on the pool in between.
//!
//! Every pool has its own settings and logic implementations, looked up
//! as `<pool>Settings` and `<pool>Logic` unless named explicitly.

use marginctl_core::amount::format_units;
use marginctl_core::curve::DemandCurve;
use marginctl_core::error::CoreError;
use marginctl_core::types::Address;
use marginctl_ledger::Ledger;

use crate::error::OperatorError;
use crate::operator::{names, Operator};
use crate::report::CurveReport;

impl<'a, L: Ledger> Operator<'a, L> {
    /// Retarget `pool` to settings, set the curve, retarget to logic, then
    /// read the resulting borrow rate.
    ///
    /// If the setter is rejected the proxy is left targeting settings.
    pub async fn set_demand_curve(
        &self,
        pool: &str,
        curve: &DemandCurve,
        settings: Option<&str>,
        logic: Option<&str>,
    ) -> Result<CurveReport, OperatorError> {
        let settings = self.implementation(pool, settings, names::settings_of)?;
        let logic = self.implementation(pool, logic, names::logic_of)?;
        let pool = self.pool(pool)?;
        let address = pool.address();

        let window = pool.enter_settings(settings).await?;
        let receipt = window.set_demand_curve(curve).await?;
        tracing::info!(
            pool = %address,
            curve = %curve,
            tx_hash = %receipt.tx_hash,
            "Demand curve set",
        );
        let pool = window.exit(logic).await?;

        let borrow_interest_rate = pool.borrow_interest_rate().await?;
        tracing::info!(
            pool = %address,
            borrow_interest_rate = %format_units(borrow_interest_rate),
            "Borrow rate after curve change",
        );

        Ok(CurveReport {
            pool: address,
            settings,
            logic,
            curve: *curve,
            borrow_interest_rate,
            tx_hash: receipt.tx_hash,
        })
    }

    /// An explicit name or address, else the pool's derived logical name.
    fn implementation(
        &self,
        pool: &str,
        explicit: Option<&str>,
        derive: fn(&str) -> String,
    ) -> Result<Address, OperatorError> {
        match explicit {
            Some(name) => self.resolve(name),
            None if pool.starts_with("0x") => Err(CoreError::Validation(format!(
                "pool {pool} is a literal address; name its settings and logic explicitly"
            ))
            .into()),
            None => self.resolve(&derive(pool)),
        }
    }
}
