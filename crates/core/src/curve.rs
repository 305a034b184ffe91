//! Interest-rate demand curve parameters for a lending pool.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::amount::{format_units, units};
use crate::types::Amount;

/// Parameters of a pool's utilization-based borrow rate curve, in the
/// order the settings implementation's `setDemandCurve` takes them.
///
/// All values are 18-decimal percentages (`10 * WAD` is 10%). Their
/// admissible ranges are enforced by the pool's settings implementation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DemandCurve {
    #[serde(with = "units")]
    pub base_rate: Amount,
    #[serde(with = "units")]
    pub rate_multiplier: Amount,
    #[serde(with = "units")]
    pub low_util_base_rate: Amount,
    #[serde(with = "units")]
    pub low_util_rate_multiplier: Amount,
}

impl DemandCurve {
    /// The same base rate and multiplier above and below the utilization
    /// threshold.
    pub fn uniform(base_rate: Amount, rate_multiplier: Amount) -> Self {
        Self {
            base_rate,
            rate_multiplier,
            low_util_base_rate: base_rate,
            low_util_rate_multiplier: rate_multiplier,
        }
    }
}

impl fmt::Display for DemandCurve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "base {}% x{}% (low util {}% x{}%)",
            format_units(self.base_rate),
            format_units(self.rate_multiplier),
            format_units(self.low_util_base_rate),
            format_units(self.low_util_rate_multiplier),
        )
    }
}
