//! Static vesting schedule tables.
//!
//! Two batches exist: individual vestings, where every row carries its own
//! cliff and duration, and team vestings, which share one schedule.

use serde::{Deserialize, Serialize};

use crate::amount::{checked_sum, units};
use crate::error::CoreError;
use crate::types::{Address, Amount};

/// One row of a vesting table: who receives how much, and on what schedule.
///
/// Rows have no identity beyond their position in the table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VestingEntry {
    pub beneficiary: Address,
    #[serde(with = "units")]
    pub amount: Amount,
    /// Cliff in seconds.
    pub cliff: u64,
    /// Total vesting duration in seconds.
    pub duration: u64,
}

/// Total amount the registry must hold before any entry is created.
pub fn total_amount(entries: &[VestingEntry]) -> Result<Amount, CoreError> {
    checked_sum(entries.iter().map(|e| e.amount))
}

/// Validate a vesting table before any call is issued.
pub fn validate_table(entries: &[VestingEntry]) -> Result<(), CoreError> {
    if entries.is_empty() {
        return Err(CoreError::Validation("vesting table is empty".to_string()));
    }
    validate_entries(entries)
}

/// Check every row on its own and that the table total fits. An empty
/// table passes; it is only rejected when a batch is about to run.
pub fn validate_entries(entries: &[VestingEntry]) -> Result<(), CoreError> {
    for (index, entry) in entries.iter().enumerate() {
        check_row("vesting", index, entry.beneficiary, entry.amount)?;
        check_schedule(
            &format!("vesting entry {index} for {}", entry.beneficiary),
            entry.cliff,
            entry.duration,
        )?;
    }
    total_amount(entries).map(|_| ())
}

// ---------------------------------------------------------------------------
// Team vestings
// ---------------------------------------------------------------------------

/// One beneficiary of the team batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamVestingEntry {
    pub beneficiary: Address,
    #[serde(with = "units")]
    pub amount: Amount,
}

/// Team vestings: every row vests on the same cliff and duration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamVestingTable {
    /// Cliff in seconds, shared by every row.
    pub cliff: u64,
    /// Total vesting duration in seconds, shared by every row.
    pub duration: u64,
    pub entries: Vec<TeamVestingEntry>,
}

impl TeamVestingTable {
    /// Rows expanded to carry the shared schedule.
    pub fn rows(&self) -> Vec<VestingEntry> {
        self.entries
            .iter()
            .map(|e| VestingEntry {
                beneficiary: e.beneficiary,
                amount: e.amount,
                cliff: self.cliff,
                duration: self.duration,
            })
            .collect()
    }

    pub fn total_amount(&self) -> Result<Amount, CoreError> {
        checked_sum(self.entries.iter().map(|e| e.amount))
    }

    /// Same checks as [`validate_entries`]; the schedule is checked once.
    pub fn validate(&self) -> Result<(), CoreError> {
        check_schedule("team vesting schedule", self.cliff, self.duration)?;
        for (index, entry) in self.entries.iter().enumerate() {
            check_row("team vesting", index, entry.beneficiary, entry.amount)?;
        }
        self.total_amount().map(|_| ())
    }
}

fn check_row(kind: &str, index: usize, beneficiary: Address, amount: Amount) -> Result<(), CoreError> {
    if amount.is_zero() {
        return Err(CoreError::Validation(format!(
            "{kind} entry {index} for {beneficiary} has a zero amount"
        )));
    }
    Ok(())
}

fn check_schedule(what: &str, cliff: u64, duration: u64) -> Result<(), CoreError> {
    if cliff > duration {
        return Err(CoreError::Validation(format!(
            "{what}: cliff {cliff}s exceeds duration {duration}s"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use alloy::primitives::U256;
    use assert_matches::assert_matches;

    use super::*;
    use crate::amount::{wad, WAD};

    const FOUR_WEEKS: u64 = 4 * 7 * 24 * 60 * 60;
    const DAY: u64 = 24 * 60 * 60;

    fn entry(byte: u8, amount: Amount) -> VestingEntry {
        VestingEntry {
            beneficiary: Address::repeat_byte(byte),
            amount,
            cliff: FOUR_WEEKS,
            duration: 13 * FOUR_WEEKS,
        }
    }

    fn team(amounts: &[u64]) -> TeamVestingTable {
        TeamVestingTable {
            cliff: 6 * FOUR_WEEKS,
            duration: 1092 * DAY,
            entries: amounts
                .iter()
                .enumerate()
                .map(|(i, a)| TeamVestingEntry {
                    beneficiary: Address::repeat_byte(0x40 + i as u8),
                    amount: wad(*a),
                })
                .collect(),
        }
    }

    #[test]
    fn total_is_exact_sum() {
        let table = vec![entry(1, wad(100_000)), entry(2, wad(200_000)), entry(3, wad(300_000))];
        assert_eq!(total_amount(&table).unwrap(), wad(600_000));
    }

    #[test]
    fn empty_table_rejected() {
        let err = validate_table(&[]).unwrap_err();
        assert!(err.to_string().contains("empty"));
    }

    #[test]
    fn cliff_after_duration_rejected() {
        let mut bad = entry(1, WAD);
        bad.cliff = bad.duration + 1;
        assert_matches!(validate_table(&[bad]), Err(CoreError::Validation(_)));
    }

    #[test]
    fn zero_amount_rejected() {
        assert_matches!(validate_table(&[entry(1, U256::ZERO)]), Err(CoreError::Validation(_)));
    }

    #[test]
    fn deserializes_token_units() {
        let json = r#"{
            "beneficiary": "0x0101010101010101010101010101010101010101",
            "amount": "100000",
            "cliff": 2419200,
            "duration": 31449600
        }"#;
        let parsed: VestingEntry = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.amount, wad(100_000));
        assert_eq!(parsed.beneficiary, Address::repeat_byte(1));
    }

    #[test]
    fn team_rows_share_the_schedule() {
        let table = team(&[10, 20]);
        table.validate().unwrap();
        assert_eq!(table.total_amount().unwrap(), wad(30));

        let rows = table.rows();
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|r| r.cliff == 6 * FOUR_WEEKS && r.duration == 1092 * DAY));
        assert_eq!(rows[1].beneficiary, Address::repeat_byte(0x41));
    }

    #[test]
    fn team_schedule_and_amounts_checked() {
        let mut bad_schedule = team(&[10]);
        bad_schedule.cliff = bad_schedule.duration + 1;
        assert_matches!(bad_schedule.validate(), Err(CoreError::Validation(m)) if m.contains("team vesting schedule"));

        assert_matches!(team(&[10, 0]).validate(), Err(CoreError::Validation(m)) if m.contains("entry 1"));
    }
}
