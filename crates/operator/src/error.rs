use marginctl_core::error::CoreError;
use marginctl_core::types::Amount;
use marginctl_ledger::LedgerError;

#[derive(Debug, thiserror::Error)]
pub enum OperatorError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// The pool's `Burn` event reports a different amount than was requested.
    #[error("Burn event reports {emitted} pool tokens burned, expected {expected}")]
    BurnAmountMismatch { expected: Amount, emitted: Amount },

    #[error("Post-burn balance is {actual}, expected {expected}")]
    BalanceMismatch { expected: Amount, actual: Amount },

    #[error("Balance of {balance} pool tokens leaves nothing to burn")]
    NothingToBurn { balance: Amount },
}
