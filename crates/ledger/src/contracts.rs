//! Typed contract handles.
//!
//! A handle binds a ledger, a contract address and the signing account
//! used for writes, and exposes the interface shape's members as typed
//! async methods. Handles are cheap; build one per use.

use alloy::primitives::{Bytes, U256};
use alloy::sol_types::SolCall;

use marginctl_core::curve::DemandCurve;
use marginctl_core::loan::Loan;
use marginctl_core::types::{Address, Amount, LoanId};

use crate::interfaces::{
    ILoanToken, ILoanTokenSettings, IPriceFeeds, IProtocol, IStaking, IStakingProxy, ITestToken,
    IVestingFactory, IVestingRegistry,
};
use crate::ledger::{Ledger, LedgerError, Receipt};

/// Shared plumbing behind every typed handle.
struct Handle<'a, L> {
    ledger: &'a L,
    address: Address,
    account: Address,
}

impl<'a, L: Ledger> Handle<'a, L> {
    fn new(ledger: &'a L, address: Address, account: Address) -> Self {
        Self {
            ledger,
            address,
            account,
        }
    }

    async fn call<C>(&self, call: C) -> Result<C::Return, LedgerError>
    where
        C: SolCall + Send + 'static,
    {
        self.ledger.call(self.address, call).await
    }

    async fn send<C>(&self, call: C) -> Result<Receipt, LedgerError>
    where
        C: SolCall + Send + 'static,
    {
        self.ledger.send(self.account, self.address, call).await
    }
}

// ---------------------------------------------------------------------------
// Test token
// ---------------------------------------------------------------------------

/// Mintable, burnable ERC-20.
pub struct TestToken<'a, L> {
    inner: Handle<'a, L>,
}

impl<'a, L: Ledger> TestToken<'a, L> {
    pub fn new(ledger: &'a L, address: Address, account: Address) -> Self {
        Self {
            inner: Handle::new(ledger, address, account),
        }
    }

    pub fn address(&self) -> Address {
        self.inner.address
    }

    pub async fn mint(&self, to: Address, value: Amount) -> Result<Receipt, LedgerError> {
        self.inner.send(ITestToken::mintCall { to, value }).await
    }

    /// Destroy `value` of `from`'s balance.
    pub async fn burn(&self, from: Address, value: Amount) -> Result<Receipt, LedgerError> {
        self.inner.send(ITestToken::burnCall { from, value }).await
    }

    pub async fn approve(&self, spender: Address, value: Amount) -> Result<Receipt, LedgerError> {
        self.inner
            .send(ITestToken::approveCall { spender, value })
            .await
    }

    pub async fn transfer(&self, to: Address, value: Amount) -> Result<Receipt, LedgerError> {
        self.inner.send(ITestToken::transferCall { to, value }).await
    }

    pub async fn balance_of(&self, owner: Address) -> Result<Amount, LedgerError> {
        self.inner.call(ITestToken::balanceOfCall { owner }).await
    }
}

// ---------------------------------------------------------------------------
// Loan token (lending pool)
// ---------------------------------------------------------------------------

/// Lending pool token proxy, targeting its logic implementation.
pub struct LoanToken<'a, L> {
    inner: Handle<'a, L>,
}

impl<'a, L: Ledger> LoanToken<'a, L> {
    pub fn new(ledger: &'a L, address: Address, account: Address) -> Self {
        Self {
            inner: Handle::new(ledger, address, account),
        }
    }

    pub fn address(&self) -> Address {
        self.inner.address
    }

    /// Open (or add to, when `loan_id` is not [`LoanId::NEW`]) a leveraged
    /// position for `trader`.
    pub async fn margin_trade(
        &self,
        loan_id: LoanId,
        leverage: Amount,
        loan_token_sent: Amount,
        collateral_token_sent: Amount,
        collateral_token: Address,
        trader: Address,
    ) -> Result<Receipt, LedgerError> {
        self.inner
            .send(ILoanToken::marginTradeCall {
                loanId: loan_id.as_b256(),
                leverageAmount: leverage,
                loanTokenSent: loan_token_sent,
                collateralTokenSent: collateral_token_sent,
                collateralTokenAddress: collateral_token,
                trader,
                loanDataBytes: Bytes::new(),
            })
            .await
    }

    /// Deposit underlying and mint pool tokens to `receiver`.
    pub async fn mint(&self, receiver: Address, deposit: Amount) -> Result<Receipt, LedgerError> {
        self.inner
            .send(ILoanToken::mintCall {
                receiver,
                depositAmount: deposit,
            })
            .await
    }

    /// Burn pool tokens and pay the underlying out to `receiver`.
    pub async fn burn(&self, receiver: Address, amount: Amount) -> Result<Receipt, LedgerError> {
        self.inner
            .send(ILoanToken::burnCall {
                receiver,
                burnAmount: amount,
            })
            .await
    }

    pub async fn balance_of(&self, owner: Address) -> Result<Amount, LedgerError> {
        self.inner.call(ILoanToken::balanceOfCall { owner }).await
    }

    /// The pool's underlying asset.
    pub async fn loan_token_address(&self) -> Result<Address, LedgerError> {
        self.inner.call(ILoanToken::loanTokenAddressCall {}).await
    }

    pub async fn total_asset_supply(&self) -> Result<Amount, LedgerError> {
        self.inner.call(ILoanToken::totalAssetSupplyCall {}).await
    }

    pub async fn total_asset_borrow(&self) -> Result<Amount, LedgerError> {
        self.inner.call(ILoanToken::totalAssetBorrowCall {}).await
    }

    pub async fn supply_interest_rate(&self) -> Result<Amount, LedgerError> {
        self.inner.call(ILoanToken::supplyInterestRateCall {}).await
    }

    pub async fn borrow_interest_rate(&self) -> Result<Amount, LedgerError> {
        self.inner.call(ILoanToken::borrowInterestRateCall {}).await
    }

    pub async fn avg_borrow_interest_rate(&self) -> Result<Amount, LedgerError> {
        self.inner.call(ILoanToken::avgBorrowInterestRateCall {}).await
    }

    /// Supply rate the pool would pay after a further deposit of `supply_amount`.
    pub async fn next_supply_interest_rate(&self, supply_amount: Amount) -> Result<Amount, LedgerError> {
        self.inner
            .call(ILoanToken::nextSupplyInterestRateCall {
                supplyAmount: supply_amount,
            })
            .await
    }

    pub async fn market_liquidity(&self) -> Result<Amount, LedgerError> {
        self.inner.call(ILoanToken::marketLiquidityCall {}).await
    }

    pub async fn token_price(&self) -> Result<Amount, LedgerError> {
        self.inner.call(ILoanToken::tokenPriceCall {}).await
    }

    /// Retarget the proxy at its settings implementation.
    ///
    /// Consumes the handle: until [`SettingsWindow::exit`] points the proxy
    /// back at `logic`, only the settings surface is reachable.
    pub async fn enter_settings(
        self,
        settings: Address,
    ) -> Result<SettingsWindow<'a, L>, LedgerError> {
        let receipt = self
            .inner
            .send(ILoanToken::setTargetCall { target: settings })
            .await?;
        tracing::info!(
            pool = %self.inner.address,
            target = %settings,
            tx_hash = %receipt.tx_hash,
            "Pool proxy retargeted to settings",
        );
        Ok(SettingsWindow { inner: self.inner })
    }
}

/// A pool proxy currently targeting its settings implementation.
pub struct SettingsWindow<'a, L> {
    inner: Handle<'a, L>,
}

impl<'a, L: Ledger> SettingsWindow<'a, L> {
    pub fn address(&self) -> Address {
        self.inner.address
    }

    pub async fn set_demand_curve(&self, curve: &DemandCurve) -> Result<Receipt, LedgerError> {
        self.inner
            .send(ILoanTokenSettings::setDemandCurveCall {
                baseRate: curve.base_rate,
                rateMultiplier: curve.rate_multiplier,
                lowUtilBaseRate: curve.low_util_base_rate,
                lowUtilRateMultiplier: curve.low_util_rate_multiplier,
            })
            .await
    }

    /// Retarget the proxy at `logic` and hand back the pool handle.
    pub async fn exit(self, logic: Address) -> Result<LoanToken<'a, L>, LedgerError> {
        let receipt = self
            .inner
            .send(ILoanToken::setTargetCall { target: logic })
            .await?;
        tracing::info!(
            pool = %self.inner.address,
            target = %logic,
            tx_hash = %receipt.tx_hash,
            "Pool proxy retargeted to logic",
        );
        Ok(LoanToken { inner: self.inner })
    }
}

// ---------------------------------------------------------------------------
// Protocol
// ---------------------------------------------------------------------------

/// Protocol / liquidation engine.
pub struct Protocol<'a, L> {
    inner: Handle<'a, L>,
}

impl<'a, L: Ledger> Protocol<'a, L> {
    pub fn new(ledger: &'a L, address: Address, account: Address) -> Self {
        Self {
            inner: Handle::new(ledger, address, account),
        }
    }

    pub fn address(&self) -> Address {
        self.inner.address
    }

    pub async fn get_loan(&self, loan_id: LoanId) -> Result<Loan, LedgerError> {
        let data = self
            .inner
            .call(IProtocol::getLoanCall {
                loanId: loan_id.as_b256(),
            })
            .await?;
        decode_loan(data)
    }

    pub async fn close_with_swap(
        &self,
        loan_id: LoanId,
        receiver: Address,
        swap_amount: Amount,
        return_token_is_collateral: bool,
    ) -> Result<Receipt, LedgerError> {
        self.inner
            .send(IProtocol::closeWithSwapCall {
                loanId: loan_id.as_b256(),
                receiver,
                swapAmount: swap_amount,
                returnTokenIsCollateral: return_token_is_collateral,
                loanDataBytes: Bytes::new(),
            })
            .await
    }

    pub async fn liquidate(
        &self,
        loan_id: LoanId,
        receiver: Address,
        close_amount: Amount,
    ) -> Result<Receipt, LedgerError> {
        self.inner
            .send(IProtocol::liquidateCall {
                loanId: loan_id.as_b256(),
                receiver,
                closeAmount: close_amount,
            })
            .await
    }

    pub async fn lending_fee_tokens_held(&self, token: Address) -> Result<Amount, LedgerError> {
        self.inner
            .call(IProtocol::lendingFeeTokensHeldCall { token })
            .await
    }

    /// Share of borrower interest the protocol keeps, 18-decimal percent.
    pub async fn lending_fee_percent(&self) -> Result<Amount, LedgerError> {
        self.inner.call(IProtocol::lendingFeePercentCall {}).await
    }
}

/// Map a `getLoan` return value onto a [`Loan`].
pub fn decode_loan(data: IProtocol::LoanReturnData) -> Result<Loan, LedgerError> {
    let seconds = |field: &str, value: U256| -> Result<u64, LedgerError> {
        u64::try_from(value)
            .map_err(|_| LedgerError::Malformed(format!("getLoan {field} {value} is not a timestamp")))
    };

    Ok(Loan {
        loan_id: LoanId::from(data.loanId),
        loan_token: data.loanToken,
        collateral_token: data.collateralToken,
        principal: data.principal,
        collateral: data.collateral,
        interest_owed_per_day: data.interestOwedPerDay,
        interest_deposit_remaining: data.interestDepositRemaining,
        start_rate: data.startRate,
        start_margin: data.startMargin,
        maintenance_margin: data.maintenanceMargin,
        current_margin: data.currentMargin,
        max_loan_term: seconds("maxLoanTerm", data.maxLoanTerm)?,
        end_timestamp: seconds("endTimestamp", data.endTimestamp)?,
        max_liquidatable: data.maxLiquidatable,
        max_seizable: data.maxSeizable,
    })
}

// ---------------------------------------------------------------------------
// Price feeds, staking, vesting
// ---------------------------------------------------------------------------

/// Price-feed oracle.
pub struct PriceFeeds<'a, L> {
    inner: Handle<'a, L>,
}

impl<'a, L: Ledger> PriceFeeds<'a, L> {
    pub fn new(ledger: &'a L, address: Address, account: Address) -> Self {
        Self {
            inner: Handle::new(ledger, address, account),
        }
    }

    /// Returns `(rate, precision)` for converting `source` into `destination`.
    pub async fn query_rate(
        &self,
        source: Address,
        destination: Address,
    ) -> Result<(Amount, Amount), LedgerError> {
        let out = self
            .inner
            .call(IPriceFeeds::queryRateCall {
                sourceToken: source,
                destToken: destination,
            })
            .await?;
        Ok((out.rate, out.precision))
    }

    pub async fn set_rates(
        &self,
        source: Address,
        destination: Address,
        rate: Amount,
    ) -> Result<Receipt, LedgerError> {
        self.inner
            .send(IPriceFeeds::setRatesCall {
                sourceToken: source,
                destToken: destination,
                rate,
            })
            .await
    }
}

pub struct Staking<'a, L> {
    inner: Handle<'a, L>,
}

impl<'a, L: Ledger> Staking<'a, L> {
    pub fn new(ledger: &'a L, address: Address, account: Address) -> Self {
        Self {
            inner: Handle::new(ledger, address, account),
        }
    }

    pub async fn balance_of(&self, account: Address) -> Result<Amount, LedgerError> {
        self.inner.call(IStaking::balanceOfCall { account }).await
    }

    pub async fn set_fee_sharing(&self, fee_sharing: Address) -> Result<Receipt, LedgerError> {
        self.inner
            .send(IStaking::setFeeSharingCall {
                feeSharing: fee_sharing,
            })
            .await
    }
}

pub struct StakingProxy<'a, L> {
    inner: Handle<'a, L>,
}

impl<'a, L: Ledger> StakingProxy<'a, L> {
    pub fn new(ledger: &'a L, address: Address, account: Address) -> Self {
        Self {
            inner: Handle::new(ledger, address, account),
        }
    }

    pub async fn set_implementation(&self, implementation: Address) -> Result<Receipt, LedgerError> {
        self.inner
            .send(IStakingProxy::setImplementationCall { implementation })
            .await
    }
}

pub struct VestingRegistry<'a, L> {
    inner: Handle<'a, L>,
}

impl<'a, L: Ledger> VestingRegistry<'a, L> {
    pub fn new(ledger: &'a L, address: Address, account: Address) -> Self {
        Self {
            inner: Handle::new(ledger, address, account),
        }
    }

    pub fn address(&self) -> Address {
        self.inner.address
    }

    pub async fn create_vesting(
        &self,
        beneficiary: Address,
        amount: Amount,
        cliff: u64,
        duration: u64,
    ) -> Result<Receipt, LedgerError> {
        self.inner
            .send(IVestingRegistry::createVestingCall {
                tokenOwner: beneficiary,
                amount,
                cliff: U256::from(cliff),
                duration: U256::from(duration),
            })
            .await
    }

    pub async fn create_team_vesting(
        &self,
        beneficiary: Address,
        amount: Amount,
        cliff: u64,
        duration: u64,
    ) -> Result<Receipt, LedgerError> {
        self.inner
            .send(IVestingRegistry::createTeamVestingCall {
                tokenOwner: beneficiary,
                amount,
                cliff: U256::from(cliff),
                duration: U256::from(duration),
            })
            .await
    }

    pub async fn stake_tokens(&self, vesting: Address, amount: Amount) -> Result<Receipt, LedgerError> {
        self.inner
            .send(IVestingRegistry::stakeTokensCall { vesting, amount })
            .await
    }

    /// Vesting contract created for `beneficiary`, zero if none.
    pub async fn get_vesting(&self, beneficiary: Address) -> Result<Address, LedgerError> {
        self.inner
            .call(IVestingRegistry::getVestingCall {
                tokenOwner: beneficiary,
            })
            .await
    }

    /// Team vesting contract created for `beneficiary`, zero if none.
    pub async fn get_team_vesting(&self, beneficiary: Address) -> Result<Address, LedgerError> {
        self.inner
            .call(IVestingRegistry::getTeamVestingCall {
                tokenOwner: beneficiary,
            })
            .await
    }
}

pub struct VestingFactory<'a, L> {
    inner: Handle<'a, L>,
}

impl<'a, L: Ledger> VestingFactory<'a, L> {
    pub fn new(ledger: &'a L, address: Address, account: Address) -> Self {
        Self {
            inner: Handle::new(ledger, address, account),
        }
    }

    pub async fn transfer_ownership(&self, new_owner: Address) -> Result<Receipt, LedgerError> {
        self.inner
            .send(IVestingFactory::transferOwnershipCall { newOwner: new_owner })
            .await
    }
}
