//! The operator: one signing account on one network.
//!
//! [`Operator::run`] is the dispatch table from [`Action`] to the
//! procedure implementing it. The procedures themselves are further
//! `impl` blocks on [`Operator`], one module per area.

use marginctl_core::network::NetworkConfig;
use marginctl_core::types::{Address, Amount};
use marginctl_ledger::contracts::{LoanToken, PriceFeeds, Protocol, TestToken};
use marginctl_ledger::Ledger;

use crate::action::Action;
use crate::error::OperatorError;
use crate::report::Outcome;

/// Logical names of the shared protocol contracts in the address book.
pub mod names {
    pub const PROTOCOL: &str = "protocol";
    pub const PRICE_FEEDS: &str = "priceFeeds";
    pub const STAKING: &str = "staking";
    pub const VESTING_REGISTRY: &str = "vestingRegistry";
    pub const VESTED_TOKEN: &str = "vestedToken";
    /// Legacy vesting tokens and the owner of created vestings, read
    /// when deploying the vesting subsystem outside development.
    pub const CSOV1: &str = "cSOV1";
    pub const CSOV2: &str = "cSOV2";
    pub const MULTISIG: &str = "multisig";

    /// `iDOC` -> `iDOCSettings`.
    pub fn settings_of(pool: &str) -> String {
        format!("{pool}Settings")
    }

    /// `iDOC` -> `iDOCLogic`.
    pub fn logic_of(pool: &str) -> String {
        format!("{pool}Logic")
    }
}

/// Runs actions against `ledger` as `account`, resolving contract names
/// through `config`.
pub struct Operator<'a, L> {
    pub(crate) ledger: &'a L,
    pub(crate) config: &'a NetworkConfig,
    pub(crate) account: Address,
}

impl<'a, L: Ledger> Operator<'a, L> {
    /// Bind to the account configured under `account_name`.
    pub fn new(
        ledger: &'a L,
        config: &'a NetworkConfig,
        account_name: &str,
    ) -> Result<Self, OperatorError> {
        let account = ledger.account(account_name)?;
        Ok(Self {
            ledger,
            config,
            account,
        })
    }

    pub fn account(&self) -> Address {
        self.account
    }

    /// Run one action to completion.
    ///
    /// The first rejected call ends the action with its error. Calls that
    /// were already confirmed stay on the ledger.
    pub async fn run(&self, action: Action) -> Result<Outcome, OperatorError> {
        tracing::info!(
            action = action.name(),
            network = %self.ledger.network(),
            account = %self.account,
            "Running action",
        );

        let outcome = match action {
            Action::ReadLoan { loan_id } => Outcome::ReadLoan(self.read_loan(loan_id).await?),
            Action::ReadPool { pool } => Outcome::ReadPool(self.read_pool(&pool).await?),
            Action::ReadPrice {
                source,
                destination,
            } => Outcome::ReadPrice(self.read_price(&source, &destination).await?),
            Action::SetPrice {
                source,
                destination,
                rate,
            } => Outcome::SetPrice(self.set_price(&source, &destination, rate).await?),
            Action::MintToken { token, amount, to } => {
                Outcome::MintToken(self.mint_token(&token, amount, to.as_deref()).await?)
            }
            Action::BurnToken {
                token,
                from,
                amount,
            } => Outcome::BurnToken(self.burn_token(&token, &from, amount).await?),
            Action::Lend { pool, amount } => Outcome::Lend(self.lend(&pool, amount).await?),
            Action::Burn { pool, deposit } => Outcome::Burn(self.burn(&pool, deposit).await?),
            Action::ReadLendingFee => Outcome::ReadLendingFee(self.read_lending_fee().await?),
            Action::Liquidate { loan_id } => Outcome::Liquidate(self.liquidate(loan_id).await?),
            Action::TradeRoundTrip {
                pool,
                collateral,
                amount,
                leverage,
            } => Outcome::TradeRoundTrip(
                self.trade_round_trip(&pool, &collateral, amount, leverage)
                    .await?,
            ),
            Action::SetDemandCurve {
                pool,
                curve,
                settings,
                logic,
            } => Outcome::SetDemandCurve(
                self.set_demand_curve(&pool, &curve, settings.as_deref(), logic.as_deref())
                    .await?,
            ),
            Action::CreateVestings => Outcome::CreateVestings(self.create_vestings().await?),
            Action::CreateTeamVestings => {
                Outcome::CreateVestings(self.create_team_vestings().await?)
            }
            Action::ReadVesting { beneficiary, team } => {
                Outcome::ReadVesting(self.read_vesting(&beneficiary, team).await?)
            }
            Action::DeployVesting { vesting_owner } => {
                Outcome::DeployVesting(self.deploy_vesting(vesting_owner).await?)
            }
        };

        Ok(outcome)
    }

    // -----------------------------------------------------------------------
    // Name resolution and handles
    // -----------------------------------------------------------------------

    /// Contract name or literal address to an address.
    pub(crate) fn resolve(&self, name_or_address: &str) -> Result<Address, OperatorError> {
        Ok(self.config.resolve(name_or_address)?)
    }

    /// Account name, contract name or literal address to an address.
    pub(crate) fn resolve_recipient(&self, name_or_address: &str) -> Result<Address, OperatorError> {
        match self.config.account(name_or_address) {
            Some(address) => Ok(address),
            None => self.resolve(name_or_address),
        }
    }

    pub(crate) fn test_token(&self, address: Address) -> TestToken<'a, L> {
        TestToken::new(self.ledger, address, self.account)
    }

    pub(crate) fn pool(&self, name_or_address: &str) -> Result<LoanToken<'a, L>, OperatorError> {
        Ok(LoanToken::new(
            self.ledger,
            self.resolve(name_or_address)?,
            self.account,
        ))
    }

    pub(crate) fn protocol(&self) -> Result<Protocol<'a, L>, OperatorError> {
        Ok(Protocol::new(
            self.ledger,
            self.config.contract(names::PROTOCOL)?,
            self.account,
        ))
    }

    pub(crate) fn price_feeds(&self) -> Result<PriceFeeds<'a, L>, OperatorError> {
        Ok(PriceFeeds::new(
            self.ledger,
            self.config.contract(names::PRICE_FEEDS)?,
            self.account,
        ))
    }

    /// Mint `amount` of `token` to the operator and approve `spender` for it.
    pub(crate) async fn fund_and_approve(
        &self,
        token: Address,
        spender: Address,
        amount: Amount,
    ) -> Result<(), OperatorError> {
        let token = self.test_token(token);
        token.mint(self.account, amount).await?;
        token.approve(spender, amount).await?;
        Ok(())
    }
}
