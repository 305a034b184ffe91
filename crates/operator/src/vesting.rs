//! Vesting subsystem: deployment, batch creation and reads.
//!
//! Both batches run the same way: the registry is funded with the batch
//! total in one transfer, then each row is created, looked up and staked
//! in table order. They differ only in which registry members they use.

use alloy::primitives::{uint, U256};
use alloy::sol_types::{sol_data, SolType, SolValue};
use marginctl_core::amount::format_units;
use marginctl_core::network::Network;
use marginctl_core::types::{Address, Amount};
use marginctl_core::vesting::{total_amount, validate_table, VestingEntry};
use marginctl_ledger::contracts::{Staking, StakingProxy, VestingFactory, VestingRegistry};
use marginctl_ledger::interfaces::artifacts;
use marginctl_ledger::{Ledger, LedgerError, Receipt};

use crate::error::OperatorError;
use crate::operator::{names, Operator};
use crate::report::{CreatedVesting, VestingBatch, VestingDeployment, VestingKind, VestingReport};

/// Initial supply of the vested token and of each development cSOV token.
const INITIAL_SUPPLY: Amount = uint!(100000000000000000000000000_U256);

/// Decimals of the development cSOV tokens.
const CSOV_DECIMALS: u8 = 18;

async fn create_entry<L: Ledger>(
    registry: &VestingRegistry<'_, L>,
    kind: VestingKind,
    entry: &VestingEntry,
) -> Result<Receipt, LedgerError> {
    match kind {
        VestingKind::Individual => {
            registry
                .create_vesting(entry.beneficiary, entry.amount, entry.cliff, entry.duration)
                .await
        }
        VestingKind::Team => {
            registry
                .create_team_vesting(entry.beneficiary, entry.amount, entry.cliff, entry.duration)
                .await
        }
    }
}

async fn lookup<L: Ledger>(
    registry: &VestingRegistry<'_, L>,
    kind: VestingKind,
    beneficiary: Address,
) -> Result<Address, LedgerError> {
    match kind {
        VestingKind::Individual => registry.get_vesting(beneficiary).await,
        VestingKind::Team => registry.get_team_vesting(beneficiary).await,
    }
}

impl<'a, L: Ledger> Operator<'a, L> {
    fn vesting_registry(&self) -> Result<VestingRegistry<'a, L>, OperatorError> {
        Ok(VestingRegistry::new(
            self.ledger,
            self.config.contract(names::VESTING_REGISTRY)?,
            self.account,
        ))
    }

    /// Create every vesting in the network's individual table.
    pub async fn create_vestings(&self) -> Result<VestingBatch, OperatorError> {
        let entries = self.config.vestings.clone();
        self.run_batch(VestingKind::Individual, &entries).await
    }

    /// Create every vesting in the network's team table, all on the
    /// table's shared cliff and duration.
    pub async fn create_team_vestings(&self) -> Result<VestingBatch, OperatorError> {
        let entries = self
            .config
            .team_vestings
            .as_ref()
            .map(|t| t.rows())
            .unwrap_or_default();
        self.run_batch(VestingKind::Team, &entries).await
    }

    async fn run_batch(
        &self,
        kind: VestingKind,
        entries: &[VestingEntry],
    ) -> Result<VestingBatch, OperatorError> {
        validate_table(entries)?;
        let total = total_amount(entries)?;

        let registry = self.vesting_registry()?;
        let token = self.test_token(self.config.contract(names::VESTED_TOKEN)?);

        let funding = token.transfer(registry.address(), total).await?;
        tracing::info!(
            kind = kind.as_str(),
            registry = %registry.address(),
            total = %format_units(total),
            entries = entries.len(),
            tx_hash = %funding.tx_hash,
            "Funded vesting registry",
        );

        let mut created = Vec::with_capacity(entries.len());
        for entry in entries {
            create_entry(&registry, kind, entry).await?;
            let vesting = lookup(&registry, kind, entry.beneficiary).await?;
            registry.stake_tokens(vesting, entry.amount).await?;

            tracing::info!(
                kind = kind.as_str(),
                beneficiary = %entry.beneficiary,
                vesting = %vesting,
                amount = %format_units(entry.amount),
                cliff = entry.cliff,
                duration = entry.duration,
                "Vesting created and staked",
            );
            created.push(CreatedVesting {
                beneficiary: entry.beneficiary,
                vesting,
                amount: entry.amount,
            });
        }

        Ok(VestingBatch {
            kind,
            registry: registry.address(),
            total,
            funding_tx: funding.tx_hash,
            created,
        })
    }

    /// Vesting contract of `beneficiary` (team vesting with `team`) and
    /// what it has staked.
    pub async fn read_vesting(
        &self,
        beneficiary: &str,
        team: bool,
    ) -> Result<VestingReport, OperatorError> {
        let beneficiary = self.resolve_recipient(beneficiary)?;
        let kind = if team {
            VestingKind::Team
        } else {
            VestingKind::Individual
        };
        let vesting = lookup(&self.vesting_registry()?, kind, beneficiary).await?;
        if vesting.is_zero() {
            return Ok(VestingReport {
                beneficiary,
                kind,
                vesting: None,
                staked: U256::ZERO,
            });
        }

        let staking = Staking::new(
            self.ledger,
            self.config.contract(names::STAKING)?,
            self.account,
        );
        Ok(VestingReport {
            beneficiary,
            kind,
            vesting: Some(vesting),
            staked: staking.balance_of(vesting).await?,
        })
    }

    /// Deploy the vesting subsystem from scratch.
    ///
    /// On development the two legacy cSOV tokens are deployed fresh and the
    /// operator owns the vestings; elsewhere both tokens and the owning
    /// multisig come from the address book. `vesting_owner` overrides the
    /// owner on any network.
    pub async fn deploy_vesting(
        &self,
        vesting_owner: Option<Address>,
    ) -> Result<VestingDeployment, OperatorError> {
        let protocol = self.config.contract(names::PROTOCOL)?;

        // 1. Legacy tokens and vesting owner.
        let (csov1, csov2, default_owner) = match self.ledger.network() {
            Network::Development => (
                self.deploy_test_token("cSOV1").await?,
                self.deploy_test_token("cSOV2").await?,
                self.account,
            ),
            Network::Testnet | Network::Mainnet => (
                self.config.contract(names::CSOV1)?,
                self.config.contract(names::CSOV2)?,
                self.config.contract(names::MULTISIG)?,
            ),
        };
        let vesting_owner = vesting_owner.unwrap_or(default_owner);

        // 2. Vested token.
        let sov = self
            .deploy(artifacts::SOV, (INITIAL_SUPPLY,).abi_encode_params())
            .await?;

        // 3. Staking logic behind a proxy holding the vested token.
        let staking_logic = self.deploy(artifacts::STAKING, Vec::new()).await?;
        let staking = self
            .deploy(artifacts::STAKING_PROXY, (sov,).abi_encode_params())
            .await?;
        StakingProxy::new(self.ledger, staking, self.account)
            .set_implementation(staking_logic)
            .await?;

        // 4. Fee sharing, wired into staking.
        let fee_sharing = self
            .deploy(
                artifacts::FEE_SHARING_PROXY,
                (protocol, staking).abi_encode_params(),
            )
            .await?;
        Staking::new(self.ledger, staking, self.account)
            .set_fee_sharing(fee_sharing)
            .await?;

        // 5. Factory and registry; the registry takes over the factory.
        let factory = self.deploy(artifacts::VESTING_FACTORY, Vec::new()).await?;
        let registry = self
            .deploy(
                artifacts::VESTING_REGISTRY,
                (
                    factory,
                    sov,
                    vec![csov1, csov2],
                    staking,
                    fee_sharing,
                    vesting_owner,
                )
                    .abi_encode_params(),
            )
            .await?;
        VestingFactory::new(self.ledger, factory, self.account)
            .transfer_ownership(registry)
            .await?;

        tracing::info!(
            sov = %sov,
            staking = %staking,
            fee_sharing = %fee_sharing,
            factory = %factory,
            registry = %registry,
            vesting_owner = %vesting_owner,
            "Vesting subsystem deployed",
        );

        Ok(VestingDeployment {
            csov1,
            csov2,
            sov,
            staking_logic,
            staking,
            fee_sharing,
            factory,
            registry,
            vesting_owner,
        })
    }

    async fn deploy(&self, artifact: &str, args: Vec<u8>) -> Result<Address, OperatorError> {
        Ok(self.ledger.deploy(self.account, artifact, args).await?)
    }

    /// `TestToken(name, name, 18, 1e26)`.
    async fn deploy_test_token(&self, name: &str) -> Result<Address, OperatorError> {
        let args = <(
            sol_data::String,
            sol_data::String,
            sol_data::Uint<8>,
            sol_data::Uint<256>,
        ) as SolType>::abi_encode_params(&(
            name.to_string(),
            name.to_string(),
            CSOV_DECIMALS,
            INITIAL_SUPPLY,
        ));
        self.deploy(artifacts::TEST_TOKEN, args).await
    }
}
