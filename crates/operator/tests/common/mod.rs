//! Scripted, recording ledger for operator integration tests.
//!
//! [`MockLedger`] answers read calls from canned responses, attaches
//! canned event logs to receipts, and records every call, send and deploy
//! in order so tests can assert on the exact sequence an action issued.

#![allow(dead_code)]

use std::collections::{BTreeMap, HashMap, VecDeque};
use std::path::PathBuf;
use std::sync::Mutex;

use alloy::primitives::{Log, B256, U256};
use alloy::sol_types::{SolCall, SolEvent, SolValue};
use marginctl_core::amount::wad;
use marginctl_core::network::{Network, NetworkConfig};
use marginctl_core::types::{Address, Amount};
use marginctl_core::vesting::{TeamVestingTable, VestingEntry};
use marginctl_ledger::interfaces::{ILoanToken, IProtocol};
use marginctl_ledger::{Ledger, LedgerError, Receipt};

// ---------------------------------------------------------------------------
// Fixture addresses
// ---------------------------------------------------------------------------

pub const fn addr(byte: u8) -> Address {
    Address::repeat_byte(byte)
}

pub const OPERATOR: Address = addr(0x01);
pub const PROTOCOL: Address = addr(0x10);
pub const PRICE_FEEDS: Address = addr(0x11);
pub const STAKING: Address = addr(0x12);
pub const FEE_SHARING: Address = addr(0x13);
pub const VESTING_REGISTRY: Address = addr(0x14);
pub const VESTING_FACTORY: Address = addr(0x15);
pub const VESTED_TOKEN: Address = addr(0x16);
pub const POOL: Address = addr(0x20);
pub const UNDERLYING: Address = addr(0x21);
pub const COLLATERAL: Address = addr(0x22);
pub const POOL_SETTINGS: Address = addr(0x23);
pub const POOL_LOGIC: Address = addr(0x24);
pub const BTC_POOL: Address = addr(0x30);
pub const BTC_POOL_SETTINGS: Address = addr(0x33);
pub const BTC_POOL_LOGIC: Address = addr(0x34);
pub const CSOV1: Address = addr(0x40);
pub const CSOV2: Address = addr(0x41);
pub const MULTISIG: Address = addr(0x42);

/// Development network section with every logical name wired to a
/// fixture address and the given vesting table.
pub fn network_config(vestings: Vec<VestingEntry>) -> NetworkConfig {
    let contracts = [
        ("protocol", PROTOCOL),
        ("priceFeeds", PRICE_FEEDS),
        ("staking", STAKING),
        ("feeSharing", FEE_SHARING),
        ("vestingRegistry", VESTING_REGISTRY),
        ("vestingFactory", VESTING_FACTORY),
        ("vestedToken", VESTED_TOKEN),
        ("iDOC", POOL),
        ("iDOCSettings", POOL_SETTINGS),
        ("iDOCLogic", POOL_LOGIC),
        ("iRBTC", BTC_POOL),
        ("iRBTCSettings", BTC_POOL_SETTINGS),
        ("iRBTCLogic", BTC_POOL_LOGIC),
        ("DoC", UNDERLYING),
        ("WRBTC", COLLATERAL),
        ("cSOV1", CSOV1),
        ("cSOV2", CSOV2),
        ("multisig", MULTISIG),
    ]
    .into_iter()
    .map(|(name, address)| (name.to_string(), address))
    .collect();

    NetworkConfig {
        network: Network::Development,
        rpc_url: "http://127.0.0.1:8545".to_string(),
        chain_id: None,
        receipt_poll_ms: 1,
        artifacts_dir: PathBuf::from("build/contracts"),
        accounts: BTreeMap::from([("operator".to_string(), OPERATOR)]),
        contracts,
        vestings,
        team_vestings: None,
    }
}

/// Same as [`network_config`] with a team table added.
pub fn network_config_with_team(vestings: Vec<VestingEntry>, team: TeamVestingTable) -> NetworkConfig {
    NetworkConfig {
        team_vestings: Some(team),
        ..network_config(vestings)
    }
}

// ---------------------------------------------------------------------------
// Journal
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entry {
    Call {
        to: Address,
        function: &'static str,
        input: Vec<u8>,
    },
    Send {
        from: Address,
        to: Address,
        function: &'static str,
        input: Vec<u8>,
    },
    Deploy {
        artifact: String,
        args: Vec<u8>,
    },
}

/// `balanceOf` for `balanceOf(address)`.
fn function_name<C: SolCall>() -> &'static str {
    C::SIGNATURE.split('(').next().unwrap_or(C::SIGNATURE)
}

// ---------------------------------------------------------------------------
// MockLedger
// ---------------------------------------------------------------------------

pub struct MockLedger {
    network: Network,
    accounts: BTreeMap<String, Address>,
    /// Canned ABI-encoded return data per `(contract, selector)`. The last
    /// response in a queue is repeated once the others are used up.
    reads: Mutex<HashMap<(Address, [u8; 4]), VecDeque<Vec<u8>>>>,
    /// Logs attached to the receipt of a send per `(contract, selector)`.
    events: Mutex<HashMap<(Address, [u8; 4]), Vec<Log>>>,
    /// Sends of this function name are rejected as reverted.
    reject: Mutex<Option<&'static str>>,
    journal: Mutex<Vec<Entry>>,
}

impl MockLedger {
    pub fn new() -> Self {
        Self::on(Network::Development)
    }

    pub fn on(network: Network) -> Self {
        Self {
            network,
            accounts: BTreeMap::from([("operator".to_string(), OPERATOR)]),
            reads: Mutex::default(),
            events: Mutex::default(),
            reject: Mutex::default(),
            journal: Mutex::default(),
        }
    }

    /// Queue `value` as the return of a read of `C` on `to`.
    pub fn respond<C: SolCall>(&self, to: Address, value: impl SolValue) {
        self.respond_raw::<C>(to, value.abi_encode());
    }

    /// Queue already-encoded return data.
    pub fn respond_raw<C: SolCall>(&self, to: Address, data: Vec<u8>) {
        self.reads
            .lock()
            .unwrap()
            .entry((to, C::SELECTOR))
            .or_default()
            .push_back(data);
    }

    /// Attach `event`, emitted by `emitter`, to every receipt of `C` sent
    /// to `to`.
    pub fn emit<C: SolCall, E: SolEvent>(&self, to: Address, emitter: Address, event: &E) {
        self.emit_log::<C>(
            to,
            Log {
                address: emitter,
                data: event.encode_log_data(),
            },
        );
    }

    pub fn emit_log<C: SolCall>(&self, to: Address, log: Log) {
        self.events
            .lock()
            .unwrap()
            .entry((to, C::SELECTOR))
            .or_default()
            .push(log);
    }

    /// Revert every send of the function named `function`.
    pub fn reject(&self, function: &'static str) {
        *self.reject.lock().unwrap() = Some(function);
    }

    pub fn journal(&self) -> Vec<Entry> {
        self.journal.lock().unwrap().clone()
    }

    /// Sends only, in order, as `(contract, function name)`.
    pub fn sends(&self) -> Vec<(Address, &'static str)> {
        self.journal()
            .into_iter()
            .filter_map(|e| match e {
                Entry::Send { to, function, .. } => Some((to, function)),
                _ => None,
            })
            .collect()
    }

    /// Every send of `C`, decoded, with its target.
    pub fn sent<C: SolCall>(&self) -> Vec<(Address, C)> {
        self.journal()
            .into_iter()
            .filter_map(|e| match e {
                Entry::Send { to, input, .. } if input.starts_with(&C::SELECTOR) => {
                    Some((to, C::abi_decode(&input).unwrap()))
                }
                _ => None,
            })
            .collect()
    }

    /// Every read of `C`, decoded, with its target.
    pub fn called<C: SolCall>(&self) -> Vec<(Address, C)> {
        self.journal()
            .into_iter()
            .filter_map(|e| match e {
                Entry::Call { to, input, .. } if input.starts_with(&C::SELECTOR) => {
                    Some((to, C::abi_decode(&input).unwrap()))
                }
                _ => None,
            })
            .collect()
    }

    /// Names of sent functions, in order.
    pub fn sent_functions(&self) -> Vec<&'static str> {
        self.sends().into_iter().map(|(_, f)| f).collect()
    }

    /// Deploys only, in order, as `(artifact, constructor args)`.
    pub fn deploys(&self) -> Vec<(String, Vec<u8>)> {
        self.journal()
            .into_iter()
            .filter_map(|e| match e {
                Entry::Deploy { artifact, args } => Some((artifact, args)),
                _ => None,
            })
            .collect()
    }

    /// Sends and deploys. Reads are not writes.
    pub fn write_count(&self) -> usize {
        self.journal()
            .iter()
            .filter(|e| !matches!(e, Entry::Call { .. }))
            .count()
    }

    fn record(&self, entry: Entry) -> usize {
        let mut journal = self.journal.lock().unwrap();
        journal.push(entry);
        journal.len()
    }
}

/// Address the mock assigns to a deploy recorded as journal entry `index`
/// (1-based).
pub fn deployed_at(index: usize) -> Address {
    addr(0xd0 + index as u8)
}

impl Ledger for MockLedger {
    fn network(&self) -> Network {
        self.network
    }

    fn account(&self, name: &str) -> Result<Address, LedgerError> {
        self.accounts
            .get(name)
            .copied()
            .ok_or_else(|| LedgerError::UnknownAccount(name.to_string()))
    }

    async fn call<C>(&self, to: Address, call: C) -> Result<C::Return, LedgerError>
    where
        C: SolCall + Send + 'static,
    {
        self.record(Entry::Call {
            to,
            function: function_name::<C>(),
            input: call.abi_encode(),
        });

        let data = {
            let mut reads = self.reads.lock().unwrap();
            let queue = reads.get_mut(&(to, C::SELECTOR)).ok_or_else(|| {
                LedgerError::Malformed(format!(
                    "no scripted response for {} on {to}",
                    function_name::<C>()
                ))
            })?;
            if queue.len() > 1 {
                queue.pop_front()
            } else {
                queue.front().cloned()
            }
        };
        let data = data.ok_or_else(|| LedgerError::Malformed("empty response queue".to_string()))?;
        Ok(C::abi_decode_returns(&data)?)
    }

    async fn send<C>(&self, from: Address, to: Address, call: C) -> Result<Receipt, LedgerError>
    where
        C: SolCall + Send + 'static,
    {
        let function = function_name::<C>();
        let index = self.record(Entry::Send {
            from,
            to,
            function,
            input: call.abi_encode(),
        });
        let tx_hash = B256::left_padding_from(&(index as u64).to_be_bytes());

        if *self.reject.lock().unwrap() == Some(function) {
            return Err(LedgerError::Reverted { tx_hash });
        }

        let logs = self
            .events
            .lock()
            .unwrap()
            .get(&(to, C::SELECTOR))
            .cloned()
            .unwrap_or_default();

        Ok(Receipt {
            tx_hash,
            block_number: Some(index as u64),
            logs,
        })
    }

    async fn deploy(
        &self,
        _from: Address,
        artifact: &str,
        constructor_args: Vec<u8>,
    ) -> Result<Address, LedgerError> {
        let index = self.record(Entry::Deploy {
            artifact: artifact.to_string(),
            args: constructor_args,
        });
        Ok(deployed_at(index))
    }
}

// ---------------------------------------------------------------------------
// Event builders
// ---------------------------------------------------------------------------

pub fn trade_event(loan_id: B256, position_size: Amount) -> IProtocol::Trade {
    IProtocol::Trade {
        user: OPERATOR,
        lender: POOL,
        loanId: loan_id,
        collateralToken: COLLATERAL,
        loanToken: UNDERLYING,
        positionSize: position_size,
        borrowedAmount: position_size / U256::from(2),
        interestRate: wad(5),
        settlementDate: U256::from(1_700_000_000u64),
        entryPrice: wad(30_000),
        entryLeverage: wad(2),
        currentLeverage: wad(2),
    }
}

pub fn mint_event(token_amount: Amount) -> ILoanToken::Mint {
    ILoanToken::Mint {
        minter: OPERATOR,
        tokenAmount: token_amount,
        assetAmount: token_amount * U256::from(2),
        price: U256::from(2),
    }
}

pub fn burn_event(token_amount: Amount) -> ILoanToken::Burn {
    ILoanToken::Burn {
        burner: OPERATOR,
        tokenAmount: token_amount,
        assetAmount: token_amount * U256::from(2),
        price: U256::from(2),
    }
}

/// `getLoan` return value for a loan of `UNDERLYING` against `COLLATERAL`.
pub fn loan_data(
    loan_id: B256,
    maintenance_margin: Amount,
    current_margin: Amount,
    max_liquidatable: Amount,
) -> IProtocol::LoanReturnData {
    IProtocol::LoanReturnData {
        loanId: loan_id,
        loanToken: UNDERLYING,
        collateralToken: COLLATERAL,
        principal: U256::from(1_000),
        collateral: U256::from(2_000),
        interestOwedPerDay: U256::from(1),
        interestDepositRemaining: U256::from(28),
        startRate: U256::from(5),
        startMargin: U256::from(50),
        maintenanceMargin: maintenance_margin,
        currentMargin: current_margin,
        maxLoanTerm: U256::from(2_419_200),
        endTimestamp: U256::from(1_700_000_000u64),
        maxLiquidatable: max_liquidatable,
        maxSeizable: max_liquidatable + U256::from(10),
    }
}
