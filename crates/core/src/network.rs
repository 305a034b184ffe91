//! Per-network address book.
//!
//! A single JSON document maps each network name to the node endpoint,
//! named accounts, named contract addresses and the vesting table for
//! that network. The document is validated as a whole when loaded so a
//! typo in any section stops the process before a transaction is sent.
//!
//! ```json
//! {
//!   "development": {
//!     "rpc_url": "http://127.0.0.1:8545",
//!     "chain_id": 31337,
//!     "accounts": { "operator": "0x..." },
//!     "contracts": { "protocol": "0x...", "iDOC": "0x..." },
//!     "vestings": [ { "beneficiary": "0x...", "amount": "100000", "cliff": 2419200, "duration": 31449600 } ],
//!     "team_vestings": { "cliff": 14515200, "duration": 94348800, "entries": [ { "beneficiary": "0x...", "amount": "50000" } ] }
//!   }
//! }
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{parse_address, Address};
use crate::vesting::{validate_entries, TeamVestingTable, VestingEntry};

/// Default interval between receipt polls.
const DEFAULT_RECEIPT_POLL_MS: u64 = 1_000;

/// Default location of compiled contract artifacts.
const DEFAULT_ARTIFACTS_DIR: &str = "build/contracts";

// ---------------------------------------------------------------------------
// Network
// ---------------------------------------------------------------------------

/// The three environments the tooling knows how to target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    /// Local development chain.
    #[default]
    Development,
    /// Public test network.
    Testnet,
    /// Production network.
    Mainnet,
}

impl Network {
    pub const ALL: [Network; 3] = [Network::Development, Network::Testnet, Network::Mainnet];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Testnet => "testnet",
            Self::Mainnet => "mainnet",
        }
    }
}

impl FromStr for Network {
    type Err = CoreError;

    /// Accepts the canonical names plus `rsk-mainnet` for [`Network::Mainnet`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "rsk-mainnet" {
            return Ok(Self::Mainnet);
        }
        Self::ALL
            .into_iter()
            .find(|n| n.as_str() == s)
            .ok_or_else(|| CoreError::UnknownNetwork(s.to_string()))
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// NetworkConfig
// ---------------------------------------------------------------------------

/// Everything the tooling needs to operate on one network.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// Set from the document key when the book is loaded.
    #[serde(skip)]
    pub network: Network,
    /// JSON-RPC endpoint of the node.
    pub rpc_url: String,
    /// Expected chain id; checked against the node at startup when set.
    #[serde(default)]
    pub chain_id: Option<u64>,
    #[serde(default = "default_receipt_poll_ms")]
    pub receipt_poll_ms: u64,
    /// Directory holding `<Name>.json` artifacts with a `bytecode` field.
    #[serde(default = "default_artifacts_dir")]
    pub artifacts_dir: PathBuf,
    /// Signing accounts by name. The node holds the keys.
    #[serde(default)]
    pub accounts: BTreeMap<String, Address>,
    /// Deployed contracts by logical name.
    #[serde(default)]
    pub contracts: BTreeMap<String, Address>,
    #[serde(default)]
    pub vestings: Vec<VestingEntry>,
    #[serde(default)]
    pub team_vestings: Option<TeamVestingTable>,
}

fn default_receipt_poll_ms() -> u64 {
    DEFAULT_RECEIPT_POLL_MS
}

fn default_artifacts_dir() -> PathBuf {
    PathBuf::from(DEFAULT_ARTIFACTS_DIR)
}

impl NetworkConfig {
    /// Look up a contract address by logical name.
    pub fn contract(&self, name: &str) -> Result<Address, CoreError> {
        self.contracts
            .get(name)
            .copied()
            .ok_or_else(|| CoreError::UnknownContract {
                network: self.network,
                name: name.to_string(),
            })
    }

    /// Resolve either a literal `0x` address or a logical contract name.
    pub fn resolve(&self, name_or_address: &str) -> Result<Address, CoreError> {
        if name_or_address.starts_with("0x") {
            parse_address(name_or_address)
        } else {
            self.contract(name_or_address)
        }
    }

    /// Address of a named account, if configured.
    pub fn account(&self, name: &str) -> Option<Address> {
        self.accounts.get(name).copied()
    }

    pub fn receipt_poll_interval(&self) -> Duration {
        Duration::from_millis(self.receipt_poll_ms)
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        let url = self.rpc_url.trim();
        if url.is_empty() {
            return Err(CoreError::Config(format!("{}: rpc_url is empty", self.network)));
        }
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(CoreError::Config(format!(
                "{}: rpc_url must be an http(s) URL, got '{url}'",
                self.network
            )));
        }
        if self.receipt_poll_ms == 0 {
            return Err(CoreError::Config(format!(
                "{}: receipt_poll_ms must be positive",
                self.network
            )));
        }
        validate_entries(&self.vestings)?;
        match &self.team_vestings {
            Some(team) => team.validate(),
            None => Ok(()),
        }
    }
}

// ---------------------------------------------------------------------------
// AddressBook
// ---------------------------------------------------------------------------

/// All configured networks, keyed by [`Network`].
#[derive(Debug, Clone, Default)]
pub struct AddressBook {
    networks: BTreeMap<Network, NetworkConfig>,
}

impl AddressBook {
    /// Read and validate the address book at `path`.
    pub fn load(path: &Path) -> Result<Self, CoreError> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| CoreError::Config(format!("cannot read {}: {e}", path.display())))?;
        Self::from_json(&text)
    }

    /// Parse and validate an address book from JSON text.
    ///
    /// Every top-level key must be a known network name and every
    /// section must pass [`NetworkConfig::validate`].
    pub fn from_json(text: &str) -> Result<Self, CoreError> {
        let raw: BTreeMap<String, NetworkConfig> =
            serde_json::from_str(text).map_err(|e| CoreError::Config(e.to_string()))?;

        let mut networks = BTreeMap::new();
        for (key, mut config) in raw {
            let network: Network = key.parse()?;
            config.network = network;
            config.validate()?;
            networks.insert(network, config);
        }
        Ok(Self { networks })
    }

    /// Configuration for `network`, failing if the book has no section for it.
    pub fn network(&self, network: Network) -> Result<&NetworkConfig, CoreError> {
        self.networks
            .get(&network)
            .ok_or(CoreError::NetworkNotConfigured(network))
    }

    /// Networks present in the book.
    pub fn networks(&self) -> impl Iterator<Item = Network> + '_ {
        self.networks.keys().copied()
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use assert_matches::assert_matches;

    use super::*;
    use crate::amount::wad;

    const BOOK: &str = r#"{
        "development": {
            "rpc_url": "http://127.0.0.1:8545",
            "chain_id": 31337,
            "accounts": { "operator": "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266" },
            "contracts": {
                "protocol": "0x5fbdb2315678afecb367f032d93f642f64180aa3",
                "iDOC": "0xe7f1725e7734ce288f8367e1bb143e90bb3f0512"
            },
            "vestings": [
                { "beneficiary": "0x70997970c51812dc3a010c7d01b50e0d17dc79c8", "amount": "100000", "cliff": 2419200, "duration": 31449600 }
            ],
            "team_vestings": {
                "cliff": 14515200,
                "duration": 94348800,
                "entries": [ { "beneficiary": "0x3c44cdddb6a900fa2b585dd299e03d12fa4293bc", "amount": "50000" } ]
            }
        },
        "testnet": {
            "rpc_url": "https://testnet.example.org/rpc"
        }
    }"#;

    #[test]
    fn network_names_round_trip() {
        for network in Network::ALL {
            assert_eq!(network.as_str().parse::<Network>().unwrap(), network);
        }
    }

    #[test]
    fn unknown_network_name_fails_fast() {
        assert_matches!("staging".parse::<Network>(), Err(CoreError::UnknownNetwork(_)));
        assert_matches!("rsk-testnet".parse::<Network>(), Err(CoreError::UnknownNetwork(_)));
    }

    #[test]
    fn rsk_mainnet_is_an_alias_for_mainnet() {
        assert_eq!("rsk-mainnet".parse::<Network>().unwrap(), Network::Mainnet);
        assert_eq!(Network::Mainnet.to_string(), "mainnet");
    }

    #[test]
    fn loads_sections_and_defaults() {
        let book = AddressBook::from_json(BOOK).unwrap();
        let dev = book.network(Network::Development).unwrap();
        assert_eq!(dev.network, Network::Development);
        assert_eq!(dev.chain_id, Some(31337));
        assert_eq!(dev.receipt_poll_ms, DEFAULT_RECEIPT_POLL_MS);
        assert_eq!(dev.vestings[0].amount, wad(100_000));
        let team = dev.team_vestings.as_ref().unwrap();
        assert_eq!(team.entries[0].amount, wad(50_000));
        assert_eq!(team.rows()[0].cliff, 14_515_200);

        let testnet = book.network(Network::Testnet).unwrap();
        assert!(testnet.contracts.is_empty());
        assert_eq!(testnet.artifacts_dir, PathBuf::from(DEFAULT_ARTIFACTS_DIR));
    }

    #[test]
    fn missing_network_section_is_an_error() {
        let book = AddressBook::from_json(BOOK).unwrap();
        assert_matches!(
            book.network(Network::Mainnet),
            Err(CoreError::NetworkNotConfigured(Network::Mainnet))
        );
    }

    #[test]
    fn unknown_top_level_key_rejected() {
        let err = AddressBook::from_json(r#"{ "staging": { "rpc_url": "http://x" } }"#).unwrap_err();
        assert_matches!(err, CoreError::UnknownNetwork(name) if name == "staging");
    }

    #[test]
    fn malformed_address_rejected() {
        let err = AddressBook::from_json(
            r#"{ "development": { "rpc_url": "http://x", "contracts": { "protocol": "0x12" } } }"#,
        )
        .unwrap_err();
        assert_matches!(err, CoreError::Config(_));
    }

    #[test]
    fn non_http_rpc_url_rejected() {
        let err = AddressBook::from_json(r#"{ "development": { "rpc_url": "ws://x" } }"#).unwrap_err();
        assert!(err.to_string().contains("http(s)"));
    }

    #[test]
    fn contract_lookup_and_resolve() {
        let book = AddressBook::from_json(BOOK).unwrap();
        let dev = book.network(Network::Development).unwrap();

        let by_name = dev.resolve("iDOC").unwrap();
        let literal = dev.resolve("0xe7f1725e7734ce288f8367e1bb143e90bb3f0512").unwrap();
        assert_eq!(by_name, literal);

        assert_matches!(dev.resolve("0x12"), Err(CoreError::InvalidAddress(_)));
        assert_matches!(
            dev.contract("iRBTC"),
            Err(CoreError::UnknownContract { name, .. }) if name == "iRBTC"
        );
    }

    #[test]
    fn load_reads_file_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(BOOK.as_bytes()).unwrap();

        let book = AddressBook::load(file.path()).unwrap();
        let networks: Vec<Network> = book.networks().collect();
        assert_eq!(networks, vec![Network::Development, Network::Testnet]);
    }

    #[test]
    fn load_reports_missing_file() {
        let err = AddressBook::load(Path::new("/nonexistent/addresses.json")).unwrap_err();
        assert!(err.to_string().contains("cannot read"));
    }
}
