use crate::network::Network;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Unknown network: '{0}'. Valid networks: development, testnet, mainnet (alias rsk-mainnet)")]
    UnknownNetwork(String),

    #[error("Network {0} is not present in the address book")]
    NetworkNotConfigured(Network),

    #[error("Contract '{name}' is not configured for network {network}")]
    UnknownContract { network: Network, name: String },

    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Invalid loan id: {0}")]
    InvalidLoanId(String),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Arithmetic overflow: {0}")]
    Overflow(&'static str),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Validation failed: {0}")]
    Validation(String),
}
