use serde::Deserialize;
use serde::Serialize;
use std::str::FromStr;

/// The Solana clusters the page can read from.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    strum::EnumIs,
    strum::EnumIter,
    strum::EnumString,
    strum::Display,
)]
#[strum(ascii_case_insensitive, serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum Cluster {
    #[default]
    MainnetBeta,
    Devnet,
    Testnet,
    Localnet,
}

impl Cluster {
    /// The public JSON-RPC endpoint of the cluster.
    pub fn default_rpc_url(&self) -> &'static str {
        match self {
            Self::MainnetBeta => "https://api.mainnet-beta.solana.com",
            Self::Devnet => "https://api.devnet.solana.com",
            Self::Testnet => "https://api.testnet.solana.com",
            Self::Localnet => "http://127.0.0.1:8899",
        }
    }
}

/// How settled a block must be before the node reports it.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    strum::EnumString,
    strum::Display,
)]
#[strum(ascii_case_insensitive, serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Commitment {
    Processed,
    #[default]
    Confirmed,
    Finalized,
}

/// Which cluster to query, and how.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct ClusterPreference {
    pub cluster: Cluster,
    /// Overrides the cluster's public endpoint when set.
    pub rpc_url: Option<String>,
    pub commitment: Commitment,
}

impl ClusterPreference {
    /// Creates a ClusterPreference from environment variables.
    ///
    /// # Environment Variables
    /// - `SOLANA_CLUSTER`: "mainnet-beta", "devnet", "testnet" or "localnet".
    /// - `SOLANA_RPC_URL`: custom JSON-RPC endpoint.
    /// - `SOLANA_COMMITMENT`: "processed", "confirmed" or "finalized".
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let cluster = lookup("SOLANA_CLUSTER")
            .and_then(|s| Cluster::from_str(s.trim()).ok())
            .unwrap_or_default();

        let rpc_url = lookup("SOLANA_RPC_URL")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        let commitment = lookup("SOLANA_COMMITMENT")
            .and_then(|s| Commitment::from_str(s.trim()).ok())
            .unwrap_or_default();

        Self {
            cluster,
            rpc_url,
            commitment,
        }
    }

    /// Same preference pointed at another cluster. A custom endpoint is dropped.
    pub fn with_cluster(&self, cluster: Cluster) -> Self {
        Self {
            cluster,
            rpc_url: None,
            commitment: self.commitment,
        }
    }

    pub fn rpc_url(&self) -> &str {
        self.rpc_url
            .as_deref()
            .unwrap_or_else(|| self.cluster.default_rpc_url())
    }
}

impl Default for ClusterPreference {
    fn default() -> Self {
        Self::from_env()
    }
}
