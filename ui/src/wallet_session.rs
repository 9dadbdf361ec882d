//! The connected wallet and the chain connection, as reactive UI state.

use api::prefs::cluster_preference::Cluster;
use api::prefs::cluster_preference::ClusterPreference;
use api::rpc_api::RpcConnection;
use api::types::WalletIdentity;
use dioxus::prelude::*;
use dioxus_logger::tracing;

/// Wallet session provided as a Dioxus context.
///
/// Screens only read it. The wallet modal is the one place that connects,
/// disconnects or switches clusters.
#[derive(Clone, Copy)]
pub struct WalletSession {
    /// The connected wallet, `None` while no wallet is connected.
    pub identity: Signal<Option<WalletIdentity>>,
    /// Handle used to query the chain.
    pub connection: Signal<RpcConnection>,
    /// The cluster `connection` points at.
    pub cluster_preference: Signal<ClusterPreference>,
}

impl WalletSession {
    pub fn connect(&mut self, identity: WalletIdentity) {
        tracing::info!("wallet connected: {}", identity);
        self.identity.set(Some(identity));
    }

    pub fn disconnect(&mut self) {
        if self.identity.peek().is_some() {
            tracing::info!("wallet disconnected");
            self.identity.set(None);
        }
    }

    /// Points the connection at `cluster`. Does nothing if it already does.
    pub fn switch_cluster(&mut self, cluster: Cluster) {
        let current = self.cluster_preference.peek().clone();
        if current.cluster == cluster && current.rpc_url.is_none() {
            return;
        }
        let preference = current.with_cluster(cluster);
        self.connection.set(api::connect(&preference));
        self.cluster_preference.set(preference);
    }
}

pub fn use_wallet_session() -> WalletSession {
    use_context::<WalletSession>()
}
