//! Chain access for the account page: data types, the chain connection,
//! the refresh operation and user preferences.

pub mod account;
mod compat;
pub mod prefs;
pub mod rpc_api;
pub mod types;

use prefs::cluster_preference::ClusterPreference;
use rpc_api::RpcConnection;

pub type ApiError = anyhow::Error;

/// Opens a connection to the endpoint selected by `preference`.
pub fn connect(preference: &ClusterPreference) -> RpcConnection {
    RpcConnection::new(preference.rpc_url(), preference.commitment)
}
