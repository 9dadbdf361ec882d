use api::prefs::cluster_preference::Cluster;
use api::types::WalletIdentity;
use dioxus::prelude::*;
use dioxus_logger::tracing;
use strum::IntoEnumIterator;

use crate::components::pico::Button;
use crate::components::pico::ButtonType;
use crate::components::pico::Modal;
use crate::format::abbreviate;
use crate::wallet_session::use_wallet_session;

/// Wallet controls: connect an address, disconnect, pick the cluster.
///
/// Everything goes through the [`WalletSession`](crate::wallet_session::WalletSession)
/// context; the account page never talks to this component directly.
#[component]
pub fn WalletModal() -> Element {
    let mut session = use_wallet_session();
    let mut is_open = use_signal(|| false);
    let mut address_input = use_signal(String::new);
    let mut input_error = use_signal(|| None::<String>);

    let connected = session.identity.read().clone();
    let active_cluster = session.cluster_preference.read().cluster;
    let endpoint = {
        let connection = session.connection.read();
        format!("{} ({})", connection.endpoint(), connection.commitment())
    };
    let aria_invalid = input_error.read().is_some();

    rsx! {
        div {
            style: "display: flex; flex-direction: row; justify-content: center; align-items: center; gap: 1rem;",
            match connected {
                Some(identity) => {
                    let label = abbreviate(identity.as_str());
                    rsx! {
                        Button {
                            button_type: ButtonType::Secondary,
                            outline: true,
                            on_click: move |_| session.disconnect(),
                            "Disconnect {label}"
                        }
                    }
                }
                None => rsx! {
                    Button {
                        on_click: move |_| {
                            input_error.set(None);
                            is_open.set(true);
                        },
                        "Connect Wallet"
                    }
                },
            }
            select {
                "aria-label": "Cluster",
                style: "width: auto; margin-bottom: 0;",
                onchange: move |evt| match evt.value().parse::<Cluster>() {
                    Ok(cluster) => session.switch_cluster(cluster),
                    Err(e) => tracing::warn!("unknown cluster {}: {}", evt.value(), e),
                },
                for cluster in Cluster::iter() {
                    option {
                        value: "{cluster}",
                        selected: cluster == active_cluster,
                        "{cluster}"
                    }
                }
            }
            small { title: "RPC endpoint", "{endpoint}" }
        }

        Modal {
            is_open,
            title: "Connect Wallet",
            form {
                onsubmit: move |evt| {
                    evt.prevent_default();
                    let input = address_input.read().clone();
                    match WalletIdentity::parse(&input) {
                        Ok(identity) => {
                            session.connect(identity);
                            address_input.set(String::new());
                            input_error.set(None);
                            is_open.set(false);
                        }
                        Err(e) => input_error.set(Some(e.to_string())),
                    }
                },
                label {
                    "Wallet address"
                    input {
                        r#type: "text",
                        name: "address",
                        placeholder: "Base58 public key",
                        value: "{address_input}",
                        "aria-invalid": "{aria_invalid}",
                        oninput: move |evt| address_input.set(evt.value()),
                    }
                }
                if let Some(e) = input_error() {
                    small { "{e}" }
                }
                button { r#type: "submit", "Connect" }
            }
        }
    }
}
