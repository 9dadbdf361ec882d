//=============================================================================
// File: src/screens/account.rs
//=============================================================================
use api::types::TransactionList;
use api::types::TransactionRecord;
use api::types::WalletIdentity;
use dioxus::prelude::*;

use crate::components::branding::Branding;
use crate::components::pico::Card;
use crate::components::wallet_modal::WalletModal;
use crate::format::abbreviate;
use crate::format::format_block_time;
use crate::format::NOT_AVAILABLE;
use crate::hooks::use_recent_transactions::use_recent_transactions;
use crate::wallet_session::use_wallet_session;
use crate::AppState;

pub const CONNECT_PROMPT: &str = "Please connect your wallet to view recent transactions.";

/// One table row, ready to display.
#[derive(Clone, PartialEq, Debug)]
pub struct TransactionRow {
    pub signature: String,
    pub abbreviated_signature: String,
    pub block_time: String,
}

impl From<&TransactionRecord> for TransactionRow {
    fn from(record: &TransactionRecord) -> Self {
        let (signature, abbreviated_signature) = match record.first_signature() {
            Some(s) => (s.to_string(), abbreviate(s.as_str())),
            None => (String::new(), NOT_AVAILABLE.to_string()),
        };
        Self {
            signature,
            abbreviated_signature,
            block_time: format_block_time(record.block_time),
        }
    }
}

/// The account page, wired to the wallet session.
#[component]
pub fn AccountScreen() -> Element {
    let app_state = use_context::<AppState>();
    let session = use_wallet_session();
    let recent = use_recent_transactions(session, app_state.prefs.recovery_policy().clone());

    let identity = session.identity.read().clone();
    let transactions = recent.transactions.read().clone();
    let error = recent.last_error.read().clone();

    rsx! {
        AccountView {
            identity,
            transactions,
            error,
            WalletModal {}
        }
    }
}

/// Renders the account page for a given wallet and transaction list.
///
/// `children` is rendered below the table, untouched.
#[component]
pub fn AccountView(
    identity: Option<WalletIdentity>,
    transactions: TransactionList,
    error: Option<String>,
    children: Element,
) -> Element {
    let rows: Vec<TransactionRow> = transactions.iter().map(TransactionRow::from).collect();

    rsx! {
        Card {
            class: "account-view",
            Branding {}
            h1 { style: "text-align: center;", "Account Page" }

            match identity {
                Some(identity) => {
                    let address = abbreviate(identity.as_str());
                    rsx! {
                        p { style: "text-align: center;", "Connected wallet: {address}" }
                        h2 { "Recent Transactions" }
                        if let Some(e) = error {
                            p { role: "alert", "Failed to load transactions: {e}" }
                        }
                        div {
                            class: "overflow-auto",
                            table {
                                thead { tr {
                                    th { scope: "col", "Signature" }
                                    th { scope: "col", "Block Time" }
                                }}
                                tbody {
                                    for (index, row) in rows.into_iter().enumerate() {
                                        tr {
                                            key: "{index}",
                                            td { code { title: "{row.signature}", "{row.abbreviated_signature}" } }
                                            td { "{row.block_time}" }
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
                None => rsx! {
                    p { style: "text-align: center;", "{CONNECT_PROMPT}" }
                },
            }

            div {
                style: "display: flex; justify-content: center; padding: 1rem 0;",
                {children}
            }
        }
    }
}
