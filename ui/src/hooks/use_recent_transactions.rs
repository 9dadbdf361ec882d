use api::account::refresh_transactions;
use api::account::RecoveryPolicy;
use api::account::RefreshOutcome;
use api::account::RefreshSequencer;
use api::account::RefreshTicket;
use api::types::TransactionList;
use api::ApiError;
use dioxus::prelude::*;
use dioxus_logger::tracing;

use crate::wallet_session::WalletSession;

#[derive(Clone, Copy)]
pub struct RecentTransactions {
    /// The latest successfully fetched list. Empty until the first fetch lands.
    pub transactions: Signal<TransactionList>,
    /// Set only when `RecoveryPolicy::Propagate` hands back an error.
    pub last_error: Signal<Option<String>>,
}

/// Keeps the recent transactions of the session's wallet up to date.
///
/// Refetches on mount and whenever the wallet identity or the chain
/// connection changes. Runs are never cancelled, but a run that has been
/// superseded by a newer one stops retrying and drops its result.
pub fn use_recent_transactions(
    session: WalletSession,
    policy: RecoveryPolicy,
) -> RecentTransactions {
    let transactions = use_signal(TransactionList::new);
    let last_error = use_signal(|| None::<String>);
    let sequencer = use_hook(RefreshSequencer::default);

    use_effect(move || {
        let identity = session.identity.read().clone();
        let connection = session.connection.read().clone();
        let policy = policy.clone();
        let sequencer = sequencer.clone();
        let ticket = sequencer.issue();

        spawn(async move {
            let outcome = refresh_transactions(&connection, identity.as_ref(), &policy, || {
                sequencer.is_latest(ticket)
            })
            .await;
            apply_outcome(&sequencer, ticket, outcome, transactions, last_error);
        });
    });

    RecentTransactions {
        transactions,
        last_error,
    }
}

/// Publishes the result of the run holding `ticket`.
///
/// Nothing is written once `ticket` is stale. The list only changes on
/// [`RefreshOutcome::Replaced`].
fn apply_outcome(
    sequencer: &RefreshSequencer,
    ticket: RefreshTicket,
    outcome: Result<RefreshOutcome, ApiError>,
    mut transactions: Signal<TransactionList>,
    mut last_error: Signal<Option<String>>,
) {
    if !sequencer.is_latest(ticket) {
        tracing::debug!("dropping result of superseded transaction refresh");
        return;
    }

    match outcome {
        Ok(RefreshOutcome::Replaced(list)) => {
            transactions.set(list);
            if last_error.peek().is_some() {
                last_error.set(None);
            }
        }
        Ok(RefreshOutcome::Skipped | RefreshOutcome::Absorbed | RefreshOutcome::Superseded) => {}
        Err(e) => {
            tracing::error!("Error fetching transactions: {:#}", e);
            last_error.set(Some(e.to_string()));
        }
    }
}
