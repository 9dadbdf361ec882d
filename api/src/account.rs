//! Fetching the recent transactions shown on the account page.

use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

use dioxus_logger::tracing;
use serde::Deserialize;
use serde::Serialize;

use crate::compat;
use crate::rpc_api::ChainConnection;
use crate::types::Signature;
use crate::types::TransactionList;
use crate::types::WalletIdentity;
use crate::ApiError;

/// The account page lists at most this many transactions.
pub const RECENT_TRANSACTION_LIMIT: usize = 5;

/// What a refresh does when fetching fails.
#[derive(Clone, PartialEq, Debug, Default, Serialize, Deserialize, strum::EnumIs)]
pub enum RecoveryPolicy {
    /// Log the error and keep the current list.
    #[default]
    Absorb,
    /// Hand the error to the caller.
    Propagate,
    /// Try again with doubling delays, then absorb.
    Retry { max_attempts: u32, backoff: Duration },
}

/// Result of a refresh that did not propagate an error.
#[derive(Clone, PartialEq, Debug, strum::EnumIs)]
pub enum RefreshOutcome {
    /// No wallet connected. The current list stays as it is.
    Skipped,
    /// The list should be replaced with this one.
    Replaced(TransactionList),
    /// Fetching failed and was logged. The current list stays as it is.
    Absorbed,
    /// A newer refresh took over before this one could retry.
    Superseded,
}

/// Fetches the most recent transactions of `identity`, newest first.
///
/// Transactions the connection could not resolve are left out.
pub async fn fetch_recent_transactions<C: ChainConnection>(
    connection: &C,
    identity: &WalletIdentity,
) -> Result<TransactionList, ApiError> {
    let infos = connection
        .signatures_for_address(identity, RECENT_TRANSACTION_LIMIT)
        .await?;
    let signatures: Vec<Signature> = infos.into_iter().map(|info| info.signature).collect();

    let records = connection.parsed_transactions(&signatures).await?;

    Ok(records
        .into_iter()
        .flatten()
        .take(RECENT_TRANSACTION_LIMIT)
        .collect())
}

/// Refreshes the transaction list of `identity`, applying `policy` on failure.
///
/// `is_wanted` is asked before every retry. Once it returns false the run
/// stops with [`RefreshOutcome::Superseded`] instead of querying the node again.
///
/// Only [`RecoveryPolicy::Propagate`] can return an error.
pub async fn refresh_transactions<C, W>(
    connection: &C,
    identity: Option<&WalletIdentity>,
    policy: &RecoveryPolicy,
    is_wanted: W,
) -> Result<RefreshOutcome, ApiError>
where
    C: ChainConnection,
    W: Fn() -> bool,
{
    let Some(identity) = identity else {
        tracing::debug!("no wallet connected; skipping transaction refresh");
        return Ok(RefreshOutcome::Skipped);
    };

    let max_attempts = match policy {
        RecoveryPolicy::Retry { max_attempts, .. } => (*max_attempts).max(1),
        _ => 1,
    };

    let mut attempt = 1;
    loop {
        match fetch_recent_transactions(connection, identity).await {
            Ok(list) => return Ok(RefreshOutcome::Replaced(list)),
            Err(e) => match policy {
                RecoveryPolicy::Propagate => return Err(e),
                RecoveryPolicy::Retry { .. } if !is_wanted() => {
                    tracing::debug!("transaction refresh superseded; giving up retries");
                    return Ok(RefreshOutcome::Superseded);
                }
                RecoveryPolicy::Retry { backoff, .. } if attempt < max_attempts => {
                    let delay = backoff.saturating_mul(1 << (attempt - 1).min(16));
                    tracing::warn!(
                        "fetching transactions failed (attempt {}/{}), retrying in {:?}: {:#}",
                        attempt,
                        max_attempts,
                        delay,
                        e
                    );
                    compat::sleep(delay).await;
                    if !is_wanted() {
                        tracing::debug!("transaction refresh superseded; giving up retries");
                        return Ok(RefreshOutcome::Superseded);
                    }
                    attempt += 1;
                }
                _ => {
                    tracing::error!("Error fetching transactions: {:#}", e);
                    return Ok(RefreshOutcome::Absorbed);
                }
            },
        }
    }
}

/// A ticket handed to one refresh run.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct RefreshTicket(u64);

/// Orders concurrent refresh runs so that only the newest may publish.
///
/// Every dependency change issues a ticket. A run whose ticket was superseded
/// while it was in flight must discard its result.
#[derive(Clone, Debug, Default)]
pub struct RefreshSequencer {
    latest: Arc<AtomicU64>,
}

impl RefreshSequencer {
    pub fn issue(&self) -> RefreshTicket {
        RefreshTicket(self.latest.fetch_add(1, Ordering::AcqRel) + 1)
    }

    pub fn is_latest(&self, ticket: RefreshTicket) -> bool {
        self.latest.load(Ordering::Acquire) == ticket.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ParsedTransaction;
    use crate::types::SignatureInfo;
    use crate::types::TransactionRecord;
    use anyhow::anyhow;
    use std::cell::Cell;
    use std::cell::RefCell;

    fn record(signature: &str, block_time: Option<i64>) -> TransactionRecord {
        TransactionRecord {
            slot: 1,
            block_time,
            transaction: ParsedTransaction {
                signatures: vec![Signature::new(signature)],
            },
            meta: None,
        }
    }

    fn info(signature: &str) -> SignatureInfo {
        SignatureInfo {
            signature: Signature::new(signature),
            slot: 1,
            err: None,
            memo: None,
            block_time: None,
            confirmation_status: None,
        }
    }

    /// In-memory connection. Fails the first `failures` listing calls.
    #[derive(Default)]
    struct FakeConnection {
        listing: Vec<SignatureInfo>,
        details: Vec<Option<TransactionRecord>>,
        failures: Cell<u32>,
        listing_calls: Cell<u32>,
        requested_limit: Cell<usize>,
        requested: RefCell<Vec<Signature>>,
    }

    impl ChainConnection for FakeConnection {
        async fn signatures_for_address(
            &self,
            _address: &WalletIdentity,
            limit: usize,
        ) -> Result<Vec<SignatureInfo>, ApiError> {
            self.listing_calls.set(self.listing_calls.get() + 1);
            self.requested_limit.set(limit);
            if self.failures.get() > 0 {
                self.failures.set(self.failures.get() - 1);
                return Err(anyhow!("429 Too Many Requests"));
            }
            Ok(self.listing.clone())
        }

        async fn parsed_transactions(
            &self,
            signatures: &[Signature],
        ) -> Result<Vec<Option<TransactionRecord>>, ApiError> {
            *self.requested.borrow_mut() = signatures.to_vec();
            Ok(self.details.clone())
        }
    }

    fn wallet() -> WalletIdentity {
        WalletIdentity::new("9xQe...Wallet1234567890abcdef")
    }

    #[tokio::test]
    async fn fetch_keeps_order_and_drops_unresolved() {
        let conn = FakeConnection {
            listing: vec![info("sigA"), info("sigB"), info("sigC")],
            details: vec![
                Some(record("sigA", Some(1700000000))),
                None,
                Some(record("sigC", None)),
            ],
            ..Default::default()
        };

        let list = fetch_recent_transactions(&conn, &wallet()).await.unwrap();

        assert_eq!(conn.requested_limit.get(), RECENT_TRANSACTION_LIMIT);
        assert_eq!(
            *conn.requested.borrow(),
            vec![Signature::new("sigA"), Signature::new("sigB"), Signature::new("sigC")]
        );
        let sigs: Vec<_> = list
            .iter()
            .filter_map(|r| r.first_signature().map(|s| s.as_str().to_string()))
            .collect();
        assert_eq!(sigs, vec!["sigA", "sigC"]);
    }

    #[tokio::test]
    async fn fetch_never_returns_more_than_the_limit() {
        let conn = FakeConnection {
            listing: (0..8).map(|i| info(&format!("sig{i}"))).collect(),
            details: (0..8).map(|i| Some(record(&format!("sig{i}"), None))).collect(),
            ..Default::default()
        };

        let list = fetch_recent_transactions(&conn, &wallet()).await.unwrap();
        assert_eq!(list.len(), RECENT_TRANSACTION_LIMIT);
    }

    #[tokio::test]
    async fn refresh_without_identity_is_a_no_op() {
        let conn = FakeConnection::default();

        let outcome = refresh_transactions(&conn, None, &RecoveryPolicy::Absorb, || true)
            .await
            .unwrap();

        assert_eq!(outcome, RefreshOutcome::Skipped);
        assert_eq!(conn.listing_calls.get(), 0);
    }

    #[tokio::test]
    async fn refresh_absorbs_failures_by_default() {
        let conn = FakeConnection {
            failures: Cell::new(1),
            ..Default::default()
        };

        let outcome =
            refresh_transactions(&conn, Some(&wallet()), &RecoveryPolicy::default(), || true)
                .await
                .unwrap();

        assert_eq!(outcome, RefreshOutcome::Absorbed);
        assert_eq!(conn.listing_calls.get(), 1);
    }

    #[tokio::test]
    async fn refresh_can_propagate_failures() {
        let conn = FakeConnection {
            failures: Cell::new(1),
            ..Default::default()
        };

        let err =
            refresh_transactions(&conn, Some(&wallet()), &RecoveryPolicy::Propagate, || true)
                .await
                .unwrap_err();

        assert!(err.to_string().contains("429"));
    }

    #[tokio::test]
    async fn refresh_retries_until_success() {
        let conn = FakeConnection {
            listing: vec![info("sigA")],
            details: vec![Some(record("sigA", Some(1700000000)))],
            failures: Cell::new(2),
            ..Default::default()
        };
        let policy = RecoveryPolicy::Retry {
            max_attempts: 3,
            backoff: Duration::from_millis(1),
        };

        let outcome = refresh_transactions(&conn, Some(&wallet()), &policy, || true)
            .await
            .unwrap();

        assert_eq!(conn.listing_calls.get(), 3);
        assert!(matches!(outcome, RefreshOutcome::Replaced(list) if list.len() == 1));
    }

    #[tokio::test]
    async fn refresh_absorbs_after_retries_run_out() {
        let conn = FakeConnection {
            failures: Cell::new(10),
            ..Default::default()
        };
        let policy = RecoveryPolicy::Retry {
            max_attempts: 2,
            backoff: Duration::from_millis(1),
        };

        let outcome = refresh_transactions(&conn, Some(&wallet()), &policy, || true)
            .await
            .unwrap();

        assert_eq!(outcome, RefreshOutcome::Absorbed);
        assert_eq!(conn.listing_calls.get(), 2);
    }

    #[tokio::test]
    async fn retries_stop_once_a_newer_refresh_is_issued() {
        let conn = FakeConnection {
            failures: Cell::new(10),
            ..Default::default()
        };
        let policy = RecoveryPolicy::Retry {
            max_attempts: 5,
            backoff: Duration::from_millis(1),
        };
        let sequencer = RefreshSequencer::default();
        let ticket = sequencer.issue();

        let outcome = refresh_transactions(&conn, Some(&wallet()), &policy, || {
            // a newer run starts while the first attempt is failing
            if conn.listing_calls.get() == 1 {
                sequencer.issue();
            }
            sequencer.is_latest(ticket)
        })
        .await
        .unwrap();

        assert_eq!(outcome, RefreshOutcome::Superseded);
        assert_eq!(conn.listing_calls.get(), 1);
    }

    #[tokio::test]
    async fn superseded_run_stops_after_its_backoff() {
        let conn = FakeConnection {
            failures: Cell::new(10),
            ..Default::default()
        };
        let policy = RecoveryPolicy::Retry {
            max_attempts: 5,
            backoff: Duration::from_millis(1),
        };
        let checks = Cell::new(0);

        // still wanted before the first backoff, gone after it
        let outcome = refresh_transactions(&conn, Some(&wallet()), &policy, || {
            checks.set(checks.get() + 1);
            checks.get() < 2
        })
        .await
        .unwrap();

        assert_eq!(outcome, RefreshOutcome::Superseded);
        assert_eq!(conn.listing_calls.get(), 1);
        assert_eq!(checks.get(), 2);
    }

    #[test]
    fn only_the_newest_ticket_may_publish() {
        let sequencer = RefreshSequencer::default();
        let first = sequencer.issue();
        assert!(sequencer.is_latest(first));

        let second = sequencer.clone().issue();
        assert!(!sequencer.is_latest(first));
        assert!(sequencer.is_latest(second));
    }
}
