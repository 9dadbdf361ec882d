pub mod use_recent_transactions;
