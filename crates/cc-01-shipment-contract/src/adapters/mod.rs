//! # Adapters Module
//!
//! - `memory_ledger`: mock ledger platform with staged writes and a commit log

pub mod memory_ledger;

pub use memory_ledger::{CommittedTransaction, InMemoryLedger, MockTransaction, Response};
