//! Ledger value types shared by ledgerid components.
//!
//! This crate provides the transaction type enumeration with its display
//! labels and the eight-decimal fixed-point amount format.

#![deny(missing_docs)]
#![deny(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod amount;
pub mod transaction;

pub use amount::{AmountError, Fixed8};
pub use transaction::TransactionType;
