//! # Banking Core
//!
//! The ledger consistency engine of a small retail-banking system: users
//! hold monetary accounts, deposit, withdraw, and transfer funds, and
//! every movement is recorded as a typed ledger entry that an
//! administrator can later reverse exactly once.
//!
//! ## Guarantees
//!
//! - **Atomic units**: every balance mutation and its ledger entry are
//!   committed together, or not at all. No partial state is observable.
//! - **No lost money**: transfers conserve the sum of the two balances,
//!   and sufficiency checks run inside the same atomic unit as the
//!   writes, so concurrent operations cannot invalidate them.
//! - **Single-use reversal**: an entry's `reversed` flag flips at most
//!   once, enforced by check-then-mark inside the atomic unit.
//! - **Storage abstraction**: any backend implementing [`LedgerStore`]
//!   works; [`utils::MemoryStore`] ships for tests and demos.
//!
//! ## Quick Start
//!
//! ```rust
//! use banking_core::{Bank, utils::MemoryStore};
//! use bigdecimal::BigDecimal;
//! use std::str::FromStr;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), banking_core::LedgerError> {
//! let bank = Bank::new(MemoryStore::new());
//! let owner = bank.register_owner("alice").await?;
//! let account = bank
//!     .open_account(owner.id, "Spending", BigDecimal::from_str("100.00").unwrap())
//!     .await?;
//!
//! let account = bank.deposit(account.id, BigDecimal::from_str("30.00").unwrap()).await?;
//! assert_eq!(account.balance, BigDecimal::from_str("130.00").unwrap());
//! # Ok(())
//! # }
//! ```

pub mod ledger;
pub mod traits;
pub mod types;
pub mod utils;

// Re-export commonly used types
pub use ledger::*;
pub use traits::*;
pub use types::*;
