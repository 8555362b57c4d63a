//! Ledger module containing account management, the ledger engine, and
//! the reversal engine

pub mod account;
pub mod core;
pub mod engine;
pub mod reversal;

pub use account::*;
pub use core::*;
pub use engine::*;
pub use reversal::*;
