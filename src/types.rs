//! Core types and data structures for the banking ledger

use bigdecimal::BigDecimal;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Identifier of a monetary account.
pub type AccountId = i64;

/// Identifier of an account owner.
pub type OwnerId = i64;

/// Identifier of a ledger entry. Assigned monotonically by the store,
/// so it doubles as a creation-order sort key.
pub type EntryId = i64;

/// A monetary account held by one owner. Many accounts per owner are allowed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    /// Unique stable identifier
    pub id: AccountId,
    /// Owning user
    pub owner_id: OwnerId,
    /// Human-facing account label ("Daily Card", "Savings Vault", ...)
    pub display_name: String,
    /// Bank-style reference code; opaque, never validated for format
    pub external_reference: String,
    /// Current balance, fixed-point decimal at scale 2.
    /// Never negative after any committed operation (the one documented
    /// exception is reversing a deposit on a drained account).
    pub balance: BigDecimal,
}

/// An account owner. The core does no authentication; owners exist so
/// entry views can be labelled with a human name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Owner {
    pub id: OwnerId,
    pub name: String,
}

/// The three kinds of balance-affecting operations the ledger records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntryKind {
    /// Money added to a destination account
    Deposit,
    /// Money removed from a source account
    Withdrawal,
    /// Money moved from a source account to a destination account
    Transfer,
}

/// An immutable record of one completed balance-affecting operation.
///
/// Exactly one of `source_account_id` / `destination_account_id` is absent
/// for Deposit and Withdrawal; both are present for Transfer. The only
/// field that ever changes after insertion is the one-way `reversed` flag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub id: EntryId,
    pub kind: EntryKind,
    /// Present for Withdrawal and Transfer
    pub source_account_id: Option<AccountId>,
    /// Present for Deposit and Transfer
    pub destination_account_id: Option<AccountId>,
    /// Strictly positive, scale 2; unchanged by reversal
    pub amount: BigDecimal,
    /// Set to true at most once, by the reversal engine
    pub reversed: bool,
    pub created_at: NaiveDateTime,
}

/// A ledger entry awaiting insertion. The store assigns `id`,
/// `created_at`, and the initial `reversed = false`.
///
/// The constructors are the only way to build one, which keeps the
/// per-kind source/destination shape invariant out of reach of callers;
/// stores turn it into a record with [`into_entry`](NewEntry::into_entry).
#[derive(Debug, Clone, PartialEq)]
pub struct NewEntry {
    kind: EntryKind,
    source_account_id: Option<AccountId>,
    destination_account_id: Option<AccountId>,
    amount: BigDecimal,
}

impl NewEntry {
    /// A deposit into `destination`
    pub fn deposit(destination: AccountId, amount: BigDecimal) -> Self {
        Self {
            kind: EntryKind::Deposit,
            source_account_id: None,
            destination_account_id: Some(destination),
            amount,
        }
    }

    /// A withdrawal from `source`
    pub fn withdrawal(source: AccountId, amount: BigDecimal) -> Self {
        Self {
            kind: EntryKind::Withdrawal,
            source_account_id: Some(source),
            destination_account_id: None,
            amount,
        }
    }

    /// A transfer covering both legs in a single record
    pub fn transfer(source: AccountId, destination: AccountId, amount: BigDecimal) -> Self {
        Self {
            kind: EntryKind::Transfer,
            source_account_id: Some(source),
            destination_account_id: Some(destination),
            amount,
        }
    }

    pub fn kind(&self) -> EntryKind {
        self.kind
    }

    pub fn amount(&self) -> &BigDecimal {
        &self.amount
    }

    /// Materialize the record the store will persist
    pub fn into_entry(self, id: EntryId, created_at: NaiveDateTime) -> LedgerEntry {
        LedgerEntry {
            id,
            kind: self.kind,
            source_account_id: self.source_account_id,
            destination_account_id: self.destination_account_id,
            amount: self.amount,
            reversed: false,
            created_at,
        }
    }
}

/// A ledger entry joined with human-readable labels for its two sides,
/// in the form "Daily Card (alice)". Display convenience only; an absent
/// side yields an empty label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntryView {
    pub entry: LedgerEntry,
    pub source_label: String,
    pub destination_label: String,
}

/// Errors that can occur in the ledger system
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("amount must be positive with at most two decimal places")]
    InvalidAmount,
    #[error("account not found: {0}")]
    AccountNotFound(AccountId),
    #[error("ledger entry not found: {0}")]
    EntryNotFound(EntryId),
    #[error("insufficient funds in account {0}")]
    InsufficientFunds(AccountId),
    #[error("insufficient funds in account {0} to reverse transfer")]
    InsufficientFundsForReversal(AccountId),
    #[error("cannot transfer from account {0} to itself")]
    SameAccount(AccountId),
    #[error("ledger entry {0} has already been reversed")]
    AlreadyReversed(EntryId),
    #[error("validation error: {0}")]
    Validation(String),
    #[error("storage error: {0}")]
    Storage(String),
}

/// Result type for ledger operations
pub type LedgerResult<T> = Result<T, LedgerError>;
