//! Storage abstraction for the ledger engines

use async_trait::async_trait;
use bigdecimal::BigDecimal;

use crate::types::*;

/// One signed balance change against a single account, applied inside an
/// atomic commit.
///
/// A posting with `enforce_sufficiency` set fails the whole commit with
/// `InsufficientFunds` if it would take the balance below zero. The
/// unchecked variant exists for exactly one caller: reversing a deposit,
/// which deliberately may drive a drained account negative.
#[derive(Debug, Clone, PartialEq)]
pub struct Posting {
    pub account_id: AccountId,
    pub delta: BigDecimal,
    pub enforce_sufficiency: bool,
}

impl Posting {
    /// Add `amount` to the account balance
    pub fn credit(account_id: AccountId, amount: BigDecimal) -> Self {
        Self {
            account_id,
            delta: amount,
            enforce_sufficiency: false,
        }
    }

    /// Subtract `amount`, failing the commit if the balance would go negative
    pub fn debit(account_id: AccountId, amount: BigDecimal) -> Self {
        Self {
            account_id,
            delta: -amount,
            enforce_sufficiency: true,
        }
    }

    /// Subtract `amount` without a sufficiency check
    pub fn debit_unchecked(account_id: AccountId, amount: BigDecimal) -> Self {
        Self {
            account_id,
            delta: -amount,
            enforce_sufficiency: false,
        }
    }
}

/// Outcome of a successful [`LedgerStore::commit`]: the appended entry and
/// the post-commit snapshots of every posted account, in posting order.
#[derive(Debug, Clone, PartialEq)]
pub struct Committed {
    pub entry: LedgerEntry,
    pub accounts: Vec<Account>,
}

/// Storage abstraction for the banking core
///
/// Implementations back the ledger with any store that can run the two
/// commit methods as serializable, all-or-nothing units (a relational
/// database transaction, a single process-wide lock, etc.). Everything
/// else is plain reads; listing reads need no particular isolation.
///
/// Balance mutation is only reachable through `commit` and
/// `commit_reversal`. There is intentionally no `update_balance`: a
/// read-check-write split across calls is the classic check-then-act race,
/// so the check lives inside the atomic unit with the write.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// Record an owner at provisioning time
    async fn insert_owner(&self, name: &str) -> LedgerResult<Owner>;

    /// Get an owner by ID
    async fn get_owner(&self, owner_id: OwnerId) -> LedgerResult<Option<Owner>>;

    /// Create an account with a non-negative opening balance
    async fn insert_account(
        &self,
        owner_id: OwnerId,
        display_name: &str,
        external_reference: &str,
        opening_balance: BigDecimal,
    ) -> LedgerResult<Account>;

    /// Get an account by ID
    async fn get_account(&self, account_id: AccountId) -> LedgerResult<Option<Account>>;

    /// List one owner's accounts, ordered by account id
    async fn accounts_for_owner(&self, owner_id: OwnerId) -> LedgerResult<Vec<Account>>;

    /// List every account not held by `owner_id`, ordered by owner then
    /// account id. Transfer-destination pickers use this.
    async fn accounts_excluding_owner(&self, owner_id: OwnerId) -> LedgerResult<Vec<Account>>;

    /// Get a ledger entry by ID
    async fn get_entry(&self, entry_id: EntryId) -> LedgerResult<Option<LedgerEntry>>;

    /// List all ledger entries, newest first
    async fn list_entries(&self) -> LedgerResult<Vec<LedgerEntry>>;

    /// Apply all postings and append the entry as one atomic unit.
    ///
    /// Every posting is validated against the balances visible inside the
    /// unit before any balance is written: a missing account fails with
    /// `AccountNotFound`, a sufficiency-enforced posting that would go
    /// negative fails with `InsufficientFunds`, and in either case no
    /// state changes at all.
    async fn commit(&self, postings: &[Posting], entry: NewEntry) -> LedgerResult<Committed>;

    /// Apply all postings and mark the entry reversed, as one atomic unit.
    ///
    /// The `reversed` flag is re-checked inside the unit, so of two
    /// concurrent reversals of the same entry exactly one succeeds and
    /// the other fails with `AlreadyReversed`. Posting validation matches
    /// [`commit`](LedgerStore::commit). Returns the updated entry.
    async fn commit_reversal(
        &self,
        entry_id: EntryId,
        postings: &[Posting],
    ) -> LedgerResult<LedgerEntry>;
}
