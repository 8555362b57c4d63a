//! In-memory storage implementation for testing and development

use async_trait::async_trait;
use bigdecimal::BigDecimal;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, RwLock};

use crate::traits::*;
use crate::types::*;

#[derive(Debug, Default)]
struct StoreInner {
    owners: BTreeMap<OwnerId, Owner>,
    accounts: BTreeMap<AccountId, Account>,
    entries: BTreeMap<EntryId, LedgerEntry>,
    next_owner_id: OwnerId,
    next_account_id: AccountId,
    next_entry_id: EntryId,
}

/// In-memory [`LedgerStore`] for tests, demos, and development.
///
/// A single `RwLock` over the whole store plays the role the database
/// transaction plays in a relational deployment: the write guard is the
/// exclusive transaction scope, so commits are serializable and
/// all-or-nothing. Cloning shares the underlying store.
#[derive(Debug, Clone)]
pub struct MemoryStore {
    inner: Arc<RwLock<StoreInner>>,
}

impl MemoryStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(StoreInner::default())),
        }
    }

    /// Clear all data (useful for testing)
    pub fn clear(&self) {
        let mut inner = self.inner.write().unwrap();
        *inner = StoreInner::default();
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Stage every posting against the balances currently visible, without
/// writing anything. Returns the new balance per posting, in order.
fn stage_postings(
    inner: &StoreInner,
    postings: &[Posting],
) -> LedgerResult<Vec<(AccountId, BigDecimal)>> {
    let mut staged: HashMap<AccountId, BigDecimal> = HashMap::new();
    let mut applied = Vec::with_capacity(postings.len());

    for posting in postings {
        let current = match staged.get(&posting.account_id) {
            Some(balance) => balance.clone(),
            None => {
                inner
                    .accounts
                    .get(&posting.account_id)
                    .ok_or(LedgerError::AccountNotFound(posting.account_id))?
                    .balance
                    .clone()
            }
        };
        let next = current + &posting.delta;
        if posting.enforce_sufficiency && next < BigDecimal::from(0) {
            return Err(LedgerError::InsufficientFunds(posting.account_id));
        }
        staged.insert(posting.account_id, next.clone());
        applied.push((posting.account_id, next));
    }

    Ok(applied)
}

fn write_balances(inner: &mut StoreInner, staged: &[(AccountId, BigDecimal)]) {
    for (account_id, balance) in staged {
        if let Some(account) = inner.accounts.get_mut(account_id) {
            account.balance = balance.clone();
        }
    }
}

fn snapshots(inner: &StoreInner, postings: &[Posting]) -> Vec<Account> {
    postings
        .iter()
        .filter_map(|p| inner.accounts.get(&p.account_id).cloned())
        .collect()
}

#[async_trait]
impl LedgerStore for MemoryStore {
    async fn insert_owner(&self, name: &str) -> LedgerResult<Owner> {
        let mut inner = self.inner.write().unwrap();
        inner.next_owner_id += 1;
        let owner = Owner {
            id: inner.next_owner_id,
            name: name.to_string(),
        };
        inner.owners.insert(owner.id, owner.clone());
        Ok(owner)
    }

    async fn get_owner(&self, owner_id: OwnerId) -> LedgerResult<Option<Owner>> {
        Ok(self.inner.read().unwrap().owners.get(&owner_id).cloned())
    }

    async fn insert_account(
        &self,
        owner_id: OwnerId,
        display_name: &str,
        external_reference: &str,
        opening_balance: BigDecimal,
    ) -> LedgerResult<Account> {
        if opening_balance < BigDecimal::from(0) {
            return Err(LedgerError::InvalidAmount);
        }
        let mut inner = self.inner.write().unwrap();
        inner.next_account_id += 1;
        let account = Account {
            id: inner.next_account_id,
            owner_id,
            display_name: display_name.to_string(),
            external_reference: external_reference.to_string(),
            balance: opening_balance,
        };
        inner.accounts.insert(account.id, account.clone());
        Ok(account)
    }

    async fn get_account(&self, account_id: AccountId) -> LedgerResult<Option<Account>> {
        Ok(self.inner.read().unwrap().accounts.get(&account_id).cloned())
    }

    async fn accounts_for_owner(&self, owner_id: OwnerId) -> LedgerResult<Vec<Account>> {
        let inner = self.inner.read().unwrap();
        Ok(inner
            .accounts
            .values()
            .filter(|account| account.owner_id == owner_id)
            .cloned()
            .collect())
    }

    async fn accounts_excluding_owner(&self, owner_id: OwnerId) -> LedgerResult<Vec<Account>> {
        let inner = self.inner.read().unwrap();
        let mut accounts: Vec<Account> = inner
            .accounts
            .values()
            .filter(|account| account.owner_id != owner_id)
            .cloned()
            .collect();
        accounts.sort_by_key(|account| (account.owner_id, account.id));
        Ok(accounts)
    }

    async fn get_entry(&self, entry_id: EntryId) -> LedgerResult<Option<LedgerEntry>> {
        Ok(self.inner.read().unwrap().entries.get(&entry_id).cloned())
    }

    async fn list_entries(&self) -> LedgerResult<Vec<LedgerEntry>> {
        let inner = self.inner.read().unwrap();
        Ok(inner.entries.values().rev().cloned().collect())
    }

    async fn commit(&self, postings: &[Posting], entry: NewEntry) -> LedgerResult<Committed> {
        let mut inner = self.inner.write().unwrap();

        // Validate everything before touching a single balance.
        let staged = stage_postings(&inner, postings)?;
        write_balances(&mut inner, &staged);

        inner.next_entry_id += 1;
        let recorded = entry.into_entry(inner.next_entry_id, chrono::Utc::now().naive_utc());
        inner.entries.insert(recorded.id, recorded.clone());

        let accounts = snapshots(&inner, postings);
        Ok(Committed {
            entry: recorded,
            accounts,
        })
    }

    async fn commit_reversal(
        &self,
        entry_id: EntryId,
        postings: &[Posting],
    ) -> LedgerResult<LedgerEntry> {
        let mut inner = self.inner.write().unwrap();

        // Check-then-mark happens under the same guard as the balance
        // writes, so a concurrent reversal of the same entry cannot slip in.
        {
            let entry = inner
                .entries
                .get(&entry_id)
                .ok_or(LedgerError::EntryNotFound(entry_id))?;
            if entry.reversed {
                return Err(LedgerError::AlreadyReversed(entry_id));
            }
        }

        let staged = stage_postings(&inner, postings)?;
        write_balances(&mut inner, &staged);

        let entry = inner
            .entries
            .get_mut(&entry_id)
            .ok_or(LedgerError::EntryNotFound(entry_id))?;
        entry.reversed = true;
        Ok(entry.clone())
    }
}
