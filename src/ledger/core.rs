//! Bank facade that wires the account manager, ledger engine, and
//! reversal engine over one shared store

use bigdecimal::BigDecimal;

use crate::ledger::{AccountManager, LedgerEngine, ReversalEngine};
use crate::traits::*;
use crate::types::*;

/// Single entry point for the banking core.
///
/// All methods take `&self`; a `Bank` can be shared across tasks, and
/// concurrent operations serialize through the store's atomic units.
pub struct Bank<S: LedgerStore> {
    accounts: AccountManager<S>,
    ledger: LedgerEngine<S>,
    reversal: ReversalEngine<S>,
}

impl<S: LedgerStore + Clone> Bank<S> {
    /// Create a new bank over the given storage backend
    pub fn new(store: S) -> Self {
        Self {
            accounts: AccountManager::new(store.clone()),
            ledger: LedgerEngine::new(store.clone()),
            reversal: ReversalEngine::new(store),
        }
    }

    // Provisioning
    /// Record an owner identity
    pub async fn register_owner(&self, name: &str) -> LedgerResult<Owner> {
        self.accounts.register_owner(name).await
    }

    /// Open an account for an owner
    pub async fn open_account(
        &self,
        owner_id: OwnerId,
        display_name: &str,
        opening_balance: BigDecimal,
    ) -> LedgerResult<Account> {
        self.accounts
            .open_account(owner_id, display_name, opening_balance)
            .await
    }

    // Account lookup
    /// Get an account by ID
    pub async fn account(&self, account_id: AccountId) -> LedgerResult<Option<Account>> {
        self.accounts.get_account(account_id).await
    }

    /// Get an account by ID, erroring when absent
    pub async fn account_required(&self, account_id: AccountId) -> LedgerResult<Account> {
        self.accounts.get_account_required(account_id).await
    }

    /// List one owner's accounts
    pub async fn accounts_for_owner(&self, owner_id: OwnerId) -> LedgerResult<Vec<Account>> {
        self.accounts.accounts_for_owner(owner_id).await
    }

    /// List everyone else's accounts (transfer destinations)
    pub async fn other_accounts(&self, owner_id: OwnerId) -> LedgerResult<Vec<Account>> {
        self.accounts.other_accounts(owner_id).await
    }

    // Money movement
    /// Deposit into an account
    pub async fn deposit(&self, account_id: AccountId, amount: BigDecimal) -> LedgerResult<Account> {
        self.ledger.deposit(account_id, amount).await
    }

    /// Withdraw from an account
    pub async fn withdraw(
        &self,
        account_id: AccountId,
        amount: BigDecimal,
    ) -> LedgerResult<Account> {
        self.ledger.withdraw(account_id, amount).await
    }

    /// Transfer between two accounts
    pub async fn transfer(
        &self,
        source_id: AccountId,
        dest_id: AccountId,
        amount: BigDecimal,
    ) -> LedgerResult<()> {
        self.ledger.transfer(source_id, dest_id, amount).await
    }

    /// Reverse a logged transaction (at most once per entry)
    pub async fn reverse(&self, entry_id: EntryId) -> LedgerResult<()> {
        self.reversal.reverse(entry_id).await
    }

    // Ledger reads
    /// Get a ledger entry by ID
    pub async fn entry(&self, entry_id: EntryId) -> LedgerResult<Option<LedgerEntry>> {
        self.accounts.store.get_entry(entry_id).await
    }

    /// List all ledger entries, newest first
    pub async fn entries(&self) -> LedgerResult<Vec<LedgerEntry>> {
        self.accounts.store.list_entries().await
    }

    /// List all ledger entries with display labels joined from account
    /// and owner names
    pub async fn entry_views(&self) -> LedgerResult<Vec<EntryView>> {
        let entries = self.accounts.store.list_entries().await?;
        let mut views = Vec::with_capacity(entries.len());
        for entry in entries {
            let source_label = self.side_label(entry.source_account_id).await?;
            let destination_label = self.side_label(entry.destination_account_id).await?;
            views.push(EntryView {
                entry,
                source_label,
                destination_label,
            });
        }
        Ok(views)
    }

    async fn side_label(&self, account_id: Option<AccountId>) -> LedgerResult<String> {
        let Some(account_id) = account_id else {
            return Ok(String::new());
        };
        let Some(account) = self.accounts.store.get_account(account_id).await? else {
            return Ok(String::new());
        };
        let label = match self.accounts.store.get_owner(account.owner_id).await? {
            Some(owner) => format!("{} ({})", account.display_name, owner.name),
            None => account.display_name,
        };
        Ok(label)
    }
}
