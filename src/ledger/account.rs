//! Account provisioning and listing

use bigdecimal::BigDecimal;
use uuid::Uuid;

use crate::traits::*;
use crate::types::*;
use crate::utils::validation::validate_display_name;

/// Manager for account provisioning and lookup.
///
/// Provisioning sits outside the ledger invariants (balances only ever
/// change through the engines once an account exists), but the store
/// still rejects a negative opening balance.
pub struct AccountManager<S: LedgerStore> {
    pub(crate) store: S,
}

impl<S: LedgerStore> AccountManager<S> {
    /// Create a new account manager
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Record an owner identity for display purposes
    pub async fn register_owner(&self, name: &str) -> LedgerResult<Owner> {
        self.store.insert_owner(name).await
    }

    /// Open an account with a generated external reference code
    pub async fn open_account(
        &self,
        owner_id: OwnerId,
        display_name: &str,
        opening_balance: BigDecimal,
    ) -> LedgerResult<Account> {
        validate_display_name(display_name)?;

        let owner = self
            .store
            .get_owner(owner_id)
            .await?
            .ok_or_else(|| LedgerError::Validation(format!("unknown owner: {owner_id}")))?;

        let index = self.store.accounts_for_owner(owner_id).await?.len();
        let reference = external_reference(&owner.name, index);

        self.store
            .insert_account(owner_id, display_name, &reference, opening_balance)
            .await
    }

    /// Get an account by ID
    pub async fn get_account(&self, account_id: AccountId) -> LedgerResult<Option<Account>> {
        self.store.get_account(account_id).await
    }

    /// Get an account by ID, returning an error if not found
    pub async fn get_account_required(&self, account_id: AccountId) -> LedgerResult<Account> {
        self.store
            .get_account(account_id)
            .await?
            .ok_or(LedgerError::AccountNotFound(account_id))
    }

    /// List one owner's accounts
    pub async fn accounts_for_owner(&self, owner_id: OwnerId) -> LedgerResult<Vec<Account>> {
        self.store.accounts_for_owner(owner_id).await
    }

    /// List every account held by someone else, for transfer-destination
    /// selection
    pub async fn other_accounts(&self, owner_id: OwnerId) -> LedgerResult<Vec<Account>> {
        self.store.accounts_excluding_owner(owner_id).await
    }
}

/// Bank-style reference code: "BK" + owner prefix + per-owner index +
/// a random chunk. Opaque downstream; nothing parses it back.
fn external_reference(owner_name: &str, index: usize) -> String {
    let prefix: String = owner_name
        .chars()
        .take(4)
        .collect::<String>()
        .to_uppercase();
    let suffix: String = Uuid::new_v4()
        .simple()
        .to_string()
        .chars()
        .take(10)
        .collect::<String>()
        .to_uppercase();
    format!("BK{prefix}{index}{suffix}")
}
