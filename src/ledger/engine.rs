//! Ledger engine: deposit, withdraw, and transfer
//!
//! Every operation validates its inputs first, then performs the balance
//! mutation and the entry append as one atomic unit against the store.
//! Transfer in particular is exposed only as a single indivisible
//! operation; composing it from a withdraw plus a deposit would let a
//! concurrent withdrawal invalidate the sufficiency check in between.

use bigdecimal::BigDecimal;

use crate::traits::*;
use crate::types::*;
use crate::utils::validation::validate_amount;

/// Orchestrates balance mutation and ledger recording for the three
/// money-moving operations.
pub struct LedgerEngine<S: LedgerStore> {
    store: S,
}

impl<S: LedgerStore> LedgerEngine<S> {
    /// Create a new ledger engine over the given store
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Increase the account balance by `amount` and append a Deposit
    /// entry, returning the post-commit account snapshot.
    pub async fn deposit(&self, account_id: AccountId, amount: BigDecimal) -> LedgerResult<Account> {
        validate_amount(&amount)?;

        let committed = self
            .store
            .commit(
                &[Posting::credit(account_id, amount.clone())],
                NewEntry::deposit(account_id, amount),
            )
            .await?;

        tracing::info!(
            account_id,
            entry_id = committed.entry.id,
            amount = %committed.entry.amount,
            "deposit committed"
        );
        single_snapshot(committed)
    }

    /// Decrease the account balance by `amount` and append a Withdrawal
    /// entry. Fails with `InsufficientFunds` when the balance is short;
    /// the check happens inside the atomic unit, next to the write.
    pub async fn withdraw(
        &self,
        account_id: AccountId,
        amount: BigDecimal,
    ) -> LedgerResult<Account> {
        validate_amount(&amount)?;

        let committed = self
            .store
            .commit(
                &[Posting::debit(account_id, amount.clone())],
                NewEntry::withdrawal(account_id, amount),
            )
            .await?;

        tracing::info!(
            account_id,
            entry_id = committed.entry.id,
            amount = %committed.entry.amount,
            "withdrawal committed"
        );
        single_snapshot(committed)
    }

    /// Move `amount` from `source_id` to `dest_id`: both balance writes,
    /// the source sufficiency check, and the single Transfer entry form
    /// one atomic unit.
    pub async fn transfer(
        &self,
        source_id: AccountId,
        dest_id: AccountId,
        amount: BigDecimal,
    ) -> LedgerResult<()> {
        if source_id == dest_id {
            return Err(LedgerError::SameAccount(source_id));
        }
        validate_amount(&amount)?;

        let committed = self
            .store
            .commit(
                &[
                    Posting::debit(source_id, amount.clone()),
                    Posting::credit(dest_id, amount.clone()),
                ],
                NewEntry::transfer(source_id, dest_id, amount),
            )
            .await?;

        tracing::info!(
            source_id,
            dest_id,
            entry_id = committed.entry.id,
            amount = %committed.entry.amount,
            "transfer committed"
        );
        Ok(())
    }
}

fn single_snapshot(committed: Committed) -> LedgerResult<Account> {
    committed
        .accounts
        .into_iter()
        .next()
        .ok_or_else(|| LedgerError::Storage("commit returned no account snapshot".to_string()))
}
