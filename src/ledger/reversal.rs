//! Reversal engine: compensating adjustments for logged transactions
//!
//! A reversal flips the entry's `reversed` flag and applies the inverse
//! balance effect in the same atomic unit. It creates no new ledger
//! entry; the flag is the only record that the reversal happened.

use crate::traits::*;
use crate::types::*;

/// Applies the inverse balance effect of a ledger entry, at most once.
pub struct ReversalEngine<S: LedgerStore> {
    store: S,
}

impl<S: LedgerStore> ReversalEngine<S> {
    /// Create a new reversal engine over the given store
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Reverse the entry with the given id.
    ///
    /// Per-kind compensation:
    /// - Deposit: subtract the amount from the destination. No
    ///   sufficiency check; if the account has been drained since, the
    ///   balance goes negative.
    /// - Withdrawal: add the amount back to the source. Always succeeds.
    /// - Transfer: the destination must still hold at least the amount
    ///   (`InsufficientFundsForReversal` otherwise); then the amount
    ///   moves back from destination to source.
    pub async fn reverse(&self, entry_id: EntryId) -> LedgerResult<()> {
        let entry = self
            .store
            .get_entry(entry_id)
            .await?
            .ok_or(LedgerError::EntryNotFound(entry_id))?;

        // Fast-path rejection; the store re-checks the flag inside the
        // atomic unit, which is what actually prevents a double reversal.
        if entry.reversed {
            return Err(LedgerError::AlreadyReversed(entry_id));
        }

        let postings = compensating_postings(&entry)?;

        match self.store.commit_reversal(entry_id, &postings).await {
            Ok(updated) => {
                tracing::info!(
                    entry_id = updated.id,
                    kind = ?updated.kind,
                    amount = %updated.amount,
                    "reversal committed"
                );
                Ok(())
            }
            // Only the transfer case carries an enforced debit, so an
            // InsufficientFunds out of the unit is always a failed
            // transfer reversal.
            Err(LedgerError::InsufficientFunds(account_id)) => {
                Err(LedgerError::InsufficientFundsForReversal(account_id))
            }
            Err(other) => Err(other),
        }
    }
}

/// Compute the postings that undo `entry`. Exhaustive over `EntryKind`,
/// so adding a kind forces a decision here.
fn compensating_postings(entry: &LedgerEntry) -> LedgerResult<Vec<Posting>> {
    match entry.kind {
        EntryKind::Deposit => {
            let destination = destination_of(entry)?;
            Ok(vec![Posting::debit_unchecked(
                destination,
                entry.amount.clone(),
            )])
        }
        EntryKind::Withdrawal => {
            let source = source_of(entry)?;
            Ok(vec![Posting::credit(source, entry.amount.clone())])
        }
        EntryKind::Transfer => {
            let source = source_of(entry)?;
            let destination = destination_of(entry)?;
            Ok(vec![
                Posting::debit(destination, entry.amount.clone()),
                Posting::credit(source, entry.amount.clone()),
            ])
        }
    }
}

fn source_of(entry: &LedgerEntry) -> LedgerResult<AccountId> {
    entry.source_account_id.ok_or_else(|| {
        LedgerError::Storage(format!(
            "ledger entry {} has no source account for kind {:?}",
            entry.id, entry.kind
        ))
    })
}

fn destination_of(entry: &LedgerEntry) -> LedgerResult<AccountId> {
    entry.destination_account_id.ok_or_else(|| {
        LedgerError::Storage(format!(
            "ledger entry {} has no destination account for kind {:?}",
            entry.id, entry.kind
        ))
    })
}
