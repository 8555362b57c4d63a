//! Integration tests for banking-core

use banking_core::{
    utils::MemoryStore, Account, Bank, EntryKind, LedgerError, LedgerStore, NewEntry, Posting,
};
use bigdecimal::BigDecimal;
use std::str::FromStr;
use std::sync::Arc;

fn dec(s: &str) -> BigDecimal {
    BigDecimal::from_str(s).unwrap()
}

/// Two owners with one account each: A at 100.00, B at 50.00.
async fn two_account_bank() -> (Bank<MemoryStore>, Account, Account) {
    let bank = Bank::new(MemoryStore::new());
    let alice = bank.register_owner("alice").await.unwrap();
    let bob = bank.register_owner("bob").await.unwrap();
    let a = bank
        .open_account(alice.id, "Spending", dec("100.00"))
        .await
        .unwrap();
    let b = bank
        .open_account(bob.id, "Checking", dec("50.00"))
        .await
        .unwrap();
    (bank, a, b)
}

#[tokio::test]
async fn transfer_conserves_total_and_moves_exactly_amount() {
    let (bank, a, b) = two_account_bank().await;

    bank.transfer(a.id, b.id, dec("30.00")).await.unwrap();

    let a = bank.account_required(a.id).await.unwrap();
    let b = bank.account_required(b.id).await.unwrap();
    assert_eq!(a.balance, dec("70.00"));
    assert_eq!(b.balance, dec("80.00"));
    assert_eq!(&a.balance + &b.balance, dec("150.00"));

    let entries = bank.entries().await.unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].kind, EntryKind::Transfer);
    assert_eq!(entries[0].source_account_id, Some(a.id));
    assert_eq!(entries[0].destination_account_id, Some(b.id));
    assert!(!entries[0].reversed);
}

#[tokio::test]
async fn transfer_then_reverse_then_reverse_again() {
    let (bank, a, b) = two_account_bank().await;

    bank.transfer(a.id, b.id, dec("30.00")).await.unwrap();
    let entry_id = bank.entries().await.unwrap()[0].id;

    bank.reverse(entry_id).await.unwrap();
    assert_eq!(
        bank.account_required(a.id).await.unwrap().balance,
        dec("100.00")
    );
    assert_eq!(
        bank.account_required(b.id).await.unwrap().balance,
        dec("50.00")
    );
    assert!(bank.entry(entry_id).await.unwrap().unwrap().reversed);

    let err = bank.reverse(entry_id).await.unwrap_err();
    assert!(matches!(err, LedgerError::AlreadyReversed(id) if id == entry_id));

    // balances untouched by the failed second reversal
    assert_eq!(
        bank.account_required(a.id).await.unwrap().balance,
        dec("100.00")
    );
    assert_eq!(
        bank.account_required(b.id).await.unwrap().balance,
        dec("50.00")
    );
}

#[tokio::test]
async fn transfer_rejects_same_account_and_bad_amounts() {
    let (bank, a, b) = two_account_bank().await;

    let err = bank.transfer(a.id, a.id, dec("10.00")).await.unwrap_err();
    assert!(matches!(err, LedgerError::SameAccount(id) if id == a.id));

    let err = bank.transfer(a.id, b.id, dec("0")).await.unwrap_err();
    assert!(matches!(err, LedgerError::InvalidAmount));

    let err = bank.transfer(a.id, b.id, dec("10.001")).await.unwrap_err();
    assert!(matches!(err, LedgerError::InvalidAmount));

    assert!(bank.entries().await.unwrap().is_empty());
}

#[tokio::test]
async fn insufficient_withdrawal_leaves_balance_unchanged() {
    let (bank, a, _) = two_account_bank().await;

    bank.withdraw(a.id, dec("30.00")).await.unwrap();
    let err = bank.withdraw(a.id, dec("1000.00")).await.unwrap_err();
    assert!(matches!(err, LedgerError::InsufficientFunds(id) if id == a.id));

    assert_eq!(
        bank.account_required(a.id).await.unwrap().balance,
        dec("70.00")
    );
    // only the successful withdrawal was logged
    assert_eq!(bank.entries().await.unwrap().len(), 1);
}

#[tokio::test]
async fn failed_transfer_touches_neither_account() {
    let (bank, a, b) = two_account_bank().await;

    let err = bank.transfer(a.id, b.id, dec("100.01")).await.unwrap_err();
    assert!(matches!(err, LedgerError::InsufficientFunds(id) if id == a.id));

    assert_eq!(
        bank.account_required(a.id).await.unwrap().balance,
        dec("100.00")
    );
    assert_eq!(
        bank.account_required(b.id).await.unwrap().balance,
        dec("50.00")
    );
    assert!(bank.entries().await.unwrap().is_empty());
}

#[tokio::test]
async fn unknown_accounts_and_entries_are_reported() {
    let (bank, a, _) = two_account_bank().await;

    let err = bank.deposit(999, dec("10.00")).await.unwrap_err();
    assert!(matches!(err, LedgerError::AccountNotFound(999)));

    let err = bank.transfer(a.id, 999, dec("10.00")).await.unwrap_err();
    assert!(matches!(err, LedgerError::AccountNotFound(999)));

    let err = bank.reverse(42).await.unwrap_err();
    assert!(matches!(err, LedgerError::EntryNotFound(42)));
}

#[tokio::test]
async fn withdrawal_reversal_adds_the_amount_back() {
    let (bank, a, _) = two_account_bank().await;

    bank.withdraw(a.id, dec("25.00")).await.unwrap();
    let entry_id = bank.entries().await.unwrap()[0].id;

    bank.reverse(entry_id).await.unwrap();
    assert_eq!(
        bank.account_required(a.id).await.unwrap().balance,
        dec("100.00")
    );
}

#[tokio::test]
async fn deposit_reversal_may_drive_balance_negative() {
    let (bank, a, _) = two_account_bank().await;

    bank.deposit(a.id, dec("40.00")).await.unwrap();
    let deposit_entry = bank.entries().await.unwrap()[0].id;

    // drain below the deposited amount
    bank.withdraw(a.id, dec("120.00")).await.unwrap();
    assert_eq!(
        bank.account_required(a.id).await.unwrap().balance,
        dec("20.00")
    );

    // documented simplification: deposit reversal skips the sufficiency
    // check and the balance goes negative
    bank.reverse(deposit_entry).await.unwrap();
    assert_eq!(
        bank.account_required(a.id).await.unwrap().balance,
        dec("-20.00")
    );
}

#[tokio::test]
async fn transfer_reversal_requires_destination_funds() {
    let (bank, a, b) = two_account_bank().await;

    bank.transfer(a.id, b.id, dec("30.00")).await.unwrap();
    let entry_id = bank.entries().await.unwrap()[0].id;

    // destination spends the money before the reversal
    bank.withdraw(b.id, dec("60.00")).await.unwrap();

    let err = bank.reverse(entry_id).await.unwrap_err();
    assert!(matches!(err, LedgerError::InsufficientFundsForReversal(id) if id == b.id));

    // nothing moved, flag still clear
    assert_eq!(
        bank.account_required(a.id).await.unwrap().balance,
        dec("70.00")
    );
    assert_eq!(
        bank.account_required(b.id).await.unwrap().balance,
        dec("20.00")
    );
    assert!(!bank.entry(entry_id).await.unwrap().unwrap().reversed);
}

#[tokio::test]
async fn entry_amount_survives_reversal() {
    let (bank, a, _) = two_account_bank().await;

    bank.deposit(a.id, dec("12.50")).await.unwrap();
    let entry_id = bank.entries().await.unwrap()[0].id;
    bank.reverse(entry_id).await.unwrap();

    let entry = bank.entry(entry_id).await.unwrap().unwrap();
    assert!(entry.reversed);
    assert_eq!(entry.amount, dec("12.50"));
}

#[tokio::test]
async fn entry_ids_are_monotonic_and_listing_is_newest_first() {
    let (bank, a, b) = two_account_bank().await;

    bank.deposit(a.id, dec("1.00")).await.unwrap();
    bank.withdraw(b.id, dec("1.00")).await.unwrap();
    bank.transfer(a.id, b.id, dec("1.00")).await.unwrap();

    let entries = bank.entries().await.unwrap();
    assert_eq!(entries.len(), 3);
    assert!(entries[0].id > entries[1].id && entries[1].id > entries[2].id);
    assert_eq!(entries[0].kind, EntryKind::Transfer);
    assert_eq!(entries[2].kind, EntryKind::Deposit);

    // per-kind side shape
    assert!(entries[2].source_account_id.is_none());
    assert!(entries[2].destination_account_id.is_some());
    assert!(entries[1].source_account_id.is_some());
    assert!(entries[1].destination_account_id.is_none());
    assert!(entries[0].source_account_id.is_some() && entries[0].destination_account_id.is_some());
}

#[tokio::test]
async fn account_listings_follow_ownership() {
    let (bank, a, b) = two_account_bank().await;

    let mine = bank.accounts_for_owner(a.owner_id).await.unwrap();
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0].id, a.id);

    let others = bank.other_accounts(a.owner_id).await.unwrap();
    assert_eq!(others.len(), 1);
    assert_eq!(others[0].id, b.id);
}

#[tokio::test]
async fn opening_balance_must_be_non_negative() {
    let bank = Bank::new(MemoryStore::new());
    let owner = bank.register_owner("carol").await.unwrap();

    let err = bank
        .open_account(owner.id, "Broken", dec("-1.00"))
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::InvalidAmount));

    assert!(bank
        .open_account(owner.id, "Empty", dec("0"))
        .await
        .is_ok());
}

#[tokio::test]
async fn open_account_rejects_blank_display_names() {
    let bank = Bank::new(MemoryStore::new());
    let owner = bank.register_owner("dave").await.unwrap();

    for bad in ["", "   "] {
        let err = bank
            .open_account(owner.id, bad, dec("10.00"))
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::Validation(_)));
    }

    let err = bank
        .open_account(owner.id, &"x".repeat(101), dec("10.00"))
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::Validation(_)));

    assert!(bank.accounts_for_owner(owner.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn open_account_rejects_unknown_owner() {
    let bank = Bank::new(MemoryStore::new());

    let err = bank
        .open_account(999, "Orphan", dec("10.00"))
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::Validation(_)));
}

#[tokio::test]
async fn entry_snapshot_serializes_with_expected_shape() {
    let (bank, a, _) = two_account_bank().await;
    bank.deposit(a.id, dec("5.00")).await.unwrap();

    let entry = &bank.entries().await.unwrap()[0];
    let json = serde_json::to_value(entry).unwrap();

    assert_eq!(json["kind"], "Deposit");
    assert!(json["source_account_id"].is_null());
    assert_eq!(json["destination_account_id"], a.id);
    assert_eq!(json["reversed"], false);
}

#[tokio::test]
async fn store_rejects_commits_against_missing_accounts() {
    let store = MemoryStore::new();

    let err = store
        .commit(
            &[Posting::credit(7, dec("10.00"))],
            NewEntry::deposit(7, dec("10.00")),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, LedgerError::AccountNotFound(7)));
    assert!(store.list_entries().await.unwrap().is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_disjoint_transfers_all_commit() {
    let bank = Arc::new(Bank::new(MemoryStore::new()));
    let owner = bank.register_owner("pool").await.unwrap();

    let mut pairs = Vec::new();
    for _ in 0..8 {
        let src = bank
            .open_account(owner.id, "Src", dec("100.00"))
            .await
            .unwrap();
        let dst = bank
            .open_account(owner.id, "Dst", dec("10.00"))
            .await
            .unwrap();
        pairs.push((src.id, dst.id));
    }

    let mut handles = Vec::new();
    for (src, dst) in pairs.clone() {
        let bank = Arc::clone(&bank);
        handles.push(tokio::spawn(async move {
            bank.transfer(src, dst, dec("25.00")).await
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    for (src, dst) in pairs {
        assert_eq!(
            bank.account_required(src).await.unwrap().balance,
            dec("75.00")
        );
        assert_eq!(
            bank.account_required(dst).await.unwrap().balance,
            dec("35.00")
        );
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_deposits_on_one_account_sum_exactly() {
    let bank = Arc::new(Bank::new(MemoryStore::new()));
    let owner = bank.register_owner("saver").await.unwrap();
    let account = bank
        .open_account(owner.id, "Jar", dec("100.00"))
        .await
        .unwrap();

    let mut handles = Vec::new();
    for _ in 0..25 {
        let bank = Arc::clone(&bank);
        let id = account.id;
        handles.push(tokio::spawn(
            async move { bank.deposit(id, dec("1.00")).await },
        ));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    assert_eq!(
        bank.account_required(account.id).await.unwrap().balance,
        dec("125.00")
    );
    assert_eq!(bank.entries().await.unwrap().len(), 25);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_same_account_operations_serialize() {
    let bank = Arc::new(Bank::new(MemoryStore::new()));
    let owner = bank.register_owner("busy").await.unwrap();
    let account = bank
        .open_account(owner.id, "Hot", dec("100.00"))
        .await
        .unwrap();

    // 20 concurrent withdrawals of 10.00 against 100.00: any serial
    // ordering lets exactly 10 succeed and ends at zero.
    let mut handles = Vec::new();
    for _ in 0..20 {
        let bank = Arc::clone(&bank);
        let id = account.id;
        handles.push(tokio::spawn(
            async move { bank.withdraw(id, dec("10.00")).await },
        ));
    }

    let mut successes = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => successes += 1,
            Err(LedgerError::InsufficientFunds(_)) => {}
            Err(other) => panic!("unexpected error: {other}"),
        }
    }

    assert_eq!(successes, 10);
    assert_eq!(
        bank.account_required(account.id).await.unwrap().balance,
        dec("0")
    );
    assert_eq!(bank.entries().await.unwrap().len(), 10);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_reversals_admit_exactly_one_winner() {
    let (bank, a, b) = two_account_bank().await;
    bank.transfer(a.id, b.id, dec("30.00")).await.unwrap();
    let entry_id = bank.entries().await.unwrap()[0].id;

    let bank = Arc::new(bank);
    let mut handles = Vec::new();
    for _ in 0..8 {
        let bank = Arc::clone(&bank);
        handles.push(tokio::spawn(async move { bank.reverse(entry_id).await }));
    }

    let mut wins = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(()) => wins += 1,
            Err(LedgerError::AlreadyReversed(_)) => {}
            Err(other) => panic!("unexpected error: {other}"),
        }
    }

    assert_eq!(wins, 1);
    assert_eq!(
        bank.account_required(a.id).await.unwrap().balance,
        dec("100.00")
    );
    assert_eq!(
        bank.account_required(b.id).await.unwrap().balance,
        dec("50.00")
    );
}
