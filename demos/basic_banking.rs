//! Basic banking walkthrough: provisioning, money movement, and reversal

use banking_core::{utils::MemoryStore, Bank, LedgerError};
use bigdecimal::BigDecimal;
use std::str::FromStr;

fn dec(s: &str) -> BigDecimal {
    BigDecimal::from_str(s).unwrap()
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt().init();

    let bank = Bank::new(MemoryStore::new());

    // Provision two users with an account each
    let alice = bank.register_owner("alice").await?;
    let bob = bank.register_owner("bob").await?;

    let spending = bank
        .open_account(alice.id, "Spending", dec("980.00"))
        .await?;
    let checking = bank
        .open_account(bob.id, "Checking", dec("1500.00"))
        .await?;

    println!("Opened accounts:");
    for account in [&spending, &checking] {
        println!(
            "  #{} {} [{}] balance {}",
            account.id, account.display_name, account.external_reference, account.balance
        );
    }

    // Move some money around
    let spending = bank.deposit(spending.id, dec("120.00")).await?;
    println!("\nAfter deposit, {} holds {}", spending.display_name, spending.balance);

    bank.transfer(spending.id, checking.id, dec("250.00")).await?;
    println!(
        "After transfer: alice {} / bob {}",
        bank.account_required(spending.id).await?.balance,
        bank.account_required(checking.id).await?.balance
    );

    // A withdrawal that cannot be honored fails cleanly
    match bank.withdraw(spending.id, dec("10000.00")).await {
        Err(LedgerError::InsufficientFunds(id)) => {
            println!("Withdrawal from #{id} rejected: insufficient funds")
        }
        other => println!("unexpected outcome: {other:?}"),
    }

    // The admin view of the ledger, newest first
    println!("\nLedger:");
    for view in bank.entry_views().await? {
        println!(
            "  #{} {:?} {} -> {} amount {} reversed={}",
            view.entry.id,
            view.entry.kind,
            view.source_label,
            view.destination_label,
            view.entry.amount,
            view.entry.reversed
        );
    }

    // Roll the transfer back
    let transfer_entry = bank
        .entries()
        .await?
        .into_iter()
        .find(|e| e.kind == banking_core::EntryKind::Transfer)
        .expect("transfer was logged");
    bank.reverse(transfer_entry.id).await?;
    println!(
        "\nAfter reversal: alice {} / bob {}",
        bank.account_required(spending.id).await?.balance,
        bank.account_required(checking.id).await?.balance
    );

    Ok(())
}
