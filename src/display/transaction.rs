//! Transaction display formatting
//!
//! Formats ledger entries for terminal listings and detail views.

use crate::models::{Money, Transaction, TransactionKind};

use super::report::{format_date, truncate};

fn category_label(txn: &Transaction) -> String {
    match &txn.subcategory {
        Some(sub) => format!("{} / {}", txn.category, sub),
        None => txn.category.clone(),
    }
}

/// Format a single transaction as a listing row
pub fn format_transaction_row(txn: &Transaction, date_format: &str) -> String {
    let marker = match txn.kind {
        TransactionKind::Income => "+",
        TransactionKind::Expense if txn.is_refund() => "r",
        TransactionKind::Expense => "-",
    };

    format!(
        "{:<8} {} {:<10} {:<8} {:<28} {:>12}  {}",
        txn.id.to_string(),
        marker,
        format_date(txn.date, date_format),
        txn.person,
        truncate(&category_label(txn), 28),
        txn.amount.to_string(),
        truncate(&txn.description, 30),
    )
}

/// Format transactions as a listing with income and expense totals
pub fn format_transaction_list(transactions: &[Transaction], date_format: &str) -> String {
    if transactions.is_empty() {
        return "No transactions found.\n".to_string();
    }

    let mut output = String::new();
    output.push_str(&format!(
        "{:<8} {} {:<10} {:<8} {:<28} {:>12}  {}\n",
        "ID", " ", "Date", "Person", "Category", "Amount", "Description"
    ));
    output.push_str(&"-".repeat(90));
    output.push('\n');

    for txn in transactions {
        output.push_str(&format_transaction_row(txn, date_format));
        output.push('\n');
    }

    let income: Money = transactions
        .iter()
        .filter(|t| t.is_income())
        .map(|t| t.amount)
        .sum();
    let expenses: Money = transactions
        .iter()
        .filter(|t| t.is_expense())
        .map(|t| t.amount)
        .sum();

    output.push_str(&"-".repeat(90));
    output.push('\n');
    output.push_str(&format!(
        "{} transaction(s)  Income: {}  Expenses: {}  Net: {}\n",
        transactions.len(),
        income,
        expenses,
        income - expenses
    ));

    output
}

/// Format transaction details for display
pub fn format_transaction_details(txn: &Transaction, date_format: &str) -> String {
    let mut output = String::new();

    output.push_str(&format!("Transaction: {}\n", txn.id));
    output.push_str(&format!("Kind:        {}\n", txn.kind));
    output.push_str(&format!("Date:        {}\n", format_date(txn.date, date_format)));
    output.push_str(&format!("Person:      {}\n", txn.person));
    output.push_str(&format!("Amount:      {}\n", txn.amount));
    output.push_str(&format!("Category:    {}\n", category_label(txn)));

    if !txn.description.is_empty() {
        output.push_str(&format!("Description: {}\n", txn.description));
    }
    if let Some(method) = &txn.payment_method {
        output.push_str(&format!("Payment:     {}\n", method));
    }
    if txn.is_refund() {
        output.push_str("Type:        Refund\n");
    }

    output
}
