use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::{Amount, BalanceStatus, Balances, ExpenseLedger, Participant};

/// Expense history row for a rendering layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseRow {
    pub date: NaiveDate,
    pub description: String,
    pub amount: Amount,
    pub paid_by: Participant,
    pub split_among: Vec<Participant>,
}

/// Current balance row; status is "settled" within a cent of zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BalanceRow {
    pub participant: Participant,
    pub balance: Amount,
    pub status: BalanceStatus,
}

pub fn expense_rows(ledger: &ExpenseLedger) -> Vec<ExpenseRow> {
    ledger
        .expenses()
        .iter()
        .map(|expense| ExpenseRow {
            date: expense.date,
            description: expense.description.clone(),
            amount: expense.amount,
            paid_by: expense.paid_by.clone(),
            split_among: expense.split_among.clone(),
        })
        .collect()
}

pub fn balance_rows(balances: &Balances) -> Vec<BalanceRow> {
    balances
        .iter()
        .map(|(participant, balance)| BalanceRow {
            participant: participant.clone(),
            balance: *balance,
            status: BalanceStatus::of(*balance),
        })
        .collect()
}
