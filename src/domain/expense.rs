use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

use super::{format_amount, join_names, Amount, Participant};

/// One recorded payment: who paid, how much, and who shares the cost.
/// Records are immutable and identified only by their position in the ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseRecord {
    /// Calendar date of the expense (defaults to the day it was recorded)
    pub date: NaiveDate,
    pub paid_by: Participant,
    /// Always positive
    pub amount: Amount,
    pub description: String,
    /// Non-empty, without duplicates, in the order the names were given
    pub split_among: Vec<Participant>,
    /// `amount / split_among.len()`, not corrected for rounding drift
    pub amount_per_person: Amount,
}

impl ExpenseRecord {
    /// Confirmation line shown after the expense is recorded.
    pub fn confirmation(&self) -> String {
        format!(
            "Added expense: {} - ${} paid by {}, split among {}.",
            self.description,
            format_amount(self.amount),
            self.paid_by,
            join_names(&self.split_among)
        )
    }

    /// Summary line, `position` being the 1-based index in the ledger.
    pub fn summary_line(&self, position: usize) -> String {
        format!(
            "{}. {} - ${} paid by {}, split among {}",
            position,
            self.description,
            format_amount(self.amount),
            self.paid_by,
            join_names(&self.split_among)
        )
    }

    /// Returns true if `participant` shares the cost of this expense.
    pub fn is_shared_by(&self, participant: &Participant) -> bool {
        self.split_among.contains(participant)
    }
}

/// Append-only list of expenses plus every participant seen so far.
///
/// The participant set is the union of all payers and split members, kept in the
/// order people first appeared. Only `add_expense` and `clear` mutate the ledger.
#[derive(Debug, Clone, Default)]
pub struct ExpenseLedger {
    expenses: Vec<ExpenseRecord>,
    participants: Vec<Participant>,
}

impl ExpenseLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an expense.
    ///
    /// Without an explicit split group the cost is shared by every participant
    /// known before this call, which is empty for the very first expense. The
    /// ledger is left untouched when the expense is rejected.
    pub fn add_expense(
        &mut self,
        paid_by: Participant,
        amount: Amount,
        description: impl Into<String>,
        split_among: Option<Vec<Participant>>,
        date: Option<NaiveDate>,
    ) -> Result<&ExpenseRecord, ExpenseError> {
        if !amount.is_finite() {
            return Err(ExpenseError::NonFiniteAmount { amount });
        }
        if amount <= 0.0 {
            return Err(ExpenseError::NonPositiveAmount { amount });
        }

        let split_among = match split_among {
            Some(names) => dedup_preserving_order(names),
            None => self.participants.clone(),
        };
        if split_among.is_empty() {
            return Err(ExpenseError::EmptySplitGroup);
        }

        for person in &split_among {
            self.register(person);
        }
        self.register(&paid_by);

        let amount_per_person = amount / split_among.len() as Amount;
        self.expenses.push(ExpenseRecord {
            date: date.unwrap_or_else(today),
            paid_by,
            amount,
            description: description.into(),
            split_among,
            amount_per_person,
        });

        let index = self.expenses.len() - 1;
        Ok(&self.expenses[index])
    }

    /// Remove every expense and forget every participant.
    pub fn clear(&mut self) {
        self.expenses.clear();
        self.participants.clear();
    }

    pub fn expenses(&self) -> &[ExpenseRecord] {
        &self.expenses
    }

    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    pub fn is_empty(&self) -> bool {
        self.expenses.is_empty()
    }

    fn register(&mut self, participant: &Participant) {
        if !self.participants.contains(participant) {
            self.participants.push(participant.clone());
        }
    }
}

/// The current local calendar date.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn dedup_preserving_order(names: Vec<Participant>) -> Vec<Participant> {
    let mut unique: Vec<Participant> = Vec::with_capacity(names.len());
    for name in names {
        if !unique.contains(&name) {
            unique.push(name);
        }
    }
    unique
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExpenseError {
    /// The split group resolved to nobody, so there is no one to divide the cost by.
    EmptySplitGroup,
    NonPositiveAmount { amount: Amount },
    /// Overflowed to infinity or not a number at all.
    NonFiniteAmount { amount: Amount },
}

impl std::fmt::Display for ExpenseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExpenseError::EmptySplitGroup => {
                write!(f, "cannot split an expense among zero people")
            }
            ExpenseError::NonPositiveAmount { amount } => {
                write!(f, "amount must be greater than zero (got {})", amount)
            }
            ExpenseError::NonFiniteAmount { amount } => {
                write!(f, "amount must be a finite number (got {})", amount)
            }
        }
    }
}

impl std::error::Error for ExpenseError {}
