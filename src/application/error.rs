use thiserror::Error;

use crate::domain::ExpenseError;

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Expense(#[from] ExpenseError),

    #[error("Invalid participant name: '{0}'")]
    InvalidParticipant(String),

    #[error("Ledger session is unavailable: a previous command panicked while holding it")]
    SessionPoisoned,
}
