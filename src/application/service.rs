use chrono::NaiveDate;
use tracing::{debug, info, warn};

use crate::domain::{
    compute_balances, plan_settlement, Amount, Balances, ExpenseLedger, ExpenseRecord,
    Participant, SettlementTransaction,
};

use super::parser::{classify, DateClause, ExpenseDraft, Intent};
use super::reporting::{balance_rows, expense_rows, BalanceRow, ExpenseRow};
use super::AppError;

pub const SETTLED_MESSAGE: &str = "All settled up! No one owes anything.";
pub const BALANCES_HEADER: &str = "Here's who owes whom:";
pub const NO_EXPENSES_MESSAGE: &str = "No expenses recorded yet.";
pub const SUMMARY_HEADER: &str = "Expense Summary:";
pub const CLEARED_MESSAGE: &str = "All expenses have been cleared.";
pub const UNKNOWN_MESSAGE: &str =
    "I didn't understand that command. Type 'help' to see what I can do.";
pub const HELP_MESSAGE: &str = r#"I understand these commands:
- "[name] paid [amount] for [description] split among/between/with [person1, person2, ...]"
- "balance" or "who owes" to see who owes whom
- "summary" or "list expenses" to see all recorded expenses
- "help" to see this message
- "clear" to reset all expenses"#;

/// One user session: the expense ledger plus every operation a client
/// (CLI, UI host, tests) can run against it.
///
/// Nothing here is global; each session owns its own context.
#[derive(Debug, Default)]
pub struct LedgerContext {
    ledger: ExpenseLedger,
}

impl LedgerContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ledger(&self) -> &ExpenseLedger {
        &self.ledger
    }

    /// Parse and run one text command, returning the text to show the user.
    ///
    /// Never fails: unrecognised input and rejected expenses are reported in
    /// the returned text.
    pub fn execute(&mut self, line: &str) -> String {
        let intent = classify(line);
        debug!(?intent, "classified command");

        match intent {
            Intent::AddExpense(draft) => match self.record_draft(draft) {
                Ok(record) => record.confirmation(),
                Err(err) => format!("Could not add expense: {}.", err),
            },
            Intent::ShowBalances => self.balances_report(),
            Intent::ShowSummary => self.summary_report(),
            Intent::Help => HELP_MESSAGE.to_string(),
            Intent::Clear => {
                self.clear();
                CLEARED_MESSAGE.to_string()
            }
            Intent::Unknown => UNKNOWN_MESSAGE.to_string(),
        }
    }

    /// Run a sequence of commands in order, collecting each response.
    pub fn replay<I, S>(&mut self, lines: I) -> Vec<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        lines
            .into_iter()
            .map(|line| self.execute(line.as_ref()))
            .collect()
    }

    /// Record an expense directly, without going through the command grammar.
    ///
    /// Names are normalized; blank split names are ignored. Unlike the text
    /// command, the payer is not added to an explicit split group.
    pub fn add_expense(
        &mut self,
        paid_by: &str,
        amount: Amount,
        description: &str,
        split_among: Option<&[&str]>,
        date: Option<NaiveDate>,
    ) -> Result<String, AppError> {
        let paid_by = Participant::new(paid_by)
            .ok_or_else(|| AppError::InvalidParticipant(paid_by.to_string()))?;
        let split_among = split_among.map(|names| {
            names
                .iter()
                .filter_map(|name| Participant::new(name))
                .collect::<Vec<_>>()
        });

        let record = self.record(paid_by, amount, description.trim(), split_among, date)?;
        Ok(record.confirmation())
    }

    /// Empty the ledger: no expenses, no participants.
    pub fn clear(&mut self) {
        let dropped = self.ledger.expenses().len();
        self.ledger.clear();
        info!(dropped, "cleared ledger");
    }

    pub fn expenses(&self) -> &[ExpenseRecord] {
        self.ledger.expenses()
    }

    pub fn participants(&self) -> &[Participant] {
        self.ledger.participants()
    }

    pub fn balances(&self) -> Balances {
        compute_balances(&self.ledger)
    }

    pub fn settlement(&self) -> Vec<SettlementTransaction> {
        plan_settlement(&self.balances())
    }

    pub fn expense_rows(&self) -> Vec<ExpenseRow> {
        expense_rows(&self.ledger)
    }

    pub fn balance_rows(&self) -> Vec<BalanceRow> {
        balance_rows(&self.balances())
    }

    /// "Who owes whom", one line per suggested payment.
    pub fn balances_report(&self) -> String {
        let transactions = self.settlement();
        if transactions.is_empty() {
            return SETTLED_MESSAGE.to_string();
        }

        std::iter::once(BALANCES_HEADER.to_string())
            .chain(transactions.iter().map(ToString::to_string))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Numbered list of every expense in the order it was recorded.
    pub fn summary_report(&self) -> String {
        if self.ledger.is_empty() {
            return NO_EXPENSES_MESSAGE.to_string();
        }

        std::iter::once(SUMMARY_HEADER.to_string())
            .chain(
                self.ledger
                    .expenses()
                    .iter()
                    .enumerate()
                    .map(|(index, expense)| expense.summary_line(index + 1)),
            )
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn record_draft(&mut self, draft: ExpenseDraft) -> Result<&ExpenseRecord, AppError> {
        if let DateClause::Malformed(raw) = &draft.date {
            debug!(date = %raw, "unparseable date, recording expense for today");
        }
        let date = draft.date.date();
        self.record(
            draft.paid_by,
            draft.amount,
            &draft.description,
            draft.split_among,
            date,
        )
    }

    fn record(
        &mut self,
        paid_by: Participant,
        amount: Amount,
        description: &str,
        split_among: Option<Vec<Participant>>,
        date: Option<NaiveDate>,
    ) -> Result<&ExpenseRecord, AppError> {
        match self
            .ledger
            .add_expense(paid_by.clone(), amount, description, split_among, date)
        {
            Ok(record) => {
                info!(
                    paid_by = %record.paid_by,
                    amount = record.amount,
                    members = record.split_among.len(),
                    "recorded expense"
                );
                Ok(record)
            }
            Err(err) => {
                warn!(%paid_by, amount, error = %err, "rejected expense");
                Err(err.into())
            }
        }
    }
}
