use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::{Amount, ExpenseLedger, Participant, SETTLED_THRESHOLD};

/// Net position of every participant, keyed by normalized name.
/// Positive means the participant is owed money, negative means they owe.
pub type Balances = BTreeMap<Participant, Amount>;

/// Compute balances for all participants from the full expense history.
///
/// Every known participant gets an entry, even when it nets to zero. The payer
/// is credited with the full amount and every split member is debited their share.
pub fn compute_balances(ledger: &ExpenseLedger) -> Balances {
    let mut balances: Balances = ledger
        .participants()
        .iter()
        .map(|participant| (participant.clone(), 0.0))
        .collect();

    for expense in ledger.expenses() {
        *balances.entry(expense.paid_by.clone()).or_insert(0.0) += expense.amount;
        for person in &expense.split_among {
            *balances.entry(person.clone()).or_insert(0.0) -= expense.amount_per_person;
        }
    }

    balances
}

/// Serialized with the same words used in tables and CSV.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BalanceStatus {
    #[serde(rename = "settled")]
    Settled,
    #[serde(rename = "owed money")]
    OwedMoney,
    #[serde(rename = "owes money")]
    OwesMoney,
}

impl BalanceStatus {
    pub fn of(balance: Amount) -> Self {
        if balance.abs() < SETTLED_THRESHOLD {
            BalanceStatus::Settled
        } else if balance > 0.0 {
            BalanceStatus::OwedMoney
        } else {
            BalanceStatus::OwesMoney
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            BalanceStatus::Settled => "settled",
            BalanceStatus::OwedMoney => "owed money",
            BalanceStatus::OwesMoney => "owes money",
        }
    }
}

impl std::fmt::Display for BalanceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(name: &str) -> Participant {
        Participant::new(name).unwrap()
    }

    fn balance_of(balances: &Balances, name: &str) -> Amount {
        balances[&p(name)]
    }

    #[test]
    fn test_compute_balances_empty() {
        let ledger = ExpenseLedger::new();
        assert!(compute_balances(&ledger).is_empty());
    }

    #[test]
    fn test_compute_balances_single_expense() {
        let mut ledger = ExpenseLedger::new();
        ledger
            .add_expense(p("john"), 50.0, "dinner", Some(vec![p("john"), p("mary"), p("bob")]), None)
            .unwrap();

        let balances = compute_balances(&ledger);

        assert_eq!(balances.len(), 3);
        assert!((balance_of(&balances, "john") - 100.0 / 3.0).abs() < 1e-9);
        assert!((balance_of(&balances, "mary") + 50.0 / 3.0).abs() < 1e-9);
        assert!((balance_of(&balances, "bob") + 50.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_payer_outside_split_is_credited_in_full() {
        let mut ledger = ExpenseLedger::new();
        ledger
            .add_expense(p("alice"), 30.0, "gift", Some(vec![p("bob"), p("carol")]), None)
            .unwrap();

        let balances = compute_balances(&ledger);

        assert_eq!(balance_of(&balances, "alice"), 30.0);
        assert_eq!(balance_of(&balances, "bob"), -15.0);
        assert_eq!(balance_of(&balances, "carol"), -15.0);
    }

    #[test]
    fn test_zero_balance_participants_are_kept() {
        let mut ledger = ExpenseLedger::new();
        ledger
            .add_expense(p("a"), 10.0, "x", Some(vec![p("a"), p("b")]), None)
            .unwrap();
        ledger
            .add_expense(p("b"), 10.0, "y", Some(vec![p("a"), p("b")]), None)
            .unwrap();

        let balances = compute_balances(&ledger);

        assert_eq!(balances.len(), 2);
        assert_eq!(balance_of(&balances, "a"), 0.0);
        assert_eq!(balance_of(&balances, "b"), 0.0);
    }

    #[test]
    fn test_balances_sum_to_zero() {
        let mut ledger = ExpenseLedger::new();
        ledger
            .add_expense(p("a"), 100.0, "rent", Some(vec![p("a"), p("b"), p("c")]), None)
            .unwrap();
        ledger
            .add_expense(p("b"), 33.33, "food", Some(vec![p("c"), p("d")]), None)
            .unwrap();
        ledger.add_expense(p("c"), 7.1, "bus", None, None).unwrap();
        ledger
            .add_expense(p("d"), 0.07, "gum", Some(vec![p("a"), p("b"), p("c")]), None)
            .unwrap();

        let balances = compute_balances(&ledger);
        let total: Amount = balances.values().sum();

        assert!(total.abs() < 1e-9, "balances must net to zero, got {}", total);
    }

    #[test]
    fn test_compute_balances_is_idempotent() {
        let mut ledger = ExpenseLedger::new();
        ledger
            .add_expense(p("a"), 10.0, "x", Some(vec![p("b"), p("c")]), None)
            .unwrap();

        assert_eq!(compute_balances(&ledger), compute_balances(&ledger));
    }

    #[test]
    fn test_balance_status() {
        assert_eq!(BalanceStatus::of(0.0), BalanceStatus::Settled);
        assert_eq!(BalanceStatus::of(0.009), BalanceStatus::Settled);
        assert_eq!(BalanceStatus::of(-0.009), BalanceStatus::Settled);
        assert_eq!(BalanceStatus::of(12.0), BalanceStatus::OwedMoney);
        assert_eq!(BalanceStatus::of(-0.01), BalanceStatus::OwesMoney);
        assert_eq!(BalanceStatus::OwesMoney.to_string(), "owes money");
    }

    #[test]
    fn test_balance_status_serializes_like_display() {
        for status in [
            BalanceStatus::Settled,
            BalanceStatus::OwedMoney,
            BalanceStatus::OwesMoney,
        ] {
            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(json, format!("\"{}\"", status));
            assert_eq!(serde_json::from_str::<BalanceStatus>(&json).unwrap(), status);
        }
    }
}
