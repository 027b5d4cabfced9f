use serde::{Deserialize, Serialize};

use super::{format_amount, Amount, Balances, Participant, EPSILON};

/// A suggested payment from a debtor to a creditor.
/// Produced fresh on every query, never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettlementTransaction {
    pub from: Participant,
    pub to: Participant,
    /// Always positive
    pub amount: Amount,
}

impl std::fmt::Display for SettlementTransaction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} owes {} ${}",
            self.from,
            self.to,
            format_amount(self.amount)
        )
    }
}

/// Suggest payments that settle every balance.
///
/// Greedy matching, not a minimum-transaction solver:
/// debtors are visited most-negative first. For each debtor the creditors are
/// ordered by remaining credit, largest first, and paid off in turn until the
/// debt is exhausted. Both sorts are stable, so ties keep the balance map order.
/// Balances within `EPSILON` of zero take no part.
pub fn plan_settlement(balances: &Balances) -> Vec<SettlementTransaction> {
    let mut debtors: Vec<(&Participant, Amount)> = balances
        .iter()
        .filter(|(_, balance)| **balance < -EPSILON)
        .map(|(participant, balance)| (participant, *balance))
        .collect();
    debtors.sort_by(|a, b| a.1.total_cmp(&b.1));

    // Remaining credit per creditor, in balance map order
    let mut creditors: Vec<(&Participant, Amount)> = balances
        .iter()
        .filter(|(_, balance)| **balance > EPSILON)
        .map(|(participant, balance)| (participant, *balance))
        .collect();

    let mut transactions = Vec::new();

    for (debtor, balance) in debtors {
        let mut debt = -balance;

        let mut order: Vec<usize> = (0..creditors.len()).collect();
        order.sort_by(|&a, &b| creditors[b].1.total_cmp(&creditors[a].1));

        for index in order {
            if debt <= EPSILON {
                break;
            }
            let (creditor, credit) = creditors[index];
            if credit <= EPSILON {
                continue;
            }

            let amount = debt.min(credit);
            transactions.push(SettlementTransaction {
                from: debtor.clone(),
                to: creditor.clone(),
                amount,
            });

            debt -= amount;
            creditors[index].1 -= amount;
        }
    }

    transactions
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(name: &str) -> Participant {
        Participant::new(name).unwrap()
    }

    fn balances(entries: &[(&str, Amount)]) -> Balances {
        entries
            .iter()
            .map(|(name, balance)| (p(name), *balance))
            .collect()
    }

    fn summary(transactions: &[SettlementTransaction]) -> Vec<String> {
        transactions.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_plan_settlement_empty() {
        assert!(plan_settlement(&Balances::new()).is_empty());
    }

    #[test]
    fn test_plan_settlement_all_settled() {
        let balances = balances(&[("a", 0.0), ("b", 1e-12), ("c", -1e-12)]);
        assert!(plan_settlement(&balances).is_empty());
    }

    #[test]
    fn test_plan_settlement_single_creditor() {
        let balances = balances(&[
            ("john", 100.0 / 3.0),
            ("mary", -50.0 / 3.0),
            ("bob", -50.0 / 3.0),
        ]);

        let transactions = plan_settlement(&balances);

        // Equal debts keep map order: bob before mary
        assert_eq!(
            summary(&transactions),
            vec!["bob owes john $16.67", "mary owes john $16.67"]
        );
    }

    #[test]
    fn test_plan_settlement_largest_debtor_first() {
        let balances = balances(&[("a", -10.0), ("b", -30.0), ("c", 25.0), ("d", 15.0)]);

        let transactions = plan_settlement(&balances);

        assert_eq!(
            summary(&transactions),
            vec!["b owes c $25.00", "b owes d $5.00", "a owes d $10.00"]
        );
    }

    #[test]
    fn test_creditors_reordered_by_remaining_credit() {
        // After a pays c 18, d (10) has more remaining credit than c (2)
        let balances = balances(&[("a", -18.0), ("b", -12.0), ("c", 20.0), ("d", 10.0)]);

        let transactions = plan_settlement(&balances);

        assert_eq!(
            summary(&transactions),
            vec!["a owes c $18.00", "b owes d $10.00", "b owes c $2.00"]
        );
    }

    #[test]
    fn test_creditor_ties_keep_map_order() {
        let balances = balances(&[("x", 5.0), ("y", 5.0), ("z", -10.0)]);

        let transactions = plan_settlement(&balances);

        assert_eq!(
            summary(&transactions),
            vec!["z owes x $5.00", "z owes y $5.00"]
        );
    }

    #[test]
    fn test_debtor_payments_cover_their_debt() {
        let balances = balances(&[
            ("a", 41.27),
            ("b", -13.1),
            ("c", -20.07),
            ("d", 3.3),
            ("e", -11.4),
        ]);

        let transactions = plan_settlement(&balances);

        assert!(transactions.iter().all(|t| t.amount > 0.0));
        for (name, balance) in [("b", -13.1), ("c", -20.07), ("e", -11.4)] {
            let paid: Amount = transactions
                .iter()
                .filter(|t| t.from == p(name))
                .map(|t| t.amount)
                .sum();
            assert!((paid + balance).abs() < 1e-9, "{} paid {}", name, paid);
        }
    }

    #[test]
    fn test_plan_settlement_does_not_mutate_balances() {
        let balances = balances(&[("a", 10.0), ("b", -10.0)]);
        let before = balances.clone();

        plan_settlement(&balances);

        assert_eq!(balances, before);
    }
}
