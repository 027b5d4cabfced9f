// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use tallyho::domain::{Amount, Balances, Participant};
use tallyho::LedgerContext;

/// Helper to build a session with the given commands already applied
pub fn session_with(commands: &[&str]) -> LedgerContext {
    let mut context = LedgerContext::new();
    context.replay(commands);
    context
}

/// Helper to look up a balance by (unnormalized) name
pub fn balance_of(balances: &Balances, name: &str) -> Amount {
    let participant = Participant::new(name).expect("non-blank name");
    *balances
        .get(&participant)
        .unwrap_or_else(|| panic!("no balance for {}", name))
}

pub fn assert_close(actual: Amount, expected: Amount) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {}, got {}",
        expected,
        actual
    );
}

/// Test fixture: a weekend trip shared by four friends
pub struct TripScript;

impl TripScript {
    pub const COMMANDS: &'static [&'static str] = &[
        "Ann paid 120 for cabin split among ann, ben, cat, dan on 2024-06-01",
        "Ben paid 45.60 for groceries split between Ben and Cat on 2024-06-01",
        "Cat paid 30 for fuel on 2024-06-02",
        "Dan paid 18 for coffee split with ann, ben",
    ];

    pub fn session() -> LedgerContext {
        session_with(Self::COMMANDS)
    }
}
