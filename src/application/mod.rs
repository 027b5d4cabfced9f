// Application layer - turns text commands into ledger operations.
// Clients (CLI, a UI host, tests) talk to a `LedgerContext`, or to a
// `SharedLedger` when several callers use the same session.

pub mod error;
pub mod parser;
pub mod reporting;
pub mod service;
pub mod session;

pub use error::*;
pub use parser::{classify, DateClause, ExpenseDraft, Intent};
pub use reporting::*;
pub use service::*;
pub use session::*;
