mod balance;
mod expense;
mod money;
mod participant;
mod settlement;

pub use balance::*;
pub use expense::*;
pub use money::*;
pub use participant::*;
pub use settlement::*;
