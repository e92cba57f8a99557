//! Wire and domain types shared by the store, the actor and the HTTP layer.

pub mod envelope;
pub mod expense;
pub mod timestamp;

pub use envelope::{ApiResponse, SUCCESS};
pub use expense::{Expense, ExpenseInput, ExpenseQuery, NewExpense};
