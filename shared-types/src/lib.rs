pub mod clock;
pub mod expense;
pub mod receipt;
pub mod report;

pub use clock::{Clock, FixedClock, SystemClock};
pub use expense::{Expense, ExpenseCategory};
pub use receipt::ReceiptScan;
pub use report::{CategoryStat, CategoryTotal, ExportRow, MonthlyRecap};
