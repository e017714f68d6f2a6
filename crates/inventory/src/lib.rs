//! `voltmart-inventory` — stock ledger and warehouse operations.
//!
//! The ledger trait is the single source of truth for stock counters and the
//! append-only audit trail; the operations type is the validated façade the
//! back office calls.

pub mod ledger;
pub mod operations;
pub mod transaction;

pub use ledger::{LedgerEntry, Recorded, StockLedger, apply_delta};
pub use operations::{InventoryOperations, StockReceipt};
pub use transaction::{InventoryTransaction, TransactionKind};
