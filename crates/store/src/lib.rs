//! `voltmart-store` — persistence for the retail core.
//!
//! The in-memory store implements the stock ledger and the order/payment
//! store traits over a single locked state, which is what makes multi-step
//! mutations (batch ledger writes, cancellation) atomic.

pub mod memory;

pub use memory::{InMemoryStore, ProductRecord};
