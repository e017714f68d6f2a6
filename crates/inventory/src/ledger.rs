//! The stock ledger: per-product stock counters plus the append-only
//! transaction log behind them.
//!
//! Implementations own the only shared mutable state in the system. The
//! contract is strict: every counter mutation appends exactly one
//! transaction, the counter never goes negative, and a batch either fully
//! applies or leaves nothing behind.

use serde::{Deserialize, Serialize};

use voltmart_core::{DomainError, DomainResult, ProductId, StaffId, TransactionId};

use crate::transaction::{InventoryTransaction, TransactionKind};

/// A single requested stock mutation, not yet applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub product_id: ProductId,
    /// Signed change to the stock counter. Never zero.
    pub delta: i64,
    /// Explicit kind, or `None` to derive it from the sign of `delta`.
    pub kind: Option<TransactionKind>,
    pub reference_number: String,
    pub performed_by: StaffId,
    pub notes: String,
}

impl LedgerEntry {
    /// Effective transaction kind for this entry.
    pub fn kind(&self) -> TransactionKind {
        self.kind
            .unwrap_or_else(|| TransactionKind::for_delta(self.delta))
    }

    /// Absolute number of units moved. Wide enough for any `delta`, so the
    /// audit trail always agrees with the counter change.
    pub fn quantity(&self) -> u64 {
        self.delta.unsigned_abs()
    }
}

/// Outcome of one applied ledger entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Recorded {
    pub transaction_id: TransactionId,
    /// Stock counter after the entry was applied.
    pub new_stock: i64,
}

/// Check a delta against the non-negative floor.
///
/// Returns the new stock level, or `InsufficientStock` carrying the current
/// level so operators can see what was actually available.
pub fn apply_delta(current: i64, delta: i64) -> DomainResult<i64> {
    if delta == 0 {
        return Err(DomainError::invalid_quantity("delta cannot be zero"));
    }
    let next = current + delta;
    if next < 0 {
        return Err(DomainError::insufficient_stock(current));
    }
    Ok(next)
}

/// Authoritative stock bookkeeping for all products.
///
/// `record` must be atomic per product with respect to concurrent callers:
/// the floor check and the counter mutation happen as one unit. Entries for
/// different products are independent.
pub trait StockLedger {
    /// Apply one entry: mutate the counter and append the transaction.
    ///
    /// Fails with `NotFound` for an unknown product and `InsufficientStock`
    /// when the delta would drive the counter negative, leaving state
    /// untouched in both cases.
    fn record(&self, entry: LedgerEntry) -> DomainResult<Recorded>;

    /// Apply a batch of entries as one unit: all of them or none of them.
    fn record_all(&self, entries: Vec<LedgerEntry>) -> DomainResult<Vec<Recorded>>;

    /// Record an entry computed from the live stock counter.
    ///
    /// `build` receives the current counter under the same guard that applies
    /// the entry, so a delta derived from it (an adjustment to an absolute
    /// target, say) cannot go stale between the read and the write. An error
    /// from `build` aborts the record and leaves state untouched.
    fn record_with<F>(&self, product_id: ProductId, build: F) -> DomainResult<Recorded>
    where
        F: FnOnce(i64) -> DomainResult<LedgerEntry>;

    /// Current stock counter for a product.
    fn current_stock(&self, product_id: ProductId) -> DomainResult<i64>;

    /// All transactions for a product, newest first. A fresh snapshot per
    /// call, not a live cursor.
    fn history_for(&self, product_id: ProductId) -> DomainResult<Vec<InventoryTransaction>>;

    /// All transactions across products, newest first.
    fn transactions(&self) -> DomainResult<Vec<InventoryTransaction>>;

    /// All transactions of one kind, newest first (the GRN/GDN/ADJ listings
    /// the back office prints).
    fn transactions_of_kind(
        &self,
        kind: TransactionKind,
    ) -> DomainResult<Vec<InventoryTransaction>>;
}

impl<T: StockLedger + ?Sized> StockLedger for &T {
    fn record(&self, entry: LedgerEntry) -> DomainResult<Recorded> {
        (**self).record(entry)
    }

    fn record_all(&self, entries: Vec<LedgerEntry>) -> DomainResult<Vec<Recorded>> {
        (**self).record_all(entries)
    }

    fn record_with<F>(&self, product_id: ProductId, build: F) -> DomainResult<Recorded>
    where
        F: FnOnce(i64) -> DomainResult<LedgerEntry>,
    {
        (**self).record_with(product_id, build)
    }

    fn current_stock(&self, product_id: ProductId) -> DomainResult<i64> {
        (**self).current_stock(product_id)
    }

    fn history_for(&self, product_id: ProductId) -> DomainResult<Vec<InventoryTransaction>> {
        (**self).history_for(product_id)
    }

    fn transactions(&self) -> DomainResult<Vec<InventoryTransaction>> {
        (**self).transactions()
    }

    fn transactions_of_kind(
        &self,
        kind: TransactionKind,
    ) -> DomainResult<Vec<InventoryTransaction>> {
        (**self).transactions_of_kind(kind)
    }
}
