//! Warehouse-facing entry points over the stock ledger.
//!
//! Each operation validates its input, generates a reference number and a
//! default note, and records exactly one ledger entry. Validation failures
//! are reported before anything is written.

use chrono::Utc;

use voltmart_core::{DomainError, DomainResult, ProductId, StaffId, TransactionId, reference_number};

use crate::ledger::{LedgerEntry, StockLedger};
use crate::transaction::TransactionKind;

/// What an operator gets back from a completed stock operation: the
/// paperwork reference and the stock level after the change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StockReceipt {
    pub transaction_id: TransactionId,
    pub reference_number: String,
    pub new_stock: i64,
}

/// Goods-received, goods-delivered, and manual-adjustment operations.
#[derive(Debug)]
pub struct InventoryOperations<L> {
    ledger: L,
}

impl<L: StockLedger> InventoryOperations<L> {
    pub fn new(ledger: L) -> Self {
        Self { ledger }
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    /// Book `quantity` units into stock (goods-received note).
    pub fn receive_goods(
        &self,
        product_id: ProductId,
        quantity: u32,
        performed_by: StaffId,
        notes: Option<String>,
    ) -> DomainResult<StockReceipt> {
        if quantity == 0 {
            return Err(DomainError::invalid_quantity(
                "quantity must be greater than zero",
            ));
        }

        let reference = reference_number(TransactionKind::In.reference_prefix(), Utc::now());
        let recorded = self.ledger.record(LedgerEntry {
            product_id,
            delta: i64::from(quantity),
            kind: None,
            reference_number: reference.clone(),
            performed_by,
            notes: notes.unwrap_or_else(|| format!("Goods received: {quantity} units")),
        })?;

        tracing::info!(%product_id, quantity, reference = %reference, new_stock = recorded.new_stock, "goods received");

        Ok(StockReceipt {
            transaction_id: recorded.transaction_id,
            reference_number: reference,
            new_stock: recorded.new_stock,
        })
    }

    /// Book `quantity` units out of stock (goods-delivery note).
    ///
    /// Surfaces `InsufficientStock` from the ledger verbatim; the error
    /// carries the available stock level for operator diagnosis.
    pub fn deliver_goods(
        &self,
        product_id: ProductId,
        quantity: u32,
        performed_by: StaffId,
        notes: Option<String>,
    ) -> DomainResult<StockReceipt> {
        if quantity == 0 {
            return Err(DomainError::invalid_quantity(
                "quantity must be greater than zero",
            ));
        }

        let reference = reference_number(TransactionKind::Out.reference_prefix(), Utc::now());
        let recorded = self.ledger.record(LedgerEntry {
            product_id,
            delta: -i64::from(quantity),
            kind: None,
            reference_number: reference.clone(),
            performed_by,
            notes: notes.unwrap_or_else(|| format!("Goods delivered: {quantity} units")),
        })?;

        tracing::info!(%product_id, quantity, reference = %reference, new_stock = recorded.new_stock, "goods delivered");

        Ok(StockReceipt {
            transaction_id: recorded.transaction_id,
            reference_number: reference,
            new_stock: recorded.new_stock,
        })
    }

    /// Correct stock to an absolute target quantity, with a mandatory reason.
    ///
    /// Records the signed difference from the current level as an ADJUST
    /// transaction. A target equal to the current level is rejected with
    /// `NoChange` rather than silently accepted.
    pub fn adjust_to_quantity(
        &self,
        product_id: ProductId,
        new_quantity: i64,
        performed_by: StaffId,
        reason: &str,
    ) -> DomainResult<StockReceipt> {
        if new_quantity < 0 {
            return Err(DomainError::invalid_quantity("quantity cannot be negative"));
        }
        if reason.trim().is_empty() {
            return Err(DomainError::MissingReason);
        }

        let reference = reference_number(TransactionKind::Adjust.reference_prefix(), Utc::now());
        // The difference and the note are computed from the counter the
        // ledger holds while applying, so neither can go stale under a
        // concurrent mutation.
        let recorded = self.ledger.record_with(product_id, |current| {
            let difference = new_quantity - current;
            if difference == 0 {
                return Err(DomainError::NoChange);
            }
            Ok(LedgerEntry {
                product_id,
                delta: difference,
                kind: Some(TransactionKind::Adjust),
                reference_number: reference.clone(),
                performed_by,
                notes: format!("Adjustment: {current} -> {new_quantity}. Reason: {reason}"),
            })
        })?;

        tracing::info!(%product_id, to = new_quantity, reference = %reference, "stock adjusted");

        Ok(StockReceipt {
            transaction_id: recorded.transaction_id,
            reference_number: reference,
            new_stock: recorded.new_stock,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::RwLock;

    use voltmart_core::DomainError;

    use crate::ledger::Recorded;
    use crate::transaction::InventoryTransaction;

    /// Minimal single-product ledger for exercising the façade in isolation.
    struct OneProductLedger {
        product_id: ProductId,
        state: RwLock<(i64, Vec<InventoryTransaction>)>,
    }

    impl OneProductLedger {
        fn new(product_id: ProductId, stock: i64) -> Self {
            Self {
                product_id,
                state: RwLock::new((stock, Vec::new())),
            }
        }

        fn apply(
            state: &mut (i64, Vec<InventoryTransaction>),
            entry: LedgerEntry,
        ) -> DomainResult<Recorded> {
            let next = crate::ledger::apply_delta(state.0, entry.delta)?;
            let tx = InventoryTransaction {
                id: TransactionId::new(),
                product_id: entry.product_id,
                kind: entry.kind(),
                quantity: entry.quantity(),
                delta: entry.delta,
                reference_number: entry.reference_number,
                performed_by: entry.performed_by,
                notes: entry.notes,
                recorded_at: Utc::now(),
            };
            state.0 = next;
            let transaction_id = tx.id;
            state.1.push(tx);
            Ok(Recorded {
                transaction_id,
                new_stock: next,
            })
        }
    }

    impl StockLedger for OneProductLedger {
        fn record(&self, entry: LedgerEntry) -> DomainResult<Recorded> {
            if entry.product_id != self.product_id {
                return Err(DomainError::NotFound);
            }
            let mut state = self.state.write().unwrap();
            Self::apply(&mut state, entry)
        }

        fn record_all(&self, entries: Vec<LedgerEntry>) -> DomainResult<Vec<Recorded>> {
            entries.into_iter().map(|e| self.record(e)).collect()
        }

        fn record_with<F>(&self, product_id: ProductId, build: F) -> DomainResult<Recorded>
        where
            F: FnOnce(i64) -> DomainResult<LedgerEntry>,
        {
            if product_id != self.product_id {
                return Err(DomainError::NotFound);
            }
            let mut state = self.state.write().unwrap();
            let entry = build(state.0)?;
            Self::apply(&mut state, entry)
        }

        fn current_stock(&self, product_id: ProductId) -> DomainResult<i64> {
            if product_id != self.product_id {
                return Err(DomainError::NotFound);
            }
            Ok(self.state.read().unwrap().0)
        }

        fn history_for(&self, product_id: ProductId) -> DomainResult<Vec<InventoryTransaction>> {
            if product_id != self.product_id {
                return Err(DomainError::NotFound);
            }
            let mut txs = self.state.read().unwrap().1.clone();
            txs.reverse();
            Ok(txs)
        }

        fn transactions(&self) -> DomainResult<Vec<InventoryTransaction>> {
            self.history_for(self.product_id)
        }

        fn transactions_of_kind(
            &self,
            kind: TransactionKind,
        ) -> DomainResult<Vec<InventoryTransaction>> {
            Ok(self
                .transactions()?
                .into_iter()
                .filter(|t| t.kind == kind)
                .collect())
        }
    }

    fn ops_with_stock(stock: i64) -> (ProductId, InventoryOperations<OneProductLedger>) {
        let product_id = ProductId::new();
        let ops = InventoryOperations::new(OneProductLedger::new(product_id, stock));
        (product_id, ops)
    }

    #[test]
    fn receive_goods_adds_stock_and_issues_grn_reference() {
        let (product_id, ops) = ops_with_stock(5);
        let staff = StaffId::new();

        let receipt = ops.receive_goods(product_id, 7, staff, None).unwrap();
        assert_eq!(receipt.new_stock, 12);
        assert!(receipt.reference_number.starts_with("GRN-"));

        let history = ops.ledger().history_for(product_id).unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].kind, TransactionKind::In);
        assert_eq!(history[0].quantity, 7);
        assert_eq!(history[0].notes, "Goods received: 7 units");
    }

    #[test]
    fn receive_goods_rejects_zero_quantity() {
        let (product_id, ops) = ops_with_stock(5);
        let err = ops
            .receive_goods(product_id, 0, StaffId::new(), None)
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidQuantity(_)));
        assert_eq!(ops.ledger().current_stock(product_id).unwrap(), 5);
    }

    #[test]
    fn deliver_goods_uses_gdn_reference_and_caller_notes() {
        let (product_id, ops) = ops_with_stock(10);
        let receipt = ops
            .deliver_goods(
                product_id,
                4,
                StaffId::new(),
                Some("Dispatch for order ORD-1".to_string()),
            )
            .unwrap();
        assert_eq!(receipt.new_stock, 6);
        assert!(receipt.reference_number.starts_with("GDN-"));

        let history = ops.ledger().history_for(product_id).unwrap();
        assert_eq!(history[0].kind, TransactionKind::Out);
        assert_eq!(history[0].notes, "Dispatch for order ORD-1");
    }

    #[test]
    fn deliver_goods_surfaces_insufficient_stock_with_available_level() {
        let (product_id, ops) = ops_with_stock(10);
        let err = ops
            .deliver_goods(product_id, 11, StaffId::new(), None)
            .unwrap_err();
        assert_eq!(err, DomainError::insufficient_stock(10));
        assert_eq!(ops.ledger().current_stock(product_id).unwrap(), 10);
    }

    #[test]
    fn adjust_records_signed_difference_with_reason_note() {
        let (product_id, ops) = ops_with_stock(100);
        let receipt = ops
            .adjust_to_quantity(product_id, 90, StaffId::new(), "damaged in transit")
            .unwrap();
        assert_eq!(receipt.new_stock, 90);
        assert!(receipt.reference_number.starts_with("ADJ-"));

        let history = ops.ledger().history_for(product_id).unwrap();
        assert_eq!(history[0].kind, TransactionKind::Adjust);
        assert_eq!(history[0].quantity, 10);
        assert_eq!(history[0].delta, -10);
        assert_eq!(
            history[0].notes,
            "Adjustment: 100 -> 90. Reason: damaged in transit"
        );
    }

    #[test]
    fn adjust_audit_quantity_matches_the_delta_for_large_targets() {
        let (product_id, ops) = ops_with_stock(0);
        let receipt = ops
            .adjust_to_quantity(product_id, 5_000_000_000, StaffId::new(), "bulk load")
            .unwrap();
        assert_eq!(receipt.new_stock, 5_000_000_000);

        let history = ops.ledger().history_for(product_id).unwrap();
        assert_eq!(history[0].delta, 5_000_000_000);
        assert_eq!(history[0].quantity, 5_000_000_000);
    }

    #[test]
    fn adjust_to_same_quantity_is_rejected() {
        let (product_id, ops) = ops_with_stock(100);
        let err = ops
            .adjust_to_quantity(product_id, 100, StaffId::new(), "recount")
            .unwrap_err();
        assert_eq!(err, DomainError::NoChange);
        assert!(ops.ledger().history_for(product_id).unwrap().is_empty());
    }

    #[test]
    fn adjust_requires_a_reason() {
        let (product_id, ops) = ops_with_stock(100);
        let err = ops
            .adjust_to_quantity(product_id, 90, StaffId::new(), "   ")
            .unwrap_err();
        assert_eq!(err, DomainError::MissingReason);
    }

    #[test]
    fn adjust_rejects_negative_target() {
        let (product_id, ops) = ops_with_stock(100);
        let err = ops
            .adjust_to_quantity(product_id, -1, StaffId::new(), "recount")
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidQuantity(_)));
    }

    #[test]
    fn unknown_product_reports_not_found() {
        let (_, ops) = ops_with_stock(1);
        let err = ops
            .receive_goods(ProductId::new(), 1, StaffId::new(), None)
            .unwrap_err();
        assert_eq!(err, DomainError::NotFound);
    }
}
