//! In-memory retail store.
//!
//! Intended for tests/dev and single-process deployments; this is the
//! per-product-lock alternative to a relational backend. One `RwLock` guards
//! all state, so every multi-step mutation validates completely and then
//! applies under a single write guard; a failure partway through validation
//! leaves nothing behind.

use std::collections::HashMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use voltmart_core::{DomainError, DomainResult, OrderId, ProductId, StaffId, TransactionId};
use voltmart_inventory::{
    InventoryTransaction, LedgerEntry, Recorded, StockLedger, TransactionKind, apply_delta,
};
use voltmart_orders::{
    CancellationPlan, CancellationStore, Order, OrderStatus, OrderStore, Payment, PaymentStatus,
    PaymentStore,
};

/// Catalog product as the store persists it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductRecord {
    pub id: ProductId,
    pub name: String,
    pub sku: String,
    pub price: Decimal,
    /// Invariant: never negative. Mutated only through the ledger.
    pub stock_level: i64,
}

#[derive(Debug, Default)]
struct State {
    products: HashMap<ProductId, ProductRecord>,
    /// Append-only, oldest first. Read sides reverse for newest-first views.
    transactions: Vec<InventoryTransaction>,
    orders: HashMap<OrderId, Order>,
    payments: HashMap<OrderId, Payment>,
}

/// All persisted state behind one lock.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    state: RwLock<State>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> DomainResult<RwLockReadGuard<'_, State>> {
        self.state
            .read()
            .map_err(|_| DomainError::persistence("state lock poisoned"))
    }

    fn write(&self) -> DomainResult<RwLockWriteGuard<'_, State>> {
        self.state
            .write()
            .map_err(|_| DomainError::persistence("state lock poisoned"))
    }

    /// Seed a product. Duplicate ids are rejected.
    pub fn insert_product(&self, record: ProductRecord) -> DomainResult<()> {
        if record.stock_level < 0 {
            return Err(DomainError::invalid_quantity(
                "stock level cannot be negative",
            ));
        }
        let mut state = self.write()?;
        if state.products.contains_key(&record.id) {
            return Err(DomainError::validation("product already exists"));
        }
        state.products.insert(record.id, record);
        Ok(())
    }

    pub fn product(&self, product_id: ProductId) -> DomainResult<ProductRecord> {
        self.read()?
            .products
            .get(&product_id)
            .cloned()
            .ok_or(DomainError::NotFound)
    }

    /// Seed or replace the payment attached to an order.
    pub fn insert_payment(&self, payment: Payment) -> DomainResult<()> {
        self.write()?.payments.insert(payment.order_id, payment);
        Ok(())
    }

    /// Validate a batch against prospective stock levels without mutating.
    ///
    /// Returns the post-apply level for each entry, accounting for earlier
    /// entries in the same batch touching the same product.
    fn check_entries(state: &State, entries: &[LedgerEntry]) -> DomainResult<Vec<i64>> {
        let mut prospective: HashMap<ProductId, i64> = HashMap::new();
        let mut levels = Vec::with_capacity(entries.len());
        for entry in entries {
            let current = match prospective.get(&entry.product_id) {
                Some(level) => *level,
                None => {
                    state
                        .products
                        .get(&entry.product_id)
                        .ok_or(DomainError::NotFound)?
                        .stock_level
                }
            };
            let next = apply_delta(current, entry.delta)?;
            prospective.insert(entry.product_id, next);
            levels.push(next);
        }
        Ok(levels)
    }

    /// Apply already-validated entries: counters move and transactions append.
    fn apply_entries(
        state: &mut State,
        entries: Vec<LedgerEntry>,
        levels: &[i64],
    ) -> Vec<Recorded> {
        let now = Utc::now();
        entries
            .into_iter()
            .zip(levels)
            .map(|(entry, new_stock)| {
                let transaction = InventoryTransaction {
                    id: TransactionId::new(),
                    product_id: entry.product_id,
                    kind: entry.kind(),
                    quantity: entry.quantity(),
                    delta: entry.delta,
                    reference_number: entry.reference_number,
                    performed_by: entry.performed_by,
                    notes: entry.notes,
                    recorded_at: now,
                };
                // Product presence was established by check_entries.
                if let Some(product) = state.products.get_mut(&transaction.product_id) {
                    product.stock_level = *new_stock;
                }
                let recorded = Recorded {
                    transaction_id: transaction.id,
                    new_stock: *new_stock,
                };
                state.transactions.push(transaction);
                recorded
            })
            .collect()
    }

    fn transactions_matching<F>(&self, keep: F) -> DomainResult<Vec<InventoryTransaction>>
    where
        F: Fn(&InventoryTransaction) -> bool,
    {
        let state = self.read()?;
        let mut matched: Vec<InventoryTransaction> =
            state.transactions.iter().filter(|t| keep(t)).cloned().collect();
        matched.reverse();
        Ok(matched)
    }
}

impl StockLedger for InMemoryStore {
    fn record(&self, entry: LedgerEntry) -> DomainResult<Recorded> {
        let mut recorded = self.record_all(vec![entry])?;
        Ok(recorded.remove(0))
    }

    fn record_all(&self, entries: Vec<LedgerEntry>) -> DomainResult<Vec<Recorded>> {
        let mut state = self.write()?;
        let levels = Self::check_entries(&state, &entries)?;
        Ok(Self::apply_entries(&mut state, entries, &levels))
    }

    fn record_with<F>(&self, product_id: ProductId, build: F) -> DomainResult<Recorded>
    where
        F: FnOnce(i64) -> DomainResult<LedgerEntry>,
    {
        let mut state = self.write()?;
        let current = state
            .products
            .get(&product_id)
            .ok_or(DomainError::NotFound)?
            .stock_level;
        let entries = vec![build(current)?];
        let levels = Self::check_entries(&state, &entries)?;
        let mut recorded = Self::apply_entries(&mut state, entries, &levels);
        Ok(recorded.remove(0))
    }

    fn current_stock(&self, product_id: ProductId) -> DomainResult<i64> {
        Ok(self.product(product_id)?.stock_level)
    }

    fn history_for(&self, product_id: ProductId) -> DomainResult<Vec<InventoryTransaction>> {
        // Distinguish "no product" from "no history".
        self.product(product_id)?;
        self.transactions_matching(|t| t.product_id == product_id)
    }

    fn transactions(&self) -> DomainResult<Vec<InventoryTransaction>> {
        self.transactions_matching(|_| true)
    }

    fn transactions_of_kind(
        &self,
        kind: TransactionKind,
    ) -> DomainResult<Vec<InventoryTransaction>> {
        self.transactions_matching(|t| t.kind == kind)
    }
}

impl OrderStore for InMemoryStore {
    fn insert_order(&self, order: Order) -> DomainResult<()> {
        let mut state = self.write()?;
        if state.orders.contains_key(&order.id) {
            return Err(DomainError::validation("order already exists"));
        }
        state.orders.insert(order.id, order);
        Ok(())
    }

    fn order(&self, order_id: OrderId) -> DomainResult<Order> {
        self.read()?
            .orders
            .get(&order_id)
            .cloned()
            .ok_or(DomainError::NotFound)
    }

    fn order_by_code(&self, code: &str) -> DomainResult<Order> {
        self.read()?
            .orders
            .values()
            .find(|o| o.order_code == code)
            .cloned()
            .ok_or(DomainError::NotFound)
    }

    fn orders(&self) -> DomainResult<Vec<Order>> {
        let mut orders: Vec<Order> = self.read()?.orders.values().cloned().collect();
        orders.sort_by(|a, b| b.ordered_at.cmp(&a.ordered_at));
        Ok(orders)
    }

    fn orders_with_status(&self, status: OrderStatus) -> DomainResult<Vec<Order>> {
        Ok(self
            .orders()?
            .into_iter()
            .filter(|o| o.status == status)
            .collect())
    }

    fn orders_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> DomainResult<Vec<Order>> {
        Ok(self
            .orders()?
            .into_iter()
            .filter(|o| o.ordered_at >= start && o.ordered_at <= end)
            .collect())
    }

    fn set_status(
        &self,
        order_id: OrderId,
        status: OrderStatus,
        staff_id: Option<StaffId>,
    ) -> DomainResult<()> {
        let mut state = self.write()?;
        let order = state.orders.get_mut(&order_id).ok_or(DomainError::NotFound)?;
        // The caller validated against a snapshot; a concurrent change may
        // have landed since, so the transition is re-checked under the write
        // guard against the status actually stored.
        order.transition_to(status)?;
        order.status = status;
        order.staff_checked_id = staff_id;
        Ok(())
    }
}

impl PaymentStore for InMemoryStore {
    fn payment_for(&self, order_id: OrderId) -> DomainResult<Option<Payment>> {
        Ok(self.read()?.payments.get(&order_id).cloned())
    }
}

impl CancellationStore for InMemoryStore {
    /// Commit a cancellation as one unit.
    ///
    /// Guards are re-checked under the write lock: the workflow validated
    /// against a snapshot, and a concurrent transition may have landed since.
    /// Nothing is applied until every restoration has been checked.
    fn commit_cancellation(&self, plan: CancellationPlan) -> DomainResult<()> {
        let mut state = self.write()?;

        let order = state.orders.get(&plan.order_id).ok_or(DomainError::NotFound)?;
        order.cancellation_guard()?;

        let levels = Self::check_entries(&state, &plan.restorations)?;
        if let Some(payment_id) = plan.fail_payment {
            let payment = state
                .payments
                .get(&plan.order_id)
                .filter(|p| p.id == payment_id)
                .ok_or(DomainError::NotFound)?;
            // Already-settled payments are left alone even if the plan is stale.
            if payment.status != PaymentStatus::Pending {
                return Err(DomainError::persistence(
                    "payment status changed during cancellation",
                ));
            }
        }

        // Validation complete; apply everything.
        Self::apply_entries(&mut state, plan.restorations, &levels);
        if let Some(order) = state.orders.get_mut(&plan.order_id) {
            order.status = OrderStatus::Cancelled;
            order.staff_checked_id = Some(plan.staff_id);
        }
        if plan.fail_payment.is_some() {
            if let Some(payment) = state.payments.get_mut(&plan.order_id) {
                payment.status = PaymentStatus::Failed;
            }
        }
        Ok(())
    }
}
