//! Order lifecycle orchestration over store traits.
//!
//! The workflow keeps decisions in the pure domain model (`Order`) and hands
//! the store complete, already-validated mutations. Cancellation in
//! particular is committed as one unit: the store applies every stock
//! restoration, the status change, and the payment flip together or not at
//! all.

use chrono::{DateTime, Utc};

use voltmart_core::{AddressId, CustomerId, DomainResult, OrderId, StaffId};

use crate::order::{CancellationPlan, LineItem, Order, OrderStatus, Payment};

/// Order persistence, consumed by the workflow.
pub trait OrderStore {
    fn insert_order(&self, order: Order) -> DomainResult<()>;

    /// Load an order with its line items. `NotFound` when absent.
    fn order(&self, order_id: OrderId) -> DomainResult<Order>;

    fn order_by_code(&self, code: &str) -> DomainResult<Order>;

    fn orders(&self) -> DomainResult<Vec<Order>>;

    fn orders_with_status(&self, status: OrderStatus) -> DomainResult<Vec<Order>>;

    /// Orders placed in the inclusive range `[start, end]`.
    fn orders_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> DomainResult<Vec<Order>>;

    /// Persist a status change with optional staff attribution.
    ///
    /// Implementations must re-check the transition against the status they
    /// actually hold at write time, not trust the caller's snapshot, and
    /// reject with `InvalidTransition` when a concurrent change has landed
    /// in between.
    fn set_status(
        &self,
        order_id: OrderId,
        status: OrderStatus,
        staff_id: Option<StaffId>,
    ) -> DomainResult<()>;
}

/// Payment lookup, consumed only by cancellation.
pub trait PaymentStore {
    fn payment_for(&self, order_id: OrderId) -> DomainResult<Option<Payment>>;
}

/// Atomic cancellation commit: stock restorations, status change, and the
/// payment side effect apply together or not at all.
pub trait CancellationStore {
    fn commit_cancellation(&self, plan: CancellationPlan) -> DomainResult<()>;
}

impl<T: OrderStore + ?Sized> OrderStore for &T {
    fn insert_order(&self, order: Order) -> DomainResult<()> {
        (**self).insert_order(order)
    }

    fn order(&self, order_id: OrderId) -> DomainResult<Order> {
        (**self).order(order_id)
    }

    fn order_by_code(&self, code: &str) -> DomainResult<Order> {
        (**self).order_by_code(code)
    }

    fn orders(&self) -> DomainResult<Vec<Order>> {
        (**self).orders()
    }

    fn orders_with_status(&self, status: OrderStatus) -> DomainResult<Vec<Order>> {
        (**self).orders_with_status(status)
    }

    fn orders_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> DomainResult<Vec<Order>> {
        (**self).orders_between(start, end)
    }

    fn set_status(
        &self,
        order_id: OrderId,
        status: OrderStatus,
        staff_id: Option<StaffId>,
    ) -> DomainResult<()> {
        (**self).set_status(order_id, status, staff_id)
    }
}

impl<T: PaymentStore + ?Sized> PaymentStore for &T {
    fn payment_for(&self, order_id: OrderId) -> DomainResult<Option<Payment>> {
        (**self).payment_for(order_id)
    }
}

impl<T: CancellationStore + ?Sized> CancellationStore for &T {
    fn commit_cancellation(&self, plan: CancellationPlan) -> DomainResult<()> {
        (**self).commit_cancellation(plan)
    }
}

/// Order placement, status transitions, and cancellation.
#[derive(Debug)]
pub struct OrderWorkflow<S> {
    store: S,
}

impl<S> OrderWorkflow<S>
where
    S: OrderStore + PaymentStore + CancellationStore,
{
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Validate line items, compute totals, and persist a Pending order.
    pub fn place_order(
        &self,
        customer_id: CustomerId,
        shipping_address_id: AddressId,
        items: Vec<LineItem>,
    ) -> DomainResult<Order> {
        let order = Order::place(customer_id, shipping_address_id, items, Utc::now())?;
        self.store.insert_order(order.clone())?;
        tracing::info!(
            order_code = %order.order_code,
            lines = order.details.len(),
            grand_total = %order.grand_total,
            "order placed"
        );
        Ok(order)
    }

    /// Move an order to `new_status` if the transition table allows it.
    pub fn update_status(
        &self,
        order_id: OrderId,
        new_status: OrderStatus,
        staff_id: Option<StaffId>,
    ) -> DomainResult<()> {
        let order = self.store.order(order_id)?;
        order.transition_to(new_status)?;
        self.store.set_status(order_id, new_status, staff_id)?;
        tracing::info!(
            order_code = %order.order_code,
            from = %order.status,
            to = %new_status,
            "order status updated"
        );
        Ok(())
    }

    /// Cancel an order: restore stock for every line, mark the order
    /// Cancelled, and fail a Pending payment, all as one atomic unit.
    pub fn cancel_order(&self, order_id: OrderId, staff_id: StaffId) -> DomainResult<()> {
        let order = self.store.order(order_id)?;
        let payment = self.store.payment_for(order_id)?;
        let plan = order.cancellation_plan(staff_id, payment.as_ref(), Utc::now())?;
        let restored_lines = plan.restorations.len();
        self.store.commit_cancellation(plan)?;
        tracing::info!(
            order_code = %order.order_code,
            restored_lines,
            "order cancelled"
        );
        Ok(())
    }

    pub fn order(&self, order_id: OrderId) -> DomainResult<Order> {
        self.store.order(order_id)
    }

    pub fn order_by_code(&self, code: &str) -> DomainResult<Order> {
        self.store.order_by_code(code)
    }

    pub fn orders(&self) -> DomainResult<Vec<Order>> {
        self.store.orders()
    }

    pub fn orders_with_status(&self, status: OrderStatus) -> DomainResult<Vec<Order>> {
        self.store.orders_with_status(status)
    }

    pub fn orders_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> DomainResult<Vec<Order>> {
        self.store.orders_between(start, end)
    }

    pub fn payment_for(&self, order_id: OrderId) -> DomainResult<Option<Payment>> {
        self.store.payment_for(order_id)
    }
}
