use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use voltmart_core::{
    AddressId, CustomerId, DomainError, DomainResult, OrderId, PaymentId, ProductId,
    ReferencePrefix, StaffId, reference_number,
};
use voltmart_inventory::{LedgerEntry, TransactionKind};
use voltmart_pricing::{PricedLine, order_totals};

/// Order status lifecycle.
///
/// Allowed transitions (everything else is rejected):
///
/// ```text
/// Pending    -> Processing, Cancelled
/// Processing -> Shipped, Cancelled
/// Shipped    -> Delivered
/// Delivered  -> (terminal)
/// Cancelled  -> (terminal)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderStatus {
    Pending,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 5] = [
        OrderStatus::Pending,
        OrderStatus::Processing,
        OrderStatus::Shipped,
        OrderStatus::Delivered,
        OrderStatus::Cancelled,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Pending => "Pending",
            OrderStatus::Processing => "Processing",
            OrderStatus::Shipped => "Shipped",
            OrderStatus::Delivered => "Delivered",
            OrderStatus::Cancelled => "Cancelled",
        }
    }

    /// Statuses this one may move to. Static data, not string comparison.
    pub fn allowed_next(self) -> &'static [OrderStatus] {
        match self {
            OrderStatus::Pending => &[OrderStatus::Processing, OrderStatus::Cancelled],
            OrderStatus::Processing => &[OrderStatus::Shipped, OrderStatus::Cancelled],
            OrderStatus::Shipped => &[OrderStatus::Delivered],
            OrderStatus::Delivered | OrderStatus::Cancelled => &[],
        }
    }

    pub fn can_transition_to(self, next: OrderStatus) -> bool {
        self.allowed_next().contains(&next)
    }

    pub fn is_terminal(self) -> bool {
        self.allowed_next().is_empty()
    }
}

impl core::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payment lifecycle, as far as this core consumes it: cancellation moves a
/// Pending payment to Failed and touches nothing else.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentStatus {
    Pending,
    Completed,
    Failed,
    Refunded,
}

/// Payment attached to an order (collaborator shape; never created here).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    pub id: PaymentId,
    pub order_id: OrderId,
    pub amount: Decimal,
    pub status: PaymentStatus,
}

/// Caller-supplied input for one order line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub product_id: ProductId,
    /// Price snapshot at order time.
    pub unit_price: Decimal,
    pub quantity: u32,
}

/// One line of a placed order. Immutable once created; no partial-line edits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderDetail {
    pub product_id: ProductId,
    pub unit_price: Decimal,
    pub quantity: u32,
    pub line_total: Decimal,
}

/// A customer order with its line items and computed totals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    /// Externally visible reference, `ORD-{yyyyMMdd}-{4 chars}`.
    pub order_code: String,
    pub customer_id: CustomerId,
    pub shipping_address_id: AddressId,
    pub sub_total: Decimal,
    pub tax: Decimal,
    pub grand_total: Decimal,
    pub status: OrderStatus,
    /// Staff member who last changed the status, if any.
    pub staff_checked_id: Option<StaffId>,
    pub ordered_at: DateTime<Utc>,
    pub details: Vec<OrderDetail>,
}

/// Everything a cancellation changes, decided up front so the store can
/// commit it as one atomic unit: per-line stock restorations, the status
/// change, and the payment side effect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CancellationPlan {
    pub order_id: OrderId,
    pub staff_id: StaffId,
    pub restorations: Vec<LedgerEntry>,
    /// Payment to move from Pending to Failed, when one exists.
    pub fail_payment: Option<PaymentId>,
}

impl Order {
    /// Validate line items, compute totals, and build a Pending order.
    ///
    /// Placement does not touch the stock ledger; decrementing stock is the
    /// checkout caller's step.
    pub fn place(
        customer_id: CustomerId,
        shipping_address_id: AddressId,
        items: Vec<LineItem>,
        now: DateTime<Utc>,
    ) -> DomainResult<Self> {
        if items.is_empty() {
            return Err(DomainError::validation(
                "order must contain at least one line item",
            ));
        }
        for item in &items {
            if item.quantity == 0 {
                return Err(DomainError::invalid_quantity(
                    "line quantity must be greater than zero",
                ));
            }
            if item.unit_price < Decimal::ZERO {
                return Err(DomainError::validation("unit price cannot be negative"));
            }
        }

        let priced: Vec<PricedLine> = items
            .iter()
            .map(|i| PricedLine::new(i.unit_price, i.quantity))
            .collect();
        let totals = order_totals(&priced);

        let details = items
            .into_iter()
            .map(|i| OrderDetail {
                product_id: i.product_id,
                unit_price: i.unit_price,
                quantity: i.quantity,
                line_total: i.unit_price * Decimal::from(i.quantity),
            })
            .collect();

        Ok(Self {
            id: OrderId::new(),
            order_code: reference_number(ReferencePrefix::Ord, now),
            customer_id,
            shipping_address_id,
            sub_total: totals.sub_total,
            tax: totals.tax,
            grand_total: totals.grand_total,
            status: OrderStatus::Pending,
            staff_checked_id: None,
            ordered_at: now,
            details,
        })
    }

    /// Check a status change against the transition table.
    pub fn transition_to(&self, next: OrderStatus) -> DomainResult<()> {
        if !self.status.can_transition_to(next) {
            return Err(DomainError::invalid_transition(
                self.status.as_str(),
                next.as_str(),
            ));
        }
        Ok(())
    }

    /// Cancellation-specific guards, checked before anything is planned.
    pub fn cancellation_guard(&self) -> DomainResult<()> {
        match self.status {
            OrderStatus::Shipped | OrderStatus::Delivered => {
                Err(DomainError::CannotCancelShipped)
            }
            OrderStatus::Cancelled => Err(DomainError::AlreadyCancelled),
            OrderStatus::Pending | OrderStatus::Processing => Ok(()),
        }
    }

    /// Decide the full cancellation, without applying any of it.
    ///
    /// Each line becomes an IN-kind restoration entry; a Pending payment is
    /// marked for failure; any other payment status is left alone.
    pub fn cancellation_plan(
        &self,
        staff_id: StaffId,
        payment: Option<&Payment>,
        now: DateTime<Utc>,
    ) -> DomainResult<CancellationPlan> {
        self.cancellation_guard()?;

        let restorations = self
            .details
            .iter()
            .map(|detail| LedgerEntry {
                product_id: detail.product_id,
                delta: i64::from(detail.quantity),
                kind: None,
                reference_number: reference_number(
                    TransactionKind::In.reference_prefix(),
                    now,
                ),
                performed_by: staff_id,
                notes: format!(
                    "Stock restored: cancellation of order {}",
                    self.order_code
                ),
            })
            .collect();

        let fail_payment = payment
            .filter(|p| p.status == PaymentStatus::Pending)
            .map(|p| p.id);

        Ok(CancellationPlan {
            order_id: self.id,
            staff_id,
            restorations,
            fail_payment,
        })
    }
}
