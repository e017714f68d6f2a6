//! `voltmart-orders` — order lifecycle domain and workflow.
//!
//! The domain model (`Order`, `OrderStatus`, `CancellationPlan`) makes all
//! decisions; the workflow wires those decisions to store traits and never
//! re-derives them.

pub mod order;
pub mod workflow;

pub use order::{
    CancellationPlan, LineItem, Order, OrderDetail, OrderStatus, Payment, PaymentStatus,
};
pub use workflow::{CancellationStore, OrderStore, OrderWorkflow, PaymentStore};
