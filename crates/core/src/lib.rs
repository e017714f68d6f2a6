//! `voltmart-core` — domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns).

pub mod error;
pub mod id;
pub mod reference;

pub use error::{DomainError, DomainResult};
pub use id::{AddressId, CustomerId, OrderId, PaymentId, ProductId, StaffId, TransactionId};
pub use reference::{ReferencePrefix, reference_number};
