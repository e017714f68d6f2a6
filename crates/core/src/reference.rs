//! Human-facing reference numbers for orders and inventory paperwork.
//!
//! Shape: `{PREFIX}-{yyyyMMdd}-{4 uppercase hex chars}`, e.g.
//! `GRN-20260829-A41F`. The random suffix comes from a fresh UUID, so
//! references are unique enough in practice without a global uniqueness
//! check.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Document family a reference number belongs to.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum ReferencePrefix {
    /// Order code.
    Ord,
    /// Goods-received note (stock in).
    Grn,
    /// Goods-delivery note (stock out).
    Gdn,
    /// Manual stock adjustment.
    Adj,
}

impl ReferencePrefix {
    pub fn as_str(self) -> &'static str {
        match self {
            ReferencePrefix::Ord => "ORD",
            ReferencePrefix::Grn => "GRN",
            ReferencePrefix::Gdn => "GDN",
            ReferencePrefix::Adj => "ADJ",
        }
    }
}

impl core::fmt::Display for ReferencePrefix {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Generate a reference number dated `on`.
///
/// The date is a parameter (not read from the clock) so callers can thread a
/// single `now` through a multi-entry operation and tests stay deterministic.
pub fn reference_number(prefix: ReferencePrefix, on: DateTime<Utc>) -> String {
    let suffix = Uuid::new_v4().simple().to_string()[..4].to_uppercase();
    format!("{}-{}-{}", prefix, on.format("%Y%m%d"), suffix)
}
