use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use voltmart_core::{ProductId, ReferencePrefix, StaffId, TransactionId};

/// Direction of a stock movement.
///
/// Closed enum instead of the `"IN"`/`"OUT"`/`"ADJUST"` strings the records
/// carry on the wire, so an unrecognized kind is unrepresentable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionKind {
    In,
    Out,
    Adjust,
}

impl TransactionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            TransactionKind::In => "IN",
            TransactionKind::Out => "OUT",
            TransactionKind::Adjust => "ADJUST",
        }
    }

    /// Kind implied by the sign of a delta, when the caller does not ask for
    /// an explicit adjustment.
    pub fn for_delta(delta: i64) -> Self {
        if delta >= 0 {
            TransactionKind::In
        } else {
            TransactionKind::Out
        }
    }

    /// Document family for this kind's reference numbers
    /// (GRN for receipts, GDN for deliveries, ADJ for adjustments).
    pub fn reference_prefix(self) -> ReferencePrefix {
        match self {
            TransactionKind::In => ReferencePrefix::Grn,
            TransactionKind::Out => ReferencePrefix::Gdn,
            TransactionKind::Adjust => ReferencePrefix::Adj,
        }
    }
}

impl core::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One immutable entry in the stock audit trail.
///
/// `quantity` is the absolute number of units moved; `delta` is the signed
/// change that was applied to the product's stock counter (so the running
/// counter always equals the sum of `delta` over a product's transactions,
/// including negative adjustments). Never updated or deleted once written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryTransaction {
    pub id: TransactionId,
    pub product_id: ProductId,
    pub kind: TransactionKind,
    pub quantity: u64,
    pub delta: i64,
    pub reference_number: String,
    pub performed_by: StaffId,
    pub notes: String,
    pub recorded_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_follows_delta_sign() {
        assert_eq!(TransactionKind::for_delta(5), TransactionKind::In);
        assert_eq!(TransactionKind::for_delta(-5), TransactionKind::Out);
    }

    #[test]
    fn kinds_map_to_their_document_prefixes() {
        assert_eq!(
            TransactionKind::In.reference_prefix(),
            ReferencePrefix::Grn
        );
        assert_eq!(
            TransactionKind::Out.reference_prefix(),
            ReferencePrefix::Gdn
        );
        assert_eq!(
            TransactionKind::Adjust.reference_prefix(),
            ReferencePrefix::Adj
        );
    }
}
