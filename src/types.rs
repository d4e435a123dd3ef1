use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// unique identifier for an enrollment
pub type EnrollmentId = Uuid;

/// unique identifier for a ledger transaction
pub type TransactionId = Uuid;

/// unique identifier for a stored payment method
pub type PaymentMethodId = Uuid;

/// payment plan chosen at purchase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentPlan {
    /// paid in full up front, no recurring schedule
    Full,
    /// shortened installment schedule
    Accelerated,
    /// lengthened installment schedule
    Extended,
}

/// cadence of automatic installments
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentFrequency {
    Monthly,
    Weekly,
    BiWeekly,
}

/// ledger entry classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionType {
    Charge,
    Refund,
    Chargeback,
    NsfFee,
    Void,
}

/// charge attempt lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChargePhase {
    /// no attempt started
    Idle,
    /// gateway call outstanding
    Processing,
    /// attempt settled, ledger updated
    Success,
    /// gateway refused, ledger updated, retry permitted
    Declined,
    /// transport or validation failure, ledger untouched, retry permitted
    Error,
}

impl ChargePhase {
    /// phases from which a new charge may be dispatched
    pub fn can_launch(&self) -> bool {
        matches!(self, ChargePhase::Idle | ChargePhase::Declined | ChargePhase::Error)
    }

    /// a charge is outstanding
    pub fn is_in_flight(&self) -> bool {
        matches!(self, ChargePhase::Processing)
    }
}
