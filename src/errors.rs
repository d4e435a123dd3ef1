use thiserror::Error;

use crate::types::{ChargePhase, EnrollmentId};

#[derive(Error, Debug)]
pub enum BillingError {
    #[error("transaction belongs to enrollment {actual}, expected {expected}")]
    EnrollmentMismatch {
        expected: EnrollmentId,
        actual: EnrollmentId,
    },

    #[error("no charge in flight: current phase is {phase:?}")]
    ChargeNotInFlight {
        phase: ChargePhase,
    },

    #[error("invalid billing day: {day}")]
    InvalidBillingDay {
        day: u8,
    },
}

pub type Result<T> = std::result::Result<T, BillingError>;
