use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::enrollment::{Enrollment, Transaction};
use crate::errors::{BillingError, Result};
use crate::schedule;

/// display metadata derived from an enrollment's ledger; recomputed from
/// scratch on every load and after every fold
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BillingMeta {
    pub discounted_cost: Money,
    pub balance: Money,
    pub next_installment: Option<NaiveDateTime>,
}

/// derive cost, balance, and next installment date for an enrollment
pub fn compute_meta(enrollment: &Enrollment, now: NaiveDateTime) -> BillingMeta {
    BillingMeta {
        discounted_cost: enrollment.discounted_cost(),
        balance: enrollment.outstanding_balance(),
        next_installment: schedule::next_installment_date(enrollment, now),
    }
}

/// pure ledger reducer: returns a new enrollment with the transaction
/// appended, leaving the input untouched. Folding a transaction that
/// belongs to a different enrollment is a caller contract breach.
pub fn fold_transaction(enrollment: &Enrollment, transaction: Transaction) -> Result<Enrollment> {
    if transaction.enrollment_id != enrollment.id {
        return Err(BillingError::EnrollmentMismatch {
            expected: enrollment.id,
            actual: transaction.enrollment_id,
        });
    }

    let mut next = enrollment.clone();
    next.transactions.push(transaction);
    Ok(next)
}
