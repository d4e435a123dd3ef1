use chrono::{Datelike, NaiveDate};

use crate::enrollment::PaymentMethod;
use crate::types::PaymentMethodId;

/// whether a stored payment method may be charged right now; a card
/// expiring in the current month is still eligible
pub fn is_eligible(method: &PaymentMethod, today: NaiveDate) -> bool {
    if method.deleted || method.disabled {
        return false;
    }

    match (method.expiry_year, method.expiry_month) {
        (Some(year), Some(month)) => (year, month) >= (today.year(), today.month()),
        _ => false,
    }
}

/// the method designated primary by the external store, without
/// re-validating that designation; None when nothing is marked primary
pub fn auto_select(methods: &[PaymentMethod]) -> Option<PaymentMethodId> {
    methods.iter().find(|m| m.primary).map(|m| m.id)
}
