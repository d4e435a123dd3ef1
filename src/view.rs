/// serializable views of billing state for the portal's view layer
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::enrollment::Enrollment;
use crate::ledger;
use crate::method;
use crate::types::{EnrollmentId, PaymentFrequency, PaymentMethodId, PaymentPlan};

/// flattened view of an enrollment's billing state
#[derive(Debug, Serialize, Deserialize)]
pub struct EnrollmentView {
    pub id: EnrollmentId,
    pub payment_plan: PaymentPlan,
    pub payment_frequency: PaymentFrequency,
    pub cost: String,
    pub discount: String,
    pub discounted_cost: String,
    pub balance: String,
    pub installment: String,
    pub next_installment: Option<NaiveDateTime>,
    pub transaction_count: usize,
    pub payment_methods: Vec<MethodView>,
}

/// one stored method with its eligibility resolved for display
#[derive(Debug, Serialize, Deserialize)]
pub struct MethodView {
    pub id: PaymentMethodId,
    pub brand: String,
    pub last_four: String,
    pub primary: bool,
    pub eligible: bool,
}

impl EnrollmentView {
    pub fn from_enrollment(enrollment: &Enrollment, now: NaiveDateTime) -> Self {
        let meta = ledger::compute_meta(enrollment, now);
        let today = now.date();

        EnrollmentView {
            id: enrollment.id,
            payment_plan: enrollment.payment_plan,
            payment_frequency: enrollment.payment_frequency,
            cost: enrollment.cost.to_fixed_string(),
            discount: enrollment.discount.to_fixed_string(),
            discounted_cost: meta.discounted_cost.to_fixed_string(),
            balance: meta.balance.to_fixed_string(),
            installment: enrollment.installment.to_fixed_string(),
            next_installment: meta.next_installment,
            transaction_count: enrollment.transactions.len(),
            payment_methods: enrollment
                .payment_methods
                .iter()
                .map(|m| MethodView {
                    id: m.id,
                    brand: m.brand.clone(),
                    last_four: m.last_four.clone(),
                    primary: m.primary,
                    eligible: method::is_eligible(m, today),
                })
                .collect(),
        }
    }

    /// convert to pretty-printed json string
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
