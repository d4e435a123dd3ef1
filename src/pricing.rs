use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::types::PaymentPlan;

/// result shape of the remote pricing oracle, consumed as data at purchase
/// time; this crate never computes or requests a quote itself
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub cost: Money,
    pub multi_course_discount: Money,
    pub promo_discount: Money,
    pub shipping_discount: Money,
    pub discounted_cost: Money,
    pub full: PlanQuote,
    pub part: PlanQuote,
}

/// per-plan terms inside a quote
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanQuote {
    pub deposit: Money,
    pub installment_size: Money,
    pub installments: u32,
    pub remainder: Money,
    pub total: Money,
}

impl Quote {
    /// sum of all discount components
    pub fn total_discount(&self) -> Money {
        self.multi_course_discount + self.promo_discount + self.shipping_discount
    }

    /// terms for the chosen payment plan
    pub fn plan(&self, plan: PaymentPlan) -> &PlanQuote {
        match plan {
            PaymentPlan::Full => &self.full,
            PaymentPlan::Accelerated | PaymentPlan::Extended => &self.part,
        }
    }
}
