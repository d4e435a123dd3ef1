use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::decimal::Money;
use crate::errors::{BillingError, Result};
use crate::pricing::Quote;
use crate::types::{
    EnrollmentId, PaymentFrequency, PaymentMethodId, PaymentPlan, TransactionId, TransactionType,
};

/// one student's purchase of one course
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enrollment {
    // identification
    pub id: EnrollmentId,
    pub course_id: Uuid,
    pub student_id: Uuid,

    // pricing, fixed by the oracle at purchase time
    pub cost: Money,
    pub discount: Money,
    pub installment: Money,

    // schedule configuration
    pub payment_plan: PaymentPlan,
    pub payment_frequency: PaymentFrequency,
    pub payment_day: Option<u8>,
    pub payment_start: Option<NaiveDateTime>,

    // owned collections, append-only from this crate's point of view
    pub transactions: Vec<Transaction>,
    pub payment_methods: Vec<PaymentMethod>,
}

/// one ledger entry, immutable once created
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,
    pub enrollment_id: EnrollmentId,
    /// amount actually applied to the balance
    pub amount: Money,
    /// amount requested; may differ on partial capture
    pub attempted_amount: Money,
    /// excluded from principal balance when set (rush fees and the like)
    pub extra_charge: bool,
    pub transaction_type: TransactionType,
    pub voided: bool,
    pub parent_id: Option<TransactionId>,
    pub posted_at: NaiveDateTime,
}

/// a stored tokenized payment instrument, never mutated here
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentMethod {
    pub id: PaymentMethodId,
    pub primary: bool,
    pub expiry_month: Option<u32>,
    pub expiry_year: Option<i32>,
    pub deleted: bool,
    pub disabled: bool,
    // display-only fields carried for the view layer
    pub brand: String,
    pub last_four: String,
}

impl Enrollment {
    /// create an enrollment from an oracle quote, persisting the chosen
    /// plan's pricing fields
    pub fn from_quote(
        course_id: Uuid,
        student_id: Uuid,
        quote: &Quote,
        payment_plan: PaymentPlan,
        payment_frequency: PaymentFrequency,
        payment_day: Option<u8>,
        payment_start: Option<NaiveDateTime>,
    ) -> Result<Self> {
        if let Some(day) = payment_day {
            if day == 0 || day > 31 {
                return Err(BillingError::InvalidBillingDay { day });
            }
        }

        let terms = quote.plan(payment_plan);

        Ok(Self {
            id: Uuid::new_v4(),
            course_id,
            student_id,
            cost: quote.cost,
            discount: quote.total_discount(),
            installment: terms.installment_size,
            payment_plan,
            payment_frequency,
            payment_day,
            payment_start,
            transactions: Vec::new(),
            payment_methods: Vec::new(),
        })
    }

    /// cost net of the purchase-time discount
    pub fn discounted_cost(&self) -> Money {
        self.cost - self.discount
    }

    /// sum of applied amounts over all non-extra-charge entries, in append
    /// order; reversals are expected to carry negative amounts upstream
    pub fn amount_paid(&self) -> Money {
        self.transactions
            .iter()
            .filter(|t| !t.extra_charge)
            .map(|t| t.amount)
            .sum()
    }

    /// outstanding principal balance; negative means overpayment
    pub fn outstanding_balance(&self) -> Money {
        self.discounted_cost() - self.amount_paid()
    }
}
