pub mod charge;
pub mod decimal;
pub mod enrollment;
pub mod errors;
pub mod events;
pub mod ledger;
pub mod method;
pub mod pricing;
pub mod schedule;
pub mod types;
pub mod view;

// re-export key types
pub use charge::{ChargeRequest, ChargeSession, GatewayFailure, GatewayResponse, PaymentGateway};
pub use decimal::Money;
pub use enrollment::{Enrollment, PaymentMethod, Transaction};
pub use errors::{BillingError, Result};
pub use events::{Event, EventStore};
pub use ledger::{compute_meta, fold_transaction, BillingMeta};
pub use method::{auto_select, is_eligible};
pub use pricing::{PlanQuote, Quote};
pub use schedule::next_installment_date;
pub use types::{
    ChargePhase, EnrollmentId, PaymentFrequency, PaymentMethodId, PaymentPlan, TransactionId,
    TransactionType,
};
pub use view::{EnrollmentView, MethodView};

// re-export external dependencies that users will need
pub use chrono;
pub use hourglass_rs::{SafeTimeProvider, TimeSource};
pub use rust_decimal::Decimal;
pub use uuid::Uuid;
